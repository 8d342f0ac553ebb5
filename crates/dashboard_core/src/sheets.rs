use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::{DashboardError, DashboardResult},
    protocol::ValueRangeResponse,
};
use tracing::debug;
use url::Url;

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// A source of 2-D string grids addressed by named cell range.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Header row first. An empty range is `Ok` with no rows.
    async fn fetch_range(&self, range: &str) -> DashboardResult<Vec<Vec<String>>>;
}

/// Stands in when the sheet id or API key is missing.
pub struct UnconfiguredSheetSource {
    pub missing: &'static str,
}

#[async_trait]
impl SheetSource for UnconfiguredSheetSource {
    async fn fetch_range(&self, _range: &str) -> DashboardResult<Vec<Vec<String>>> {
        Err(DashboardError::MissingConfig(self.missing))
    }
}

/// Reads ranges through the spreadsheet `values` endpoint with an API key.
pub struct SheetsClient {
    http: Client,
    base_url: Url,
    sheet_id: String,
    api_key: String,
}

impl SheetsClient {
    pub fn new(
        base_url: &str,
        sheet_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> DashboardResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DashboardError::Validation(format!("invalid sheets base url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DashboardError::Validation(format!(
                "sheets base url '{base_url}' cannot carry a path"
            )));
        }
        Ok(Self {
            http: Client::new(),
            base_url,
            sheet_id: sheet_id.into(),
            api_key: api_key.into(),
        })
    }

    /// `{base}/{sheet_id}/values/{range}?key={api_key}`, with the range
    /// percent-encoded as a single path segment.
    pub fn range_url(&self, range: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&self.sheet_id)
                .push("values")
                .push(range);
        }
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }
}

#[async_trait]
impl SheetSource for SheetsClient {
    async fn fetch_range(&self, range: &str) -> DashboardResult<Vec<Vec<String>>> {
        let url = self.range_url(range);
        debug!(range, "fetching sheet range");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| DashboardError::fetch(range, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::fetch(
                range,
                format!("spreadsheet API error: {status}"),
            ));
        }

        let body: ValueRangeResponse = response
            .json()
            .await
            .map_err(|e| DashboardError::fetch(range, e))?;
        let grid = body.into_grid();
        debug!(range, rows = grid.len(), "sheet range fetched");
        Ok(grid)
    }
}

#[cfg(test)]
#[path = "tests/sheets_tests.rs"]
mod tests;
