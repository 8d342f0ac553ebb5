use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use shared::{domain::Announcement, error::DashboardResult, protocol::WebhookPayload};
use tracing::{error, info, warn};

pub mod aggregate;
pub mod charts;
pub mod documents;
pub mod format;
pub mod notifications;
pub mod render;
pub mod schema;
pub mod sheets;
pub mod state;
pub mod weather;
pub mod webhook;

pub use aggregate::{aggregate, Aggregates, DashboardTotals};
pub use notifications::NotificationQueue;
pub use sheets::{SheetSource, SheetsClient, UnconfiguredSheetSource};
pub use state::DashboardState;
pub use weather::{WeatherClient, WeatherWidget};
pub use webhook::{AnnouncementForm, IdeaForm, SubmitOutcome, WebhookClient};

use schema::{map_grid, map_row, Field};

const HOURS_READ_FAILED: &str = "Impossible de lire les heures (voir console).";
const ANNOUNCEMENTS_READ_FAILED: &str = "Impossible de lire les annonces (voir console).";
const WEBHOOK_NOT_CONFIGURED: &str = "Webhook non configuré : voir console pour les données.";
const WEBHOOK_FAILED: &str = "Échec de l'envoi : vérifier la console.";
const ANNOUNCEMENT_SENT: &str = "Annonce envoyée pour validation.";
const IDEA_SENT: &str = "Merci ! Votre idée a été transmise.";

/// Named ranges read from the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRanges {
    pub hours: String,
    pub announcements: String,
}

/// Outcome of one fetch per data source, after both have settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub hours_ok: bool,
    pub announcements_ok: bool,
}

/// Page controller: owns the dashboard state and wires fetchers, the
/// aggregator and the submitters together.
///
/// Every operation is fenced: failures are logged and become notifications,
/// and the state belonging to a failed fetch keeps its previous value.
/// Overlapping refreshes are neither merged nor cancelled; whichever applies
/// last wins.
pub struct Dashboard {
    sheets: Arc<dyn SheetSource>,
    webhook: WebhookClient,
    ranges: SheetRanges,
    pub state: DashboardState,
}

impl Dashboard {
    pub fn new(sheets: Arc<dyn SheetSource>, webhook: WebhookClient, ranges: SheetRanges) -> Self {
        Self {
            sheets,
            webhook,
            ranges,
            state: DashboardState::default(),
        }
    }

    /// Fetches hours and announcements concurrently, then runs the
    /// post-refresh step once both have settled.
    pub async fn fetch_all(&mut self) -> RefreshReport {
        let sheets = self.sheets.clone();
        let (hours, announcements) = futures::join!(
            sheets.fetch_range(&self.ranges.hours),
            sheets.fetch_range(&self.ranges.announcements),
        );
        let report = RefreshReport {
            hours_ok: self.apply_hours(hours),
            announcements_ok: self.apply_announcements(announcements),
        };
        self.refresh_notifications();
        report
    }

    pub async fn fetch_hours(&mut self) -> bool {
        let grid = self.sheets.fetch_range(&self.ranges.hours).await;
        self.apply_hours(grid)
    }

    pub async fn fetch_announcements(&mut self) -> bool {
        let grid = self.sheets.fetch_range(&self.ranges.announcements).await;
        self.apply_announcements(grid)
    }

    /// An empty grid leaves the previous rows in place.
    pub fn apply_hours(&mut self, grid: DashboardResult<Vec<Vec<String>>>) -> bool {
        match grid {
            Ok(grid) if grid.is_empty() => {
                info!(range = %self.ranges.hours, "hours range is empty");
                true
            }
            Ok(grid) => {
                self.state.rows = map_grid(&grid);
                self.state.aggregates = aggregate(&self.state.rows);
                info!(
                    rows = self.state.rows.len(),
                    collaborators = self.state.aggregates.collaborators.len(),
                    clients = self.state.aggregates.clients.len(),
                    "hours aggregated"
                );
                true
            }
            Err(error) => {
                error!(%error, range = %self.ranges.hours, "failed to read hours");
                self.state.notifications.notify(HOURS_READ_FAILED, false);
                false
            }
        }
    }

    pub fn apply_announcements(&mut self, grid: DashboardResult<Vec<Vec<String>>>) -> bool {
        match grid {
            Ok(grid) => {
                self.state.announcements = announcements_from_grid(&grid);
                info!(
                    announcements = self.state.announcements.len(),
                    "announcements loaded"
                );
                if let Some(latest) = self.state.announcements.first() {
                    let message = format!("Nouvelle annonce : {}", latest.title);
                    self.state.notifications.notify(message, true);
                }
                true
            }
            Err(error) => {
                error!(%error, range = %self.ranges.announcements, "failed to read announcements");
                self.state.notifications.notify(ANNOUNCEMENTS_READ_FAILED, false);
                false
            }
        }
    }

    fn refresh_notifications(&self) {
        let visible: Vec<&str> = self.state.notifications.visible().collect();
        info!(notifications = ?visible, "dashboard refreshed");
    }

    pub async fn submit_announcement(&mut self, form: AnnouncementForm) -> SubmitOutcome {
        let Some(payload) = form.into_payload(Utc::now()) else {
            return SubmitOutcome::Rejected;
        };
        let outcome = self.submit(&payload).await;
        self.state.notifications.notify(ANNOUNCEMENT_SENT, false);
        self.fetch_announcements().await;
        outcome
    }

    pub async fn submit_idea(&mut self, form: IdeaForm) -> SubmitOutcome {
        let Some(payload) = form.into_payload(Utc::now()) else {
            return SubmitOutcome::Rejected;
        };
        let outcome = self.submit(&payload).await;
        self.state.notifications.notify(IDEA_SENT, false);
        outcome
    }

    async fn submit(&mut self, payload: &WebhookPayload) -> SubmitOutcome {
        if !self.webhook.is_configured() {
            match serde_json::to_string(payload) {
                Ok(body) => {
                    warn!(kind = payload.kind(), payload = %body, "webhook not configured; payload not sent")
                }
                Err(error) => {
                    warn!(kind = payload.kind(), %error, "webhook not configured; payload not serializable")
                }
            }
            self.state.notifications.notify(WEBHOOK_NOT_CONFIGURED, false);
            return SubmitOutcome::NotConfigured;
        }
        match self.webhook.post(payload).await {
            Ok(()) => {
                info!(kind = payload.kind(), "webhook submission accepted");
                SubmitOutcome::Sent
            }
            Err(error) => {
                error!(%error, kind = payload.kind(), "webhook submission failed");
                self.state.notifications.notify(WEBHOOK_FAILED, false);
                SubmitOutcome::Failed
            }
        }
    }
}

/// Announcements with a title, newest first. Rows without a date are stamped
/// with the current time; dates that do not parse sort last.
pub fn announcements_from_grid(grid: &[Vec<String>]) -> Vec<Announcement> {
    let headers: &[String] = grid.first().map(Vec::as_slice).unwrap_or_default();
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut announcements: Vec<Announcement> = grid
        .iter()
        .skip(1)
        .map(|row| map_row(headers, row))
        .filter_map(|record| {
            let title = Field::Title.resolve(&record)?.to_string();
            Some(Announcement {
                title,
                author: Field::Author.resolve_or(&record, "").to_string(),
                text: Field::Text.resolve_or(&record, "").to_string(),
                created_at: Field::CreatedAt.resolve_or(&record, &now).to_string(),
            })
        })
        .collect();

    announcements.sort_by_cached_key(|item| {
        std::cmp::Reverse(format::parse_timestamp(&item.created_at))
    });
    announcements
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
