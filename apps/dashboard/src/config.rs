use std::{fs, path::Path, sync::Arc};

use anyhow::Context;
use dashboard_core::{
    sheets::DEFAULT_SHEETS_BASE_URL, weather::DEFAULT_WEATHER_BASE_URL, SheetRanges, SheetSource,
    SheetsClient, UnconfiguredSheetSource, WeatherClient, WebhookClient,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";
const API_KEY_PLACEHOLDER_MARKER: &str = "VOTRE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sheet_id: String,
    pub api_key: String,
    pub open_weather_key: String,
    pub webhook_url: String,
    pub hours_range: String,
    pub announcements_range: String,
    pub ideas_range: String,
    pub sheets_base_url: String,
    pub weather_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sheet_id: "1uf2uOV_kNjq9k2FaWfyTvBPRy6FbieXuOiWLREbS140".into(),
            api_key: "VOTRE_CLE_API_GOOGLE".into(),
            open_weather_key: "VOTRE_CLE_OPENWEATHER".into(),
            webhook_url: "https://script.google.com/macros/s/XXXXXXXX/exec".into(),
            hours_range: "Comptes Rendu!A:E".into(),
            announcements_range: "Annonces!A:D".into(),
            ideas_range: "Idées!A:C".into(),
            sheets_base_url: DEFAULT_SHEETS_BASE_URL.into(),
            weather_base_url: DEFAULT_WEATHER_BASE_URL.into(),
        }
    }
}

impl Settings {
    fn overrides(&mut self) -> [(&'static str, &mut String); 9] {
        [
            ("SHEET_ID", &mut self.sheet_id),
            ("API_KEY", &mut self.api_key),
            ("OPEN_WEATHER_KEY", &mut self.open_weather_key),
            ("WEBHOOK_URL", &mut self.webhook_url),
            ("HOURS_RANGE", &mut self.hours_range),
            ("ANNOUNCEMENTS_RANGE", &mut self.announcements_range),
            ("IDEAS_RANGE", &mut self.ideas_range),
            ("SHEETS_BASE_URL", &mut self.sheets_base_url),
            ("WEATHER_BASE_URL", &mut self.weather_base_url),
        ]
    }

    pub fn ranges(&self) -> SheetRanges {
        SheetRanges {
            hours: self.hours_range.clone(),
            announcements: self.announcements_range.clone(),
        }
    }

    /// Falls back to a source that always reports the missing key, so the
    /// rest of the page still renders.
    pub fn sheet_source(&self) -> anyhow::Result<Arc<dyn SheetSource>> {
        let api_key = self.api_key.trim();
        if api_key.is_empty() || api_key.contains(API_KEY_PLACEHOLDER_MARKER) {
            tracing::warn!("API_KEY not configured; spreadsheet reads disabled");
            return Ok(Arc::new(UnconfiguredSheetSource { missing: "API_KEY" }));
        }
        if self.sheet_id.trim().is_empty() {
            tracing::warn!("SHEET_ID not configured; spreadsheet reads disabled");
            return Ok(Arc::new(UnconfiguredSheetSource {
                missing: "SHEET_ID",
            }));
        }
        let client = SheetsClient::new(&self.sheets_base_url, self.sheet_id.trim(), api_key)
            .context("invalid spreadsheet configuration")?;
        Ok(Arc::new(client))
    }

    pub fn webhook(&self) -> WebhookClient {
        WebhookClient::new(&self.webhook_url)
    }

    pub fn weather(&self) -> WeatherClient {
        WeatherClient::new(self.weather_base_url.clone(), &self.open_weather_key)
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("failed to serialize settings")
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the optional TOML file, then `KEY` and `APP__KEY`
/// environment variables (the prefixed form wins).
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Settings::default(),
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };

    for (key, slot) in settings.overrides() {
        if let Some(value) = env(key) {
            *slot = value;
        }
        if let Some(value) = env(&format!("APP__{key}")) {
            *slot = value;
        }
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
