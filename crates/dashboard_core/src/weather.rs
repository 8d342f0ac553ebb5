use reqwest::Client;
use shared::{
    error::{DashboardError, DashboardResult},
    protocol::WeatherResponse,
};
use tracing::{error, info};

use crate::format::round_half_up;

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const WEATHER_CITY: &str = "Cherbourg,FR";
const KEY_PLACEHOLDER_MARKER: &str = "VOTRE";

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherWidget {
    Unconfigured,
    Unavailable,
    Current {
        temperature_c: f64,
        description: String,
    },
}

impl WeatherWidget {
    pub fn label(&self) -> String {
        match self {
            Self::Unconfigured => "Configurer OPEN_WEATHER_KEY".to_string(),
            Self::Unavailable => "Météo indisponible".to_string(),
            Self::Current {
                temperature_c,
                description,
            } => {
                let temperature = round_half_up(*temperature_c);
                if description.is_empty() {
                    format!("{temperature}°C")
                } else {
                    format!("{temperature}°C {description}")
                }
            }
        }
    }
}

pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    /// An empty key or the shipped placeholder leaves the widget unconfigured.
    pub fn new(base_url: impl Into<String>, api_key: &str) -> Self {
        let api_key = api_key.trim();
        let api_key = (!api_key.is_empty() && !api_key.contains(KEY_PLACEHOLDER_MARKER))
            .then(|| api_key.to_string());
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn current(&self) -> DashboardResult<WeatherResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(DashboardError::MissingConfig("OPEN_WEATHER_KEY"))?;
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", WEATHER_CITY),
                ("units", "metric"),
                ("lang", "fr"),
                ("appid", api_key),
            ])
            .send()
            .await
            .map_err(|e| DashboardError::fetch("weather", e))?
            .error_for_status()
            .map_err(|e| DashboardError::fetch("weather", e))?;
        response
            .json()
            .await
            .map_err(|e| DashboardError::fetch("weather", e))
    }

    pub async fn widget(&self) -> WeatherWidget {
        if !self.is_configured() {
            info!("weather key not configured; widget disabled");
            return WeatherWidget::Unconfigured;
        }
        match self.current().await {
            Ok(body) => WeatherWidget::Current {
                temperature_c: body.main.temp,
                description: body
                    .weather
                    .into_iter()
                    .next()
                    .map(|condition| condition.description.trim().to_string())
                    .unwrap_or_default(),
            },
            Err(error) => {
                error!(%error, "weather fetch failed");
                WeatherWidget::Unavailable
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/weather_tests.rs"]
mod tests;
