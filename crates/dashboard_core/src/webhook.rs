//! Form validation and write-back submission.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use shared::{
    domain::Priority,
    error::{DashboardError, DashboardResult},
    protocol::WebhookPayload,
};
use tracing::warn;
use url::Url;

const URL_PLACEHOLDER_MARKER: &str = "XXXXXXXX";

#[derive(Debug, Clone, Default)]
pub struct AnnouncementForm {
    pub title: String,
    pub author: String,
    pub text: String,
}

impl AnnouncementForm {
    /// `None` when any required field is blank after trimming.
    pub fn into_payload(self, now: DateTime<Utc>) -> Option<WebhookPayload> {
        let title = required(&self.title)?;
        let author = required(&self.author)?;
        let text = required(&self.text)?;
        Some(WebhookPayload::Announcement {
            title,
            author,
            text,
            created_at: timestamp(now),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdeaForm {
    pub name: String,
    pub idea: String,
    pub priority: Priority,
}

impl IdeaForm {
    pub fn into_payload(self, now: DateTime<Utc>) -> Option<WebhookPayload> {
        let name = required(&self.name)?;
        let idea = required(&self.idea)?;
        Some(WebhookPayload::Idea {
            name,
            idea,
            priority: self.priority,
            created_at: timestamp(now),
        })
    }
}

fn required(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A required field was blank; nothing was built or sent.
    Rejected,
    /// No webhook configured; the payload was only logged.
    NotConfigured,
    Sent,
    Failed,
}

/// Posts payloads to the write-back webhook, at most once each.
pub struct WebhookClient {
    http: Client,
    url: Option<Url>,
}

impl WebhookClient {
    /// Empty, placeholder or unparsable URLs leave the client unconfigured.
    pub fn new(raw_url: &str) -> Self {
        let raw_url = raw_url.trim();
        let url = if raw_url.is_empty() || raw_url.contains(URL_PLACEHOLDER_MARKER) {
            None
        } else {
            match Url::parse(raw_url) {
                Ok(url) => Some(url),
                Err(error) => {
                    warn!(%error, url = raw_url, "ignoring invalid webhook url");
                    None
                }
            }
        };
        Self {
            http: Client::new(),
            url,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    pub async fn post(&self, payload: &WebhookPayload) -> DashboardResult<()> {
        let url = self
            .url
            .clone()
            .ok_or(DashboardError::MissingConfig("WEBHOOK_URL"))?;
        let response = self
            .http
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(DashboardError::submit)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::submit(format!("webhook error: {status}")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/webhook_tests.rs"]
mod tests;
