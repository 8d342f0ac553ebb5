use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Fetch,
    Submit,
    MissingConfig,
    Validation,
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to read {resource}: {message}")]
    Fetch { resource: String, message: String },
    #[error("webhook submission failed: {0}")]
    Submit(String),
    #[error("missing configuration value {0}")]
    MissingConfig(&'static str),
    #[error("invalid input: {0}")]
    Validation(String),
}

impl DashboardError {
    pub fn fetch(resource: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Fetch {
            resource: resource.into(),
            message: message.to_string(),
        }
    }

    pub fn submit(message: impl std::fmt::Display) -> Self {
        Self::Submit(message.to_string())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Fetch { .. } => ErrorCode::Fetch,
            Self::Submit(_) => ErrorCode::Submit,
            Self::MissingConfig(_) => ErrorCode::MissingConfig,
            Self::Validation(_) => ErrorCode::Validation,
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
