use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body shape used by every assistant endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The server answered with a structured `error` field.
    Application,
    /// The request failed in flight or the body could not be understood.
    Transport,
}

#[derive(Debug, Error)]
#[error("{kind:?}: {message}")]
pub struct ApiException {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiException {
    pub fn application(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Application,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: message.into(),
        }
    }
}

impl From<ApiException> for ApiError {
    fn from(value: ApiException) -> Self {
        Self {
            error: value.message,
        }
    }
}
