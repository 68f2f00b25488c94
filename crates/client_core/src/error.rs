use reqwest::StatusCode;
use shared::error::ApiException;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("malformed {endpoint} response (HTTP {status}): {source}")]
    Decode {
        endpoint: &'static str,
        status: StatusCode,
        source: serde_json::Error,
    },
}

impl From<ClientError> for ApiException {
    fn from(value: ClientError) -> Self {
        ApiException::transport(value.to_string())
    }
}
