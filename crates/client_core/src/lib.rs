use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::protocol::{
    ChatRequest, ChatResponse, PortfolioResponse, CHAT_PATH, PORTFOLIO_PATH, RESET_PATH,
};
use tracing::{debug, info};
use url::Url;

pub mod controller;
pub mod document;
pub mod error;
pub mod format;
pub mod markup;
pub mod view;

pub use controller::{
    LoadOutcome, PageController, ResetOutcome, SendOutcome, CHAT_FAILURE, GREETING,
    PORTFOLIO_FAILURE, QUICK_PROMPTS, RESET_FAILURE, RESET_PROMPT,
};
pub use document::DocumentView;
pub use error::ClientError;
pub use view::{FunctionCallEntry, MessageNode, PageView, SendControl, SummaryContent};

/// Remote side of the assistant page: one request per user action.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn fetch_portfolio(&self) -> Result<PortfolioResponse, ClientError>;
    async fn send_chat(&self, message: &str) -> Result<ChatResponse, ClientError>;
    async fn reset_conversation(&self) -> Result<(), ClientError>;
}

#[async_trait]
impl<T> AssistantApi for Arc<T>
where
    T: AssistantApi + ?Sized,
{
    async fn fetch_portfolio(&self) -> Result<PortfolioResponse, ClientError> {
        (**self).fetch_portfolio().await
    }

    async fn send_chat(&self, message: &str) -> Result<ChatResponse, ClientError> {
        (**self).send_chat(message).await
    }

    async fn reset_conversation(&self) -> Result<(), ClientError> {
        (**self).reset_conversation().await
    }
}

/// HTTP implementation against the assistant server.
///
/// The server keys conversation history on its session cookie, so the
/// underlying client keeps a cookie store for the lifetime of this value.
#[derive(Clone)]
pub struct HttpAssistantClient {
    http: Client,
    base_url: Url,
}

impl HttpAssistantClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(ClientError::Build)?;
        Self::with_http_client(http, server_url)
    }

    pub fn with_http_client(http: Client, server_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(server_url.trim()).map_err(|source| {
            ClientError::InvalidUrl {
                url: server_url.to_string(),
                source,
            }
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an absolute API path below the configured base, keeping any
    /// path prefix the server is mounted under.
    pub fn endpoint(&self, path: &'static str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                source,
            })
    }
}

/// Reads the body as JSON whatever the status code; error statuses from the
/// server still carry a structured `error` field.
async fn decode_body<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, ClientError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ClientError::Transport { endpoint, source })?;
    debug!(endpoint, %status, bytes = body.len(), "assistant api: response received");
    serde_json::from_str(&body).map_err(|source| ClientError::Decode {
        endpoint,
        status,
        source,
    })
}

#[async_trait]
impl AssistantApi for HttpAssistantClient {
    async fn fetch_portfolio(&self) -> Result<PortfolioResponse, ClientError> {
        let url = self.endpoint(PORTFOLIO_PATH)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: PORTFOLIO_PATH,
                source,
            })?;
        decode_body(PORTFOLIO_PATH, response).await
    }

    async fn send_chat(&self, message: &str) -> Result<ChatResponse, ClientError> {
        let url = self.endpoint(CHAT_PATH)?;
        let response = self
            .http
            .post(url)
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: CHAT_PATH,
                source,
            })?;
        decode_body(CHAT_PATH, response).await
    }

    async fn reset_conversation(&self) -> Result<(), ClientError> {
        let url = self.endpoint(RESET_PATH)?;
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: RESET_PATH,
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint: RESET_PATH,
                status,
            });
        }
        info!(%status, "assistant api: conversation reset");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
