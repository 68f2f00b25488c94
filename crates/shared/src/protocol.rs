use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{DriftLine, FunctionCallRecord, PortfolioSummary},
    error::ApiException,
};

pub const PORTFOLIO_PATH: &str = "/api/portfolio";
pub const CHAT_PATH: &str = "/api/chat";
pub const RESET_PATH: &str = "/api/reset";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioHoldings {
    pub total_value: f64,
    pub cash: f64,
    /// Individual positions are opaque here; only their count is rendered.
    pub holdings: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftEntry {
    pub current_allocation: f64,
    pub target_allocation: f64,
    pub drift: f64,
    pub drift_dollars: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holdings: Option<PortfolioHoldings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drift: Option<BTreeMap<String, DriftEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PortfolioResponse {
    /// An `error` field wins over any data that came with it.
    pub fn into_summary(self) -> Result<PortfolioSummary, ApiException> {
        if let Some(error) = self.error {
            return Err(ApiException::application(error));
        }
        let holdings = self
            .holdings
            .ok_or_else(|| ApiException::transport("portfolio response carried no holdings"))?;
        let drift = self
            .drift
            .unwrap_or_default()
            .into_iter()
            .map(|(symbol, entry)| DriftLine {
                symbol,
                current_allocation: entry.current_allocation,
                target_allocation: entry.target_allocation,
                drift: entry.drift,
                drift_dollars: entry.drift_dollars,
            })
            .collect();

        Ok(PortfolioSummary {
            total_value: holdings.total_value,
            cash: holdings.cash,
            holdings_count: holdings.holdings.len(),
            drift,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Absent and `null` both mean no tools ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_calls: Option<Vec<FunctionCallRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub text: String,
    pub function_calls: Vec<FunctionCallRecord>,
}

impl ChatResponse {
    pub fn into_reply(self) -> Result<ChatReply, ApiException> {
        if let Some(error) = self.error {
            return Err(ApiException::application(error));
        }
        let text = self
            .response
            .ok_or_else(|| ApiException::transport("chat response carried no reply text"))?;
        Ok(ChatReply {
            text,
            function_calls: self.function_calls.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
