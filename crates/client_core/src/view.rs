//! View contract between the page controller and whatever displays it.

use async_trait::async_trait;
use shared::domain::{PortfolioSummary, Role};

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryContent {
    Loaded(PortfolioSummary),
    /// Shown in place of the figures: either the server's own error text or a
    /// fixed failure notice.
    Unavailable(String),
}

/// One entry of the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageNode {
    pub role: Role,
    /// The text as sent or received.
    pub content: String,
    /// Display markup: formatted for assistant messages, escaped for user ones.
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCallEntry {
    pub name: String,
    /// Serialized arguments; absent when the call took none.
    pub arguments: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendControl {
    Ready,
    Busy,
}

impl SendControl {
    pub fn enabled(self) -> bool {
        matches!(self, SendControl::Ready)
    }

    pub fn label(self) -> &'static str {
        match self {
            SendControl::Ready => "Send",
            SendControl::Busy => "Thinking...",
        }
    }
}

/// Display regions the controller drives: portfolio summary, message log,
/// function-call region, text input and send control, plus the two modal
/// interactions (confirmation and alert).
#[async_trait]
pub trait PageView: Send {
    fn render_summary(&mut self, content: SummaryContent);

    fn append_message(&mut self, node: MessageNode);
    fn replace_messages(&mut self, nodes: Vec<MessageNode>);
    fn scroll_to_latest(&mut self);

    fn render_function_calls(&mut self, entries: &[FunctionCallEntry]);
    fn clear_function_calls(&mut self);

    fn input_value(&self) -> String;
    fn set_input_value(&mut self, value: &str);
    fn focus_input(&mut self);
    fn set_send_control(&mut self, control: SendControl);

    async fn confirm(&mut self, prompt: &str) -> bool;
    fn alert(&mut self, message: &str);
}
