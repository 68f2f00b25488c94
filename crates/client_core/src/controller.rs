//! Page controller: user actions in, API calls out, results rendered into the view.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use shared::{
    domain::{FunctionCallRecord, Role},
    error::{ApiException, FailureKind},
    protocol::{ChatResponse, PortfolioResponse},
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    format::format_arguments,
    markup::{escape_html, render_markdown},
    view::{FunctionCallEntry, MessageNode, PageView, SendControl, SummaryContent},
    AssistantApi,
};

pub const PORTFOLIO_FAILURE: &str = "Failed to load portfolio";
pub const CHAT_FAILURE: &str = "Sorry, something went wrong. Please try again.";
pub const RESET_PROMPT: &str = "Are you sure you want to reset the conversation?";
pub const RESET_FAILURE: &str = "Failed to reset conversation";
pub const GREETING: &str =
    "**👋 Hello!**\n\nI'm your Portfolio Rebalancing Assistant. What would you like to know?";

/// Canned prompts offered next to the input.
pub const QUICK_PROMPTS: &[&str] = &[
    "Show me my current portfolio holdings",
    "How far is my portfolio from its target allocation?",
    "Generate rebalancing recommendations for my portfolio",
    "What would the transaction costs of rebalancing be?",
    "Is the market open right now?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    ApplicationError,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was empty after trimming; nothing happened.
    Empty,
    /// Another chat request was still in flight.
    Busy,
    Replied { function_calls: usize },
    ApplicationError,
    Failed,
    /// The conversation was reset while the request was in flight; the reply
    /// was dropped.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Declined,
    Reset,
    Failed,
}

/// Single-slot claim on the chat request; released on drop, including when
/// the handler future is cancelled mid-request.
struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct PageController<A, V> {
    api: A,
    view: Mutex<V>,
    in_flight: AtomicBool,
    generation: AtomicU64,
    turns: AtomicU64,
}

impl<A, V> PageController<A, V>
where
    A: AssistantApi,
    V: PageView,
{
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view: Mutex::new(view),
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            turns: AtomicU64::new(0),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Number of completed resets.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub async fn with_view<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        let view = self.view.lock().await;
        f(&*view)
    }

    pub async fn with_view_mut<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        let mut view = self.view.lock().await;
        f(&mut *view)
    }

    pub fn into_view(self) -> V {
        self.view.into_inner()
    }

    /// Page-ready hook: seeds the greeting and loads the portfolio summary.
    pub async fn on_ready(&self) -> LoadOutcome {
        {
            let mut view = self.view.lock().await;
            view.replace_messages(vec![greeting_node()]);
            view.scroll_to_latest();
        }
        self.load_portfolio_summary().await
    }

    pub async fn load_portfolio_summary(&self) -> LoadOutcome {
        let result = self
            .api
            .fetch_portfolio()
            .await
            .map_err(ApiException::from)
            .and_then(PortfolioResponse::into_summary);

        let (content, outcome) = match result {
            Ok(summary) => {
                info!(
                    holdings = summary.holdings_count,
                    drift_lines = summary.drift.len(),
                    "portfolio: summary loaded"
                );
                (SummaryContent::Loaded(summary), LoadOutcome::Loaded)
            }
            Err(err) if err.kind == FailureKind::Application => {
                warn!(error = %err.message, "portfolio: server reported an error");
                (
                    SummaryContent::Unavailable(err.message),
                    LoadOutcome::ApplicationError,
                )
            }
            Err(err) => {
                error!(error = %err.message, "portfolio: failed to load summary");
                (
                    SummaryContent::Unavailable(PORTFOLIO_FAILURE.to_string()),
                    LoadOutcome::Failed,
                )
            }
        };
        self.view.lock().await.render_summary(content);
        outcome
    }

    pub async fn set_input(&self, text: &str) {
        self.view.lock().await.set_input_value(text);
    }

    pub async fn send_quick_message(&self, text: &str) -> SendOutcome {
        self.set_input(text).await;
        self.send_message().await
    }

    pub async fn send_message(&self) -> SendOutcome {
        let message = self.view.lock().await.input_value().trim().to_string();
        if message.is_empty() {
            debug!("chat: ignoring empty input");
            return SendOutcome::Empty;
        }
        let Some(_slot) = InFlight::acquire(&self.in_flight) else {
            warn!("chat: a request is already in flight; send rejected");
            return SendOutcome::Busy;
        };

        let generation = self.generation.load(Ordering::Acquire);
        let turn = self.turns.fetch_add(1, Ordering::AcqRel) + 1;
        {
            let mut view = self.view.lock().await;
            view.set_input_value("");
            add_message_to(&mut *view, &message, Role::User);
            view.set_send_control(SendControl::Busy);
            view.clear_function_calls();
        }

        info!(turn, chars = message.chars().count(), "chat: sending message");
        let result = self
            .api
            .send_chat(&message)
            .await
            .map_err(ApiException::from)
            .and_then(ChatResponse::into_reply);

        let mut view = self.view.lock().await;
        let outcome = if self.generation.load(Ordering::Acquire) != generation {
            info!(turn, "chat: conversation was reset while waiting; reply dropped");
            SendOutcome::Superseded
        } else {
            match result {
                Ok(reply) => {
                    let function_calls = reply.function_calls.len();
                    if function_calls > 0 {
                        show_function_calls_in(&mut *view, &reply.function_calls);
                    }
                    add_message_to(&mut *view, &reply.text, Role::Assistant);
                    info!(turn, function_calls, "chat: reply rendered");
                    SendOutcome::Replied { function_calls }
                }
                Err(err) if err.kind == FailureKind::Application => {
                    warn!(turn, error = %err.message, "chat: server reported an error");
                    add_message_to(
                        &mut *view,
                        &format!("Error: {}", err.message),
                        Role::Assistant,
                    );
                    SendOutcome::ApplicationError
                }
                Err(err) => {
                    error!(turn, error = %err.message, "chat: request failed");
                    add_message_to(&mut *view, CHAT_FAILURE, Role::Assistant);
                    SendOutcome::Failed
                }
            }
        };

        view.set_send_control(SendControl::Ready);
        view.focus_input();
        outcome
    }

    pub async fn add_message(&self, content: &str, role: Role) {
        let mut view = self.view.lock().await;
        add_message_to(&mut *view, content, role);
    }

    pub async fn show_function_calls(&self, calls: &[FunctionCallRecord]) {
        let mut view = self.view.lock().await;
        show_function_calls_in(&mut *view, calls);
    }

    pub async fn reset_conversation(&self) -> ResetOutcome {
        let mut view = self.view.lock().await;
        if !view.confirm(RESET_PROMPT).await {
            debug!("reset: declined");
            return ResetOutcome::Declined;
        }
        drop(view);

        match self.api.reset_conversation().await {
            Ok(()) => {
                let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
                let mut view = self.view.lock().await;
                view.replace_messages(vec![greeting_node()]);
                view.scroll_to_latest();
                view.clear_function_calls();
                info!(generation, "reset: conversation cleared");
                ResetOutcome::Reset
            }
            Err(err) => {
                error!(error = %err, "reset: request failed");
                self.view.lock().await.alert(RESET_FAILURE);
                ResetOutcome::Failed
            }
        }
    }
}

fn message_node(content: &str, role: Role) -> MessageNode {
    let html = match role {
        Role::Assistant => render_markdown(content),
        Role::User => escape_html(content),
    };
    MessageNode {
        role,
        content: content.to_string(),
        html,
    }
}

fn greeting_node() -> MessageNode {
    message_node(GREETING, Role::Assistant)
}

fn add_message_to<V: PageView + ?Sized>(view: &mut V, content: &str, role: Role) {
    view.append_message(message_node(content, role));
    view.scroll_to_latest();
}

fn show_function_calls_in<V: PageView + ?Sized>(view: &mut V, calls: &[FunctionCallRecord]) {
    let entries: Vec<FunctionCallEntry> = calls
        .iter()
        .map(|call| FunctionCallEntry {
            name: call.name.clone(),
            arguments: format_arguments(&call.arguments),
        })
        .collect();
    view.render_function_calls(&entries);
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
