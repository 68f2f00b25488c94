use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use client_core::{ClientError, DocumentView, GREETING, QUICK_PROMPTS};
use serde_json::json;
use shared::{
    domain::Role,
    protocol::{ChatResponse, PortfolioHoldings, PortfolioResponse},
};

use super::*;

#[derive(Default)]
struct ScriptedApi {
    messages: StdMutex<Vec<String>>,
    resets: StdMutex<u32>,
}

#[async_trait]
impl AssistantApi for ScriptedApi {
    async fn fetch_portfolio(&self) -> Result<PortfolioResponse, ClientError> {
        Ok(PortfolioResponse {
            holdings: Some(PortfolioHoldings {
                total_value: 10_000.0,
                cash: 500.0,
                holdings: vec![json!({"symbol": "VTI"}), json!({"symbol": "BND"})],
            }),
            ..PortfolioResponse::default()
        })
    }

    async fn send_chat(&self, message: &str) -> Result<ChatResponse, ClientError> {
        self.messages
            .lock()
            .expect("messages")
            .push(message.to_string());
        Ok(ChatResponse {
            response: Some(format!("echo: {message}")),
            ..ChatResponse::default()
        })
    }

    async fn reset_conversation(&self) -> Result<(), ClientError> {
        *self.resets.lock().expect("resets") += 1;
        Ok(())
    }
}

async fn run(script: &[&str]) -> (Arc<ScriptedApi>, DocumentView, String) {
    run_with(script, false).await
}

async fn run_with(script: &[&str], assume_yes: bool) -> (Arc<ScriptedApi>, DocumentView, String) {
    let api = Arc::new(ScriptedApi::default());
    let lines = LineSource::scripted(script.iter().copied());
    let view = TerminalView::new(Vec::new(), Some(lines.clone())).assume_yes(assume_yes);
    let controller = PageController::new(Arc::clone(&api), view);

    run_interactive(&controller, &lines).await;

    let view = controller.into_view();
    let output = String::from_utf8(view.writer().clone()).expect("utf8");
    (api, view.document().clone(), output)
}

#[tokio::test]
async fn greets_and_shows_summary_on_start() {
    let (_, document, output) = run(&["/quit"]).await;

    assert_eq!(document.messages().len(), 1);
    assert_eq!(document.messages()[0].content, GREETING);
    assert!(output.contains("Portfolio  total $10,000 | cash $500 | holdings 2"), "{output}");
}

#[tokio::test]
async fn typed_lines_and_quick_prompts_are_sent() {
    let (api, document, output) = run(&["what should I buy?", "/quick 2", "   "]).await;

    assert_eq!(
        *api.messages.lock().expect("messages"),
        vec!["what should I buy?".to_string(), QUICK_PROMPTS[1].to_string()]
    );

    let users: Vec<_> = document
        .messages_by(Role::User)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(users, vec!["what should I buy?", QUICK_PROMPTS[1]]);
    assert!(output.contains("echo: what should I buy?"), "{output}");
    assert!(output.contains("Thinking..."), "{output}");
}

#[tokio::test]
async fn reset_asks_for_confirmation() {
    let (api, document, output) = run(&["hello", "/reset", "n", "/reset", "y"]).await;

    assert_eq!(*api.resets.lock().expect("resets"), 1);

    assert!(output.contains("Reset cancelled."), "{output}");
    assert_eq!(document.messages().len(), 1);
    assert_eq!(document.messages()[0].content, GREETING);
    assert_eq!(document.confirm_prompts().len(), 2);
}

#[tokio::test]
async fn assumed_yes_resets_without_consuming_input() {
    let (api, document, output) = run_with(&["/reset", "after reset"], true).await;

    assert_eq!(*api.resets.lock().expect("resets"), 1);
    assert_eq!(*api.messages.lock().expect("messages"), ["after reset".to_string()]);
    assert!(!output.contains("[y/N]"), "{output}");
    assert_eq!(document.confirm_prompts().len(), 1);
    let contents: Vec<&str> = document.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, [GREETING, "after reset", "echo: after reset"]);
}

#[tokio::test]
async fn bad_commands_print_guidance_and_continue() {
    let (_, document, output) = run(&["/bogus", "/quick 99", "still here"]).await;

    assert!(output.contains("unknown command /bogus"), "{output}");
    assert!(output.contains("No quick prompt #99."), "{output}");
    assert_eq!(document.messages_by(Role::User).count(), 1);
}
