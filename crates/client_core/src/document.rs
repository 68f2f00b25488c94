//! In-memory HTML document for the assistant page.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::domain::{PortfolioSummary, Role};

use crate::{
    format::{format_count, format_currency, format_number, format_percent_delta},
    markup::escape_html,
    view::{FunctionCallEntry, MessageNode, PageView, SendControl, SummaryContent},
};

const ERROR_STYLE: &str = "color: #d32f2f;";

/// Holds each page region as rendered markup, the way a browser document
/// would after the same sequence of updates.
#[derive(Debug, Clone)]
pub struct DocumentView {
    summary_html: String,
    messages: Vec<MessageNode>,
    scrolled_to: usize,
    function_calls_html: String,
    input: String,
    input_focused: bool,
    send_control: SendControl,
    confirm_answer: bool,
    confirm_prompts: Vec<String>,
    alerts: Vec<String>,
}

impl Default for DocumentView {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentView {
    pub fn new() -> Self {
        Self {
            summary_html: String::new(),
            messages: Vec::new(),
            scrolled_to: 0,
            function_calls_html: String::new(),
            input: String::new(),
            input_focused: false,
            send_control: SendControl::Ready,
            confirm_answer: true,
            confirm_prompts: Vec::new(),
            alerts: Vec::new(),
        }
    }

    /// Answer given to every later confirmation prompt.
    pub fn set_confirm_answer(&mut self, answer: bool) {
        self.confirm_answer = answer;
    }

    pub fn summary_html(&self) -> &str {
        &self.summary_html
    }

    pub fn messages(&self) -> &[MessageNode] {
        &self.messages
    }

    pub fn messages_by(&self, role: Role) -> impl Iterator<Item = &MessageNode> {
        self.messages.iter().filter(move |node| node.role == role)
    }

    pub fn is_scrolled_to_latest(&self) -> bool {
        self.scrolled_to == self.messages.len()
    }

    pub fn function_calls_html(&self) -> &str {
        &self.function_calls_html
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn send_enabled(&self) -> bool {
        self.send_control.enabled()
    }

    pub fn send_label(&self) -> &'static str {
        self.send_control.label()
    }

    pub fn confirm_prompts(&self) -> &[String] {
        &self.confirm_prompts
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn messages_html(&self) -> String {
        self.messages.iter().map(message_html).collect()
    }

    /// Standalone page with every region, used for transcript export.
    pub fn to_html(&self, title: &str, generated_at: DateTime<Utc>) -> String {
        let title = escape_html(title);
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n</head>\n<body>\n\
             <h1>{title}</h1>\n<p class=\"generated-at\">Generated {generated}</p>\n\
             <div id=\"portfolio-summary\">{summary}</div>\n\
             <div id=\"chat-messages\">{messages}</div>\n\
             <div id=\"function-calls\">{calls}</div>\n\
             </body>\n</html>\n",
            generated = generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            summary = self.summary_html,
            messages = self.messages_html(),
            calls = self.function_calls_html,
        )
    }
}

fn message_html(node: &MessageNode) -> String {
    format!(
        "<div class=\"message {role}-message\"><div class=\"message-content\">{html}</div></div>",
        role = node.role,
        html = node.html
    )
}

fn summary_html(summary: &PortfolioSummary) -> String {
    let mut html = format!(
        "<div class=\"portfolio-item\"><strong>Total Value:</strong> {}</div>\
         <div class=\"portfolio-item\"><strong>Cash:</strong> {}</div>\
         <div class=\"portfolio-item\"><strong>Holdings:</strong> {}</div>",
        format_currency(summary.total_value),
        format_currency(summary.cash),
        format_count(summary.holdings_count),
    );
    if !summary.drift.is_empty() {
        html.push_str("<div class=\"portfolio-drift\"><strong>Drift:</strong>");
        for line in &summary.drift {
            html.push_str(&format!(
                "<div class=\"drift-item\">{symbol}: {current}% of {target}% target \
                 ({delta}, {dollars})</div>",
                symbol = escape_html(&line.symbol),
                current = format_number(line.current_allocation),
                target = format_number(line.target_allocation),
                delta = format_percent_delta(line.drift),
                dollars = format_currency(line.drift_dollars),
            ));
        }
        html.push_str("</div>");
    }
    html
}

#[async_trait]
impl PageView for DocumentView {
    fn render_summary(&mut self, content: SummaryContent) {
        self.summary_html = match content {
            SummaryContent::Loaded(summary) => summary_html(&summary),
            SummaryContent::Unavailable(message) => {
                format!("<p style=\"{ERROR_STYLE}\">{}</p>", escape_html(&message))
            }
        };
    }

    fn append_message(&mut self, node: MessageNode) {
        self.messages.push(node);
    }

    fn replace_messages(&mut self, nodes: Vec<MessageNode>) {
        self.messages = nodes;
        self.scrolled_to = self.scrolled_to.min(self.messages.len());
    }

    fn scroll_to_latest(&mut self) {
        self.scrolled_to = self.messages.len();
    }

    fn render_function_calls(&mut self, entries: &[FunctionCallEntry]) {
        let mut html = String::from("<strong>🔧 Functions called:</strong>");
        for entry in entries {
            html.push_str("<div class=\"function-call-item\"><strong>");
            html.push_str(&escape_html(&entry.name));
            html.push_str("</strong>");
            if let Some(arguments) = &entry.arguments {
                html.push_str("<br><small>");
                html.push_str(&escape_html(arguments));
                html.push_str("</small>");
            }
            html.push_str("</div>");
        }
        self.function_calls_html = html;
    }

    fn clear_function_calls(&mut self) {
        self.function_calls_html.clear();
    }

    fn input_value(&self) -> String {
        self.input.clone()
    }

    fn set_input_value(&mut self, value: &str) {
        self.input = value.to_string();
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
    }

    fn set_send_control(&mut self, control: SendControl) {
        if control == SendControl::Busy {
            self.input_focused = false;
        }
        self.send_control = control;
    }

    async fn confirm(&mut self, prompt: &str) -> bool {
        self.confirm_prompts.push(prompt.to_string());
        self.confirm_answer
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;
