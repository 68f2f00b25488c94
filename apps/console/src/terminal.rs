//! Terminal rendering of the assistant page.

use std::{
    fmt,
    io::{BufRead, Write},
    sync::Arc,
    thread,
};

use async_trait::async_trait;
use client_core::{
    format::{format_count, format_currency, format_number, format_percent_delta},
    DocumentView, FunctionCallEntry, MessageNode, PageView, SendControl, SummaryContent,
};
use shared::domain::Role;
use tokio::sync::{mpsc, Mutex};

/// Lines typed by the user, shared between the prompt loop and confirmations.
#[derive(Clone)]
pub struct LineSource {
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
}

impl LineSource {
    /// Reads stdin on a dedicated thread so the runtime never blocks on it.
    pub fn stdin() -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel(16);
        thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self {
            rx: Arc::new(Mutex::new(rx)),
        })
    }

    #[cfg(test)]
    pub fn scripted<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let (tx, rx) = mpsc::channel(lines.len().max(1));
        for line in lines {
            tx.try_send(line).expect("capacity covers every line");
        }
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// `None` once input is exhausted.
    pub async fn next_line(&self) -> Option<String> {
        self.rx.lock().await.recv().await
    }
}

pub struct TerminalView<W> {
    document: DocumentView,
    out: W,
    lines: Option<LineSource>,
    assume_yes: bool,
    echo_user: bool,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W, lines: Option<LineSource>) -> Self {
        Self {
            document: DocumentView::new(),
            out,
            lines,
            assume_yes: false,
            echo_user: false,
        }
    }

    /// Answer yes to confirmations without reading input.
    pub fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    /// Print user messages too; useful when they were not typed here.
    pub fn echo_user(mut self, echo_user: bool) -> Self {
        self.echo_user = echo_user;
        self
    }

    pub fn document(&self) -> &DocumentView {
        &self.document
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn print_prompt(&mut self) {
        self.emit(format_args!("> "));
        let _ = self.out.flush();
    }

    pub fn print(&mut self, text: &str) {
        self.emit(format_args!("{text}"));
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.out.write_fmt(args);
    }

    fn print_message(&mut self, node: &MessageNode) {
        match node.role {
            Role::User if self.echo_user => {
                self.emit(format_args!("you: {}\n", node.content));
            }
            Role::User => {}
            Role::Assistant => {
                self.emit(format_args!("\nassistant:\n{}\n\n", node.content.trim_end()));
            }
        }
    }
}

#[async_trait]
impl<W: Write + Send> PageView for TerminalView<W> {
    fn render_summary(&mut self, content: SummaryContent) {
        match &content {
            SummaryContent::Loaded(summary) => {
                self.emit(format_args!(
                    "Portfolio  total {} | cash {} | holdings {}\n",
                    format_currency(summary.total_value),
                    format_currency(summary.cash),
                    format_count(summary.holdings_count),
                ));
                for line in &summary.drift {
                    self.emit(format_args!(
                        "  {:<6} {}% of {}% target ({}, {})\n",
                        line.symbol,
                        format_number(line.current_allocation),
                        format_number(line.target_allocation),
                        format_percent_delta(line.drift),
                        format_currency(line.drift_dollars),
                    ));
                }
            }
            SummaryContent::Unavailable(message) => {
                self.emit(format_args!("Portfolio: {message}\n"));
            }
        }
        self.document.render_summary(content);
    }

    fn append_message(&mut self, node: MessageNode) {
        self.print_message(&node);
        self.document.append_message(node);
    }

    fn replace_messages(&mut self, nodes: Vec<MessageNode>) {
        for node in &nodes {
            self.print_message(node);
        }
        self.document.replace_messages(nodes);
    }

    fn scroll_to_latest(&mut self) {
        self.document.scroll_to_latest();
    }

    fn render_function_calls(&mut self, entries: &[FunctionCallEntry]) {
        self.emit(format_args!("🔧 Functions called:\n"));
        for entry in entries {
            match &entry.arguments {
                Some(arguments) => self.emit(format_args!("  - {} {arguments}\n", entry.name)),
                None => self.emit(format_args!("  - {}\n", entry.name)),
            }
        }
        self.document.render_function_calls(entries);
    }

    fn clear_function_calls(&mut self) {
        self.document.clear_function_calls();
    }

    fn input_value(&self) -> String {
        self.document.input_value()
    }

    fn set_input_value(&mut self, value: &str) {
        self.document.set_input_value(value);
    }

    fn focus_input(&mut self) {
        self.document.focus_input();
    }

    fn set_send_control(&mut self, control: SendControl) {
        if control == SendControl::Busy {
            self.emit(format_args!("{}\n", control.label()));
        }
        self.document.set_send_control(control);
    }

    async fn confirm(&mut self, prompt: &str) -> bool {
        let answer = if self.assume_yes {
            true
        } else {
            self.emit(format_args!("{prompt} [y/N] "));
            let _ = self.out.flush();
            match &self.lines {
                Some(lines) => lines.next_line().await.is_some_and(|line| {
                    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
                }),
                None => false,
            }
        };
        self.document.set_confirm_answer(answer);
        self.document.confirm(prompt).await
    }

    fn alert(&mut self, message: &str) {
        self.emit(format_args!("! {message}\n"));
        self.document.alert(message);
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
