//! Interactive prompt loop.

use std::io::Write;

use client_core::{AssistantApi, PageController, ResetOutcome, SendOutcome};
use tracing::debug;

use crate::{
    commands::{help_text, parse_line, quick_prompt, quick_prompt_list, ConsoleCommand},
    terminal::{LineSource, TerminalView},
};

pub async fn run_interactive<A, W>(
    controller: &PageController<A, TerminalView<W>>,
    lines: &LineSource,
) where
    A: AssistantApi,
    W: Write + Send,
{
    controller.on_ready().await;
    controller
        .with_view_mut(|view| view.print("Type /help for commands.\n"))
        .await;

    loop {
        controller.with_view_mut(TerminalView::print_prompt).await;
        let Some(line) = lines.next_line().await else {
            debug!("console: input closed");
            break;
        };

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(message) => {
                controller
                    .with_view_mut(|view| view.print(&format!("{message}\n")))
                    .await;
                continue;
            }
        };

        match command {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Help => {
                controller
                    .with_view_mut(|view| view.print(&help_text()))
                    .await;
            }
            ConsoleCommand::Summary => {
                controller.load_portfolio_summary().await;
            }
            ConsoleCommand::Reset => {
                if controller.reset_conversation().await == ResetOutcome::Declined {
                    controller
                        .with_view_mut(|view| view.print("Reset cancelled.\n"))
                        .await;
                }
            }
            ConsoleCommand::Quick(None) => {
                controller
                    .with_view_mut(|view| view.print(&quick_prompt_list()))
                    .await;
            }
            ConsoleCommand::Quick(Some(index)) => match quick_prompt(index) {
                Some(prompt) => {
                    report(controller, controller.send_quick_message(prompt).await).await;
                }
                None => {
                    controller
                        .with_view_mut(|view| view.print(&format!("No quick prompt #{index}.\n")))
                        .await;
                }
            },
            ConsoleCommand::Send(text) => {
                controller.set_input(&text).await;
                report(controller, controller.send_message().await).await;
            }
        }
    }
}

async fn report<A, W>(controller: &PageController<A, TerminalView<W>>, outcome: SendOutcome)
where
    A: AssistantApi,
    W: Write + Send,
{
    let notice = match outcome {
        SendOutcome::Busy => "Still waiting for the previous reply.\n",
        SendOutcome::Superseded => "The conversation was reset; that reply was discarded.\n",
        _ => return,
    };
    controller.with_view_mut(|view| view.print(notice)).await;
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
