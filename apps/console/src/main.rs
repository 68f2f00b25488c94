use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use client_core::{
    DocumentView, HttpAssistantClient, LoadOutcome, PageController, SendOutcome, QUICK_PROMPTS,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod session;
mod terminal;

use commands::quick_prompt;
use config::{load_settings, normalize_server_url, DEFAULT_CONFIG_PATH};
use terminal::{LineSource, TerminalView};

const TRANSCRIPT_TITLE: &str = "Portfolio Rebalancing Assistant";

#[derive(Parser, Debug)]
#[command(
    name = "portfolio-assistant",
    version,
    about = "Terminal client for the portfolio rebalancing assistant"
)]
struct Cli {
    /// Assistant server base URL; overrides the config file and environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Write an HTML transcript of the session to this path on exit.
    #[arg(long)]
    transcript: Option<PathBuf>,
    /// Answer yes to confirmation prompts such as `/reset`.
    #[arg(long, short = 'y')]
    yes: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive chat (default).
    Chat,
    /// Send one message and print the reply.
    Ask {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Send one of the built-in quick prompts.
    Quick { index: usize },
    /// Print the portfolio summary.
    Summary,
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config);
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(path) = cli.transcript {
        settings.transcript_path = Some(path);
    }
    init_tracing(&settings.log_filter);

    let server_url = normalize_server_url(&settings.server_url)?;
    let api = HttpAssistantClient::new(&server_url)?;
    info!(%server_url, "console: assistant client ready");

    let command = cli.command.unwrap_or(Command::Chat);
    let interactive = matches!(command, Command::Chat);
    let lines = if interactive {
        Some(LineSource::stdin().context("failed to start stdin reader")?)
    } else {
        None
    };
    let view = TerminalView::new(std::io::stdout(), lines.clone())
        .echo_user(!interactive)
        .assume_yes(cli.yes);
    let controller = PageController::new(api, view);

    let result = match (command, lines) {
        (Command::Chat, Some(lines)) => {
            session::run_interactive(&controller, &lines).await;
            Ok(())
        }
        (Command::Chat, None) => Err(anyhow!("interactive chat needs stdin")),
        (Command::Ask { message }, _) => {
            expect_reply(controller.send_quick_message(&message.join(" ")).await)
        }
        (Command::Quick { index }, _) => {
            let prompt = quick_prompt(index).ok_or_else(|| {
                anyhow!(
                    "no quick prompt #{index}; choose 1 to {}",
                    QUICK_PROMPTS.len()
                )
            })?;
            expect_reply(controller.send_quick_message(prompt).await)
        }
        (Command::Summary, _) => match controller.load_portfolio_summary().await {
            LoadOutcome::Loaded => Ok(()),
            _ => Err(anyhow!("portfolio summary unavailable")),
        },
    };

    if let Some(path) = &settings.transcript_path {
        let view = controller.into_view();
        if let Err(error) = export_transcript(view.document(), path).await {
            warn!(path = %path.display(), %error, "console: transcript export failed");
        }
    }
    result
}

fn expect_reply(outcome: SendOutcome) -> Result<()> {
    match outcome {
        SendOutcome::Replied { .. } => Ok(()),
        SendOutcome::Empty => bail!("message is empty"),
        other => bail!("no reply from the assistant ({other:?})"),
    }
}

async fn export_transcript(document: &DocumentView, path: &Path) -> Result<()> {
    let html = document.to_html(TRANSCRIPT_TITLE, Utc::now());
    tokio::fs::write(path, html)
        .await
        .with_context(|| format!("failed to write transcript to {}", path.display()))?;
    info!(path = %path.display(), "console: transcript written");
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
