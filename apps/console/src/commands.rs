//! Commands typed at the interactive prompt.

use client_core::QUICK_PROMPTS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Free text for the assistant.
    Send(String),
    /// `/quick` alone lists the prompts; with a number it sends one.
    Quick(Option<usize>),
    Summary,
    Reset,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<ConsoleCommand, String> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Ok(ConsoleCommand::Send(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let argument = parts.next();
    match (name, argument) {
        ("quick" | "q", None) => Ok(ConsoleCommand::Quick(None)),
        ("quick" | "q", Some(raw)) => raw
            .parse::<usize>()
            .map(|index| ConsoleCommand::Quick(Some(index)))
            .map_err(|_| format!("/quick expects a prompt number, got {raw:?}")),
        ("summary" | "portfolio", None) => Ok(ConsoleCommand::Summary),
        ("reset", None) => Ok(ConsoleCommand::Reset),
        ("help" | "?", None) => Ok(ConsoleCommand::Help),
        ("quit" | "exit", None) => Ok(ConsoleCommand::Quit),
        ("", _) => Err("empty command; try /help".to_string()),
        (name, _) => Err(format!("unknown command /{name}; try /help")),
    }
}

/// One-based lookup into the quick prompt catalogue.
pub fn quick_prompt(index: usize) -> Option<&'static str> {
    QUICK_PROMPTS.get(index.checked_sub(1)?).copied()
}

pub fn help_text() -> String {
    let mut text = String::from(
        "Type a question and press Enter.\n\
         /quick [n]   list quick prompts, or send prompt n\n\
         /summary     reload the portfolio summary\n\
         /reset       clear the conversation\n\
         /quit        leave\n",
    );
    text.push_str(&quick_prompt_list());
    text
}

pub fn quick_prompt_list() -> String {
    QUICK_PROMPTS
        .iter()
        .enumerate()
        .map(|(i, prompt)| format!("  {}. {prompt}\n", i + 1))
        .collect()
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
