use super::*;

#[test]
fn plain_text_is_sent_untouched() {
    assert_eq!(
        parse_line("  what should I sell? "),
        Ok(ConsoleCommand::Send("  what should I sell? ".into()))
    );
}

#[test]
fn parses_slash_commands() {
    assert_eq!(parse_line("/quick"), Ok(ConsoleCommand::Quick(None)));
    assert_eq!(parse_line("/q 3"), Ok(ConsoleCommand::Quick(Some(3))));
    assert_eq!(parse_line("/summary"), Ok(ConsoleCommand::Summary));
    assert_eq!(parse_line(" /reset "), Ok(ConsoleCommand::Reset));
    assert_eq!(parse_line("/help"), Ok(ConsoleCommand::Help));
    assert_eq!(parse_line("/exit"), Ok(ConsoleCommand::Quit));
}

#[test]
fn rejects_unknown_or_malformed_commands() {
    assert!(parse_line("/quick two").is_err());
    assert!(parse_line("/frobnicate").unwrap_err().contains("/frobnicate"));
    assert!(parse_line("/").is_err());
}

#[test]
fn quick_prompts_are_one_based() {
    assert_eq!(quick_prompt(1), Some(QUICK_PROMPTS[0]));
    assert_eq!(quick_prompt(0), None);
    assert_eq!(quick_prompt(QUICK_PROMPTS.len() + 1), None);
}

#[test]
fn help_lists_every_quick_prompt() {
    let help = help_text();
    for prompt in QUICK_PROMPTS {
        assert!(help.contains(prompt));
    }
}
