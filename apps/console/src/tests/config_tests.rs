use super::{normalize_server_url, settings_from_sources, Settings};

use std::{collections::HashMap, path::PathBuf};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_without_file_or_env() {
    assert_eq!(settings_from_sources(None, env_from(&[])), Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
server_url = "http://assistant.internal:8080"
log_filter = "client_core=debug"
transcript = "session.html"
"#;
    let settings = settings_from_sources(Some(raw), env_from(&[]));
    assert_eq!(settings.server_url, "http://assistant.internal:8080");
    assert_eq!(settings.log_filter, "client_core=debug");
    assert_eq!(settings.transcript_path, Some(PathBuf::from("session.html")));
}

#[test]
fn environment_overrides_file() {
    let raw = r#"server_url = "http://from-file:5000""#;
    let settings = settings_from_sources(
        Some(raw),
        env_from(&[
            ("ASSISTANT_SERVER_URL", "http://from-env:5000"),
            ("APP__LOG_FILTER", "debug"),
        ]),
    );
    assert_eq!(settings.server_url, "http://from-env:5000");
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn prefixed_app_variable_wins_over_plain_one() {
    let settings = settings_from_sources(
        None,
        env_from(&[
            ("ASSISTANT_SERVER_URL", "http://plain:1"),
            ("APP__SERVER_URL", "http://prefixed:2"),
        ]),
    );
    assert_eq!(settings.server_url, "http://prefixed:2");
}

#[test]
fn unparseable_file_is_ignored() {
    let settings = settings_from_sources(Some("server_url = [1, 2"), env_from(&[]));
    assert_eq!(settings, Settings::default());
}

#[test]
fn bare_host_gets_http_scheme() {
    assert_eq!(
        normalize_server_url("localhost:5000").expect("url"),
        "http://localhost:5000"
    );
}

#[test]
fn trailing_slash_is_trimmed() {
    assert_eq!(
        normalize_server_url(" https://assistant.example/ ").expect("url"),
        "https://assistant.example"
    );
}

#[test]
fn empty_url_falls_back_to_default() {
    assert_eq!(
        normalize_server_url("   ").expect("url"),
        Settings::default().server_url
    );
}

#[test]
fn rejects_non_http_schemes() {
    let err = normalize_server_url("ftp://files.example").expect_err("must fail");
    assert!(err.to_string().contains("unsupported scheme"), "{err}");
}
