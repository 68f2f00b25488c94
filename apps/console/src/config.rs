use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "assistant.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub log_filter: String,
    pub transcript_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            log_filter: "warn".into(),
            transcript_path: None,
        }
    }
}

pub fn load_settings(path: &Path) -> Settings {
    let file_raw = fs::read_to_string(path).ok();
    settings_from_sources(file_raw.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file, then environment variables; later sources win.
pub fn settings_from_sources(
    file_raw: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_raw {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("server_url") {
                settings.server_url = v.clone();
            }
            if let Some(v) = file_cfg.get("log_filter") {
                settings.log_filter = v.clone();
            }
            if let Some(v) = file_cfg.get("transcript") {
                settings.transcript_path = Some(PathBuf::from(v));
            }
        }
    }

    if let Some(v) = env("ASSISTANT_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("ASSISTANT_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = env("ASSISTANT_TRANSCRIPT") {
        settings.transcript_path = Some(PathBuf::from(v));
    }
    if let Some(v) = env("APP__TRANSCRIPT") {
        settings.transcript_path = Some(PathBuf::from(v));
    }

    settings
}

pub fn normalize_server_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Settings::default().server_url);
    }

    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    let url = Url::parse(&candidate).with_context(|| format!("invalid server url {raw:?}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => bail!("unsupported scheme {other:?} in server url {raw:?}"),
    }
    if url.host_str().is_none() {
        bail!("server url {raw:?} has no host");
    }

    Ok(candidate.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
