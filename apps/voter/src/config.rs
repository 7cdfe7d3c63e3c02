use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use client_core::ListScope;
use serde::Deserialize;
use shared::protocol::DEFAULT_RECENT_LIMIT;

pub const DEFAULT_CONFIG_FILE: &str = "voter.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub service_url: String,
    pub account: Option<String>,
    pub recent_limit: usize,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:3030".into(),
            account: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn list_scope(&self) -> ListScope {
        match &self.account {
            Some(account) => ListScope::Account(account.clone()),
            None => ListScope::Recent {
                limit: self.recent_limit,
            },
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.service_url.trim().is_empty() {
            bail!("service_url must not be empty");
        }
        if self.recent_limit == 0 {
            bail!("recent_limit must be at least 1");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    service_url: Option<String>,
    account: Option<String>,
    recent_limit: Option<usize>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the config file, then the process environment. A missing
/// default file is fine; a missing explicit file is an error.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, explicit) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if explicit => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.service_url {
        settings.service_url = v;
    }
    if let Some(v) = file_cfg.account {
        settings.account = Some(v);
    }
    if let Some(v) = file_cfg.recent_limit {
        settings.recent_limit = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("VOTER_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = lookup("APP__SERVICE_URL") {
        settings.service_url = v;
    }

    if let Some(v) = lookup("VOTER_ACCOUNT") {
        settings.account = Some(v);
    }
    if let Some(v) = lookup("APP__ACCOUNT") {
        settings.account = Some(v);
    }

    if let Some(v) = lookup("APP__RECENT_LIMIT") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.recent_limit = parsed;
        }
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
