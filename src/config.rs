use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::fmt::Formatter;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A value that must never end up in logs.
#[derive(Clone, PartialEq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<redacted>")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub bot_token: Secret,
    pub channel_id: Secret,
    pub timeout: Duration,

    pub git_ref: String,
    pub sha: String,
    pub event_path: Option<String>,
}

pub fn get_config() -> Result<Config> {
    config_from(|key| std::env::var(key).ok())
}

/// Builds the config from any variable lookup, so tests don't have to touch the process environment.
pub fn config_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let Some(bot_token) = non_empty("TELEGRAM_BOT_TOKEN") else {
        bail!("TELEGRAM_BOT_TOKEN is not set");
    };
    let Some(channel_id) = non_empty("TELEGRAM_CHANNEL_ID") else {
        bail!("TELEGRAM_CHANNEL_ID is not set");
    };

    let api_url = non_empty("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let api_url = Url::parse(&api_url)
        .with_context(|| format!("TELEGRAM_API_URL is not a valid URL: {}", api_url))?;

    if api_url.cannot_be_a_base() {
        bail!("TELEGRAM_API_URL must be an http(s) base URL: {}", api_url);
    }

    let timeout = match non_empty("NOTIFY_TIMEOUT_SECS") {
        Some(secs) => parse_timeout(&secs)?,
        None => DEFAULT_TIMEOUT,
    };

    Ok(Config {
        api_url,
        bot_token: Secret::new(&bot_token),
        channel_id: Secret::new(&channel_id),
        timeout,
        git_ref: lookup("GITHUB_REF").unwrap_or_default(),
        sha: lookup("GITHUB_SHA").unwrap_or_default(),
        event_path: non_empty("GITHUB_EVENT_PATH"),
    })
}

fn parse_timeout(secs: &str) -> Result<Duration> {
    let secs = secs
        .trim()
        .parse::<u64>()
        .with_context(|| format!("NOTIFY_TIMEOUT_SECS is not a number: {}", secs))?;

    if secs == 0 {
        bail!("NOTIFY_TIMEOUT_SECS must be greater than zero");
    }

    Ok(Duration::from_secs(secs))
}
