use crate::config::Config;
use crate::log::Logger;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

const SHORT_SHA_LEN: usize = 7;

/// The push that triggered this run.
#[derive(Debug, Clone, PartialEq)]
pub struct PushEvent {
    pub branch: String,
    pub sha: String,
    pub message: String,
}

impl PushEvent {
    /// The first seven characters of the SHA, or all of it if shorter.
    pub fn short_sha(&self) -> &str {
        match self.sha.char_indices().nth(SHORT_SHA_LEN) {
            Some((end, _)) => &self.sha[..end],
            None => &self.sha,
        }
    }
}

pub fn get_push_event(config: &Config, log: &dyn Logger) -> PushEvent {
    let message = match &config.event_path {
        Some(path) => read_commit_message(Path::new(path)).unwrap_or_else(|e| {
            log.warning(&format!("Unable to read commit message: {:#}", e));
            String::new()
        }),
        None => {
            log.warning("GITHUB_EVENT_PATH is not set, sending without a commit message");
            String::new()
        }
    };

    PushEvent {
        branch: config.git_ref.clone(),
        sha: config.sha.clone(),
        message,
    }
}

fn read_commit_message(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading event payload {}", path.display()))?;

    let payload = serde_json::from_str::<Value>(&contents).context("parsing event payload")?;

    commit_message(&payload)
}

fn commit_message(payload: &Value) -> Result<String> {
    let head_commit = payload.get("head_commit").filter(|c| !c.is_null());

    let last_commit = || {
        payload
            .get("commits")
            .and_then(|c| c.as_array())
            .and_then(|c| c.last())
    };

    let Some(message) = head_commit
        .or_else(last_commit)
        .and_then(|c| c.get("message"))
        .and_then(|m| m.as_str())
    else {
        bail!("event payload has no commit message");
    };

    Ok(message.to_string())
}
