//! Logging utilities
//!
//! Subscriber setup and helpers for keeping secrets and long prompts out of logs

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Longest prompt excerpt written to the logs
pub const MAX_LOGGED_PROMPT: usize = 200;

/// Initialize the global tracing subscriber
///
/// `filter` is an env-filter directive string, `format` is `text` or `json`.
/// Logs go to stderr so the command line tool keeps stdout for the command.
pub fn init_logging(filter: &str, format: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let result = if format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

/// Truncate a string with a note about original length
pub fn truncate_content(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        Some((cut, _)) => {
            let total = s.chars().count();
            format!("{}... ({} chars truncated)", &s[..cut], total - max_len)
        }
        None => s.to_string(),
    }
}

/// Mask an API key for diagnostics, keeping only a short prefix
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{}****", prefix)
    }
}
