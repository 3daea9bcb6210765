use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the chat backend (e.g., "http://localhost:8000/api")
    pub base_url: Option<String>,
    /// Persona id selected at startup (e.g., "infra")
    pub default_persona: Option<String>,
    /// Merchant id sent with personas that accept one
    pub merchant_id: Option<String>,
    /// Scale multiplier sent with the infrastructure persona
    pub multiplier: Option<u32>,
    /// Per-request HTTP timeout in seconds; unset means no timeout
    pub timeout_secs: Option<u64>,
    /// Simulated latency of the offline fallback responder, in milliseconds
    pub fallback_latency_ms: Option<u64>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/switchboard/config.toml` → `~/.config/switchboard/config.toml`
/// - macOS: `/Users/user/Library/Application Support/...` → `~/Library/Application Support/...`
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
