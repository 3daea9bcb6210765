use crate::core::config::data::Config;
use crate::core::fallback::FALLBACK_LATENCY;
use crate::core::persona::{ContextParams, Persona};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const BASE_URL_ENV: &str = "SWITCHBOARD_BASE_URL";

impl Config {
    /// Backend URL: `SWITCHBOARD_BASE_URL` wins over the config file, which
    /// wins over the built-in default.
    pub fn resolved_base_url(&self) -> String {
        self.base_url_with_override(std::env::var(BASE_URL_ENV).ok())
    }

    pub(crate) fn base_url_with_override(&self, env_value: Option<String>) -> String {
        env_value
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn resolved_persona(&self) -> Persona {
        match self.default_persona.as_deref() {
            Some(id) => id.parse().unwrap_or_else(|err| {
                warn!("Ignoring default-persona from config: {err}");
                Persona::default()
            }),
            None => Persona::default(),
        }
    }

    pub fn context_params(&self) -> ContextParams {
        ContextParams::new(self.merchant_id.clone(), self.multiplier.unwrap_or(1))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn fallback_latency(&self) -> Duration {
        self.fallback_latency_ms
            .map(Duration::from_millis)
            .unwrap_or(FALLBACK_LATENCY)
    }
}
