use crate::core::config::data::Config;
use crate::core::persona::Persona;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Settable configuration keys, as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BaseUrl,
    DefaultPersona,
    Merchant,
    Multiplier,
    Timeout,
    FallbackLatency,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValueError {
    UnknownKey(String),
    InvalidValue {
        key: ConfigKey,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for ConfigValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValueError::UnknownKey(key) => {
                let known: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.name()).collect();
                write!(
                    f,
                    "Unknown config key: {key} (known keys: {})",
                    known.join(", ")
                )
            }
            ConfigValueError::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "Invalid value '{value}' for {}: expected {expected}", key.name()),
        }
    }
}

impl Error for ConfigValueError {}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::BaseUrl,
        ConfigKey::DefaultPersona,
        ConfigKey::Merchant,
        ConfigKey::Multiplier,
        ConfigKey::Timeout,
        ConfigKey::FallbackLatency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::DefaultPersona => "default-persona",
            ConfigKey::Merchant => "merchant",
            ConfigKey::Multiplier => "multiplier",
            ConfigKey::Timeout => "timeout",
            ConfigKey::FallbackLatency => "fallback-latency",
        }
    }

    fn invalid(self, value: &str, expected: &'static str) -> ConfigValueError {
        ConfigValueError::InvalidValue {
            key: self,
            value: value.to_string(),
            expected,
        }
    }

    /// Parse `value` and store it in `config`.
    pub fn apply(self, config: &mut Config, value: &str) -> Result<(), ConfigValueError> {
        let value = value.trim();
        match self {
            ConfigKey::BaseUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(self.invalid(value, "an http:// or https:// URL"));
                }
                config.base_url = Some(value.to_string());
            }
            ConfigKey::DefaultPersona => {
                let persona: Persona = value
                    .parse()
                    .map_err(|_| self.invalid(value, "one of growth, infra, ops, dev"))?;
                config.default_persona = Some(persona.id().to_string());
            }
            ConfigKey::Merchant => {
                if value.is_empty() {
                    return Err(self.invalid(value, "a non-empty merchant id"));
                }
                config.merchant_id = Some(value.to_string());
            }
            ConfigKey::Multiplier => {
                let multiplier = value
                    .parse::<u32>()
                    .ok()
                    .filter(|m| *m >= 1)
                    .ok_or_else(|| self.invalid(value, "a positive integer"))?;
                config.multiplier = Some(multiplier);
            }
            ConfigKey::Timeout => {
                let secs = value
                    .parse::<u64>()
                    .map_err(|_| self.invalid(value, "a number of seconds"))?;
                config.timeout_secs = Some(secs);
            }
            ConfigKey::FallbackLatency => {
                let millis = value
                    .parse::<u64>()
                    .map_err(|_| self.invalid(value, "a number of milliseconds"))?;
                config.fallback_latency_ms = Some(millis);
            }
        }
        Ok(())
    }

    pub fn clear(self, config: &mut Config) {
        match self {
            ConfigKey::BaseUrl => config.base_url = None,
            ConfigKey::DefaultPersona => config.default_persona = None,
            ConfigKey::Merchant => config.merchant_id = None,
            ConfigKey::Multiplier => config.multiplier = None,
            ConfigKey::Timeout => config.timeout_secs = None,
            ConfigKey::FallbackLatency => config.fallback_latency_ms = None,
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.name() == normalized)
            .ok_or_else(|| ConfigValueError::UnknownKey(s.to_string()))
    }
}
