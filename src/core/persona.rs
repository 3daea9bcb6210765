use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// The fixed set of identities a user can chat as.
///
/// Every persona owns an independent conversation and backend session. The
/// per-persona behaviour (remote operation, accepted parameters, fallback
/// rules) hangs off this enum as lookup tables rather than trait objects.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Growth,
    #[serde(rename = "infra")]
    Infrastructure,
    #[serde(rename = "ops")]
    Operations,
    #[serde(rename = "dev")]
    Developer,
}

/// Backend operation a persona's messages are routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOperation {
    GrowthChat,
    InfraChat,
    GenericChat,
}

impl RemoteOperation {
    /// Endpoint path relative to the configured base URL.
    pub fn path(self) -> &'static str {
        match self {
            RemoteOperation::GrowthChat => "chat/growth",
            RemoteOperation::InfraChat => "chat/infra",
            RemoteOperation::GenericChat => "chat",
        }
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Growth,
        Persona::Infrastructure,
        Persona::Operations,
        Persona::Developer,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Persona::Growth => "growth",
            Persona::Infrastructure => "infra",
            Persona::Operations => "ops",
            Persona::Developer => "dev",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Persona::Growth => "Growth Analyst",
            Persona::Infrastructure => "Platform Architect",
            Persona::Operations => "Operations Engineer",
            Persona::Developer => "Integration Developer",
        }
    }

    pub fn role(self) -> &'static str {
        match self {
            Persona::Growth => "Merchant growth and revenue insights",
            Persona::Infrastructure => "Capacity planning and infrastructure design",
            Persona::Operations => "Incident triage and root-cause analysis",
            Persona::Developer => "API integration and debugging",
        }
    }

    pub fn operation(self) -> RemoteOperation {
        match self {
            Persona::Growth => RemoteOperation::GrowthChat,
            Persona::Infrastructure => RemoteOperation::InfraChat,
            Persona::Operations | Persona::Developer => RemoteOperation::GenericChat,
        }
    }

    pub fn accepts_merchant_id(self) -> bool {
        matches!(self, Persona::Growth | Persona::Infrastructure)
    }

    pub fn accepts_multiplier(self) -> bool {
        self == Persona::Infrastructure
    }

    /// Human-readable list of the contextual parameters this persona carries.
    pub fn parameter_summary(self) -> &'static str {
        match (self.accepts_merchant_id(), self.accepts_multiplier()) {
            (true, true) => "merchant id, scale multiplier",
            (true, false) => "merchant id",
            _ => "none",
        }
    }

    /// Find a persona by id or display name, ignoring case.
    pub fn find(name: &str) -> Option<Persona> {
        let needle = name.trim();
        Persona::ALL.into_iter().find(|persona| {
            persona.id().eq_ignore_ascii_case(needle)
                || persona.display_name().eq_ignore_ascii_case(needle)
        })
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePersonaError {
    input: String,
}

impl fmt::Display for ParsePersonaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let available: Vec<&str> = Persona::ALL.iter().map(|p| p.id()).collect();
        write!(
            f,
            "Persona '{}' not found. Available personas: {}",
            self.input,
            available.join(", ")
        )
    }
}

impl Error for ParsePersonaError {}

impl FromStr for Persona {
    type Err = ParsePersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Persona::find(s).ok_or_else(|| ParsePersonaError {
            input: s.trim().to_string(),
        })
    }
}

/// A context parameter typed by the user that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    InvalidMultiplier(String),
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::InvalidMultiplier(value) => write!(
                f,
                "Invalid multiplier '{value}': expected a whole number of at least 1"
            ),
        }
    }
}

impl Error for ParamError {}

/// Parse a scale multiplier such as `4` or `4x`.
pub fn parse_multiplier(input: &str) -> Result<u32, ParamError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_suffix('x')
        .or_else(|| trimmed.strip_suffix('X'))
        .unwrap_or(trimmed);
    digits
        .parse::<u32>()
        .ok()
        .filter(|m| *m >= 1)
        .ok_or_else(|| ParamError::InvalidMultiplier(trimmed.to_string()))
}

/// Persona-scoped auxiliary inputs sent alongside each message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextParams {
    pub merchant_id: Option<String>,
    pub multiplier: u32,
}

impl Default for ContextParams {
    fn default() -> Self {
        Self {
            merchant_id: None,
            multiplier: 1,
        }
    }
}

impl ContextParams {
    pub fn new(merchant_id: Option<String>, multiplier: u32) -> Self {
        Self {
            merchant_id: merchant_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            multiplier: multiplier.max(1),
        }
    }

    /// Keep only the parameters `persona` is allowed to carry.
    pub fn scoped_for(&self, persona: Persona) -> ContextParams {
        ContextParams {
            merchant_id: if persona.accepts_merchant_id() {
                self.merchant_id.clone()
            } else {
                None
            },
            multiplier: if persona.accepts_multiplier() {
                self.multiplier.max(1)
            } else {
                1
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personas_resolve_by_id_and_display_name() {
        assert_eq!(Persona::find("infra"), Some(Persona::Infrastructure));
        assert_eq!(Persona::find("  OPS "), Some(Persona::Operations));
        assert_eq!(Persona::find("growth analyst"), Some(Persona::Growth));
        assert_eq!(Persona::find("marketing"), None);
    }

    #[test]
    fn unknown_persona_error_lists_available_ids() {
        let err = "marketing".parse::<Persona>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'marketing'"));
        assert!(message.contains("growth, infra, ops, dev"));
    }

    #[test]
    fn operations_are_selected_per_persona() {
        assert_eq!(Persona::Growth.operation().path(), "chat/growth");
        assert_eq!(Persona::Infrastructure.operation().path(), "chat/infra");
        assert_eq!(Persona::Operations.operation(), RemoteOperation::GenericChat);
        assert_eq!(Persona::Developer.operation(), RemoteOperation::GenericChat);
    }

    #[test]
    fn scoped_params_drop_disallowed_fields() {
        let params = ContextParams::new(Some("m-42".to_string()), 4);

        let infra = params.scoped_for(Persona::Infrastructure);
        assert_eq!(infra.merchant_id.as_deref(), Some("m-42"));
        assert_eq!(infra.multiplier, 4);

        let growth = params.scoped_for(Persona::Growth);
        assert_eq!(growth.merchant_id.as_deref(), Some("m-42"));
        assert_eq!(growth.multiplier, 1);

        let dev = params.scoped_for(Persona::Developer);
        assert_eq!(dev, ContextParams::default());
    }

    #[test]
    fn params_normalize_blank_merchant_and_zero_multiplier() {
        let params = ContextParams::new(Some("   ".to_string()), 0);
        assert_eq!(params.merchant_id, None);
        assert_eq!(params.multiplier, 1);
    }

    #[test]
    fn persona_ids_round_trip_through_serde() {
        let json = serde_json::to_string(&Persona::Infrastructure).unwrap();
        assert_eq!(json, "\"infra\"");
        let parsed: Persona = serde_json::from_str("\"dev\"").unwrap();
        assert_eq!(parsed, Persona::Developer);
    }

    #[test]
    fn multiplier_parsing_accepts_plain_and_suffixed_values() {
        assert_eq!(parse_multiplier("4"), Ok(4));
        assert_eq!(parse_multiplier(" 10x "), Ok(10));
        assert_eq!(parse_multiplier("3X"), Ok(3));
        for bad in ["0", "x", "-1", "two", ""] {
            assert!(parse_multiplier(bad).is_err(), "{bad} should be rejected");
        }
        assert_eq!(
            parse_multiplier("0").unwrap_err().to_string(),
            "Invalid multiplier '0': expected a whole number of at least 1"
        );
    }
}
