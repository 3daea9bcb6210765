use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::User => ROLE_USER,
            MessageRole::Assistant => ROLE_ASSISTANT,
        }
    }

    pub fn is_assistant(self) -> bool {
        self == MessageRole::Assistant
    }
}

/// A single conversation entry. Never mutated after it is appended to a log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            action: None,
        }
    }

    pub fn assistant(content: impl Into<String>, action: Option<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            action: action.filter(|tag| !tag.trim().is_empty()),
        }
    }

    /// Assistant entry reporting a failed request. Carries no action tag.
    pub fn error(reason: &str) -> Self {
        Self::assistant(format!("Error: {reason}"), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_untagged_assistant_entries() {
        let message = Message::error("merchant not found");
        assert!(message.role.is_assistant());
        assert_eq!(message.content, "Error: merchant not found");
        assert!(message.action.is_none());
    }

    #[test]
    fn blank_action_tags_are_dropped() {
        let message = Message::assistant("hi", Some("  ".to_string()));
        assert!(message.action.is_none());

        let tagged = Message::assistant("hi", Some("log_analysis".to_string()));
        assert_eq!(tagged.action.as_deref(), Some("log_analysis"));
    }

    #[test]
    fn roles_serialize_as_api_strings() {
        let json = serde_json::to_value(Message::user("hello")).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("action").is_none());
    }
}
