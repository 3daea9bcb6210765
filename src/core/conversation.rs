use crate::core::message::Message;
use crate::core::persona::Persona;
use std::collections::HashMap;

/// Log and backend session token for one persona.
#[derive(Debug, Default, Clone)]
pub struct PersonaConversation {
    messages: Vec<Message>,
    session_token: Option<String>,
}

/// Per-persona bookkeeping of message logs and session tokens.
///
/// Every persona in [`Persona::ALL`] has an entry from construction, so
/// lookups never miss. Mutation is crate-private; outside the crate the store
/// is only reachable through the session orchestrator's read accessors.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    conversations: HashMap<Persona, PersonaConversation>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        let conversations = Persona::ALL
            .into_iter()
            .map(|persona| (persona, PersonaConversation::default()))
            .collect();
        Self { conversations }
    }

    fn entry(&mut self, persona: Persona) -> &mut PersonaConversation {
        self.conversations.entry(persona).or_default()
    }

    pub(crate) fn append(&mut self, persona: Persona, message: Message) {
        self.entry(persona).messages.push(message);
    }

    pub fn log(&self, persona: Persona) -> &[Message] {
        self.conversations
            .get(&persona)
            .map(|conversation| conversation.messages.as_slice())
            .unwrap_or(&[])
    }

    /// Overwrite the persona's token when `token` is not blank and differs
    /// from the stored one. Tokens are stored exactly as received. Returns
    /// true when the token changed.
    pub(crate) fn set_session_token(&mut self, persona: Persona, token: &str) -> bool {
        if token.trim().is_empty() {
            return false;
        }

        let conversation = self.entry(persona);
        if conversation.session_token.as_deref() == Some(token) {
            return false;
        }
        conversation.session_token = Some(token.to_string());
        true
    }

    pub fn session_token(&self, persona: Persona) -> Option<&str> {
        self.conversations
            .get(&persona)
            .and_then(|conversation| conversation.session_token.as_deref())
    }
}
