//! Routes an outgoing message to the right backend operation.
//!
//! Two failure tiers are kept apart here:
//! - transport faults (unreachable, non-2xx, undecodable payload) are absorbed
//!   by handing the same inputs to the [`FallbackSynthesizer`];
//! - a reachable backend that answers with an error result becomes a
//!   [`DispatchResult::Failure`] carrying the server's message.

use crate::api::{ChatRequest, ChatResponse};
use crate::core::fallback::FallbackSynthesizer;
use crate::core::persona::{ContextParams, Persona};
use crate::core::transport::Transport;
use serde_json::Value;
use tracing::{debug, warn};

const GENERIC_FAILURE_REASON: &str = "The assistant reported an error without details.";

/// Everything needed to send one message for one persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub persona: Persona,
    pub text: String,
    pub session_token: Option<String>,
    pub params: ContextParams,
}

impl DispatchRequest {
    /// Serialize for the wire, carrying only the parameters the persona accepts.
    pub fn to_wire(&self) -> ChatRequest {
        let params = self.params.scoped_for(self.persona);
        ChatRequest {
            message: self.text.clone(),
            session_id: self.session_token.clone(),
            merchant_id: params.merchant_id,
            multiplier: self
                .persona
                .accepts_multiplier()
                .then_some(params.multiplier),
        }
    }

    fn normalized(&self) -> DispatchRequest {
        DispatchRequest {
            text: self.text.to_lowercase(),
            params: self.params.scoped_for(self.persona),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchSuccess {
    pub response: String,
    pub session_token: Option<String>,
    pub action: Option<String>,
    pub data: Option<Value>,
    pub merchant_id: Option<String>,
}

impl From<ChatResponse> for DispatchSuccess {
    fn from(response: ChatResponse) -> Self {
        Self {
            response: response.response.unwrap_or_default(),
            session_token: response.session_id,
            action: response.action,
            data: response.data,
            merchant_id: response.merchant_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    Success(DispatchSuccess),
    Failure { reason: String },
}

impl DispatchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchResult::Success(_))
    }

    /// Convert a decoded backend response, honouring its result discriminator.
    pub fn from_response(response: ChatResponse) -> Self {
        if response.is_error() {
            let reason = response
                .error
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .unwrap_or(GENERIC_FAILURE_REASON)
                .to_string();
            return DispatchResult::Failure { reason };
        }
        DispatchResult::Success(DispatchSuccess::from(response))
    }
}

pub struct Dispatcher<T> {
    transport: T,
    fallback: FallbackSynthesizer,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, fallback: FallbackSynthesizer) -> Self {
        Self {
            transport,
            fallback,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn dispatch(&self, request: &DispatchRequest) -> DispatchResult {
        let operation = request.persona.operation();
        let wire = request.to_wire();

        match self.transport.send(operation, &wire).await {
            Ok(response) => {
                debug!(
                    persona = request.persona.id(),
                    %operation,
                    error_result = response.is_error(),
                    "backend responded"
                );
                DispatchResult::from_response(response)
            }
            Err(err) => {
                warn!(
                    persona = request.persona.id(),
                    %operation,
                    error = %err,
                    "transport failed, using fallback responder"
                );
                self.fallback.synthesize(&request.normalized()).await
            }
        }
    }
}
