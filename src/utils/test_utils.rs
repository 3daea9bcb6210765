use crate::api::{ChatRequest, ChatResponse};
use crate::commands::{ChatContext, ChatSession};
use crate::core::dispatch::Dispatcher;
use crate::core::fallback::FallbackSynthesizer;
use crate::core::message::Message;
use crate::core::persona::{ContextParams, Persona, RemoteOperation};
use crate::core::transport::{Transport, TransportError};
use crate::utils::logging::LoggingState;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub type RecordedCall = (RemoteOperation, ChatRequest);

/// Fallback responder without the simulated round trip.
pub fn instant_fallback() -> FallbackSynthesizer {
    FallbackSynthesizer::new(Duration::ZERO)
}

/// Transport that replays a fixed script of results and records every call.
/// Once the script runs out every call fails as unreachable.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<ChatResponse, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<ChatResponse, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        operation: RemoteOperation,
        request: &ChatRequest,
    ) -> Result<ChatResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((operation, request.clone()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Unreachable("script exhausted".to_string())))
    }
}

/// Scripted transport that holds every call until the gate is notified.
pub struct GatedTransport {
    gate: Arc<Notify>,
    inner: ScriptedTransport,
}

impl GatedTransport {
    pub fn new(gate: Arc<Notify>, script: Vec<Result<ChatResponse, TransportError>>) -> Self {
        Self {
            gate,
            inner: ScriptedTransport::new(script),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.calls()
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn send(
        &self,
        operation: RemoteOperation,
        request: &ChatRequest,
    ) -> Result<ChatResponse, TransportError> {
        self.gate.notified().await;
        self.inner.send(operation, request).await
    }
}

pub fn create_test_messages() -> Vec<Message> {
    vec![
        Message::user("Hello"),
        Message::assistant("Hi there!", Some("capability_summary".to_string())),
        Message::user("How are you?"),
        Message::error("backend unavailable"),
    ]
}

/// Chat context on the growth persona backed by a scripted transport, with
/// transcript logging off.
pub fn create_test_context(script: Vec<Result<ChatResponse, TransportError>>) -> ChatContext {
    let transport: Box<dyn Transport> = Box::new(ScriptedTransport::new(script));
    let session: ChatSession = ChatSession::new(
        Dispatcher::new(transport, instant_fallback()),
        Persona::Growth,
        ContextParams::default(),
    );
    ChatContext::new(session, LoggingState::new(None).unwrap())
}
