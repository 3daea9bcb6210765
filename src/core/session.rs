//! Top-level controller for outgoing messages.
//!
//! A submission moves Idle -> Sending -> Settled (success or failure) -> Idle.
//! One global in-flight flag guards the transport, so while any persona is
//! Sending every other submission is rejected, whichever persona it targets.

use crate::core::conversation::ConversationStore;
use crate::core::dispatch::{DispatchRequest, DispatchResult, Dispatcher};
use crate::core::message::Message;
use crate::core::persona::{ContextParams, Persona};
use crate::core::transport::Transport;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The text was empty after trimming.
    Empty,
    /// Another submission is still Sending.
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(RejectReason),
    Settled { persona: Persona, succeeded: bool },
}

impl SubmitOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected(_))
    }
}

struct SessionState {
    store: ConversationStore,
    active: Persona,
    params: ContextParams,
}

/// Clears the in-flight flag on every exit path of a submission.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SessionOrchestrator<T> {
    dispatcher: Dispatcher<T>,
    state: Mutex<SessionState>,
    in_flight: AtomicBool,
}

impl<T: Transport> SessionOrchestrator<T> {
    pub fn new(dispatcher: Dispatcher<T>, active: Persona, params: ContextParams) -> Self {
        Self {
            dispatcher,
            state: Mutex::new(SessionState {
                store: ConversationStore::new(),
                active,
                params,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn active_persona(&self) -> Persona {
        self.lock().active
    }

    pub fn set_active_persona(&self, persona: Persona) {
        self.lock().active = persona;
    }

    pub fn params(&self) -> ContextParams {
        self.lock().params.clone()
    }

    pub fn set_merchant_id(&self, merchant_id: Option<String>) {
        let mut state = self.lock();
        let multiplier = state.params.multiplier;
        state.params = ContextParams::new(merchant_id, multiplier);
    }

    pub fn set_multiplier(&self, multiplier: u32) {
        let mut state = self.lock();
        state.params.multiplier = multiplier.max(1);
    }

    pub fn log(&self, persona: Persona) -> Vec<Message> {
        self.lock().store.log(persona).to_vec()
    }

    pub fn log_len(&self, persona: Persona) -> usize {
        self.lock().store.log(persona).len()
    }

    pub fn session_token(&self, persona: Persona) -> Option<String> {
        self.lock().store.session_token(persona).map(str::to_string)
    }

    /// Send `text` as the active persona.
    ///
    /// Empty input and submissions made while another one is Sending are
    /// rejected without touching any state. An accepted submission appends
    /// exactly one user message before dispatching and exactly one assistant
    /// message (the reply or an error) once it settles, both to the persona
    /// that was active when it was accepted.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Rejected(RejectReason::Empty);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("submission rejected while another is in flight");
            return SubmitOutcome::Rejected(RejectReason::Busy);
        }
        let _in_flight = InFlightGuard(&self.in_flight);

        let request = {
            let mut state = self.lock();
            let persona = state.active;
            let params = state.params.scoped_for(persona);
            state.store.append(persona, Message::user(text));
            DispatchRequest {
                persona,
                text: text.to_string(),
                session_token: state.store.session_token(persona).map(str::to_string),
                params,
            }
        };
        let persona = request.persona;
        debug!(persona = persona.id(), "sending message");

        let result = self.dispatcher.dispatch(&request).await;

        let mut state = self.lock();
        match result {
            DispatchResult::Success(success) => {
                if let Some(token) = success.session_token.as_deref() {
                    if state.store.set_session_token(persona, token) {
                        info!(persona = persona.id(), "session token updated");
                    }
                }
                state
                    .store
                    .append(persona, Message::assistant(success.response, success.action));
                SubmitOutcome::Settled {
                    persona,
                    succeeded: true,
                }
            }
            DispatchResult::Failure { reason } => {
                state.store.append(persona, Message::error(&reason));
                SubmitOutcome::Settled {
                    persona,
                    succeeded: false,
                }
            }
        }
    }
}
