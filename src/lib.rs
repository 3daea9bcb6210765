//! Switchboard is a terminal chat client that talks to a conversational
//! backend as one of several fixed personas.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns personas, per-persona conversations and session tokens,
//!   request dispatch with its offline fallback responder, and the session
//!   orchestrator that serializes submissions.
//! - [`commands`] implements slash-command parsing and execution for the
//!   interactive chat.
//! - [`api`] defines the JSON payloads exchanged with the backend.
//! - [`utils`] holds URL helpers and transcript logging.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod utils;
