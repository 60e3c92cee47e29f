//! Persona synthesis and conversation orchestration.
//!
//! This crate provides the [`PersonaEngine`] type which coordinates the full
//! persona lifecycle against the record store, the enrichment workflow, and
//! the completion gateway:
//!
//! ```text
//! Create request
//!      ↓
//! ┌───────────────────────────────────────────────────────────┐
//! │                     PERSONA ENGINE                        │
//! │                                                           │
//! │  1. Validate + insert bare persona row                    │
//! │         ↓                                                 │
//! │  2. Fire enrichment webhook (failure logged, swallowed)   │
//! │         ↓                                                 │
//! │  3. Poll until both raw fields land (bounded, cancellable)│
//! │         ↓                                                 │
//! │  4. Synthesize summary → persist → greet → log turn       │
//! └───────────────────────────────────────────────────────────┘
//!
//! Chat request: re-fetch row → build in-character directive →
//! completion call → append human turn, then AI turn.
//! ```
//!
//! Every operation takes an explicit [`Identity`]; there is no ambient auth
//! state. The completion backend is a [`persona_core::CompletionClient`]
//! handle, so the whole engine runs against an in-memory store and a scripted
//! client in tests.

mod chat;
mod engine;
mod error;
mod panels;
mod synthesis;

pub use chat::{ChatReply, IncomingMessage, SendMessageRequest};
pub use engine::{
    CreatePersonaRequest, CreatedPersona, Identity, Initialized, PersonaEngine, RetryPolicy,
};
pub use error::{Disposition, OrchestratorError};
pub use panels::PersonaPanels;

// Re-export commonly used types from dependencies
pub use database::{Persona, User};
pub use persona_core::{CompletionClient, ScriptedClient};
