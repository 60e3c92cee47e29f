//! Core trait and types for the Hatch persona services.
//!
//! This crate provides the shared vocabulary used across the workspace:
//!
//! - [`CompletionClient`] - The trait every chat-completion backend implements
//! - [`ChatMessage`] / [`CompletionRequest`] - Message types for model calls
//! - [`CompletionError`] - Error types for completion calls
//! - [`raw`] - Defensive normalization of enrichment payloads
//! - [`Summary`] - The derived-summary union (structured or narrative)
//! - [`prompt`] - The single persona instruction template, parameterized by mode
//! - [`ScriptedClient`] - A scripted completion client for tests and examples
//!
//! # Example
//!
//! ```rust
//! use persona_core::{ChatMessage, CompletionClient, CompletionError, CompletionRequest};
//! use async_trait::async_trait;
//!
//! struct CannedClient;
//!
//! #[async_trait]
//! impl CompletionClient for CannedClient {
//!     async fn complete(&self, _request: CompletionRequest) -> Result<String, CompletionError> {
//!         Ok("Hello!".to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "CannedClient"
//!     }
//! }
//! ```

mod error;
mod message;
pub mod prompt;
pub mod raw;
mod scripted;
mod summary;
mod trait_def;

pub use error::CompletionError;
pub use message::{ChatMessage, CompletionRequest};
pub use prompt::{hash_prompt, PersonaDossier, PromptMode};
pub use scripted::ScriptedClient;
pub use summary::{NarrativeSummary, StructuredSummary, Summary};
pub use trait_def::CompletionClient;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
