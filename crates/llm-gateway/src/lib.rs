//! HTTP client for the hosted chat-completion gateway.
//!
//! Implements [`persona_core::CompletionClient`] over the standard
//! chat-completion wire contract: a model identifier, a temperature, and an
//! ordered list of role/content messages. Synthesis, greeting, and chat all
//! go through this one client with different prompt content.
//!
//! # Example
//!
//! ```no_run
//! use llm_gateway::{GatewayClient, GatewayConfig};
//! use persona_core::{ChatMessage, CompletionClient, CompletionRequest};
//!
//! # async fn example() -> Result<(), persona_core::CompletionError> {
//! let config = GatewayConfig::from_env()?;
//! let client = GatewayClient::new(config)?;
//!
//! let request = CompletionRequest::new(vec![ChatMessage::user("Hello")], 0.7);
//! let reply = client.complete(request).await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

mod api_types;
mod client;
mod config;

pub use api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, Choice, ResponseMessage, Usage,
};
pub use client::GatewayClient;
pub use config::GatewayConfig;
