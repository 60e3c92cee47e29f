//! The completion-client trait.

use async_trait::async_trait;

use crate::error::CompletionError;
use crate::message::CompletionRequest;

/// A backend that turns an ordered message list into one reply.
///
/// Implemented by the HTTP gateway client for production and by
/// [`ScriptedClient`](crate::ScriptedClient) for tests. The orchestration
/// layer only ever sees this trait, so it can be exercised without a network.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one completion call and return the reply text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;

    /// Human-readable backend name, for logs.
    fn name(&self) -> &str;
}
