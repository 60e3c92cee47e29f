//! A scripted completion client for tests and examples.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CompletionError;
use crate::message::CompletionRequest;
use crate::trait_def::CompletionClient;

/// A [`CompletionClient`] that replays a scripted list of outcomes and
/// records every request it receives.
///
/// # Example
///
/// ```rust
/// use persona_core::{ChatMessage, CompletionClient, CompletionRequest, ScriptedClient};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let client = ScriptedClient::new();
///     client.push_reply("Hello!");
///
///     let request = CompletionRequest::new(vec![ChatMessage::user("hi")], 0.7);
///     let reply = client.complete(request).await.unwrap();
///
///     assert_eq!(reply, "Hello!");
///     assert_eq!(client.requests().len(), 1);
/// }
/// ```
#[derive(Default)]
pub struct ScriptedClient {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    /// Create an empty scripted client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(reply.into()));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: CompletionError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// All requests received so far, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of completion calls made.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(CompletionError::Configuration(
                    "scripted client exhausted".to_string(),
                ))
            })
    }

    fn name(&self) -> &str {
        "ScriptedClient"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ChatMessage;

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let client = ScriptedClient::new();
        client.push_reply("first");
        client.push_error(CompletionError::Status {
            status: 429,
            message: "rate limited".to_string(),
        });

        let request = CompletionRequest::new(vec![ChatMessage::user("a")], 0.7);
        assert_eq!(client.complete(request.clone()).await.unwrap(), "first");

        let err = client.complete(request).await.unwrap_err();
        assert!(matches!(err, CompletionError::Status { status: 429, .. }));

        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_script_is_an_error() {
        let client = ScriptedClient::new();
        let request = CompletionRequest::new(vec![ChatMessage::user("a")], 0.7);
        let err = client.complete(request).await.unwrap_err();
        assert!(matches!(err, CompletionError::Configuration(_)));
    }
}
