//! Gateway client implementation.

use async_trait::async_trait;
use persona_core::{CompletionClient, CompletionError, CompletionRequest};
use reqwest::Client;
use tracing::{debug, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse};
use crate::config::GatewayConfig;

/// A completion client backed by a hosted chat-completion gateway.
pub struct GatewayClient {
    client: Client,
    config: GatewayConfig,
}

impl GatewayClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, CompletionError> {
        if config.api_key.trim().is_empty() {
            return Err(CompletionError::Configuration(
                "gateway API key is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                CompletionError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Create a client from environment variables.
    ///
    /// See [`GatewayConfig::from_env`] for the variable table.
    pub fn from_env() -> Result<Self, CompletionError> {
        Self::new(GatewayConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    async fn chat_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: request.messages,
            max_tokens: self.config.max_tokens,
            temperature: request.temperature,
        };

        debug!(model = %body.model, temperature = body.temperature, "Sending gateway request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Prefer the structured error message when the body parses.
            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => api_error.error.message,
                Err(_) => error_text,
            };

            return Err(CompletionError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CompletionError::Network(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl CompletionClient for GatewayClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let completion = self.chat_completion(request).await?;

        if let Some(usage) = &completion.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Gateway usage"
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                warn!("Gateway reply carried no content");
                CompletionError::EmptyResponse
            })
    }

    fn name(&self) -> &str {
        "GatewayClient"
    }
}
