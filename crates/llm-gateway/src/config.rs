//! Configuration for the gateway client.

use std::env;
use std::time::Duration;

use persona_core::CompletionError;

/// Configuration for [`GatewayClient`](crate::GatewayClient).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Request timeout for every outbound call.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl GatewayConfig {
    /// Create configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `GATEWAY_API_KEY` | API key for authentication | (required) |
    /// | `GATEWAY_API_URL` | Gateway base URL | `https://api.openai.com` |
    /// | `GATEWAY_MODEL` | Model name | `gpt-4o-mini` |
    /// | `GATEWAY_MAX_TOKENS` | Max tokens per reply | (unset) |
    /// | `GATEWAY_TIMEOUT_SECS` | Request timeout in seconds | `60` |
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = env::var("GATEWAY_API_KEY")
            .map_err(|_| CompletionError::Configuration("GATEWAY_API_KEY not set".to_string()))?;

        let api_url =
            env::var("GATEWAY_API_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());

        let model = env::var("GATEWAY_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let max_tokens = env::var("GATEWAY_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok());

        let timeout = env::var("GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));

        Ok(Self {
            api_url,
            api_key,
            model,
            max_tokens,
            timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }
}

/// Builder for GatewayConfig.
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the gateway base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GatewayConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();

        assert_eq!(config.api_url, "https://api.openai.com");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.max_tokens.is_none());
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_builder() {
        let config = GatewayConfig::builder()
            .api_key("my-key")
            .api_url("https://gateway.example.com")
            .model("gpt-4o")
            .max_tokens(512)
            .timeout(Duration::from_secs(10))
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.api_url, "https://gateway.example.com");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, Some(512));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_gateway_vars() {
            std::env::remove_var("GATEWAY_API_KEY");
            std::env::remove_var("GATEWAY_API_URL");
            std::env::remove_var("GATEWAY_MODEL");
            std::env::remove_var("GATEWAY_MAX_TOKENS");
            std::env::remove_var("GATEWAY_TIMEOUT_SECS");
        }

        // Missing API key should error
        clear_all_gateway_vars();
        let result = GatewayConfig::from_env();
        assert!(matches!(
            result,
            Err(persona_core::CompletionError::Configuration(_))
        ));

        // Only API key set, defaults used
        clear_all_gateway_vars();
        std::env::set_var("GATEWAY_API_KEY", "test-env-key");

        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.api_url, "https://api.openai.com");
        assert_eq!(config.model, "gpt-4o-mini");

        // All vars set
        clear_all_gateway_vars();
        std::env::set_var("GATEWAY_API_KEY", "full-test-key");
        std::env::set_var("GATEWAY_API_URL", "https://test.api.com");
        std::env::set_var("GATEWAY_MODEL", "gpt-4o");
        std::env::set_var("GATEWAY_MAX_TOKENS", "2048");
        std::env::set_var("GATEWAY_TIMEOUT_SECS", "15");

        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.api_url, "https://test.api.com");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, Some(2048));
        assert_eq!(config.timeout, Duration::from_secs(15));

        clear_all_gateway_vars();
    }
}
