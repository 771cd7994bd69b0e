/// Blocking HTTP model client for OpenAI-compatible embedding endpoints.
///
/// Reference implementation of [`ModelClient`]: serializes composed model
/// kwargs plus the input into the request body, POSTs to the configured
/// endpoint, and returns the provider's JSON unparsed. Deliberately thin:
/// no retry, no backoff, no rate limiting — those belong to the provider
/// SDK or a higher layer.
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use serde_json::{Value, json};
use tracing::{debug, info};

use super::{ClientError, ModelClient, ModelType, RawResponse};
use crate::config::Config;
use crate::embedder::EmbedderInput;
use crate::kwargs::ModelKwargs;

/// HTTP client targeting an OpenAI-compatible `/embeddings` endpoint.
///
/// The underlying `reqwest` blocking client is built exactly once by
/// `init_sync_client`; `call` before initialization is an error.
pub struct HttpClient {
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
    client: OnceLock<reqwest::blocking::Client>,
}

impl HttpClient {
    /// Create a client for the given endpoint URL with defaults
    /// (no API key, 30 second timeout).
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
            client: OnceLock::new(),
        }
    }

    /// Attach a bearer token sent with every request.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a client from configuration, reading the API key from the
    /// environment variable the config names (absent variable means no
    /// authentication header).
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut client =
            Self::new(config.endpoint.clone()).with_timeout(Duration::from_secs(config.timeout_secs));
        if let Ok(key) = std::env::var(&config.api_key_env) {
            client = client.with_api_key(key);
        }
        client
    }
}

impl ModelClient for HttpClient {
    fn init_sync_client(&self) -> Result<(), ClientError> {
        if self.client.get().is_some() {
            return Ok(());
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("embedcore/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::InitFailed(e.to_string()))?;

        // A lost set race just means another thread initialized first.
        let _ = self.client.set(client);
        info!(endpoint = %self.endpoint, "HTTP sync client initialized");
        Ok(())
    }

    fn call(
        &self,
        input: &EmbedderInput,
        model_kwargs: &ModelKwargs,
        model_type: ModelType,
    ) -> Result<RawResponse, ClientError> {
        if model_type != ModelType::Embedder {
            return Err(ClientError::UnsupportedModelType(model_type));
        }

        let client = self.client.get().ok_or(ClientError::NotInitialized)?;
        let body = build_request_body(input, model_kwargs);

        debug!(endpoint = %self.endpoint, inputs = input.len(), "POST embeddings");

        let mut request = client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Request body: every composed kwarg passed through, plus `"input"` as
/// a string or array of strings.
fn build_request_body(input: &EmbedderInput, model_kwargs: &ModelKwargs) -> Value {
    let mut body = serde_json::Map::new();
    for (key, value) in model_kwargs.iter() {
        body.insert(key.clone(), value.clone());
    }
    let input_value = match input {
        EmbedderInput::Single(text) => json!(text),
        EmbedderInput::Batch(texts) => json!(texts),
    };
    body.insert("input".to_string(), input_value);
    Value::Object(body)
}

// ── Tests ────────────────────────────────────────────────────────────
