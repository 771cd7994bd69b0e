/// Model client interface and shared types.
///
/// A [`ModelClient`] performs the actual request/response exchange with a
/// model-serving backend. The embedder core treats it as an opaque
/// capability: transport, authentication, and wire format are entirely
/// the client's concern.
pub mod http;
pub mod mock;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::embedder::EmbedderInput;
use crate::kwargs::ModelKwargs;

/// Raw provider-specific response, passed through as loose JSON.
pub type RawResponse = serde_json::Value;

/// Tag distinguishing the kinds of model invocation a client can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// Embedding request (text → vectors).
    Embedder,
    /// Text generation request.
    Llm,
    /// Not yet classified.
    Undefined,
}

impl ModelType {
    /// Stable lowercase name, used in logs and request routing.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Embedder => "embedder",
            Self::Llm => "llm",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur inside a model client.
///
/// The embedder core propagates these unchanged; it performs no retry,
/// translation, or suppression.
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    #[error("sync client not initialized; call init_sync_client first")]
    NotInitialized,

    #[error("client initialization failed: {0}")]
    InitFailed(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("provider error (status {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("unsupported model type: {0}")]
    UnsupportedModelType(ModelType),
}

/// Trait for model-serving clients.
///
/// Implementations must be `Send + Sync` to allow concurrent use behind
/// `Arc`, and `Debug` so the embedder's diagnostic representation can
/// name them.
pub trait ModelClient: Send + Sync + fmt::Debug {
    /// Initialize the synchronous channel to the backend.
    ///
    /// Invoked once, eagerly, when an embedder is constructed. A
    /// misconfigured client should fail here, at wiring time, not at
    /// first use.
    fn init_sync_client(&self) -> Result<(), ClientError>;

    /// Perform a synchronous, potentially blocking model call.
    ///
    /// `model_kwargs` is the fully composed configuration for this call;
    /// `model_type` identifies the invocation kind among the kinds this
    /// client might serve.
    fn call(
        &self,
        input: &EmbedderInput,
        model_kwargs: &ModelKwargs,
        model_type: ModelType,
    ) -> Result<RawResponse, ClientError>;
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_type_as_str() {
        assert_eq!(ModelType::Embedder.as_str(), "embedder");
        assert_eq!(ModelType::Llm.as_str(), "llm");
        assert_eq!(ModelType::Undefined.as_str(), "undefined");
    }

    #[test]
    fn test_model_type_serde() {
        let json = serde_json::to_string(&ModelType::Embedder).unwrap();
        assert_eq!(json, r#""embedder""#);
        let back: ModelType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ModelType::Embedder);
    }

    #[test]
    fn test_client_error_display() {
        let err = ClientError::Provider {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "provider error (status 429): rate limited");

        let err = ClientError::NotInitialized;
        assert!(err.to_string().contains("init_sync_client"));
    }
}
