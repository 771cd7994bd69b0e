/// Normalized embedding output types and the processor producing them.
///
/// Providers wrap vectors in slightly different envelopes; the types
/// here pin down one stable shape (`data` / `model` / `usage`) that
/// downstream code can rely on regardless of backend.
use serde::{Deserialize, Serialize};

use super::{EmbedderError, OutputProcessor};
use crate::client::RawResponse;

/// One embedding vector with its position in the input batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub index: usize,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Normalized result of an embedding call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedderOutput {
    /// One entry per input text, in input order.
    #[serde(default)]
    pub data: Vec<Embedding>,

    /// Backend model that produced the vectors, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Token usage, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl EmbedderOutput {
    /// Parse a raw provider response into the normalized shape.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedderError::OutputProcessing`] when the response
    /// does not match the expected envelope.
    pub fn from_response(response: &RawResponse) -> Result<Self, EmbedderError> {
        serde_json::from_value(response.clone())
            .map_err(|e| EmbedderError::OutputProcessing(format!("unexpected response shape: {e}")))
    }

    /// Dimensionality of the vectors, taken from the first entry.
    #[must_use]
    pub fn dimensions(&self) -> Option<usize> {
        self.data.first().map(|e| e.embedding.len())
    }

    /// Number of embeddings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the output carries no embeddings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Output processor that parses the raw response and re-emits it in the
/// normalized shape, dropping provider-specific extras.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddingNormalizer;

impl EmbeddingNormalizer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl OutputProcessor for EmbeddingNormalizer {
    fn process(&self, response: RawResponse) -> Result<RawResponse, EmbedderError> {
        let output = EmbedderOutput::from_response(&response)?;
        serde_json::to_value(&output)
            .map_err(|e| EmbedderError::OutputProcessing(e.to_string()))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
