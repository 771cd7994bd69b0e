/// Mock model client for testing purposes.
///
/// Produces deterministic, L2-normalized embeddings from text hashes and
/// records every call, so tests can assert what the embedder actually
/// sent without a real backend.
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use super::{ClientError, ModelClient, ModelType, RawResponse};
use crate::embedder::EmbedderInput;
use crate::kwargs::ModelKwargs;

/// One recorded `call` invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub input: EmbedderInput,
    pub model_kwargs: ModelKwargs,
    pub model_type: ModelType,
}

/// A mock client that replies with deterministic hash-derived vectors.
///
/// Responses follow the common `/embeddings` JSON shape, so output
/// processors can be exercised against it unchanged.
pub struct MockClient {
    dimensions: usize,
    fail_init: bool,
    fail_call: Option<ClientError>,
    init_count: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockClient {
    /// Create a mock producing vectors of the given dimensionality.
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            fail_init: false,
            fail_call: None,
            init_count: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make `init_sync_client` fail, for wiring-failure tests.
    #[must_use]
    pub fn with_init_failure(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Make every `call` fail with the given error.
    #[must_use]
    pub fn with_call_failure(mut self, err: ClientError) -> Self {
        self.fail_call = Some(err);
        self
    }

    /// How many times `init_sync_client` has run.
    #[must_use]
    pub fn init_count(&self) -> usize {
        self.init_count.load(Ordering::SeqCst)
    }

    /// Snapshot of all recorded calls, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// The response this mock returns for `input` under `model`.
    ///
    /// Exposed so tests can compute the expected raw response without
    /// going through `call` (which would record an extra invocation).
    #[must_use]
    pub fn response_for(&self, input: &EmbedderInput, model: &str) -> RawResponse {
        let texts = input.texts();
        let data: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(index, text)| {
                json!({
                    "embedding": hash_embedding(text, self.dimensions),
                    "index": index,
                })
            })
            .collect();

        let prompt_tokens: u64 = texts.iter().map(|t| t.len() as u64).sum();
        json!({
            "data": data,
            "model": model,
            "usage": { "prompt_tokens": prompt_tokens, "total_tokens": prompt_tokens },
        })
    }
}

impl ModelClient for MockClient {
    fn init_sync_client(&self) -> Result<(), ClientError> {
        if self.fail_init {
            return Err(ClientError::InitFailed(
                "mock configured to fail initialization".to_string(),
            ));
        }
        self.init_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn call(
        &self,
        input: &EmbedderInput,
        model_kwargs: &ModelKwargs,
        model_type: ModelType,
    ) -> Result<RawResponse, ClientError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                input: input.clone(),
                model_kwargs: model_kwargs.clone(),
                model_type,
            });
        }

        if let Some(err) = &self.fail_call {
            return Err(err.clone());
        }

        let model = model_kwargs.model().unwrap_or("mock-embed");
        Ok(self.response_for(input, model))
    }
}

impl fmt::Debug for MockClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockClient")
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

/// Deterministic L2-normalized embedding derived from a text hash.
fn hash_embedding(text: &str, dimensions: usize) -> Vec<f32> {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let hash = hasher.finish();

    // Use the hash bytes to seed deterministic float values
    let bytes = hash.to_le_bytes();
    let mut embedding = Vec::with_capacity(dimensions);
    for i in 0..dimensions {
        embedding.push(f32::from(bytes[i % 8]) / 255.0);
    }

    // L2 normalize
    let norm_sq: f32 = embedding.iter().map(|v| v * v).sum();
    if norm_sq > 0.0 {
        let inv = 1.0 / norm_sq.sqrt();
        for v in &mut embedding {
            *v *= inv;
        }
    }

    embedding
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_embedding_deterministic() {
        let a = hash_embedding("hello", 16);
        let b = hash_embedding("hello", 16);
        assert_eq!(a, b, "same input should produce same vector");

        let c = hash_embedding("world", 16);
        assert_ne!(a, c, "different inputs should produce different vectors");
    }

    #[test]
    fn test_hash_embedding_normalized() {
        let vec = hash_embedding("normalize me", 32);
        let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!(
            (norm - 1.0).abs() < 0.01,
            "vector should be approximately unit length, got {norm}"
        );
    }

    #[test]
    fn test_call_records_invocations() {
        let client = MockClient::new(8);
        client.init_sync_client().unwrap();

        let input = EmbedderInput::from("hello");
        let kwargs = ModelKwargs::with_model("m1");
        client.call(&input, &kwargs, ModelType::Embedder).unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].input, input);
        assert_eq!(calls[0].model_kwargs, kwargs);
        assert_eq!(calls[0].model_type, ModelType::Embedder);
    }

    #[test]
    fn test_response_shape() {
        let client = MockClient::new(8);
        let input = EmbedderInput::from(vec!["a".to_string(), "b".to_string()]);
        let response = client
            .call(&input, &ModelKwargs::with_model("m1"), ModelType::Embedder)
            .unwrap();

        let data = response["data"].as_array().unwrap();
        assert_eq!(data.len(), 2, "one entry per input text");
        assert_eq!(data[0]["embedding"].as_array().unwrap().len(), 8);
        assert_eq!(data[1]["index"], 1);
        assert_eq!(response["model"], "m1");
    }

    #[test]
    fn test_init_failure_mode() {
        let client = MockClient::new(8).with_init_failure();
        let err = client.init_sync_client().unwrap_err();
        assert!(matches!(err, ClientError::InitFailed(_)));
        assert_eq!(client.init_count(), 0);
    }

    #[test]
    fn test_call_failure_mode_still_records() {
        let client = MockClient::new(8).with_call_failure(ClientError::Network(
            "connection refused".to_string(),
        ));
        let input = EmbedderInput::from("x");
        let err = client
            .call(&input, &ModelKwargs::with_model("m1"), ModelType::Embedder)
            .unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        assert_eq!(client.calls().len(), 1, "failed calls are still recorded");
    }
}
