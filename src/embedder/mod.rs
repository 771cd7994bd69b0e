/// Embedder core: turns text into vector embeddings by delegating to a
/// [`ModelClient`], optionally post-processing the raw response.
///
/// All non-trivial behavior of this crate lives here: default-merging of
/// model kwargs, construction-time validation, and error propagation.
/// Batching, caching, rate limiting, and retries belong to the client or
/// a higher-level caller, never to this component.
pub mod output;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::client::{ClientError, ModelClient, ModelType, RawResponse};
use crate::kwargs::ModelKwargs;

/// Errors produced by the embedder core.
#[derive(Error, Debug)]
pub enum EmbedderError {
    /// Construction-time configuration error: the defaults lack the one
    /// mandatory key.
    #[error("Embedder requires a 'model' key in model_kwargs")]
    MissingModel,

    /// Client failure, surfaced unchanged.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Output processor failure.
    #[error("output processing failed: {0}")]
    OutputProcessing(String),
}

/// Input to an embedding call: one text or an ordered sequence of texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedderInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbedderInput {
    /// All input texts, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Self::Single(text) => vec![text.as_str()],
            Self::Batch(texts) => texts.iter().map(String::as_str).collect(),
        }
    }

    /// Number of input texts.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(texts) => texts.len(),
        }
    }

    /// Whether there are no input texts (empty batch).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for EmbedderInput {
    fn from(text: &str) -> Self {
        Self::Single(text.to_string())
    }
}

impl From<String> for EmbedderInput {
    fn from(text: String) -> Self {
        Self::Single(text)
    }
}

impl From<Vec<String>> for EmbedderInput {
    fn from(texts: Vec<String>) -> Self {
        Self::Batch(texts)
    }
}

impl From<&[&str]> for EmbedderInput {
    fn from(texts: &[&str]) -> Self {
        Self::Batch(texts.iter().map(ToString::to_string).collect())
    }
}

/// Transform applied to a raw model response.
///
/// Any callable accepting the raw response works; a blanket impl covers
/// plain closures, including the identity function.
pub trait OutputProcessor: Send + Sync {
    /// Transform the raw response into the processed result.
    fn process(&self, response: RawResponse) -> Result<RawResponse, EmbedderError>;
}

impl<F> OutputProcessor for F
where
    F: Fn(RawResponse) -> Result<RawResponse, EmbedderError> + Send + Sync,
{
    fn process(&self, response: RawResponse) -> Result<RawResponse, EmbedderError> {
        self(response)
    }
}

/// Adapter that turns text into vector embeddings via a model client.
///
/// Constructed once at wiring time, then called repeatedly and
/// statelessly: the stored default kwargs are never mutated after
/// construction, and each call composes a fresh merged mapping. Safe for
/// concurrent use as long as the client and processor are.
#[derive(Clone)]
pub struct Embedder {
    model_kwargs: ModelKwargs,
    model_client: Arc<dyn ModelClient>,
    output_processor: Option<Arc<dyn OutputProcessor>>,
}

impl Embedder {
    /// The fixed tag identifying this component's calls to the client.
    pub const MODEL_TYPE: ModelType = ModelType::Embedder;

    /// Construct an embedder with no output processor.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedderError::MissingModel`] if `model_kwargs` lacks a
    /// `"model"` key, or the client's error if its synchronous-channel
    /// initialization fails.
    pub fn new(
        model_client: Arc<dyn ModelClient>,
        model_kwargs: ModelKwargs,
    ) -> Result<Self, EmbedderError> {
        Self::with_output_processor(model_client, model_kwargs, None)
    }

    /// Construct an embedder, optionally wiring an output processor.
    ///
    /// `model_kwargs` is taken by value: the embedder owns its snapshot,
    /// so later caller-side mutation cannot reach the stored defaults.
    /// The client's `init_sync_client` runs here, eagerly — a
    /// misconfigured client fails at wiring time, not at first use.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedderError::MissingModel`] if `model_kwargs` lacks a
    /// `"model"` key, or the client's error if initialization fails.
    pub fn with_output_processor(
        model_client: Arc<dyn ModelClient>,
        model_kwargs: ModelKwargs,
        output_processor: Option<Arc<dyn OutputProcessor>>,
    ) -> Result<Self, EmbedderError> {
        if !model_kwargs.contains("model") {
            return Err(EmbedderError::MissingModel);
        }

        model_client.init_sync_client()?;

        debug!(
            model = model_kwargs.model(),
            has_processor = output_processor.is_some(),
            "Embedder constructed"
        );

        Ok(Self {
            model_kwargs,
            model_client,
            output_processor,
        })
    }

    /// The stored default kwargs (always contains `"model"`).
    #[must_use]
    pub fn model_kwargs(&self) -> &ModelKwargs {
        &self.model_kwargs
    }

    /// Merge per-call overrides over the stored defaults.
    ///
    /// Pure: returns a new mapping, leaving the stored defaults and the
    /// overrides untouched.
    #[must_use]
    pub fn compose_model_kwargs(&self, overrides: &ModelKwargs) -> ModelKwargs {
        self.model_kwargs.compose(overrides)
    }

    /// Embed `input`, merging `model_kwargs` over the stored defaults.
    ///
    /// Delegates synchronously to the client; any client failure
    /// propagates unchanged. With an output processor wired, returns
    /// `Ok(Some(processed))`; without one, returns `Ok(None)` — an
    /// explicit absence, not an error, which callers must check for.
    ///
    /// # Errors
    ///
    /// Returns the client's error unchanged, or
    /// [`EmbedderError::OutputProcessing`] if the processor fails.
    pub fn call(
        &self,
        input: impl Into<EmbedderInput>,
        model_kwargs: &ModelKwargs,
    ) -> Result<Option<RawResponse>, EmbedderError> {
        let input = input.into();
        let composed = self.compose_model_kwargs(model_kwargs);

        debug!(
            model = composed.model(),
            inputs = input.len(),
            "dispatching embedding call"
        );

        let response = self.model_client.call(&input, &composed, Self::MODEL_TYPE)?;

        match &self.output_processor {
            Some(processor) => Ok(Some(processor.process(response)?)),
            None => Ok(None),
        }
    }
}

impl fmt::Display for Embedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Embedder(model_kwargs={:?}, model_client={:?})",
            self.model_kwargs, self.model_client
        )
    }
}

impl fmt::Debug for Embedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Embedder")
            .field("model_kwargs", &self.model_kwargs)
            .field("model_client", &self.model_client)
            .field("has_output_processor", &self.output_processor.is_some())
            .finish()
    }
}

// ── Tests ────────────────────────────────────────────────────────────
