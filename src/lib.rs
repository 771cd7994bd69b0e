//! # embedcore — Embedding adapter for model-serving backends
//!
//! Turns arbitrary text into vector embeddings by delegating to a
//! pluggable model-serving client, with optional post-processing of the
//! raw provider response.
//!
//! ## Architecture
//!
//! - **[`embedder`]** — The core adapter: kwargs validation, default
//!   merging, client delegation, optional output processing
//! - **[`client`]** — `ModelClient` trait plus reference HTTP and mock
//!   implementations
//! - **[`kwargs`]** — `ModelKwargs` mapping with pure merge semantics
//! - **[`config`]** — JSON configuration loading and validation

pub mod client;
pub mod config;
pub mod embedder;
pub mod kwargs;
