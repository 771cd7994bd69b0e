/// Configuration module for embedcore.
///
/// Handles loading, validating, and providing default configuration for
/// wiring the reference HTTP client and the embedder's default kwargs.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::kwargs::ModelKwargs;

// ── Default value functions ──────────────────────────────────────────

fn default_endpoint() -> String {
    "https://api.openai.com/v1/embeddings".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_model_kwargs() -> ModelKwargs {
    ModelKwargs::with_model("text-embedding-3-small")
}

// ── Config struct ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Embeddings endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default model kwargs for embedder construction. Must contain
    /// a `"model"` key.
    #[serde(default = "default_model_kwargs")]
    pub model_kwargs: ModelKwargs,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            model_kwargs: default_model_kwargs(),
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// If the file does not exist, returns a default config and
    /// generates a template at the given path. If the file exists but
    /// contains invalid JSON, logs a warning and falls back to defaults.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = if config_path.is_empty() {
            "embedcore.json"
        } else {
            config_path
        };

        if !Path::new(path).exists() {
            info!("{path} not found, using defaults");
            let cfg = Self::default();

            if path == "embedcore.json" {
                match cfg.save(path) {
                    Ok(()) => info!("Generated config template: {path}"),
                    Err(e) => warn!("Failed to generate config template: {e}"),
                }
            }

            return Ok(cfg);
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {path}"))?;

        let cfg: Config = match serde_json::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid JSON in {path}: {e}");
                warn!("Using default configuration");
                return Ok(Self::default());
            }
        };

        info!("Loaded configuration from {path}");
        Ok(cfg)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("failed to marshal config")?;
        std::fs::write(path, data).with_context(|| format!("failed to write config: {path}"))?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.endpoint.is_empty(), "endpoint must not be empty");
        anyhow::ensure!(self.timeout_secs > 0, "timeout_secs must be positive");
        anyhow::ensure!(
            self.model_kwargs.contains("model"),
            "model_kwargs must contain a 'model' key"
        );
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
