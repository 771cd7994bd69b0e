/// Model keyword configuration mapping.
///
/// `ModelKwargs` carries the provider-specific options for a model call
/// (model name, dimensions, encoding format, ...) as string keys mapped
/// to arbitrary JSON values. The `"model"` key selects the backend model
/// and is required by [`crate::embedder::Embedder`] at construction.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keyword configuration for a model call.
///
/// A plain string-to-JSON mapping with mapping (not sequence) semantics:
/// key order never matters. Values are arbitrary JSON so provider-specific
/// options pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelKwargs(BTreeMap<String, Value>);

impl ModelKwargs {
    /// Create an empty kwargs mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a kwargs mapping with only the `"model"` key set.
    #[must_use]
    pub fn with_model(model: impl Into<String>) -> Self {
        let model: String = model.into();
        Self::new().set("model", model)
    }

    /// Builder-style insert, consuming and returning `self`.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a key/value pair in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `"model"` value, if present and a string.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.0.get("model").and_then(Value::as_str)
    }

    /// Whether the mapping contains `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Merge `overrides` over these defaults into a new mapping.
    ///
    /// Every key in `overrides` wins; keys present only here are
    /// preserved; keys present only in `overrides` are added. Neither
    /// input is mutated — each call produces a fresh mapping, so stored
    /// defaults stay untouched across calls.
    #[must_use]
    pub fn compose(&self, overrides: &Self) -> Self {
        let mut merged = self.0.clone();
        for (key, value) in &overrides.0 {
            merged.insert(key.clone(), value.clone());
        }
        Self(merged)
    }
}

impl From<BTreeMap<String, Value>> for ModelKwargs {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for ModelKwargs {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_model() {
        let kwargs = ModelKwargs::with_model("text-embed-v1");
        assert_eq!(kwargs.model(), Some("text-embed-v1"));
        assert_eq!(kwargs.len(), 1);
    }

    #[test]
    fn test_compose_override_wins() {
        let defaults = ModelKwargs::with_model("text-embed-v1");
        let overrides = ModelKwargs::with_model("text-embed-v2");

        let merged = defaults.compose(&overrides);
        assert_eq!(merged.model(), Some("text-embed-v2"));
        assert_eq!(merged.len(), 1, "no extra keys should appear");
    }

    #[test]
    fn test_compose_preserves_default_only_keys() {
        let defaults = ModelKwargs::with_model("m1").set("dimensions", 256);
        let overrides = ModelKwargs::new().set("encoding_format", "float");

        let merged = defaults.compose(&overrides);
        assert_eq!(merged.model(), Some("m1"));
        assert_eq!(merged.get("dimensions"), Some(&json!(256)));
        assert_eq!(merged.get("encoding_format"), Some(&json!("float")));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_compose_does_not_mutate_inputs() {
        let defaults = ModelKwargs::with_model("m1").set("dimensions", 256);
        let overrides = ModelKwargs::with_model("m2");

        let before_defaults = defaults.clone();
        let before_overrides = overrides.clone();
        let _ = defaults.compose(&overrides);

        assert_eq!(defaults, before_defaults, "defaults must be unmodified");
        assert_eq!(overrides, before_overrides, "overrides must be unmodified");
    }

    #[test]
    fn test_compose_empty_overrides() {
        let defaults = ModelKwargs::with_model("m1").set("dimensions", 256);
        let merged = defaults.compose(&ModelKwargs::new());
        assert_eq!(merged, defaults);
    }

    #[test]
    fn test_compose_empty_defaults() {
        let overrides = ModelKwargs::with_model("m1");
        let merged = ModelKwargs::new().compose(&overrides);
        assert_eq!(merged, overrides);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let defaults = ModelKwargs::with_model("m1").set("a", 1).set("b", 2);
        let overrides = ModelKwargs::new().set("b", 3).set("c", 4);
        assert_eq!(defaults.compose(&overrides), defaults.compose(&overrides));
    }

    #[test]
    fn test_model_requires_string_value() {
        let kwargs = ModelKwargs::new().set("model", 42);
        assert_eq!(kwargs.model(), None, "non-string model is not a model name");
        assert!(kwargs.contains("model"));
    }

    #[test]
    fn test_deserialize_from_json() {
        let kwargs: ModelKwargs =
            serde_json::from_str(r#"{"model": "m1", "dimensions": 256}"#).unwrap();
        assert_eq!(kwargs.model(), Some("m1"));
        assert_eq!(kwargs.get("dimensions"), Some(&json!(256)));
    }
}
