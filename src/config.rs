//! User-facing engine options.
//!
//! Options are a nested structure keyed by backend name:
//!
//! ```json
//! {
//!   "java":   { "parser": { "LINE_TERMINATOR": ";" }, "forceOptionalEmulation": false },
//!   "python": { "uncamelcase": true }
//! }
//! ```
//!
//! Unknown keys are ignored at every level. Recognized keys override the backend defaults by shallow merge (see
//! [`crate::backend::BackendConfig::with_options`]).

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::backend::BackendId;

/// Options for a single backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BackendOptions {
    /// Token overrides keyed by configuration key. Non-string values are ignored when applied.
    #[serde(default)]
    pub parser: BTreeMap<String, serde_json::Value>,
    /// Convert identifiers and member names to snake_case.
    #[serde(default, rename = "uncamelcase")]
    pub uncamel_case: Option<bool>,
    /// Emulate optional parameters even when the target supports defaults natively.
    #[serde(default, rename = "forceOptionalEmulation")]
    pub force_optional_emulation: Option<bool>,
}

impl BackendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parser
            .insert(key.into(), serde_json::Value::String(value.into()));
        self
    }

    pub fn with_uncamel_case(mut self, enabled: bool) -> Self {
        self.uncamel_case = Some(enabled);
        self
    }

    pub fn with_forced_optional_emulation(mut self, enabled: bool) -> Self {
        self.force_optional_emulation = Some(enabled);
        self
    }
}

/// Options for every backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineOptions {
    #[serde(flatten)]
    backends: BTreeMap<String, serde_json::Value>,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_backend(mut self, id: BackendId, options: BackendOptions) -> Self {
        let mut entry = serde_json::Map::new();
        let parser = options
            .parser
            .into_iter()
            .collect::<serde_json::Map<String, serde_json::Value>>();
        entry.insert("parser".into(), serde_json::Value::Object(parser));
        if let Some(flag) = options.uncamel_case {
            entry.insert("uncamelcase".into(), serde_json::Value::Bool(flag));
        }
        if let Some(flag) = options.force_optional_emulation {
            entry.insert("forceOptionalEmulation".into(), serde_json::Value::Bool(flag));
        }
        self.backends
            .insert(id.as_str().to_string(), serde_json::Value::Object(entry));
        self
    }

    /// Options for `id`; malformed or missing entries yield the defaults.
    pub fn for_backend(&self, id: BackendId) -> BackendOptions {
        self.backends
            .get(id.as_str())
            .and_then(|value| BackendOptions::deserialize(value).ok())
            .unwrap_or_default()
    }
}
