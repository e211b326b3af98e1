//! Generation options
//!
//! Options can be loaded from a YAML file; missing keys take their defaults.
//!
//! ```yaml
//! with_doc: false
//! media_type_policy: prefer
//! server: https://api.example.com/v1
//! ```

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How to treat a response status that declares several media types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaTypePolicy {
    /// Fail with `UnsupportedResponseShape`
    #[default]
    Strict,

    /// Keep every variant and decode the body as JSON, then text, then the
    /// first declared media type
    Prefer,
}

/// Switches for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Emit named type declarations
    pub types: bool,

    /// Emit the runtime `request` helper
    pub request: bool,

    /// Emit per-operation parameter/result types and bindings
    pub operations: bool,

    /// Carry descriptions and summaries into doc comments
    pub with_doc: bool,

    pub media_type_policy: MediaTypePolicy,

    /// Register every `components.schemas` entry, referenced or not
    pub all_components: bool,

    /// URL prefix override; defaults to the document's first server
    pub server: Option<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            types: true,
            request: true,
            operations: true,
            with_doc: true,
            media_type_policy: MediaTypePolicy::Strict,
            all_components: false,
            server: None,
        }
    }
}

impl GenerateOptions {
    /// Load options from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!("Failed to read options file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            GeneratorError::Parse(format!("Failed to parse options file {:?}: {}", path, e))
        })
    }

    /// Parse options from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}
