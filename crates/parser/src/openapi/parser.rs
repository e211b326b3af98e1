//! OpenAPI document parser

use super::extractor::OperationExtractor;
use super::loader::{self, DocumentFormat};
use super::resolver::DocumentResolver;
use super::types::OpenApiDocument;
use oapi_tsgen_common::{GenerateOptions, GeneratorError, ParsedApi, Result};
use serde_json::Value;
use std::path::Path;

/// OpenAPI document parser
///
/// Keeps the raw document for pointer resolution next to its typed form.
pub struct OpenApiParser {
    raw: Value,
    document: OpenApiDocument,
}

impl OpenApiParser {
    /// Load a JSON or YAML document from a file
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = OpenApiParser::from_file("petstore.yaml")?;
    /// let api = parser.parse(&GenerateOptions::default())?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_value(loader::load_file(path.as_ref())?)
    }

    /// Load several documents and merge them, first write wins
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        Self::from_value(loader::load_files(paths)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw = loader::parse_str(json, DocumentFormat::Json)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse OpenAPI JSON: {}", e)))?;
        Self::from_value(raw)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw = loader::parse_str(yaml, DocumentFormat::Yaml)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))?;
        Self::from_value(raw)
    }

    pub fn from_value(raw: Value) -> Result<Self> {
        let document: OpenApiDocument = serde_json::from_value(raw.clone()).map_err(|e| {
            GeneratorError::Parse(format!("Invalid OpenAPI document: {}", e))
        })?;

        Ok(Self { raw, document })
    }

    /// Resolve every operation into descriptors and named types
    ///
    /// Each call starts from an empty type registry.
    pub fn parse(&self, options: &GenerateOptions) -> Result<ParsedApi> {
        let resolver = DocumentResolver::new(&self.raw);
        let api = OperationExtractor::new(&self.document, &resolver, options).extract()?;

        tracing::info!(
            operations = api.operations.len(),
            types = api.types.len(),
            "parsed OpenAPI document"
        );
        Ok(api)
    }

    /// The typed document
    pub fn document(&self) -> &OpenApiDocument {
        &self.document
    }

    /// The raw document that pointers resolve against
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}
