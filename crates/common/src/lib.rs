//! Common types and utilities for oapi-tsgen
//!
//! This crate contains the data shared between the parser (which resolves
//! schemas and extracts operations), the generator (which names and renders
//! them) and the CLI:
//!
//! - [`TsType`]: the TypeScript type expression AST produced by synthesis
//! - [`TypeRegistry`]: one canonical implementation per named type
//! - [`OperationDescriptor`]: the resolved form of one path + verb pair
//! - [`GenerateOptions`]: generation switches, loadable from YAML

mod descriptor;
mod options;
mod registry;
mod ts;

pub use descriptor::{
    BodyParam, HttpMethod, MediaKind, MediaVariant, OperationDescriptor, ParamDescriptor,
    ParsedApi, ResponseDescriptor, SimpleType, StatusCode,
};
pub use options::{GenerateOptions, MediaTypePolicy};
pub use registry::{NamedType, TypeRegistry};
pub use ts::{doc_comment, is_identifier, Keyword, TsField, TsType};

use thiserror::Error;

/// Errors that can occur during client generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Unresolved reference: {pointer}")]
    UnresolvedReference { pointer: String },

    #[error("Conflicting definitions registered for type \"{name}\"")]
    ConflictingTypeDefinition { name: String },

    #[error(
        "Unsupported response shape: {operation} declares {} media types for status {status} ({})",
        .media_types.len(),
        .media_types.join(", ")
    )]
    UnsupportedResponseShape {
        operation: String,
        status: String,
        media_types: Vec<String>,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
