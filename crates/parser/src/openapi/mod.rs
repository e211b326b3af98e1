//! OpenAPI 3 document parsing
//!
//! Loads JSON or YAML documents, resolves `$ref` pointers, synthesizes
//! schemas into TypeScript types and extracts one descriptor per operation.
//!
//! ## Pipeline
//! 1. [`loader`] reads and merges documents into a raw JSON value
//! 2. [`OpenApiDocument`] gives the raw value a typed shape; schemas become [`SchemaNode`]s
//! 3. [`OperationExtractor`] walks `paths` in order, using [`TypeSynthesizer`]
//!    and a [`ResolvePointer`] implementation to fill the type registry
//!
//! ## Usage
//! ```rust,ignore
//! use oapi_tsgen_parser::openapi::OpenApiParser;
//!
//! let parser = OpenApiParser::from_file("petstore.yaml")?;
//! let api = parser.parse(&GenerateOptions::default())?;
//! ```

mod extractor;
pub mod loader;
mod parser;
pub mod resolver;
mod schema;
mod synthesizer;
mod types;

pub use extractor::OperationExtractor;
pub use parser::OpenApiParser;
pub use resolver::{DocumentResolver, ResolvePointer};
pub use schema::*;
pub use synthesizer::TypeSynthesizer;
pub use types::*;
