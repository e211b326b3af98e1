//! OpenAPI parsing for oapi-tsgen
//!
//! This crate turns OpenAPI 3 documents into the intermediate form consumed
//! by the generator: an ordered list of [`OperationDescriptor`]s plus a
//! [`TypeRegistry`] holding every named type they reference.
//!
//! ## Resolution Strategy
//!
//! Schemas are converted into closed [`openapi::SchemaNode`] variants on load.
//! Synthesis maps each variant to a TypeScript type expression:
//! - `$ref` → a named type, registered once under the pointer's last segment
//! - `allOf` → intersection
//! - `oneOf` / `anyOf` → union, tagged per member when a discriminator is set
//! - objects → record literals honoring `required` and `readOnly`
//!
//! [`OperationDescriptor`]: oapi_tsgen_common::OperationDescriptor
//! [`TypeRegistry`]: oapi_tsgen_common::TypeRegistry

pub mod openapi;
mod type_mapper;

pub use openapi::OpenApiParser;
pub use type_mapper::TypeMapper;

use oapi_tsgen_common::{GenerateOptions, ParsedApi, Result};
use std::path::Path;

/// Load, merge and parse the documents at `paths`
///
/// # Arguments
/// * `paths` - One or more JSON/YAML documents; earlier documents win on conflicts
/// * `options` - Generation options (media type policy, server override, ...)
///
/// # Returns
/// * `ParsedApi` - Operation descriptors and the named types they use
pub fn parse_documents<P: AsRef<Path>>(paths: &[P], options: &GenerateOptions) -> Result<ParsedApi> {
    OpenApiParser::from_files(paths)?.parse(options)
}
