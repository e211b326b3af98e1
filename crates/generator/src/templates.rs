//! Template loading and management

use oapi_tsgen_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("doc_comment", doc_comment_filter);

    tera.add_raw_template("runtime.ts", include_str!("../templates/runtime.ts.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load runtime.ts template: {}", e))
        })?;

    tera.add_raw_template(
        "operation.ts",
        include_str!("../templates/operation.ts.tera"),
    )
    .map_err(|e| {
        GeneratorError::Generation(format!("Failed to load operation.ts template: {}", e))
    })?;

    tera.add_raw_template("client.ts", include_str!("../templates/client.ts.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load client.ts template: {}", e))
        })?;

    Ok(tera)
}

/// Filter rendering text as a `/** ... */` block; null renders as nothing
///
/// Takes an optional `indent` argument (levels of two spaces).
fn doc_comment_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let indent = match args.get("indent") {
        Some(indent) => indent
            .as_u64()
            .ok_or_else(|| tera::Error::msg("doc_comment filter expects a numeric indent"))?
            as usize,
        None => 0,
    };

    let rendered = match value {
        Value::Null => String::new(),
        Value::String(text) => oapi_tsgen_common::doc_comment(text, indent),
        _ => return Err(tera::Error::msg("doc_comment filter expects a string")),
    };

    Ok(Value::String(rendered))
}
