//! Document loading and merging
//!
//! Documents are read as JSON or YAML into a raw [`Value`]. Several documents
//! can be merged into one before parsing; the first document to declare a
//! path or a named component wins.

use oapi_tsgen_common::{GeneratorError, Result};
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::Path;

/// Component sections merged entry by entry
const COMPONENT_SECTIONS: [&str; 9] = [
    "schemas",
    "responses",
    "parameters",
    "examples",
    "requestBodies",
    "headers",
    "securitySchemes",
    "links",
    "callbacks",
];

/// Source format of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Format from the file extension, falling back to the content
    pub fn detect(path: &Path, content: &str) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => Self::sniff(content),
        }
    }

    pub fn sniff(content: &str) -> Self {
        match content.trim_start().chars().next() {
            Some('{') | Some('[') => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Read one document from disk
pub fn load_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        GeneratorError::Parse(format!(
            "Failed to read OpenAPI file {}: {}",
            path.display(),
            e
        ))
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "loaded document");
    parse_str(&content, DocumentFormat::detect(path, &content)).map_err(|e| {
        GeneratorError::Parse(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Read several documents and merge them in order
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Value> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        documents.push(load_file(path.as_ref())?);
    }
    merge(documents)
}

pub fn parse_str(content: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(content)?),
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
            Ok(yaml_to_json(yaml))
        }
    }
}

/// Convert YAML into JSON; non-string mapping keys are stringified
pub fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Response codes such as `200:` arrive as integer keys
fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Merge documents, first write wins
///
/// The first document supplies everything outside `paths` and `components`.
/// Paths and the entries of each component section are added from later
/// documents only when not already present.
pub fn merge(documents: Vec<Value>) -> Result<Value> {
    let mut documents = documents.into_iter();
    let Some(mut merged) = documents.next() else {
        return Err(GeneratorError::Parse(
            "No OpenAPI documents to merge".to_string(),
        ));
    };

    for document in documents {
        let Value::Object(mut source) = document else {
            return Err(GeneratorError::Parse(
                "OpenAPI document root must be an object".to_string(),
            ));
        };
        let target = root_object(&mut merged)?;

        if let Some(Value::Object(paths)) = source.remove("paths") {
            let target_paths = section(target, "paths")?;
            for (path, item) in paths {
                if target_paths.contains_key(&path) {
                    tracing::debug!(%path, "keeping first definition of path");
                    continue;
                }
                target_paths.insert(path, item);
            }
        }

        if let Some(Value::Object(mut components)) = source.remove("components") {
            let target_components = section(target, "components")?;
            for name in COMPONENT_SECTIONS {
                let Some(Value::Object(entries)) = components.remove(name) else {
                    continue;
                };
                let target_section = section(target_components, name)?;
                for (key, entry) in entries {
                    target_section.entry(key).or_insert(entry);
                }
            }
        }
    }

    Ok(merged)
}

fn root_object(value: &mut Value) -> Result<&mut Map<String, Value>> {
    value.as_object_mut().ok_or_else(|| {
        GeneratorError::Parse("OpenAPI document root must be an object".to_string())
    })
}

/// The object stored under `key`, created (or replaced if not an object) on demand
fn section<'m>(map: &'m mut Map<String, Value>, key: &str) -> Result<&'m mut Map<String, Value>> {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut()
        .ok_or_else(|| GeneratorError::Parse(format!("\"{}\" must be an object", key)))
}
