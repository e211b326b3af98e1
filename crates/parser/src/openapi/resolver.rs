//! JSON pointer resolution against the loaded document

use super::types::RefOr;
use oapi_tsgen_common::{GeneratorError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;

/// Resolves a local JSON pointer (`#/components/schemas/Pet`) to the value
/// it designates
#[cfg_attr(test, mockall::automock)]
pub trait ResolvePointer {
    fn resolve(&self, pointer: &str) -> Result<Value>;
}

/// Resolver over the raw (merged) document
pub struct DocumentResolver<'a> {
    document: &'a Value,
}

impl<'a> DocumentResolver<'a> {
    pub fn new(document: &'a Value) -> Self {
        Self { document }
    }

    fn lookup(&self, pointer: &str) -> Option<&'a Value> {
        let path = pointer.strip_prefix('#')?;
        if path.is_empty() {
            return Some(self.document);
        }
        let path = path.strip_prefix('/')?;

        path.split('/').try_fold(self.document, |current, token| {
            let token = unescape(token);
            match current {
                Value::Object(map) => map.get(&token),
                Value::Array(items) => token.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            }
        })
    }
}

impl ResolvePointer for DocumentResolver<'_> {
    fn resolve(&self, pointer: &str) -> Result<Value> {
        self.lookup(pointer)
            .cloned()
            .ok_or_else(|| GeneratorError::UnresolvedReference {
                pointer: pointer.to_string(),
            })
    }
}

/// Decode `~1` and `~0` in one pointer token
fn unescape(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Encode a key for use as one pointer token
pub fn escape_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// The last token of a pointer, decoded
pub fn last_token(pointer: &str) -> String {
    unescape(pointer.rsplit('/').next().unwrap_or(pointer))
}

/// Follow `$ref` hops until an inline item is reached
///
/// Chains (a reference to a reference) are followed repeatedly; a chain that
/// revisits a pointer is reported as unresolved.
pub fn follow<T, R>(resolver: &R, item: &RefOr<T>) -> Result<T>
where
    T: Clone + DeserializeOwned,
    R: ResolvePointer + ?Sized,
{
    let mut pointer = match item {
        RefOr::Item(inner) => return Ok(inner.clone()),
        RefOr::Reference { pointer } => pointer.clone(),
    };

    let mut visited = HashSet::new();
    loop {
        if !visited.insert(pointer.clone()) {
            return Err(GeneratorError::UnresolvedReference { pointer });
        }

        let value = resolver.resolve(&pointer)?;
        let next: RefOr<T> = serde_json::from_value(value).map_err(|e| {
            GeneratorError::Parse(format!("Failed to parse value at {}: {}", pointer, e))
        })?;

        match next {
            RefOr::Item(inner) => return Ok(inner),
            RefOr::Reference { pointer: target } => {
                tracing::trace!(from = %pointer, to = %target, "following reference chain");
                pointer = target;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::types::{Parameter, ParameterLocation};
    use serde_json::json;

    fn document() -> Value {
        json!({
            "paths": {
                "/pets/{petId}": { "get": { "responses": {} } }
            },
            "components": {
                "schemas": {
                    "Pet": { "type": "object" },
                    "a~b": { "type": "string" }
                },
                "parameters": {
                    "Limit": { "name": "limit", "in": "query" },
                    "Alias": { "$ref": "#/components/parameters/Limit" },
                    "LoopA": { "$ref": "#/components/parameters/LoopB" },
                    "LoopB": { "$ref": "#/components/parameters/LoopA" }
                }
            },
            "servers": [{ "url": "https://one" }, { "url": "https://two" }]
        })
    }

    #[test]
    fn test_resolve_component() {
        let doc = document();
        let resolver = DocumentResolver::new(&doc);
        assert_eq!(
            resolver.resolve("#/components/schemas/Pet").unwrap(),
            json!({ "type": "object" })
        );
    }

    #[test]
    fn test_resolve_escaped_tokens_and_indices() {
        let doc = document();
        let resolver = DocumentResolver::new(&doc);

        assert!(resolver.resolve("#/paths/~1pets~1{petId}/get").is_ok());
        assert_eq!(
            resolver.resolve("#/components/schemas/a~0b").unwrap(),
            json!({ "type": "string" })
        );
        assert_eq!(
            resolver.resolve("#/servers/1/url").unwrap(),
            json!("https://two")
        );
    }

    #[test]
    fn test_missing_and_external_pointers_fail() {
        let doc = document();
        let resolver = DocumentResolver::new(&doc);

        for pointer in [
            "#/components/schemas/Missing",
            "other.yaml#/components/schemas/Pet",
            "#/servers/9",
        ] {
            let err = resolver.resolve(pointer).unwrap_err();
            assert!(matches!(
                err,
                GeneratorError::UnresolvedReference { pointer: ref p } if p == pointer
            ));
        }
    }

    #[test]
    fn test_escape_round_trip_of_keys() {
        assert_eq!(escape_token("a/b~c"), "a~1b~0c");
        assert_eq!(last_token("#/paths/~1pets"), "/pets");
        assert_eq!(last_token("#/components/schemas/Pet"), "Pet");
    }

    #[test]
    fn test_follow_reference_chain() {
        let doc = document();
        let resolver = DocumentResolver::new(&doc);

        let item: RefOr<Parameter> = RefOr::Reference {
            pointer: "#/components/parameters/Alias".to_string(),
        };
        let parameter = follow(&resolver, &item).unwrap();
        assert_eq!(parameter.name, "limit");
        assert_eq!(parameter.location, ParameterLocation::Query);
    }

    #[test]
    fn test_follow_detects_cycles() {
        let doc = document();
        let resolver = DocumentResolver::new(&doc);

        let item: RefOr<Parameter> = RefOr::Reference {
            pointer: "#/components/parameters/LoopA".to_string(),
        };
        assert!(matches!(
            follow(&resolver, &item),
            Err(GeneratorError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn test_follow_with_mock_resolver() {
        let mut resolver = MockResolvePointer::new();
        resolver
            .expect_resolve()
            .withf(|pointer| pointer == "#/components/parameters/Id")
            .times(1)
            .returning(|_| Ok(json!({ "name": "id", "in": "path", "required": true })));

        let item: RefOr<Parameter> = RefOr::Reference {
            pointer: "#/components/parameters/Id".to_string(),
        };
        let parameter = follow(&resolver, &item).unwrap();
        assert!(parameter.required);
    }
}
