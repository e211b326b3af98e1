//! Schema nodes
//!
//! Schemas are converted into a closed set of variants as soon as they are
//! deserialized, so synthesis is a total match over [`SchemaNode`] instead of
//! a walk over loosely-typed JSON.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Primitive schema kinds; `integer` and `number` share one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Null,
}

/// Composition keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionKind {
    OneOf,
    AnyOf,
    AllOf,
}

/// A parsed schema
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum SchemaNode {
    Primitive(PrimitiveKind),

    /// Literal values from `enum`
    Enum(Vec<Value>),

    Array(Box<SchemaNode>),

    Object(ObjectSchema),

    Composition(Composition),

    /// `$ref` pointer
    Reference(String),

    /// No recognizable shape
    Any,
}

/// Object schema with declared properties
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    /// Properties in declaration order
    pub properties: IndexMap<String, Property>,

    /// The explicit `required` list, if the node has one
    pub required: Option<Vec<String>>,

    /// `required` lists of `oneOf` branches that only constrain required-ness
    pub branch_required: Vec<Vec<String>>,
}

/// One declared property
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub node: SchemaNode,
    pub read_only: bool,
    pub description: Option<String>,
}

/// `oneOf` / `anyOf` / `allOf`
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub kind: CompositionKind,
    pub members: Vec<SchemaNode>,
    pub discriminator: Option<Discriminator>,
}

/// Tag property plus value -> member pointer mapping
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Discriminator {
    pub property_name: String,
    pub mapping: IndexMap<String, String>,
}

impl Discriminator {
    /// The mapping key whose target is `pointer`
    ///
    /// Targets may be full pointers or bare schema names.
    pub fn value_for(&self, pointer: &str) -> Option<&str> {
        let name = pointer.rsplit('/').next().unwrap_or(pointer);
        self.mapping
            .iter()
            .find(|(_, target)| target.as_str() == pointer || target.as_str() == name)
            .map(|(value, _)| value.as_str())
    }
}

impl ObjectSchema {
    /// Names of required properties
    ///
    /// The explicit list wins. Without one, a property is required when every
    /// `oneOf` branch that lists required properties includes it.
    pub fn required_set(&self) -> Vec<String> {
        if let Some(required) = &self.required {
            return required.clone();
        }

        let mut branches = self
            .branch_required
            .iter()
            .filter(|branch| !branch.is_empty());

        let Some(first) = branches.next() else {
            return Vec::new();
        };

        let mut common = first.clone();
        for branch in branches {
            common.retain(|name| branch.contains(name));
        }
        common
    }
}

impl From<Value> for SchemaNode {
    fn from(value: Value) -> Self {
        SchemaNode::from_value(&value)
    }
}

impl SchemaNode {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return SchemaNode::Any;
        };

        if let Some(pointer) = obj.get("$ref").and_then(Value::as_str) {
            return SchemaNode::Reference(pointer.to_string());
        }

        match obj.get("type").and_then(Value::as_str) {
            Some("integer") | Some("number") => SchemaNode::Primitive(PrimitiveKind::Number),
            Some("boolean") => SchemaNode::Primitive(PrimitiveKind::Boolean),
            Some("null") => SchemaNode::Primitive(PrimitiveKind::Null),
            Some("string") => match enum_values(obj) {
                Some(values) => SchemaNode::Enum(values.iter().map(stringify).collect()),
                None => SchemaNode::Primitive(PrimitiveKind::String),
            },
            Some("array") => SchemaNode::Array(Box::new(
                obj.get("items")
                    .map(SchemaNode::from_value)
                    .unwrap_or(SchemaNode::Any),
            )),
            _ => Self::from_untyped_object(obj),
        }
    }

    /// Conversion for `type: object`, no type, or an unknown type
    fn from_untyped_object(obj: &Map<String, Value>) -> Self {
        if let Some(values) = enum_values(obj) {
            return SchemaNode::Enum(values);
        }

        if let Some(members) = obj.get("allOf").and_then(Value::as_array) {
            return SchemaNode::Composition(Composition {
                kind: CompositionKind::AllOf,
                members: members.iter().map(SchemaNode::from_value).collect(),
                discriminator: None,
            });
        }

        if let Some(members) = obj.get("oneOf").and_then(Value::as_array) {
            // Branches carrying only `required` lists describe which
            // properties are present, not alternative shapes
            if obj.contains_key("properties") && members.iter().all(is_required_only) {
                return SchemaNode::Object(object_schema(obj));
            }
            return Self::composition(obj, CompositionKind::OneOf, members);
        }

        if let Some(members) = obj.get("anyOf").and_then(Value::as_array) {
            return Self::composition(obj, CompositionKind::AnyOf, members);
        }

        if obj.contains_key("properties") {
            return SchemaNode::Object(object_schema(obj));
        }

        SchemaNode::Any
    }

    fn composition(obj: &Map<String, Value>, kind: CompositionKind, members: &[Value]) -> Self {
        SchemaNode::Composition(Composition {
            kind,
            members: members.iter().map(SchemaNode::from_value).collect(),
            discriminator: obj.get("discriminator").and_then(discriminator),
        })
    }
}

fn enum_values(obj: &Map<String, Value>) -> Option<Vec<Value>> {
    obj.get("enum")
        .and_then(Value::as_array)
        .filter(|values| !values.is_empty())
        .cloned()
}

/// String form of an enum value declared under `type: string`
fn stringify(value: &Value) -> Value {
    match value {
        Value::String(_) => value.clone(),
        other => Value::String(other.to_string()),
    }
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    value.and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

fn is_required_only(branch: &Value) -> bool {
    const SHAPE_KEYS: [&str; 8] = [
        "$ref",
        "type",
        "properties",
        "items",
        "enum",
        "allOf",
        "oneOf",
        "anyOf",
    ];

    branch
        .as_object()
        .is_some_and(|obj| !SHAPE_KEYS.iter().any(|key| obj.contains_key(*key)))
}

fn object_schema(obj: &Map<String, Value>) -> ObjectSchema {
    let properties = obj
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, value)| {
                    let property = Property {
                        node: SchemaNode::from_value(value),
                        read_only: value
                            .get("readOnly")
                            .and_then(Value::as_bool)
                            .unwrap_or(false),
                        description: value
                            .get("description")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    };
                    (name.clone(), property)
                })
                .collect()
        })
        .unwrap_or_default();

    let branch_required = obj
        .get("oneOf")
        .and_then(Value::as_array)
        .map(|branches| {
            branches
                .iter()
                .filter_map(|branch| string_list(branch.get("required")))
                .collect()
        })
        .unwrap_or_default();

    ObjectSchema {
        properties,
        required: string_list(obj.get("required")),
        branch_required,
    }
}

fn discriminator(value: &Value) -> Option<Discriminator> {
    let property_name = value.get("propertyName")?.as_str()?.to_string();
    let mapping = value
        .get("mapping")
        .and_then(Value::as_object)
        .map(|mapping| {
            mapping
                .iter()
                .filter_map(|(key, target)| Some((key.clone(), target.as_str()?.to_string())))
                .collect()
        })
        .unwrap_or_default();

    Some(Discriminator {
        property_name,
        mapping,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> SchemaNode {
        SchemaNode::from_value(&value)
    }

    #[test]
    fn test_primitives() {
        assert_eq!(
            node(json!({ "type": "integer", "format": "int64" })),
            SchemaNode::Primitive(PrimitiveKind::Number)
        );
        assert_eq!(
            node(json!({ "type": "number", "enum": [1, 2] })),
            SchemaNode::Primitive(PrimitiveKind::Number)
        );
        assert_eq!(
            node(json!({ "type": "boolean" })),
            SchemaNode::Primitive(PrimitiveKind::Boolean)
        );
        assert_eq!(
            node(json!({ "type": "null" })),
            SchemaNode::Primitive(PrimitiveKind::Null)
        );
        assert_eq!(
            node(json!({ "type": "string" })),
            SchemaNode::Primitive(PrimitiveKind::String)
        );
    }

    #[test]
    fn test_string_enum() {
        assert_eq!(
            node(json!({ "type": "string", "enum": ["a", "b"] })),
            SchemaNode::Enum(vec![json!("a"), json!("b")])
        );
        assert_eq!(
            node(json!({ "type": "string", "enum": [1, "2", true] })),
            SchemaNode::Enum(vec![json!("1"), json!("2"), json!("true")])
        );
        assert_eq!(
            node(json!({ "type": "string", "enum": [] })),
            SchemaNode::Primitive(PrimitiveKind::String)
        );
    }

    #[test]
    fn test_reference_wins_over_siblings() {
        assert_eq!(
            node(json!({ "$ref": "#/components/schemas/Pet", "type": "object" })),
            SchemaNode::Reference("#/components/schemas/Pet".to_string())
        );
    }

    #[test]
    fn test_array_without_items_is_any_array() {
        assert_eq!(
            node(json!({ "type": "array" })),
            SchemaNode::Array(Box::new(SchemaNode::Any))
        );
    }

    #[test]
    fn test_object_properties_keep_order_and_flags() {
        let SchemaNode::Object(object) = node(json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "zeta": { "type": "string", "readOnly": true },
                "id": { "type": "integer", "description": "Identifier" }
            }
        })) else {
            panic!("expected an object schema");
        };

        let names: Vec<&str> = object.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "id"]);
        assert!(object.properties["zeta"].read_only);
        assert_eq!(
            object.properties["id"].description.as_deref(),
            Some("Identifier")
        );
        assert_eq!(object.required_set(), vec!["id".to_string()]);
    }

    #[test]
    fn test_required_intersection_across_branches() {
        let SchemaNode::Object(object) = node(json!({
            "type": "object",
            "properties": {
                "a": { "type": "string" },
                "b": { "type": "string" }
            },
            "oneOf": [
                { "required": ["a"] },
                { "required": ["a", "b"] }
            ]
        })) else {
            panic!("expected an object schema");
        };

        assert_eq!(object.required_set(), vec!["a".to_string()]);
    }

    #[test]
    fn test_explicit_required_beats_branches() {
        let object = ObjectSchema {
            properties: IndexMap::new(),
            required: Some(vec![]),
            branch_required: vec![vec!["a".to_string()]],
        };
        assert!(object.required_set().is_empty());
    }

    #[test]
    fn test_branches_without_required_are_skipped() {
        let object = ObjectSchema {
            properties: IndexMap::new(),
            required: None,
            branch_required: vec![vec![], vec!["x".to_string(), "y".to_string()]],
        };
        assert_eq!(
            object.required_set(),
            vec!["x".to_string(), "y".to_string()]
        );
    }

    #[test]
    fn test_one_of_with_shapes_is_a_composition() {
        let schema = node(json!({
            "oneOf": [
                { "$ref": "#/components/schemas/Cat" },
                { "$ref": "#/components/schemas/Dog" }
            ],
            "discriminator": {
                "propertyName": "kind",
                "mapping": {
                    "cat": "#/components/schemas/Cat",
                    "dog": "Dog"
                }
            }
        }));

        let SchemaNode::Composition(composition) = schema else {
            panic!("expected a composition");
        };
        assert_eq!(composition.kind, CompositionKind::OneOf);
        assert_eq!(composition.members.len(), 2);

        let discriminator = composition.discriminator.unwrap();
        assert_eq!(discriminator.property_name, "kind");
        assert_eq!(
            discriminator.value_for("#/components/schemas/Cat"),
            Some("cat")
        );
        assert_eq!(
            discriminator.value_for("#/components/schemas/Dog"),
            Some("dog")
        );
        assert_eq!(discriminator.value_for("#/components/schemas/Bird"), None);
    }

    #[test]
    fn test_any_of_and_all_of() {
        assert!(matches!(
            node(json!({ "anyOf": [{ "type": "string" }, { "type": "null" }] })),
            SchemaNode::Composition(Composition {
                kind: CompositionKind::AnyOf,
                ..
            })
        ));
        assert!(matches!(
            node(json!({ "type": "object", "allOf": [{ "type": "object" }] })),
            SchemaNode::Composition(Composition {
                kind: CompositionKind::AllOf,
                ..
            })
        ));
    }

    #[test]
    fn test_shapeless_nodes_are_any() {
        assert_eq!(node(json!({ "type": "object" })), SchemaNode::Any);
        assert_eq!(node(json!({})), SchemaNode::Any);
        assert_eq!(node(json!(true)), SchemaNode::Any);
    }

    #[test]
    fn test_deserialize_from_value() {
        let schema: SchemaNode = serde_json::from_str(r#"{ "type": "boolean" }"#).unwrap();
        assert_eq!(schema, SchemaNode::Primitive(PrimitiveKind::Boolean));
    }
}
