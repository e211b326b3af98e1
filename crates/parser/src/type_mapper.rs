//! Mapping from schema nodes to TypeScript names and keywords

use crate::openapi::{resolver, PrimitiveKind, SchemaNode};
use oapi_tsgen_common::{Keyword, SimpleType, TsType};

/// Maps schema-level names and primitives to their TypeScript counterparts
pub struct TypeMapper;

impl TypeMapper {
    /// Type name for the schema a pointer designates
    ///
    /// # Examples
    /// ```
    /// use oapi_tsgen_parser::TypeMapper;
    ///
    /// assert_eq!(TypeMapper::type_name("#/components/schemas/Pet"), "Pet");
    /// assert_eq!(TypeMapper::type_name("#/components/schemas/pet-list"), "pet_list");
    /// assert_eq!(TypeMapper::type_name("#/components/schemas/3D"), "_3D");
    /// ```
    pub fn type_name(pointer: &str) -> String {
        Self::sanitize(&resolver::last_token(pointer))
    }

    /// Replace characters that cannot appear in a TypeScript identifier
    pub fn sanitize(name: &str) -> String {
        let mut sanitized: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        if sanitized.is_empty() || sanitized.starts_with(|c: char| c.is_ascii_digit()) {
            sanitized.insert(0, '_');
        }
        sanitized
    }

    /// Keyword for a primitive kind
    pub fn primitive(kind: PrimitiveKind) -> TsType {
        let keyword = match kind {
            PrimitiveKind::String => Keyword::String,
            PrimitiveKind::Number => Keyword::Number,
            PrimitiveKind::Boolean => Keyword::Boolean,
            PrimitiveKind::Null => Keyword::Null,
        };
        TsType::Keyword(keyword)
    }

    /// Parameter type; parameters only distinguish strings and numbers
    pub fn simple_type(schema: Option<&SchemaNode>) -> SimpleType {
        match schema {
            Some(SchemaNode::Primitive(PrimitiveKind::String)) | Some(SchemaNode::Enum(_)) => {
                SimpleType::String
            }
            Some(SchemaNode::Primitive(PrimitiveKind::Number)) => SimpleType::Number,
            _ => SimpleType::Any,
        }
    }
}
