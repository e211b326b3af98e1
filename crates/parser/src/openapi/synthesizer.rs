//! Type synthesis
//!
//! Turns [`SchemaNode`]s into [`TsType`] expressions. Referenced schemas
//! become named types in the [`TypeRegistry`]; everything else is inlined.

use super::resolver::ResolvePointer;
use super::schema::{Composition, CompositionKind, Discriminator, ObjectSchema, SchemaNode};
use crate::TypeMapper;
use oapi_tsgen_common::{NamedType, Result, TsField, TsType, TypeRegistry};
use serde_json::Value;

/// Synthesizes type expressions, registering named types as it goes
pub struct TypeSynthesizer<'a, R: ResolvePointer + ?Sized> {
    resolver: &'a R,
    registry: &'a mut TypeRegistry,
    with_doc: bool,
}

impl<'a, R: ResolvePointer + ?Sized> TypeSynthesizer<'a, R> {
    pub fn new(resolver: &'a R, registry: &'a mut TypeRegistry) -> Self {
        Self {
            resolver,
            registry,
            with_doc: true,
        }
    }

    /// Carry schema descriptions onto fields and named types
    pub fn with_doc(mut self, with_doc: bool) -> Self {
        self.with_doc = with_doc;
        self
    }

    pub fn synthesize(&mut self, node: &SchemaNode) -> Result<TsType> {
        match node {
            SchemaNode::Reference(pointer) => self.reference(pointer),
            SchemaNode::Primitive(kind) => Ok(TypeMapper::primitive(*kind)),
            SchemaNode::Enum(values) => Ok(TsType::Union(
                values.iter().map(TsType::json_literal).collect(),
            )),
            SchemaNode::Array(items) => Ok(TsType::Array(Box::new(self.synthesize(items)?))),
            SchemaNode::Object(object) => self.object(object),
            SchemaNode::Composition(composition) => self.composition(composition),
            SchemaNode::Any => Ok(TsType::any()),
        }
    }

    /// Named type for a pointer
    ///
    /// The name is reserved before the target is synthesized, so a cycle back
    /// to it resolves to the bare name.
    pub fn reference(&mut self, pointer: &str) -> Result<TsType> {
        let name = TypeMapper::type_name(pointer);
        if self.registry.contains(&name) {
            return Ok(TsType::Ref(name));
        }

        tracing::debug!(%pointer, %name, "synthesizing named type");
        self.registry.reserve(&name);

        let value = self.resolver.resolve(pointer)?;
        let description = if self.with_doc {
            value
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string)
        } else {
            None
        };

        let ty = self.synthesize(&SchemaNode::from_value(&value))?;
        self.registry
            .register(&name, NamedType::new(ty).with_description(description))?;

        Ok(TsType::Ref(name))
    }

    fn object(&mut self, object: &ObjectSchema) -> Result<TsType> {
        let required = object.required_set();

        let mut fields = Vec::with_capacity(object.properties.len());
        for (name, property) in &object.properties {
            let mut field = TsField::new(name.as_str(), self.synthesize(&property.node)?)
                .with_required(required.contains(name));
            field.read_only = property.read_only;
            if self.with_doc {
                field.description = property.description.clone();
            }
            fields.push(field);
        }

        Ok(TsType::Object(fields))
    }

    fn composition(&mut self, composition: &Composition) -> Result<TsType> {
        if composition.members.is_empty() {
            return Ok(TsType::any());
        }

        let mut members = Vec::with_capacity(composition.members.len());
        for member in &composition.members {
            let ty = self.synthesize(member)?;
            let ty = match &composition.discriminator {
                Some(discriminator) if composition.kind != CompositionKind::AllOf => {
                    tag(ty, member, discriminator)
                }
                _ => ty,
            };
            members.push(ty);
        }

        Ok(match composition.kind {
            CompositionKind::AllOf => TsType::Intersection(members),
            CompositionKind::OneOf | CompositionKind::AnyOf => TsType::Union(members),
        })
    }
}

/// `member & { property: literal }`
fn tag(ty: TsType, member: &SchemaNode, discriminator: &Discriminator) -> TsType {
    let literal = match member {
        SchemaNode::Reference(pointer) => discriminator
            .value_for(pointer)
            .map(TsType::string_literal)
            .unwrap_or_else(TsType::string),
        _ => TsType::string(),
    };

    TsType::Intersection(vec![
        ty,
        TsType::Object(vec![TsField::new(
            discriminator.property_name.as_str(),
            literal,
        )]),
    ])
}
