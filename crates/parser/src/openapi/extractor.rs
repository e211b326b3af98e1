//! Operation extraction
//!
//! One pass over `paths` builds an [`OperationDescriptor`] per path + verb
//! pair, synthesizing every schema it meets into the run's [`TypeRegistry`].

use super::resolver::{self, ResolvePointer};
use super::schema::SchemaNode;
use super::synthesizer::TypeSynthesizer;
use super::types::{
    OpenApiDocument, Operation, Parameter, ParameterLocation, PathItem, RequestBody, Response,
    SecurityRequirement,
};
use crate::TypeMapper;
use oapi_tsgen_common::{
    BodyParam, GenerateOptions, GeneratorError, HttpMethod, MediaKind, MediaTypePolicy,
    MediaVariant, OperationDescriptor, ParamDescriptor, ParsedApi, ResponseDescriptor, Result,
    StatusCode, TsType, TypeRegistry,
};

/// Builds operation descriptors and the named types they use
pub struct OperationExtractor<'a, R: ResolvePointer + ?Sized> {
    document: &'a OpenApiDocument,
    resolver: &'a R,
    options: &'a GenerateOptions,
    registry: TypeRegistry,
}

impl<'a, R: ResolvePointer + ?Sized> OperationExtractor<'a, R> {
    pub fn new(document: &'a OpenApiDocument, resolver: &'a R, options: &'a GenerateOptions) -> Self {
        Self {
            document,
            resolver,
            options,
            registry: TypeRegistry::new(),
        }
    }

    /// Extract every operation in document order
    pub fn extract(mut self) -> Result<ParsedApi> {
        let document = self.document;
        let mut operations = Vec::new();

        for (path, item) in &document.paths {
            for method in HttpMethod::ALL {
                let Some(operation) = item.operation(method) else {
                    continue;
                };
                let descriptor = self.operation(path, method, item, operation)?;
                tracing::debug!(
                    operation = %descriptor.label(),
                    responses = descriptor.responses.len(),
                    "extracted operation"
                );
                operations.push(descriptor);
            }
        }

        if self.options.all_components {
            self.register_all_components()?;
        }

        Ok(ParsedApi {
            server: self.server(),
            operations,
            types: self.registry,
        })
    }

    fn operation(
        &mut self,
        path: &str,
        method: HttpMethod,
        item: &PathItem,
        operation: &Operation,
    ) -> Result<OperationDescriptor> {
        let mut descriptor = OperationDescriptor {
            path: path.to_string(),
            method,
            operation_id: operation.operation_id.clone(),
            summary: operation
                .summary
                .clone()
                .or_else(|| operation.description.clone()),
            basic_auth: self.requires_basic_auth(operation)?,
            positional_params: Vec::new(),
            header_params: Vec::new(),
            query_params: Vec::new(),
            body_param: None,
            responses: Vec::new(),
        };

        for parameter in self.parameters(item, operation)? {
            let param = ParamDescriptor {
                name: parameter.name.clone(),
                description: parameter.description.clone(),
                required: parameter.required || parameter.location == ParameterLocation::Path,
                ty: TypeMapper::simple_type(parameter.schema.as_ref()),
            };
            match parameter.location {
                ParameterLocation::Path => descriptor.positional_params.push(param),
                ParameterLocation::Header => descriptor.header_params.push(param),
                ParameterLocation::Query => descriptor.query_params.push(param),
                ParameterLocation::Cookie => {
                    tracing::debug!(name = %parameter.name, "skipping cookie parameter");
                }
            }
        }

        if let Some(body) = &operation.request_body {
            let body = resolver::follow(self.resolver, body)?;
            descriptor.body_param = self.body(&body)?;
        }

        let label = descriptor.label();
        for (key, response) in &operation.responses {
            let response = resolver::follow(self.resolver, response)?;
            let response = self.response(&label, StatusCode::parse(key), &response)?;
            descriptor.responses.push(response);
        }

        Ok(descriptor)
    }

    /// Path-level parameters merged with the operation's own
    ///
    /// An operation parameter with the same name and location replaces the
    /// path-level one in place.
    fn parameters(&self, item: &PathItem, operation: &Operation) -> Result<Vec<Parameter>> {
        let mut merged: Vec<Parameter> = Vec::new();

        for parameter in item.parameters.iter().chain(&operation.parameters) {
            let parameter = resolver::follow(self.resolver, parameter)?;
            match merged
                .iter_mut()
                .find(|p| p.name == parameter.name && p.location == parameter.location)
            {
                Some(existing) => *existing = parameter,
                None => merged.push(parameter),
            }
        }

        Ok(merged)
    }

    fn body(&mut self, body: &RequestBody) -> Result<Option<BodyParam>> {
        let find = |kind: MediaKind| {
            body.content
                .iter()
                .find(|(media_type, _)| MediaKind::classify(media_type) == kind)
        };

        let chosen = find(MediaKind::Json)
            .map(|chosen| (chosen, MediaKind::Json))
            .or_else(|| find(MediaKind::Text).map(|chosen| (chosen, MediaKind::Text)))
            .or_else(|| body.content.first().map(|chosen| (chosen, MediaKind::Other)));

        let Some(((media_type, media), kind)) = chosen else {
            return Ok(None);
        };

        let ty = match kind {
            MediaKind::Json => self.synthesize(media.schema.as_ref())?,
            MediaKind::Text => TsType::string(),
            _ => TsType::any(),
        };

        Ok(Some(BodyParam {
            description: body.description.clone(),
            required: body.required,
            media_type: media_type.clone(),
            ty,
        }))
    }

    fn response(
        &mut self,
        label: &str,
        status: StatusCode,
        response: &Response,
    ) -> Result<ResponseDescriptor> {
        if response.content.len() > 1 && self.options.media_type_policy == MediaTypePolicy::Strict
        {
            return Err(GeneratorError::UnsupportedResponseShape {
                operation: label.to_string(),
                status: status.key(),
                media_types: response.content.keys().cloned().collect(),
            });
        }

        let mut media_types = Vec::with_capacity(response.content.len());
        for (media_type, media) in &response.content {
            media_types.push(MediaVariant {
                media_type: media_type.clone(),
                ty: self.synthesize(media.schema.as_ref())?,
            });
        }

        Ok(ResponseDescriptor {
            status,
            description: response.description.clone(),
            media_types,
        })
    }

    fn synthesize(&mut self, schema: Option<&SchemaNode>) -> Result<TsType> {
        match schema {
            Some(node) => TypeSynthesizer::new(self.resolver, &mut self.registry)
                .with_doc(self.options.with_doc)
                .synthesize(node),
            None => Ok(TsType::any()),
        }
    }

    /// Whether the effective security requirements name a basic-auth scheme
    fn requires_basic_auth(&self, operation: &Operation) -> Result<bool> {
        let requirements: &[SecurityRequirement] = operation
            .security
            .as_deref()
            .or(self.document.security.as_deref())
            .unwrap_or_default();

        let Some(components) = &self.document.components else {
            return Ok(false);
        };

        for requirement in requirements {
            for name in requirement.keys() {
                let Some(scheme) = components.security_schemes.get(name) else {
                    continue;
                };
                if resolver::follow(self.resolver, scheme)?.is_basic_auth() {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    fn register_all_components(&mut self) -> Result<()> {
        let document = self.document;
        let Some(components) = &document.components else {
            return Ok(());
        };

        for name in components.schemas.keys() {
            let pointer = format!("#/components/schemas/{}", resolver::escape_token(name));
            TypeSynthesizer::new(self.resolver, &mut self.registry)
                .with_doc(self.options.with_doc)
                .reference(&pointer)?;
        }
        Ok(())
    }

    fn server(&self) -> String {
        self.options
            .server
            .clone()
            .or_else(|| self.document.servers.first().map(|s| s.url.clone()))
            .unwrap_or_default()
    }
}
