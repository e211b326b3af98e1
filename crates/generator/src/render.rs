//! Declaration rendering
//!
//! Builds the per-operation type expressions and the template view of each
//! binding. Type expressions are rendered here; tera only lays out the
//! binding around them.

use crate::naming::{self, OperationNames};
use oapi_tsgen_common::{
    doc_comment, is_identifier, GenerateOptions, NamedType, OperationDescriptor, ParamDescriptor,
    ResponseDescriptor, TsField, TsType,
};
use serde::Serialize;

/// `export interface N {...}` for record literals, `export type N = ...;` otherwise
pub fn declaration(name: &str, named: &NamedType) -> String {
    let doc = named
        .description
        .as_deref()
        .map(|text| doc_comment(text, 0))
        .unwrap_or_default();

    if named.ty.is_object() {
        format!("{}export interface {} {}", doc, name, named.ty.render())
    } else {
        format!("{}export type {} = {};", doc, name, named.ty.render())
    }
}

/// Result union laid out one variant per line
pub fn result_declaration(name: &str, variants: &[String]) -> String {
    let mut out = format!("export type {} =", name);
    for variant in variants {
        out.push_str("\n  | ");
        out.push_str(variant);
    }
    out.push(';');
    out
}

/// Record type of a binding's `params` argument
pub fn params_type(operation: &OperationDescriptor, with_doc: bool) -> TsType {
    let mut fields: Vec<TsField> = operation
        .positional_params
        .iter()
        .map(|param| param_field(param, with_doc))
        .collect();

    if let Some(body) = &operation.body_param {
        fields.push(
            TsField::new("data", body.ty.clone())
                .with_required(body.required)
                .with_description(doc_text(&body.description, with_doc)),
        );
    }

    if let Some(query) = group_field("query", &operation.query_params, with_doc) {
        fields.push(query);
    }
    if let Some(headers) = group_field("headers", &operation.header_params, with_doc) {
        fields.push(headers);
    }

    TsType::Object(fields)
}

fn param_field(param: &ParamDescriptor, with_doc: bool) -> TsField {
    TsField::new(param.name.as_str(), param.ty.ts_type())
        .with_required(param.required)
        .with_description(doc_text(&param.description, with_doc))
}

/// Sub-record that is required when any of its members is
fn group_field(name: &str, params: &[ParamDescriptor], with_doc: bool) -> Option<TsField> {
    if params.is_empty() {
        return None;
    }

    let fields = params
        .iter()
        .map(|param| param_field(param, with_doc))
        .collect();
    Some(TsField::new(name, TsType::Object(fields)).with_required(params.iter().any(|p| p.required)))
}

/// `{ status; headers; data }` for one response
pub fn variant_type(response: &ResponseDescriptor) -> TsType {
    let data = response
        .preferred_media()
        .map(|variant| variant.ty.clone())
        .unwrap_or_else(TsType::any);

    TsType::Object(vec![
        TsField::new("status", naming::status_literal(&response.status)),
        TsField::new("headers", TsType::Ref("Headers".to_string())),
        TsField::new("data", data),
    ])
}

/// Result shape of an operation that declares no responses
pub fn untyped_result() -> TsType {
    TsType::Object(vec![
        TsField::new("status", TsType::number()),
        TsField::new("headers", TsType::Ref("Headers".to_string())),
        TsField::new("data", TsType::any()),
    ])
}

/// Template-literal body for the request URL
///
/// `{name}` placeholders become `${params.name}` (or `${params["na-me"]}`).
pub fn url_template(server: &str, path: &str) -> String {
    let mut out = escape_template(server);
    let mut rest = path;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        out.push_str(&escape_template(&rest[..start]));

        let name = &rest[start + 1..start + len];
        if is_identifier(name) {
            out.push_str(&format!("${{params.{}}}", name));
        } else {
            out.push_str(&format!(
                "${{params[{}]}}",
                serde_json::Value::String(name.to_string())
            ));
        }
        rest = &rest[start + len + 1..];
    }

    out.push_str(&escape_template(rest));
    out
}

fn escape_template(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

fn doc_text(text: &Option<String>, with_doc: bool) -> Option<String> {
    if with_doc {
        text.clone()
    } else {
        None
    }
}

/// Everything the operation template needs for one binding
#[derive(Debug, Clone, Serialize)]
pub struct OperationView {
    pub function: String,
    pub params_name: String,
    pub result_name: String,
    pub summary: Option<String>,
    pub method: &'static str,
    pub url: String,
    pub has_query: bool,
    /// JSON-quoted media type of the body
    pub content_type: Option<String>,
    pub basic_auth: bool,
    pub params_decl: String,
    pub result_decl: String,
    pub variants: Vec<String>,
}

/// Declarations of one operation, before layout
pub struct OperationDeclarations {
    pub names: OperationNames,
    pub params: TsType,
    /// `None` when the operation declares no responses
    pub variants: Option<Vec<(String, NamedType)>>,
}

impl OperationDeclarations {
    pub fn new(operation: &OperationDescriptor, options: &GenerateOptions) -> Self {
        let names = OperationNames::for_operation(operation);
        let params = params_type(operation, options.with_doc);

        let variants = if operation.responses.is_empty() {
            None
        } else {
            Some(
                operation
                    .responses
                    .iter()
                    .map(|response| {
                        let named = NamedType::new(variant_type(response))
                            .with_description(doc_text(&response.description, options.with_doc));
                        (names.variant(&response.status), named)
                    })
                    .collect(),
            )
        };

        Self {
            names,
            params,
            variants,
        }
    }

    /// The result type as registered for conflict checks
    pub fn result_type(&self) -> TsType {
        match &self.variants {
            Some(variants) => TsType::Union(
                variants
                    .iter()
                    .map(|(name, _)| TsType::Ref(name.clone()))
                    .collect(),
            ),
            None => untyped_result(),
        }
    }

    pub fn view(&self, operation: &OperationDescriptor, server: &str, with_doc: bool) -> OperationView {
        let (result_decl, variants) = match &self.variants {
            Some(variants) => {
                let names: Vec<String> = variants.iter().map(|(name, _)| name.clone()).collect();
                (
                    result_declaration(&self.names.result, &names),
                    variants
                        .iter()
                        .map(|(name, named)| declaration(name, named))
                        .collect(),
                )
            }
            None => (
                declaration(&self.names.result, &NamedType::new(untyped_result())),
                Vec::new(),
            ),
        };

        OperationView {
            function: self.names.function.clone(),
            params_name: self.names.params.clone(),
            result_name: self.names.result.clone(),
            summary: doc_text(&operation.summary, with_doc),
            method: operation.method.wire_name(),
            url: url_template(server, &operation.path),
            has_query: !operation.query_params.is_empty(),
            content_type: operation
                .body_param
                .as_ref()
                .map(|body| serde_json::Value::String(body.media_type.clone()).to_string()),
            basic_auth: operation.basic_auth,
            params_decl: declaration(&self.names.params, &NamedType::new(self.params.clone())),
            result_decl,
            variants,
        }
    }
}
