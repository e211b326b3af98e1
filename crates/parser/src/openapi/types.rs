//! OpenAPI 3 document types
//!
//! Only the parts that drive code generation are modelled. Maps are
//! [`IndexMap`]s so iteration follows the document's own order, and every
//! schema position deserializes straight into a [`SchemaNode`].

use super::schema::SchemaNode;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Security requirement: scheme name -> scopes
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// OpenAPI document root
#[derive(Debug, Clone, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version (e.g., "3.0.0")
    #[serde(default)]
    pub openapi: String,

    /// API metadata
    #[serde(default)]
    pub info: Option<Info>,

    #[serde(default)]
    pub servers: Vec<Server>,

    /// API paths (endpoints), in document order
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    /// Reusable components
    #[serde(default)]
    pub components: Option<Components>,

    /// Document-wide security requirements
    #[serde(default)]
    pub security: Option<Vec<SecurityRequirement>>,
}

/// API information
#[derive(Debug, Clone, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Server information
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Either an inline object or a `$ref` to one
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Reference {
        #[serde(rename = "$ref")]
        pointer: String,
    },
    Item(T),
}

/// Path item (operations for a path)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub get: Option<Operation>,

    #[serde(default)]
    pub post: Option<Operation>,

    #[serde(default)]
    pub put: Option<Operation>,

    #[serde(default)]
    pub patch: Option<Operation>,

    #[serde(default)]
    pub delete: Option<Operation>,

    /// Parameters shared by every operation of this path
    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,
}

impl PathItem {
    pub fn operation(&self, method: oapi_tsgen_common::HttpMethod) -> Option<&Operation> {
        use oapi_tsgen_common::HttpMethod;

        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
        }
    }
}

/// HTTP operation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,

    #[serde(default)]
    pub request_body: Option<RefOr<RequestBody>>,

    /// Responses keyed by status code, `default` or range
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,

    /// Overrides the document-wide requirements when present
    #[serde(default)]
    pub security: Option<Vec<SecurityRequirement>>,
}

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// Parameter definition
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub schema: Option<SchemaNode>,
}

/// Request body
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub description: Option<String>,

    /// Content by media type, in document order
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

/// Response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// Media type
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<SchemaNode>,
}

/// Security scheme; only the fields needed to detect basic auth
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,

    #[serde(default)]
    pub scheme: Option<String>,
}

impl SecurityScheme {
    pub fn is_basic_auth(&self) -> bool {
        self.scheme_type == "http"
            && self
                .scheme
                .as_deref()
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("basic"))
    }
}

/// Reusable components
///
/// Schemas stay raw: they are reached through pointers and converted on use.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Value>,

    #[serde(default)]
    pub security_schemes: IndexMap<String, RefOr<SecurityScheme>>,
}
