//! Operation descriptors
//!
//! The resolved, reference-free form of one path + verb pair. Descriptors are
//! built once by the parser and only read afterwards.

use crate::{TsType, TypeRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods that produce bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// All methods, in the order they are visited within a path item
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    /// Lowercase key as it appears in a path item (`get`, `post`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }

    /// Uppercase method token sent on the wire
    pub fn wire_name(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn is_mutating(self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Response key of an operation's `responses` map
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    /// Explicit numeric code (`200`)
    Code(u16),

    /// The `default` response
    Default,

    /// A range key such as `2XX`
    Range(String),
}

impl StatusCode {
    pub fn parse(key: &str) -> Self {
        let key = key.trim();
        if key.eq_ignore_ascii_case("default") {
            return StatusCode::Default;
        }
        match key.parse::<u16>() {
            Ok(code) => StatusCode::Code(code),
            Err(_) => StatusCode::Range(key.to_uppercase()),
        }
    }

    /// The key as written in the document
    pub fn key(&self) -> String {
        match self {
            StatusCode::Code(code) => code.to_string(),
            StatusCode::Default => "default".to_string(),
            StatusCode::Range(range) => range.clone(),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Type of a parameter declared with a bare primitive schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimpleType {
    String,
    Number,
    Any,
}

impl SimpleType {
    pub fn ts_type(self) -> TsType {
        match self {
            SimpleType::String => TsType::string(),
            SimpleType::Number => TsType::number(),
            SimpleType::Any => TsType::any(),
        }
    }
}

/// Path, header or query parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
    pub ty: SimpleType,
}

/// Request body chosen from the declared media types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyParam {
    pub description: Option<String>,
    pub required: bool,
    pub media_type: String,
    pub ty: TsType,
}

/// One media type declared under a response status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaVariant {
    pub media_type: String,
    pub ty: TsType,
}

/// Coarse classification of a media type string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Json,
    Text,
    OctetStream,
    Other,
}

impl MediaKind {
    pub fn classify(media_type: &str) -> Self {
        let lower = media_type.to_ascii_lowercase();
        if lower.contains("json") {
            MediaKind::Json
        } else if lower.contains("octet-stream") {
            MediaKind::OctetStream
        } else if lower.contains("text") {
            MediaKind::Text
        } else {
            MediaKind::Other
        }
    }
}

/// One declared response status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDescriptor {
    pub status: StatusCode,
    pub description: Option<String>,
    pub media_types: Vec<MediaVariant>,
}

impl ResponseDescriptor {
    /// The variant used for the decoded body: JSON, then text, then the first declared
    pub fn preferred_media(&self) -> Option<&MediaVariant> {
        let find = |kind: MediaKind| {
            self.media_types
                .iter()
                .find(|variant| MediaKind::classify(&variant.media_type) == kind)
        };

        find(MediaKind::Json)
            .or_else(|| find(MediaKind::Text))
            .or_else(|| self.media_types.first())
    }
}

/// Everything needed to emit the declarations and binding of one endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Path template, e.g. `/pets/{petId}`
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    /// Whether the runtime must attach basic credentials
    pub basic_auth: bool,
    pub positional_params: Vec<ParamDescriptor>,
    pub header_params: Vec<ParamDescriptor>,
    pub query_params: Vec<ParamDescriptor>,
    pub body_param: Option<BodyParam>,
    pub responses: Vec<ResponseDescriptor>,
}

impl OperationDescriptor {
    /// `METHOD /path`, used in logs and error messages
    pub fn label(&self) -> String {
        format!("{} {}", self.method.wire_name(), self.path)
    }
}

/// Output of the extraction pass: descriptors in document order plus the
/// named types they reference
#[derive(Debug, Clone, Default)]
pub struct ParsedApi {
    /// URL prefix for every binding
    pub server: String,
    pub operations: Vec<OperationDescriptor>,
    pub types: TypeRegistry,
}
