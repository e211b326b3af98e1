//! Identifier derivation for operations
//!
//! Every name is a pure function of an operation's path, method and status
//! codes. Collisions are not resolved here; the emitter's conflict check
//! reports them.

use oapi_tsgen_common::{HttpMethod, OperationDescriptor, StatusCode, TsType};

/// Identifiers for one operation's binding and declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationNames {
    /// Binding name, e.g. `getPet`
    pub function: String,

    /// `GetPetParams`
    pub params: String,

    /// `GetPetResult`
    pub result: String,

    /// `GetPet`, the prefix of every declaration name
    base: String,
}

impl OperationNames {
    pub fn new(path: &str, method: HttpMethod) -> Self {
        let function = operation_name(path, method);
        let base = upper_first(&function);

        Self {
            params: format!("{}Params", base),
            result: format!("{}Result", base),
            function,
            base,
        }
    }

    pub fn for_operation(operation: &OperationDescriptor) -> Self {
        Self::new(&operation.path, operation.method)
    }

    /// Result variant for one status, e.g. `GetPetNotFoundResult`
    pub fn variant(&self, status: &StatusCode) -> String {
        format!("{}{}Result", self.base, status_name(status))
    }
}

/// Lexical verb prefix for a method
pub fn verb(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "get",
        HttpMethod::Post => "create",
        HttpMethod::Put => "replace",
        HttpMethod::Patch => "update",
        HttpMethod::Delete => "delete",
    }
}

/// Binding name for a path + method
///
/// # Examples
/// ```
/// use oapi_tsgen_common::HttpMethod;
/// use oapi_tsgen_generator::naming::operation_name;
///
/// assert_eq!(operation_name("/pets/{petId}", HttpMethod::Get), "getPet");
/// assert_eq!(operation_name("/foos", HttpMethod::Post), "createFoo");
/// assert_eq!(operation_name("/pets/{petId}", HttpMethod::Delete), "deletePets");
/// ```
pub fn operation_name(path: &str, method: HttpMethod) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let last = segments.len().saturating_sub(1);

    let mut name = verb(method).to_string();
    for (i, segment) in segments.iter().enumerate() {
        if is_placeholder(segment) {
            continue;
        }

        let single = match method {
            HttpMethod::Get => i + 1 == last && is_placeholder(segments[last]),
            _ => i == last,
        };
        let segment = if single {
            singularize(segment)
        } else {
            segment
        };

        for word in segment
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            name.push_str(&title_case(word));
        }
    }
    name
}

fn is_placeholder(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// Strip one trailing `s`
fn singularize(segment: &str) -> &str {
    match segment.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem,
        _ => segment,
    }
}

/// First letter upper, remainder lower
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Identifier fragment for a response status
pub fn status_name(status: &StatusCode) -> &'static str {
    match status {
        StatusCode::Code(code) => code_name(*code).unwrap_or("Default"),
        StatusCode::Default => "Default",
        StatusCode::Range(range) => match range.as_str() {
            "1XX" => "Informational",
            "2XX" => "Success",
            "3XX" => "Redirection",
            "4XX" => "ClientError",
            "5XX" => "ServerError",
            _ => "Default",
        },
    }
}

fn code_name(code: u16) -> Option<&'static str> {
    let name = match code {
        100 => "Continue",
        101 => "SwitchingProtocols",
        102 => "Processing",
        103 => "EarlyHints",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "NonAuthoritativeInformation",
        204 => "NoContent",
        205 => "ResetContent",
        206 => "PartialContent",
        207 => "MultiStatus",
        208 => "AlreadyReported",
        226 => "IMUsed",
        300 => "MultipleChoices",
        301 => "MovedPermanently",
        302 => "Found",
        303 => "SeeOther",
        304 => "NotModified",
        305 => "UseProxy",
        307 => "TemporaryRedirect",
        308 => "PermanentRedirect",
        400 => "BadRequest",
        401 => "Unauthorized",
        402 => "PaymentRequired",
        403 => "Forbidden",
        404 => "NotFound",
        405 => "MethodNotAllowed",
        406 => "NotAcceptable",
        408 => "RequestTimeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "LengthRequired",
        412 => "PreconditionFailed",
        413 => "PayloadTooLarge",
        414 => "UriTooLong",
        415 => "UnsupportedMediaType",
        416 => "RangeNotSatisfiable",
        417 => "ExpectationFailed",
        418 => "ImATeapot",
        421 => "MisdirectedRequest",
        422 => "UnprocessableEntity",
        423 => "Locked",
        424 => "FailedDependency",
        425 => "TooEarly",
        426 => "UpgradeRequired",
        428 => "PreconditionRequired",
        429 => "TooManyRequests",
        431 => "RequestHeaderFieldsTooLarge",
        451 => "UnavailableForLegalReasons",
        500 => "InternalServerError",
        501 => "NotImplemented",
        502 => "BadGateway",
        503 => "ServiceUnavailable",
        504 => "GatewayTimeout",
        505 => "HttpVersionNotSupported",
        506 => "VariantAlsoNegotiates",
        507 => "InsufficientStorage",
        508 => "LoopDetected",
        510 => "NotExtended",
        511 => "NetworkAuthenticationRequired",
        _ => return None,
    };
    Some(name)
}

/// Type of a result variant's `status` field
pub fn status_literal(status: &StatusCode) -> TsType {
    match status {
        StatusCode::Code(code) => TsType::Literal(code.to_string()),
        StatusCode::Default => TsType::Literal("500".to_string()),
        StatusCode::Range(_) => TsType::number(),
    }
}
