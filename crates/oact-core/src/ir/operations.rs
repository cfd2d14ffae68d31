use indexmap::IndexMap;

use super::policy::RetryPolicy;
use super::schemas::IrType;
use super::types::NormalizedName;

/// Client group used for untagged operations.
pub const DEFAULT_GROUP: &str = "Default";

/// HTTP method of an operation that becomes an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// GET, PUT and DELETE are idempotent; POST and PATCH are not.
    pub fn is_idempotent(&self) -> bool {
        match self {
            HttpMethod::Get | HttpMethod::Put | HttpMethod::Delete => true,
            HttpMethod::Post | HttpMethod::Patch => false,
        }
    }
}

/// A fully resolved API operation.
#[derive(Debug, Clone)]
pub struct IrOperation {
    pub name: NormalizedName,
    pub method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<IrParameter>,
    pub request_body: Option<IrRequestBody>,
    pub response: IrResponse,
    pub idempotent: bool,
    pub retry_policy: RetryPolicy,
    pub deprecated: bool,
}

impl IrOperation {
    /// Whether the parameters are collapsed into one synthetic request object.
    ///
    /// Every generator must call this instead of re-deriving the rule.
    pub fn uses_request_object(&self) -> bool {
        uses_request_object(self.parameters.len(), self.request_body.is_some())
    }

    /// Name of the synthetic request type, e.g. `GetPetRequest`.
    pub fn request_type_name(&self) -> String {
        format!("{}Request", self.name.pascal_case)
    }

    /// Type of the body argument, if the request body has any content.
    pub fn body_type(&self) -> Option<&IrType> {
        self.request_body
            .as_ref()
            .and_then(IrRequestBody::primary)
            .map(|m| &m.media_type)
    }

    /// Resolved return type, or `None` when the operation returns no value.
    pub fn return_type(&self) -> Option<&IrType> {
        self.response.primary().map(|m| &m.media_type)
    }

    /// Tag selecting the delegate client group; the first tag wins.
    pub fn client_group(&self) -> &str {
        self.tags.first().map_or(DEFAULT_GROUP, String::as_str)
    }

    /// Call arguments in declaration order: parameters, then the body.
    ///
    /// The contract and the implementation both take their argument lists
    /// from here, whether they end up as method parameters or as fields of
    /// the request object.
    pub fn arguments(&self) -> Vec<IrArgument> {
        let mut args: Vec<IrArgument> = self
            .parameters
            .iter()
            .map(|p| IrArgument {
                field_name: p.field_name.clone(),
                original_name: p.original_name.clone(),
                arg_type: p.param_type.clone(),
                kind: ArgumentKind::Parameter(p.location),
                description: p.description.clone(),
            })
            .collect();

        if let Some(body_type) = self.body_type() {
            args.push(IrArgument {
                field_name: BODY_ARGUMENT.to_string(),
                original_name: BODY_ARGUMENT.to_string(),
                arg_type: body_type.clone(),
                kind: ArgumentKind::Body,
                description: self
                    .request_body
                    .as_ref()
                    .and_then(|b| b.description.clone()),
            });
        }

        args
    }
}

/// The flattening rule: more than three parameters, or any parameter next to a body.
pub fn uses_request_object(param_count: usize, has_request_body: bool) -> bool {
    param_count > 3 || (param_count > 0 && has_request_body)
}

/// Name of the argument carrying the request body.
pub const BODY_ARGUMENT: &str = "body";

/// One argument of a generated operation.
#[derive(Debug, Clone)]
pub struct IrArgument {
    pub field_name: String,
    pub original_name: String,
    pub arg_type: IrType,
    pub kind: ArgumentKind,
    pub description: Option<String>,
}

/// Where an argument ends up in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    Parameter(IrParameterLocation),
    Body,
}

/// A resolved path/query/header/cookie parameter.
#[derive(Debug, Clone)]
pub struct IrParameter {
    /// Name as written in the document, used on the wire.
    pub original_name: String,
    /// camelCase identifier derived from `original_name`.
    pub field_name: String,
    pub location: IrParameterLocation,
    /// Parameter type; wrapped in [`IrType::Nullable`] when not required.
    pub param_type: IrType,
    pub required: bool,
    pub description: Option<String>,
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl IrParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrParameterLocation::Path => "path",
            IrParameterLocation::Query => "query",
            IrParameterLocation::Header => "header",
            IrParameterLocation::Cookie => "cookie",
        }
    }
}

/// A content type and the type its schema maps to.
#[derive(Debug, Clone, PartialEq)]
pub struct IrMediaType {
    pub content_type: String,
    pub media_type: IrType,
    pub is_array: bool,
    /// Element type when `is_array` is set.
    pub item_type: Option<IrType>,
    /// The `$ref` the schema points at, if it is a reference.
    pub schema_ref: Option<String>,
}

/// A resolved request body.
#[derive(Debug, Clone)]
pub struct IrRequestBody {
    pub description: Option<String>,
    pub required: bool,
    pub content: IndexMap<String, IrMediaType>,
}

impl IrRequestBody {
    pub fn primary(&self) -> Option<&IrMediaType> {
        primary_media_type(&self.content)
    }
}

/// The single response an operation is generated against.
#[derive(Debug, Clone)]
pub struct IrResponse {
    pub status_code: String,
    pub description: Option<String>,
    pub content: IndexMap<String, IrMediaType>,
}

impl IrResponse {
    pub fn primary(&self) -> Option<&IrMediaType> {
        primary_media_type(&self.content)
    }
}

/// Pick the primary content type: `application/json` if declared, otherwise
/// the first declared one.
pub fn primary_media_type(content: &IndexMap<String, IrMediaType>) -> Option<&IrMediaType> {
    content
        .get("application/json")
        .or_else(|| content.first().map(|(_, media)| media))
}
