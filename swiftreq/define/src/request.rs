//! Request-side types: the declarative description of one endpoint.

use serde::{Deserialize, Serialize};

use crate::schema::ScalarKind;
use crate::types::HttpMethod;

/// The declared type of a request parameter.
///
/// Parameters are never inferred from samples, so besides the scalar kinds
/// they may be untyped collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Scalar(ScalarKind),
    /// An array with no declared element type.
    AnyArray,
    /// A string-keyed dictionary with no declared value type.
    AnyDictionary,
}

/// One request parameter (`name:type` in the parameter list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParam {
    pub name: String,
    pub ty: ParamType,
}

impl RequestParam {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Everything needed to scaffold one network request.
///
/// ## Examples
///
/// ```
/// use swiftreq_define::{HttpMethod, RequestDefinition};
///
/// let request = RequestDefinition {
///     method: HttpMethod::Get,
///     path: "/user/profile".to_string(),
///     summary: "Fetch the signed-in user's profile".to_string(),
///     server: "api.example.com".to_string(),
///     params: vec![],
/// };
/// assert_eq!(request.method.to_string(), "GET");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDefinition {
    pub method: HttpMethod,
    /// The URL path, e.g. `/user/profile`.
    pub path: String,
    /// Human-readable summary, recorded next to the path binding.
    pub summary: String,
    /// Server domain, e.g. `api.example.com`.
    pub server: String,
    pub params: Vec<RequestParam>,
}
