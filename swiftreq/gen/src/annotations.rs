//! Explicit type annotations: `name:type,name:type` lists.
//!
//! Two lists use this syntax: request parameters (`--params`) and inline
//! response field lists (`--response` when it is not JSON). Neither has a
//! sample value to infer from, so unknown scalar names fall back to
//! `String` with a diagnostic and collection types must be spelled out.
//!
//! ## Response Array Forms
//!
//! - `tags:string[]`
//! - `tags:array<string>`
//! - `tags:[string]`

use std::str::FromStr;

use swiftreq_define::{
    HttpMethod, ParamType, RecordField, RequestParam, ScalarKind, TypeDescriptor,
};

use crate::diagnostics::Diagnostic;
use crate::errors::GeneratorError;
use crate::sanitize::{format_property_name, is_strict_identifier};

/// Parses `--method`; only GET and POST are accepted, in any case.
///
/// ## Errors
///
/// Returns [`GeneratorError::UnsupportedMethod`] for anything else.
pub fn parse_method(raw: &str) -> Result<HttpMethod, GeneratorError> {
    HttpMethod::from_str(raw.trim())
        .map_err(|_| GeneratorError::UnsupportedMethod(raw.trim().to_string()))
}

/// Maps a scalar type name (`int`, `long`, `bool`, ...) to its kind.
///
/// ## Examples
///
/// ```
/// use swiftreq_define::ScalarKind;
/// use swiftreq_gen::annotations::scalar_kind;
///
/// assert_eq!(scalar_kind("Integer"), Some(ScalarKind::Integer));
/// assert_eq!(scalar_kind("long"), Some(ScalarKind::Int64));
/// assert_eq!(scalar_kind("number"), Some(ScalarKind::Double));
/// assert_eq!(scalar_kind("uuid"), None);
/// ```
pub fn scalar_kind(raw: &str) -> Option<ScalarKind> {
    match raw.trim().to_lowercase().as_str() {
        "string" => Some(ScalarKind::String),
        "int" | "integer" => Some(ScalarKind::Integer),
        "long" => Some(ScalarKind::Int64),
        "float" | "double" | "number" => Some(ScalarKind::Double),
        "bool" | "boolean" => Some(ScalarKind::Bool),
        _ => None,
    }
}

/// Parses a request parameter list such as `userId:int,name:string`.
///
/// Empty items are skipped. Unknown types become `String` and are reported
/// through `diagnostics`.
///
/// ## Errors
///
/// Returns [`GeneratorError::MalformedParam`] for an item without `:` or
/// whose name is not a valid identifier.
///
/// ## Examples
///
/// ```
/// use swiftreq_define::{ParamType, ScalarKind};
/// use swiftreq_gen::annotations::parse_params;
///
/// let mut diagnostics = Vec::new();
/// let params = parse_params("userId:int, filters:map", &mut diagnostics).unwrap();
/// assert_eq!(params[0].ty, ParamType::Scalar(ScalarKind::Integer));
/// assert_eq!(params[1].ty, ParamType::AnyDictionary);
/// assert!(diagnostics.is_empty());
/// ```
pub fn parse_params(
    list: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<RequestParam>, GeneratorError> {
    let mut params = Vec::new();
    for item in list.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let Some((name, raw_type)) = item.split_once(':') else {
            return Err(GeneratorError::MalformedParam(item.to_string()));
        };
        let name = name.trim();
        if !is_strict_identifier(name) {
            return Err(GeneratorError::MalformedParam(item.to_string()));
        }
        params.push(RequestParam::new(name, param_type(name, raw_type, diagnostics)));
    }
    Ok(params)
}

fn param_type(name: &str, raw: &str, diagnostics: &mut Vec<Diagnostic>) -> ParamType {
    if let Some(kind) = scalar_kind(raw) {
        return ParamType::Scalar(kind);
    }
    match raw.trim().to_lowercase().as_str() {
        "array" => ParamType::AnyArray,
        "object" | "map" | "dict" => ParamType::AnyDictionary,
        _ => {
            diagnostics.push(Diagnostic::UnknownParamType {
                name: name.to_string(),
                raw: raw.trim().to_string(),
            });
            ParamType::Scalar(ScalarKind::String)
        }
    }
}

/// Parses an inline response field list such as `id:int,tags:[string]`.
///
/// Field names follow the same strict rules as JSON keys: keywords are
/// escaped, anything else invalid is fatal.
///
/// ## Errors
///
/// - [`GeneratorError::MalformedResponseField`] for an item without `:`
/// - [`GeneratorError::ArrayElementTypeRequired`] for a bare `array`/`list`
/// - [`GeneratorError::ObjectSampleRequired`] for `object`/`map`/`dict`
/// - [`GeneratorError::InvalidFieldName`] for an invalid field name
pub fn parse_response_fields(
    list: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<RecordField>, GeneratorError> {
    let mut fields = Vec::new();
    for item in list.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let Some((name, raw_type)) = item.split_once(':') else {
            return Err(GeneratorError::MalformedResponseField(item.to_string()));
        };
        let name = name.trim();
        let property = format_property_name(name)?;
        let ty = response_type(name, raw_type, diagnostics)?;
        fields.push(RecordField::for_key(property, name, ty));
    }
    Ok(fields)
}

/// Resolves one response type annotation.
pub fn response_type(
    field: &str,
    raw: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<TypeDescriptor, GeneratorError> {
    let lowered = raw.trim().to_lowercase();
    let raw = lowered.as_str();

    let element = raw
        .strip_suffix("[]")
        .or_else(|| raw.strip_prefix("array<").and_then(|r| r.strip_suffix('>')))
        .or_else(|| raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')));
    if let Some(element) = element {
        return Ok(TypeDescriptor::array(response_scalar(element, diagnostics)));
    }

    match raw {
        "array" | "list" => Err(GeneratorError::ArrayElementTypeRequired {
            field: field.to_string(),
        }),
        "object" | "map" | "dict" => Err(GeneratorError::ObjectSampleRequired {
            field: field.to_string(),
        }),
        scalar => Ok(response_scalar(scalar, diagnostics)),
    }
}

fn response_scalar(raw: &str, diagnostics: &mut Vec<Diagnostic>) -> TypeDescriptor {
    let kind = scalar_kind(raw).unwrap_or_else(|| {
        diagnostics.push(Diagnostic::UnknownResponseType {
            raw: raw.trim().to_string(),
        });
        ScalarKind::String
    });
    TypeDescriptor::Scalar(kind)
}
