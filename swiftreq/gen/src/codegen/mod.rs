//! Swift source emission.
//!
//! This module turns the decisions made by inference, annotation parsing
//! and registry merging into Swift text. Each submodule handles one
//! artifact:
//!
//! - [`request`] - The request class and its commented usage skeleton
//! - [`models`] - `Codable` structs for inferred or annotated records
//!
//! ## Output Format
//!
//! Generators return plain `String`s without a trailing newline; the
//! orchestrator in [`crate::output`] joins sections and adds file headers.

pub mod models;
pub mod request;

pub use models::{build_model_file, build_models, build_record};
pub use request::{
    RequestTemplate, build_request_class, build_request_file, build_usage_skeleton,
    model_name, request_class_name,
};

use swiftreq_define::{ParamType, ScalarKind, TypeDescriptor};

/// The Swift spelling of a scalar kind.
pub fn scalar_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String => "String",
        ScalarKind::Integer => "Int",
        ScalarKind::Int64 => "Int64",
        ScalarKind::Double => "Double",
        ScalarKind::Bool => "Bool",
    }
}

/// The Swift spelling of a type descriptor.
///
/// ## Examples
///
/// ```
/// use swiftreq_define::{ScalarKind, TypeDescriptor};
/// use swiftreq_gen::codegen::swift_type;
///
/// let ty = TypeDescriptor::array(TypeDescriptor::array(TypeDescriptor::Scalar(ScalarKind::Int64)));
/// assert_eq!(swift_type(&ty), "[[Int64]]");
/// assert_eq!(swift_type(&TypeDescriptor::reference("FeedModelUser")), "FeedModelUser");
/// ```
pub fn swift_type(ty: &TypeDescriptor) -> String {
    match ty {
        TypeDescriptor::Scalar(kind) => scalar_type(*kind).to_string(),
        TypeDescriptor::Array(element) => format!("[{}]", swift_type(element)),
        TypeDescriptor::Reference(name) => name.clone(),
    }
}

/// The Swift spelling of a request parameter type.
pub fn param_type(ty: ParamType) -> &'static str {
    match ty {
        ParamType::Scalar(kind) => scalar_type(kind),
        ParamType::AnyArray => "[Any]",
        ParamType::AnyDictionary => "[String: Any]",
    }
}
