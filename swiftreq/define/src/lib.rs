//! swiftreq Definition Library
//!
//! This crate provides the data model shared by the `swiftreq` generator:
//! what a request looks like, and what shape a response model has once it
//! has been inferred from a sample payload or an explicit field list.
//!
//! ## Core Types
//!
//! ### Request Types
//!
//! - [`RequestDefinition`] - Method, path, summary, server and parameters of one endpoint
//! - [`RequestParam`] - A single `name:type` parameter
//! - [`ParamType`] - Scalar or untyped collection parameter types
//! - [`HttpMethod`] - The supported HTTP verbs (GET, POST)
//! - [`OutputMode`] - Which side effects a generation run performs
//!
//! ### Response Model Types
//!
//! - [`ScalarKind`] - string, integer, 64-bit integer, double, boolean
//! - [`TypeDescriptor`] - Scalar, array or record reference
//! - [`RecordField`] - A property with an optional original JSON key
//! - [`RecordShape`] - Keyed object vs single-value wrapper
//! - [`RecordDefinition`] - A named record and its ordered fields
//!
//! ## Examples
//!
//! ```
//! use swiftreq_define::prelude::*;
//!
//! let record = RecordDefinition::keyed(
//!     "ProfileModel",
//!     vec![RecordField::new("id", TypeDescriptor::Scalar(ScalarKind::Integer))],
//! );
//! assert_eq!(record.fields.len(), 1);
//! assert_eq!(record.shape, RecordShape::Keyed);
//! ```

pub mod prelude;
pub mod request;
pub mod schema;
pub mod types;

// Re-export main types at crate root
pub use request::{ParamType, RequestDefinition, RequestParam};
pub use schema::{RecordDefinition, RecordField, RecordShape, ScalarKind, TypeDescriptor};
pub use types::{HttpMethod, OutputMode};
