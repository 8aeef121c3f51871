//! Convenient re-exports for working with swiftreq definitions.
//!
//! ## Examples
//!
//! ```
//! use swiftreq_define::prelude::*;
//!
//! let param = RequestParam::new("userId", ParamType::Scalar(ScalarKind::Integer));
//! assert_eq!(param.name, "userId");
//! ```

pub use crate::request::{ParamType, RequestDefinition, RequestParam};
pub use crate::schema::{RecordDefinition, RecordField, RecordShape, ScalarKind, TypeDescriptor};
pub use crate::types::{HttpMethod, OutputMode};
