//! Record and type descriptors produced by schema inference.
//!
//! These types describe the *shape* of a response model independently of
//! the Swift text that is eventually emitted for it. Every consumer is
//! expected to match [`TypeDescriptor`] exhaustively.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Scalar value kinds a response field can carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScalarKind {
    String,
    Integer,
    /// 64-bit integer, only reachable through an explicit `long` annotation.
    Int64,
    Double,
    Bool,
}

/// The type of a record field or of a whole payload.
///
/// An [`TypeDescriptor::Array`] always owns a fully resolved element
/// descriptor; record references point at a [`RecordDefinition`] that was
/// allocated earlier in the same run.
///
/// ## Examples
///
/// ```
/// use swiftreq_define::{ScalarKind, TypeDescriptor};
///
/// let tags = TypeDescriptor::array(TypeDescriptor::Scalar(ScalarKind::String));
/// assert_eq!(tags.referenced_record(), None);
///
/// let users = TypeDescriptor::array(TypeDescriptor::reference("UserModelItem"));
/// assert_eq!(users.referenced_record(), Some("UserModelItem"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeDescriptor {
    Scalar(ScalarKind),
    Array(Box<TypeDescriptor>),
    Reference(String),
}

impl TypeDescriptor {
    /// Wraps an already resolved element type in an array descriptor.
    pub fn array(element: TypeDescriptor) -> Self {
        Self::Array(Box::new(element))
    }

    /// Creates a reference to a named record.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// Returns the record name this descriptor ultimately points at, looking
    /// through any number of array layers.
    pub fn referenced_record(&self) -> Option<&str> {
        match self {
            Self::Scalar(_) => None,
            Self::Array(element) => element.referenced_record(),
            Self::Reference(name) => Some(name),
        }
    }
}

/// A single property of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordField {
    /// The symbolic property name as it appears in the declaration
    /// (reserved words arrive already escaped, e.g. `` `class` ``).
    pub name: String,
    pub ty: TypeDescriptor,
    /// The source JSON key, set only when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_key: Option<String>,
}

impl RecordField {
    /// Creates a field whose symbolic name doubles as its JSON key.
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            original_key: None,
        }
    }

    /// Creates a field for JSON key `key`, recording the key only when the
    /// symbolic name had to differ from it.
    pub fn for_key(name: impl Into<String>, key: &str, ty: TypeDescriptor) -> Self {
        let name = name.into();
        let original_key = (name != key).then(|| key.to_string());
        Self {
            name,
            ty,
            original_key,
        }
    }

    /// The JSON key this field decodes from and encodes to.
    pub fn json_key(&self) -> &str {
        self.original_key.as_deref().unwrap_or(&self.name)
    }
}

/// How a record maps onto its JSON representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordShape {
    /// A JSON object; each field is a key.
    Keyed,
    /// A named container around one bare value (scalar or array) that
    /// encodes and decodes as that value directly.
    SingleValue,
}

/// A named record inferred from (or annotated for) a response payload.
///
/// ## Examples
///
/// ```
/// use swiftreq_define::{RecordDefinition, RecordField, ScalarKind, TypeDescriptor};
///
/// let record = RecordDefinition::keyed(
///     "ProfileModel",
///     vec![
///         RecordField::new("id", TypeDescriptor::Scalar(ScalarKind::Integer)),
///         RecordField::for_key("`class`", "class", TypeDescriptor::Scalar(ScalarKind::String)),
///     ],
/// );
/// assert!(record.needs_coding_keys());
/// assert_eq!(record.json_keys(), vec!["id", "class"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDefinition {
    pub name: String,
    pub shape: RecordShape,
    /// Fields in first-seen source order.
    pub fields: Vec<RecordField>,
}

impl RecordDefinition {
    /// Creates a keyed (JSON object) record.
    pub fn keyed(name: impl Into<String>, fields: Vec<RecordField>) -> Self {
        Self {
            name: name.into(),
            shape: RecordShape::Keyed,
            fields,
        }
    }

    /// Creates a single-value wrapper record holding exactly one field.
    pub fn single_value(name: impl Into<String>, field: RecordField) -> Self {
        Self {
            name: name.into(),
            shape: RecordShape::SingleValue,
            fields: vec![field],
        }
    }

    /// True when at least one field needs an explicit key mapping.
    pub fn needs_coding_keys(&self) -> bool {
        self.shape == RecordShape::Keyed && self.fields.iter().any(|f| f.original_key.is_some())
    }

    /// The JSON keys this record reads, in declaration order.
    pub fn json_keys(&self) -> Vec<&str> {
        self.fields.iter().map(RecordField::json_key).collect()
    }
}
