//! Record inference from sample JSON payloads.
//!
//! Walks an arbitrary [`serde_json::Value`] and produces the minimal set of
//! named records needed to decode it, plus a [`TypeDescriptor`] for the
//! payload itself.
//!
//! ## Naming Rules
//!
//! - The top-level record takes the requested root name
//! - An object under key `k` of record `P` becomes `P` + PascalCase(`k`)
//! - Objects inside an array under key `k` become `P` + PascalCase(`k`) + `Item`
//! - Nested arrays extend the key with `Item` for each extra level
//! - Every name goes through the run's [`NameRegistry`], so collisions get a
//!   numeric suffix (`2`, `3`, ...)
//!
//! Records are listed children first: a record appears after every record
//! it references.
//!
//! ## Arrays
//!
//! The first non-null element decides the element type. Arrays without one
//! default to `[String]` with a diagnostic. Later elements are not inferred;
//! when their JSON kind differs from the first element's a
//! [`Diagnostic::HeterogeneousArray`] is recorded instead.

use serde_json::{Map, Value};
use swiftreq_define::{RecordDefinition, RecordField, ScalarKind, TypeDescriptor};

use crate::diagnostics::Diagnostic;
use crate::errors::GeneratorError;
use crate::names::NameRegistry;
use crate::sanitize::{format_property_name, to_record_name};

/// Conventional top-level key holding the payload of interest.
pub const ENVELOPE_KEY: &str = "data";

/// Field name of the wrapper record around a top-level array.
const ITEMS_FIELD: &str = "items";

/// Field name of the wrapper record around a top-level scalar.
const VALUE_FIELD: &str = "value";

/// The outcome of inferring one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    /// Every record needed to decode the payload, children first.
    pub records: Vec<RecordDefinition>,
    /// The name of the top-level record (an object record or a wrapper).
    pub root_record: String,
    /// The type of the payload itself.
    pub root: TypeDescriptor,
    pub diagnostics: Vec<Diagnostic>,
}

/// Returns the value under the `data` envelope key, if the payload is an
/// object carrying a non-null one.
///
/// ## Examples
///
/// ```
/// use serde_json::json;
/// use swiftreq_gen::inference::extract_envelope;
///
/// assert_eq!(extract_envelope(&json!({"data": [1]})), Some(&json!([1])));
/// assert_eq!(extract_envelope(&json!({"data": null})), None);
/// assert_eq!(extract_envelope(&json!({"items": []})), None);
/// assert_eq!(extract_envelope(&json!([1, 2])), None);
/// ```
pub fn extract_envelope(payload: &Value) -> Option<&Value> {
    match payload.as_object()?.get(ENVELOPE_KEY)? {
        Value::Null => None,
        data => Some(data),
    }
}

/// Infers record definitions for `payload`.
///
/// Objects become keyed records; a top-level scalar or array becomes a
/// single-value wrapper record whose field is named `value` or `items`.
///
/// ## Errors
///
/// Returns [`GeneratorError::InvalidFieldName`] when an object key is not a
/// strict identifier. Keys are never renamed.
///
/// ## Examples
///
/// ```
/// use serde_json::json;
/// use swiftreq_gen::inference::infer;
/// use swiftreq_gen::names::NameRegistry;
///
/// let payload = json!({"id": 7, "owner": {"login": "octo"}});
/// let result = infer(&payload, "RepoModel", &mut NameRegistry::new()).unwrap();
///
/// let names: Vec<_> = result.records.iter().map(|r| r.name.as_str()).collect();
/// assert_eq!(names, vec!["RepoModelOwner", "RepoModel"]);
/// assert_eq!(result.root_record, "RepoModel");
/// ```
pub fn infer(
    payload: &Value,
    root_name: &str,
    names: &mut NameRegistry,
) -> Result<Inference, GeneratorError> {
    let mut walker = Walker {
        names,
        records: Vec::new(),
        diagnostics: Vec::new(),
    };

    let (root_record, root) = match payload {
        Value::Object(object) => {
            let name = walker.names.allocate(root_name);
            walker.build_record(&name, object)?;
            let root = TypeDescriptor::reference(name.clone());
            (name, root)
        }
        Value::Array(values) => {
            let element = walker.infer_element(values, root_name, ITEMS_FIELD)?;
            let root = TypeDescriptor::array(element);
            let name = walker.names.allocate(root_name);
            walker.push_wrapper(&name, ITEMS_FIELD, root.clone());
            (name, root)
        }
        scalar => {
            let root = walker.infer_scalar(scalar, VALUE_FIELD);
            let name = walker.names.allocate(root_name);
            walker.push_wrapper(&name, VALUE_FIELD, root.clone());
            (name, root)
        }
    };

    tracing::debug!(
        root = %root_record,
        records = walker.records.len(),
        "inferred response records"
    );

    Ok(Inference {
        records: walker.records,
        root_record,
        root,
        diagnostics: walker.diagnostics,
    })
}

struct Walker<'a> {
    names: &'a mut NameRegistry,
    records: Vec<RecordDefinition>,
    diagnostics: Vec<Diagnostic>,
}

impl Walker<'_> {
    fn build_record(&mut self, name: &str, object: &Map<String, Value>) -> Result<(), GeneratorError> {
        let mut fields = Vec::with_capacity(object.len());
        for (key, value) in object {
            let property = format_property_name(key)?;
            let ty = self.infer_value(value, name, key)?;
            fields.push(RecordField::for_key(property, key, ty));
        }
        self.records.push(RecordDefinition::keyed(name, fields));
        Ok(())
    }

    fn infer_value(
        &mut self,
        value: &Value,
        parent: &str,
        key: &str,
    ) -> Result<TypeDescriptor, GeneratorError> {
        match value {
            Value::Object(object) => {
                let child = self.names.allocate(&format!("{parent}{}", to_record_name(key)));
                self.build_record(&child, object)?;
                Ok(TypeDescriptor::reference(child))
            }
            Value::Array(values) => Ok(TypeDescriptor::array(self.infer_element(values, parent, key)?)),
            scalar => Ok(self.infer_scalar(scalar, key)),
        }
    }

    fn infer_element(
        &mut self,
        values: &[Value],
        parent: &str,
        key: &str,
    ) -> Result<TypeDescriptor, GeneratorError> {
        let mut non_null = values.iter().filter(|v| !v.is_null());
        let Some(first) = non_null.next() else {
            self.diagnostics.push(Diagnostic::EmptyArray {
                key: key.to_string(),
            });
            return Ok(TypeDescriptor::Scalar(ScalarKind::String));
        };

        let first_kind = json_kind(first);
        if non_null.any(|v| json_kind(v) != first_kind) {
            self.diagnostics.push(Diagnostic::HeterogeneousArray {
                key: key.to_string(),
            });
        }

        match first {
            Value::Object(object) => {
                let child = self
                    .names
                    .allocate(&format!("{parent}{}Item", to_record_name(key)));
                self.build_record(&child, object)?;
                Ok(TypeDescriptor::reference(child))
            }
            Value::Array(nested) => {
                let inner = self.infer_element(nested, parent, &format!("{key}Item"))?;
                Ok(TypeDescriptor::array(inner))
            }
            scalar => Ok(self.infer_scalar(scalar, key)),
        }
    }

    fn infer_scalar(&mut self, value: &Value, key: &str) -> TypeDescriptor {
        let kind = match value {
            Value::Bool(_) => ScalarKind::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => ScalarKind::Integer,
            Value::Number(_) => ScalarKind::Double,
            Value::String(_) => ScalarKind::String,
            Value::Null | Value::Array(_) | Value::Object(_) => {
                self.diagnostics.push(Diagnostic::NullValue {
                    key: key.to_string(),
                });
                ScalarKind::String
            }
        };
        TypeDescriptor::Scalar(kind)
    }

    fn push_wrapper(&mut self, name: &str, field: &str, ty: TypeDescriptor) {
        self.records
            .push(RecordDefinition::single_value(name, RecordField::new(field, ty)));
    }
}

/// Coarse JSON kind used for the homogeneity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JsonKind {
    Null,
    Bool,
    Integer,
    Double,
    String,
    Array,
    Object,
}

fn json_kind(value: &Value) -> JsonKind {
    match value {
        Value::Null => JsonKind::Null,
        Value::Bool(_) => JsonKind::Bool,
        Value::Number(n) if n.is_i64() || n.is_u64() => JsonKind::Integer,
        Value::Number(_) => JsonKind::Double,
        Value::String(_) => JsonKind::String,
        Value::Array(_) => JsonKind::Array,
        Value::Object(_) => JsonKind::Object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use swiftreq_define::RecordShape;

    fn string() -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::String)
    }

    fn int() -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::Integer)
    }

    fn run(payload: Value, root: &str) -> Inference {
        infer(&payload, root, &mut NameRegistry::new()).unwrap()
    }

    fn record<'a>(result: &'a Inference, name: &str) -> &'a RecordDefinition {
        result
            .records
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("record {name} missing"))
    }

    #[test]
    fn enveloped_payload_yields_outer_and_inner_records() {
        let response = json!({"data": {"id": 1, "tags": ["a", "b"], "user": {"name": "x"}}});
        let data = extract_envelope(&response).unwrap();
        let result = run(data.clone(), "ProfileModel");

        assert_eq!(result.records.len(), 2);
        let outer = record(&result, "ProfileModel");
        assert_eq!(outer.shape, RecordShape::Keyed);
        assert_eq!(
            outer.fields,
            vec![
                RecordField::new("id", int()),
                RecordField::new("tags", TypeDescriptor::array(string())),
                RecordField::new("user", TypeDescriptor::reference("ProfileModelUser")),
            ]
        );
        let inner = record(&result, "ProfileModelUser");
        assert_eq!(inner.fields, vec![RecordField::new("name", string())]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn field_order_follows_source_order() {
        let result = run(json!({"z": 1, "a": 2, "m": 3}), "Root");
        let keys: Vec<_> = result.records[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn inference_is_deterministic() {
        let payload = json!({
            "list": [{"id": 1, "child": {"x": 1.5}}],
            "meta": {"page": 1, "more": true}
        });
        let first = run(payload.clone(), "PageModel");
        let second = run(payload, "PageModel");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_array_defaults_to_strings_with_diagnostic() {
        let result = run(json!({"tags": []}), "Root");
        assert_eq!(result.records[0].fields[0].ty, TypeDescriptor::array(string()));
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::EmptyArray {
                key: "tags".to_string()
            }]
        );
    }

    #[test]
    fn null_only_array_defaults_to_strings() {
        let result = run(json!({"tags": [null, null]}), "Root");
        assert_eq!(result.records[0].fields[0].ty, TypeDescriptor::array(string()));
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn leading_nulls_are_skipped() {
        let result = run(json!({"ids": [null, 3]}), "Root");
        assert_eq!(result.records[0].fields[0].ty, TypeDescriptor::array(int()));
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn array_of_objects_uses_item_suffix() {
        let result = run(json!({"users": [{"id": 1}, {"id": 2}]}), "ListModel");
        assert!(result.records.iter().any(|r| r.name == "ListModelUsersItem"));
        assert_eq!(
            record(&result, "ListModel").fields[0].ty,
            TypeDescriptor::array(TypeDescriptor::reference("ListModelUsersItem"))
        );
    }

    #[test]
    fn nested_arrays_extend_key_with_item() {
        let result = run(json!({"grid": [[{"v": 1}]]}), "Root");
        assert_eq!(
            record(&result, "Root").fields[0].ty,
            TypeDescriptor::array(TypeDescriptor::array(TypeDescriptor::reference(
                "RootGridItemItem"
            )))
        );
    }

    #[test]
    fn heterogeneous_array_uses_first_element_and_warns() {
        let result = run(json!({"mixed": [1, "two"]}), "Root");
        assert_eq!(result.records[0].fields[0].ty, TypeDescriptor::array(int()));
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::HeterogeneousArray {
                key: "mixed".to_string()
            }]
        );
    }

    #[test]
    fn scalar_kinds_map_to_descriptors() {
        let result = run(
            json!({"b": true, "i": -4, "big": 18446744073709551615u64, "d": 0.5, "s": "x"}),
            "Root",
        );
        let kinds: Vec<_> = result.records[0].fields.iter().map(|f| f.ty.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TypeDescriptor::Scalar(ScalarKind::Bool),
                int(),
                int(),
                TypeDescriptor::Scalar(ScalarKind::Double),
                string(),
            ]
        );
    }

    #[test]
    fn null_field_defaults_to_string_with_diagnostic() {
        let result = run(json!({"nickname": null}), "Root");
        assert_eq!(result.records[0].fields[0].ty, string());
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::NullValue {
                key: "nickname".to_string()
            }]
        );
    }

    #[test]
    fn colliding_child_names_get_numeric_suffix() {
        // "a_b" under Root and "b" under RootA both want "RootAB".
        let result = run(json!({"a_b": {"x": 1}, "a": {"b": {"y": 2}}}), "Root");
        let names: Vec<_> = result.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["RootAB", "RootAB2", "RootA", "Root"]);
    }

    #[test]
    fn keyword_keys_are_escaped_with_original_key() {
        let result = run(json!({"class": "A", "default": 1}), "Root");
        let fields = &result.records[0].fields;
        assert_eq!(fields[0].name, "`class`");
        assert_eq!(fields[0].original_key.as_deref(), Some("class"));
        assert_eq!(fields[1].name, "`default`");
        assert!(result.records[0].needs_coding_keys());
    }

    #[test]
    fn escaped_fields_reconstruct_original_key_set() {
        let payload = json!({"class": 1, "self": 2, "init": 3});
        let result = run(payload.clone(), "Root");
        let record = &result.records[0];
        assert!(record.fields.iter().all(|f| f.original_key.is_some()));
        let keys: Vec<_> = payload.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(record.json_keys(), keys);
    }

    #[test]
    fn invalid_key_is_fatal() {
        let err = infer(&json!({"user-name": "x"}), "Root", &mut NameRegistry::new()).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidFieldName(ref k) if k == "user-name"));
    }

    #[test]
    fn invalid_nested_key_is_fatal() {
        let result = infer(
            &json!({"ok": {"also ok": 1}}),
            "Root",
            &mut NameRegistry::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn top_level_array_gets_items_wrapper() {
        let result = run(json!([{"id": 1}]), "FeedModel");
        let names: Vec<_> = result.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["FeedModelItemsItem", "FeedModel"]);
        let wrapper = record(&result, "FeedModel");
        assert_eq!(wrapper.shape, RecordShape::SingleValue);
        assert_eq!(wrapper.fields.len(), 1);
        assert_eq!(wrapper.fields[0].name, "items");
        assert_eq!(
            result.root,
            TypeDescriptor::array(TypeDescriptor::reference("FeedModelItemsItem"))
        );
    }

    #[test]
    fn top_level_scalar_gets_value_wrapper() {
        let result = run(json!(42), "CountModel");
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].shape, RecordShape::SingleValue);
        assert_eq!(result.records[0].fields, vec![RecordField::new("value", int())]);
        assert_eq!(result.root, int());
    }

    #[test]
    fn top_level_null_defaults_to_string() {
        let result = run(Value::Null, "NothingModel");
        assert_eq!(result.root, string());
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::NullValue {
                key: "value".to_string()
            }]
        );
    }

    #[test]
    fn root_name_respects_existing_registry_entries() {
        let mut names = NameRegistry::new();
        names.allocate("Root");
        let result = infer(&json!({"a": 1}), "Root", &mut names).unwrap();
        assert_eq!(result.root_record, "Root2");
    }
}
