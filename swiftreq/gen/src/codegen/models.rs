//! `Codable` struct generation for response records.

use swiftreq_define::{RecordDefinition, RecordShape};

use crate::codegen::swift_type;

/// Generates the Swift declaration for one record.
///
/// Keyed records become structs with optional properties, plus a
/// `CodingKeys` enum when any property's JSON key differs from its name.
/// Single-value records become a one-property struct that decodes and
/// encodes through a single-value container.
///
/// ## Examples
///
/// ```
/// use swiftreq_define::{RecordDefinition, RecordField, ScalarKind, TypeDescriptor};
/// use swiftreq_gen::codegen::build_record;
///
/// let record = RecordDefinition::keyed(
///     "UserModel",
///     vec![RecordField::new("name", TypeDescriptor::Scalar(ScalarKind::String))],
/// );
/// assert_eq!(
///     build_record(&record),
///     "struct UserModel: Codable {\n    let name: String?\n}"
/// );
/// ```
pub fn build_record(record: &RecordDefinition) -> String {
    match record.shape {
        RecordShape::Keyed => build_keyed(record),
        RecordShape::SingleValue => build_single_value(record),
    }
}

fn build_keyed(record: &RecordDefinition) -> String {
    let mut lines = vec![format!("struct {}: Codable {{", record.name)];
    for field in &record.fields {
        lines.push(format!("    let {}: {}?", field.name, swift_type(&field.ty)));
    }

    if record.needs_coding_keys() {
        lines.push(String::new());
        lines.push("    private enum CodingKeys: String, CodingKey {".to_string());
        for field in &record.fields {
            match &field.original_key {
                Some(key) => lines.push(format!("        case {} = \"{key}\"", field.name)),
                None => lines.push(format!("        case {}", field.name)),
            }
        }
        lines.push("    }".to_string());
    }

    lines.push("}".to_string());
    lines.join("\n")
}

fn build_single_value(record: &RecordDefinition) -> String {
    let name = &record.name;
    // Single-value records are constructed with exactly one field.
    let Some(field) = record.fields.first() else {
        return format!("struct {name}: Codable {{\n}}");
    };
    let prop = &field.name;
    let ty = swift_type(&field.ty);

    [
        format!("struct {name}: Codable {{"),
        format!("    let {prop}: {ty}"),
        String::new(),
        format!("    init({prop}: {ty}) {{"),
        format!("        self.{prop} = {prop}"),
        "    }".to_string(),
        String::new(),
        "    init(from decoder: Decoder) throws {".to_string(),
        "        let container = try decoder.singleValueContainer()".to_string(),
        format!("        {prop} = try container.decode({ty}.self)"),
        "    }".to_string(),
        String::new(),
        "    func encode(to encoder: Encoder) throws {".to_string(),
        "        var container = encoder.singleValueContainer()".to_string(),
        format!("        try container.encode({prop})"),
        "    }".to_string(),
        "}".to_string(),
    ]
    .join("\n")
}

/// Generates all records, separated by blank lines, in the given order.
pub fn build_models(records: &[RecordDefinition]) -> String {
    records
        .iter()
        .map(build_record)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The full model file: `import Foundation` followed by the records.
pub fn build_model_file(models: &str) -> String {
    format!("import Foundation\n\n{models}\n")
}
