//! Identifier sanitizing for domain labels, URL paths and JSON keys.
//!
//! All functions here are pure. The lenient ones ([`sanitize_identifier`],
//! [`to_pascal`], [`to_record_name`]) always produce a valid identifier;
//! [`format_property_name`] is strict and refuses keys it would have to
//! rename.

use crate::errors::GeneratorError;

/// Swift keywords that must be escaped with backticks when used as a name.
pub const SWIFT_KEYWORDS: &[&str] = &[
    "associatedtype", "class", "deinit", "enum", "extension", "fileprivate", "func", "import",
    "init", "inout", "internal", "let", "open", "operator", "private", "protocol", "public",
    "static", "struct", "subscript", "typealias", "var", "break", "case", "continue", "default",
    "defer", "do", "else", "fallthrough", "for", "guard", "if", "in", "repeat", "return",
    "switch", "where", "while", "as", "Any", "catch", "false", "is", "nil", "rethrows", "super",
    "self", "Self", "throw", "throws", "true", "try", "associativity", "convenience", "dynamic",
    "didSet", "final", "get", "infix", "indirect", "lazy", "left", "mutating", "none",
    "nonmutating", "optional", "override", "postfix", "precedence", "prefix", "Protocol",
    "required", "right", "set", "Type", "unowned", "weak", "willSet",
];

/// Separators that split a path or key into PascalCase segments.
const SEGMENT_SEPARATORS: [char; 4] = ['/', '_', '.', '-'];

/// Replaces every character outside `[A-Za-z0-9_]` with `_` and prefixes
/// `_` when the result starts with a digit.
///
/// ## Examples
///
/// ```
/// use swiftreq_gen::sanitize::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("my-api"), "my_api");
/// assert_eq!(sanitize_identifier("3rdparty"), "_3rdparty");
/// ```
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Converts a URL path into a PascalCase name.
///
/// Leading/trailing slashes are ignored; an empty path yields `"Request"`.
///
/// ## Examples
///
/// ```
/// use swiftreq_gen::sanitize::to_pascal;
///
/// assert_eq!(to_pascal("/user/profile"), "UserProfile");
/// assert_eq!(to_pascal("/v2/order_list.json"), "V2OrderListJson");
/// assert_eq!(to_pascal("/"), "Request");
/// ```
pub fn to_pascal(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return "Request".to_string();
    }
    trimmed
        .split(SEGMENT_SEPARATORS)
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

/// Converts a path or JSON key into a PascalCase record name.
///
/// Non-alphanumerics left over after [`to_pascal`] are stripped; the result
/// falls back to `"Type"` when empty and gets a `Type` prefix when it would
/// start with a digit.
///
/// ## Examples
///
/// ```
/// use swiftreq_gen::sanitize::to_record_name;
///
/// assert_eq!(to_record_name("user_info"), "UserInfo");
/// assert_eq!(to_record_name("2fa"), "Type2fa");
/// assert_eq!(to_record_name("$"), "Type");
/// ```
pub fn to_record_name(value: &str) -> String {
    let name: String = to_pascal(value)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    if name.is_empty() {
        return "Type".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("Type{name}");
    }
    name
}

/// Lower-cases the first character only.
///
/// ## Examples
///
/// ```
/// use swiftreq_gen::sanitize::to_field_name;
///
/// assert_eq!(to_field_name("UserProfile"), "userProfile");
/// assert_eq!(to_field_name(""), "");
/// ```
pub fn to_field_name(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// True for `^[A-Za-z_][A-Za-z0-9_]*$`.
pub fn is_strict_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// True when `value` is a Swift keyword.
pub fn is_keyword(value: &str) -> bool {
    SWIFT_KEYWORDS.contains(&value)
}

/// Turns a JSON key into a property name without renaming it.
///
/// Keywords are escaped with backticks; anything that is not a strict
/// identifier is rejected.
///
/// ## Errors
///
/// Returns [`GeneratorError::InvalidFieldName`] for keys such as
/// `"first-name"` or `"1st"`.
pub fn format_property_name(key: &str) -> Result<String, GeneratorError> {
    if !is_strict_identifier(key) {
        return Err(GeneratorError::InvalidFieldName(key.to_string()));
    }
    if is_keyword(key) {
        Ok(format!("`{key}`"))
    } else {
        Ok(key.to_string())
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
