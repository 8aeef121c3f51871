//! Host/path registry merging for `HostPath.swift`.
//!
//! The registry document binds logical keys (server domains and URL paths)
//! to symbolic names in two blocks:
//!
//! ```text
//! extension Host {
//!     static let api = Host(rawValue: "api.example.com")
//! }
//!
//! extension Path {
//!     /// Fetch the user profile
//!     static let userProfile = Path(rawValue: "/user/profile")
//! }
//! ```
//!
//! A block runs from its `extension <Wrapper> {` header to the first
//! unindented `}` after it. Both blocks must already exist; the merge never
//! creates scaffolding.
//!
//! ## Guarantees
//!
//! - A key that is already bound returns its existing name and leaves the
//!   document untouched
//! - A symbolic name is never rebound to a different key; colliding names
//!   are extended instead
//! - Merging is a pure function over text; persistence is up to the caller

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::document::{Insertion, LineDocument, indent_of};
use crate::errors::GeneratorError;
use crate::sanitize::{is_keyword, sanitize_identifier, to_field_name, to_pascal};

/// Display name used in error messages.
const REGISTRY_DOCUMENT: &str = "HostPath.swift";

/// Indentation for the first binding of an empty block.
const DEFAULT_INDENT: &str = "    ";

static BINDING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*static let (\w+) = (Host|Path)\(rawValue: "([^"]*)"\)\s*(?://.*)?$"#)
        .expect("binding pattern is valid")
});

/// Which block a binding lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Server domains, wrapped in `Host(rawValue:)`.
    Host,
    /// URL paths, wrapped in `Path(rawValue:)`.
    Path,
}

impl BindingKind {
    /// The wrapper type name used in declarations.
    pub fn wrapper(self) -> &'static str {
        match self {
            Self::Host => "Host",
            Self::Path => "Path",
        }
    }

    fn header(self) -> String {
        format!("extension {} {{", self.wrapper())
    }

    fn fallback_name(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Path => "path",
        }
    }
}

/// One `static let name = Wrapper(rawValue: "key")` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub key: String,
    /// Line index of the declaration.
    pub line: usize,
}

/// A located registry block and the bindings inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryBlock {
    pub kind: BindingKind,
    /// Line index of the `extension X {` header.
    pub header: usize,
    /// Line index of the closing `}`.
    pub close: usize,
    pub bindings: Vec<Binding>,
}

impl RegistryBlock {
    /// Locates the block for `kind` in `doc`.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::MissingMarker`] when the header or its
    /// closing brace is missing.
    pub fn locate(doc: &LineDocument, kind: BindingKind) -> Result<Self, GeneratorError> {
        let header_text = kind.header();
        let missing = || GeneratorError::MissingMarker {
            document: REGISTRY_DOCUMENT.to_string(),
            marker: format!("{} extension", kind.wrapper()),
        };

        let header = doc
            .find(|line| line.trim_end() == header_text)
            .ok_or_else(missing)?;
        let close = doc
            .find_from(header + 1, |line| line.trim_end() == "}")
            .ok_or_else(missing)?;

        let bindings = (header + 1..close)
            .filter_map(|idx| {
                let line = doc.line(idx)?;
                let caps = BINDING_PATTERN.captures(line)?;
                (&caps[2] == kind.wrapper()).then(|| Binding {
                    name: caps[1].to_string(),
                    key: caps[3].to_string(),
                    line: idx,
                })
            })
            .collect();

        Ok(Self {
            kind,
            header,
            close,
            bindings,
        })
    }

    /// The name bound to `key`, if any.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.key == key)
            .map(|b| b.name.as_str())
    }

    /// Line index after the last non-blank line of the block body.
    fn append_point(&self, doc: &LineDocument) -> usize {
        (self.header + 1..self.close)
            .rev()
            .find(|&idx| doc.line(idx).is_some_and(|l| !l.trim().is_empty()))
            .map_or(self.header + 1, |idx| idx + 1)
    }

    fn indent<'a>(&self, doc: &'a LineDocument) -> &'a str {
        self.bindings
            .first()
            .and_then(|b| doc.line(b.line))
            .map_or(DEFAULT_INDENT, indent_of)
    }
}

/// The result of ensuring a binding exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merge {
    /// The (possibly unchanged) document text.
    pub document: String,
    /// The symbolic name bound to the key.
    pub name: String,
    /// Whether the document was modified.
    pub changed: bool,
}

/// Collapses a domain to its first label plus its last two labels.
///
/// ## Examples
///
/// ```
/// use swiftreq_gen::registry::normalize_domain;
///
/// assert_eq!(normalize_domain("foo.bar.example.com"), "foo.example.com");
/// assert_eq!(normalize_domain("api.example.com"), "api.example.com");
/// assert_eq!(normalize_domain("localhost"), "localhost");
/// ```
pub fn normalize_domain(domain: &str) -> String {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 3 {
        return domain.to_string();
    }
    format!(
        "{}.{}.{}",
        labels[0],
        labels[labels.len() - 2],
        labels[labels.len() - 1]
    )
}

/// Returns the name bound to `key` in the `kind` block, binding it first
/// when it is new.
///
/// Name synthesis starts at `base`, then `extended`, then `extended_2`,
/// `extended_3`, ... and takes the first candidate that is unused (or
/// already bound to `key`) and is not a Swift keyword. `comment`, when
/// given, is written as a `///` line above a new declaration.
///
/// ## Errors
///
/// - [`GeneratorError::InvalidRegistryKey`] when `key` contains `"`, `\`
///   or a line break
/// - [`GeneratorError::MissingMarker`] when the block is missing
pub fn ensure_binding(
    document: &str,
    kind: BindingKind,
    key: &str,
    base: &str,
    extended: &str,
    comment: Option<&str>,
) -> Result<Merge, GeneratorError> {
    // Keys are written verbatim between quotes and read back by BINDING_PATTERN.
    if key.contains(['"', '\\', '\n', '\r']) {
        return Err(GeneratorError::InvalidRegistryKey(key.to_string()));
    }

    let mut doc = LineDocument::parse(document);
    let block = RegistryBlock::locate(&doc, kind)?;

    if let Some(name) = block.lookup(key) {
        tracing::debug!(key, name, wrapper = kind.wrapper(), "registry binding already present");
        return Ok(Merge {
            document: document.to_string(),
            name: name.to_string(),
            changed: false,
        });
    }

    let existing: HashMap<&str, &str> = block
        .bindings
        .iter()
        .map(|b| (b.name.as_str(), b.key.as_str()))
        .collect();
    let name = synthesize_name(&existing, key, base, extended, kind.fallback_name());

    let indent = block.indent(&doc).to_string();
    let mut lines = Vec::with_capacity(2);
    if let Some(comment) = comment {
        lines.push(format!("{indent}/// {}", single_line(comment)));
    }
    lines.push(format!(
        "{indent}static let {name} = {}(rawValue: \"{key}\")",
        kind.wrapper()
    ));
    let at = block.append_point(&doc);
    doc.apply(vec![Insertion::before(at, lines)]);

    tracing::info!(key, name = %name, wrapper = kind.wrapper(), "added registry binding");
    Ok(Merge {
        document: doc.render(),
        name,
        changed: true,
    })
}

fn synthesize_name(
    existing: &HashMap<&str, &str>,
    key: &str,
    base: &str,
    extended: &str,
    fallback: &str,
) -> String {
    let acceptable = |candidate: &str| {
        !is_keyword(candidate) && existing.get(candidate).is_none_or(|bound| *bound == key)
    };

    let base = if base.is_empty() { fallback } else { base };
    if acceptable(base) {
        return base.to_string();
    }
    let extended = if extended.is_empty() { base } else { extended };
    if acceptable(extended) {
        return extended.to_string();
    }
    let mut idx = 2;
    loop {
        let candidate = format!("{extended}_{idx}");
        if acceptable(&candidate) {
            return candidate;
        }
        idx += 1;
    }
}

/// Ensures a host binding for `domain` (normalized first).
///
/// The name derives from the first domain label, extended with the second
/// label on collision.
pub fn ensure_host_binding(document: &str, domain: &str) -> Result<Merge, GeneratorError> {
    let normalized = normalize_domain(domain);
    let labels: Vec<&str> = normalized.split('.').collect();
    let base = sanitize_identifier(labels[0]);
    let extended = match labels.get(1).map(|label| sanitize_identifier(label)) {
        Some(second) if !second.is_empty() && !base.is_empty() => format!("{base}_{second}"),
        _ => base.clone(),
    };
    ensure_binding(
        document,
        BindingKind::Host,
        &normalized,
        &base,
        &extended,
        None,
    )
}

/// The default symbolic name for a path: lower-camel PascalCase.
///
/// ## Examples
///
/// ```
/// use swiftreq_gen::registry::path_name_hint;
///
/// assert_eq!(path_name_hint("/user/profile"), "userProfile");
/// assert_eq!(path_name_hint("/order-list"), "orderList");
/// ```
pub fn path_name_hint(path: &str) -> String {
    sanitize_identifier(&to_field_name(&to_pascal(path)))
}

/// Ensures a path binding for the literal `path`, documented by `summary`.
pub fn ensure_path_binding(
    document: &str,
    path: &str,
    summary: &str,
    hint: &str,
) -> Result<Merge, GeneratorError> {
    ensure_binding(
        document,
        BindingKind::Path,
        path,
        hint,
        hint,
        Some(summary),
    )
}

/// Both bindings needed by one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryUpdate {
    pub document: String,
    pub host_name: String,
    pub path_name: String,
    pub changed: bool,
}

/// Ensures host and path bindings for one request.
///
/// ## Errors
///
/// Returns [`GeneratorError::MissingMarker`] if either block is missing;
/// nothing is returned for partial success.
pub fn update_host_path(
    document: &str,
    path: &str,
    summary: &str,
    domain: &str,
) -> Result<RegistryUpdate, GeneratorError> {
    let host = ensure_host_binding(document, domain)?;
    let path_merge = ensure_path_binding(&host.document, path, summary, &path_name_hint(path))?;
    Ok(RegistryUpdate {
        changed: host.changed || path_merge.changed,
        document: path_merge.document,
        host_name: host.name,
        path_name: path_merge.name,
    })
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCAFFOLD: &str = "\
import Foundation

struct Host: RawRepresentable, Hashable {
    let rawValue: String
}

extension Host {
    static let api = Host(rawValue: \"api.example.com\")
}

extension Path {
    /// Fetch the user profile
    static let userProfile = Path(rawValue: \"/user/profile\")
}

struct HostPath {
    let host: Host
    let path: Path
}
";

    const EMPTY_BLOCKS: &str = "extension Host {\n}\n\nextension Path {\n}\n";

    #[test]
    fn domain_normalization_keeps_first_and_last_two() {
        assert_eq!(normalize_domain("foo.bar.example.com"), "foo.example.com");
        assert_eq!(normalize_domain("a.b.c.d.e"), "a.d.e");
        assert_eq!(normalize_domain("example.com"), "example.com");
    }

    #[test]
    fn existing_host_is_reused_without_change() {
        let merge = ensure_host_binding(SCAFFOLD, "api.example.com").unwrap();
        assert!(!merge.changed);
        assert_eq!(merge.name, "api");
        assert_eq!(merge.document, SCAFFOLD);
    }

    #[test]
    fn subdomain_normalizes_onto_existing_binding() {
        let merge = ensure_host_binding(SCAFFOLD, "api.internal.example.com").unwrap();
        assert!(!merge.changed);
        assert_eq!(merge.name, "api");
    }

    #[test]
    fn new_host_is_appended_inside_block() {
        let merge = ensure_host_binding(SCAFFOLD, "pay.example.com").unwrap();
        assert!(merge.changed);
        assert_eq!(merge.name, "pay");
        assert!(merge.document.contains(
            "    static let api = Host(rawValue: \"api.example.com\")\n    static let pay = Host(rawValue: \"pay.example.com\")\n}\n\nextension Path {"
        ));
    }

    #[test]
    fn second_merge_is_idempotent() {
        let first = ensure_host_binding(SCAFFOLD, "pay.example.com").unwrap();
        let second = ensure_host_binding(&first.document, "pay.example.com").unwrap();
        assert!(!second.changed);
        assert_eq!(second.name, first.name);
        assert_eq!(second.document, first.document);
    }

    #[test]
    fn colliding_host_name_is_extended_not_overwritten() {
        let merge = ensure_host_binding(SCAFFOLD, "api.other.com").unwrap();
        assert_eq!(merge.name, "api_other");
        assert!(merge.document.contains("static let api = Host(rawValue: \"api.example.com\")"));
    }

    #[test]
    fn repeated_collisions_get_numeric_suffix() {
        let mut doc = EMPTY_BLOCKS.to_string();
        let mut names = Vec::new();
        for domain in ["api.a.com", "api.b.com", "api.b.org", "api.b.net"] {
            let merge = ensure_host_binding(&doc, domain).unwrap();
            doc = merge.document;
            names.push(merge.name);
        }
        assert_eq!(names, vec!["api", "api_b", "api_b_2", "api_b_3"]);
    }

    #[test]
    fn distinct_keys_get_distinct_names() {
        let mut doc = EMPTY_BLOCKS.to_string();
        let mut names = std::collections::HashSet::new();
        let domains = [
            "api.a.com", "api.b.com", "api.c.com", "web.a.com", "api.a.org", "x.y.z.a.com",
            "api.b.io", "3d.render.com", "api-v2.a.com", "api",
        ];
        for domain in domains {
            let merge = ensure_host_binding(&doc, domain).unwrap();
            doc = merge.document;
            names.insert(merge.name);
        }
        assert_eq!(names.len(), domains.len());
    }

    #[test]
    fn self_consistent_name_is_reused() {
        let doc = "extension Host {\n    static let api = Host(rawValue: \"api.example.com\")\n}\n";
        let mut existing = HashMap::new();
        existing.insert("api", "api.example.com");
        assert_eq!(
            synthesize_name(&existing, "api.example.com", "api", "api_example", "host"),
            "api"
        );
        assert!(!ensure_host_binding(doc, "api.example.com").unwrap().changed);
    }

    #[test]
    fn keyword_names_are_skipped() {
        let merge = ensure_host_binding(EMPTY_BLOCKS, "default.example.com").unwrap();
        assert_eq!(merge.name, "default_example");
    }

    #[test]
    fn digit_leading_label_is_sanitized() {
        let merge = ensure_host_binding(EMPTY_BLOCKS, "3d.example.com").unwrap();
        assert_eq!(merge.name, "_3d");
    }

    #[test]
    fn first_binding_in_empty_block_uses_default_indent() {
        let merge = ensure_host_binding(EMPTY_BLOCKS, "api.example.com").unwrap();
        assert!(merge
            .document
            .starts_with("extension Host {\n    static let api = Host(rawValue: \"api.example.com\")\n}\n"));
    }

    #[test]
    fn new_path_carries_summary_comment() {
        let merge =
            ensure_path_binding(SCAFFOLD, "/order/list", "List  orders\nfor user", "orderList")
                .unwrap();
        assert!(merge.changed);
        assert_eq!(merge.name, "orderList");
        assert!(merge.document.contains(
            "    /// List orders for user\n    static let orderList = Path(rawValue: \"/order/list\")\n}"
        ));
    }

    #[test]
    fn path_name_collision_renames() {
        let merge = ensure_path_binding(SCAFFOLD, "/user_profile", "Other", "userProfile").unwrap();
        assert_eq!(merge.name, "userProfile_2");
    }

    #[test]
    fn missing_host_block_is_fatal() {
        let err = ensure_host_binding("extension Path {\n}\n", "api.example.com").unwrap_err();
        assert!(matches!(err, GeneratorError::MissingMarker { ref marker, .. } if marker == "Host extension"));
    }

    #[test]
    fn unclosed_block_is_fatal() {
        let err = ensure_path_binding("extension Path {\n    static let a = Path(rawValue: \"/a\")\n", "/b", "b", "b");
        assert!(err.is_err());
    }

    #[test]
    fn lookups_ignore_other_block() {
        // "/user/profile" is bound as a Path; the Host block must not see it.
        let merge = ensure_host_binding(SCAFFOLD, "/user/profile").unwrap();
        assert!(merge.changed);
    }

    #[test]
    fn quoted_key_is_rejected() {
        let err = ensure_path_binding(SCAFFOLD, "/a\"b", "quoted", "aB").unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidRegistryKey(ref key) if key == "/a\"b"));

        let err = ensure_host_binding(SCAFFOLD, "api\\x.example.com").unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidRegistryKey(_)));
    }

    #[test]
    fn binding_with_trailing_comment_is_found() {
        let doc = "extension Host {\n    static let cdn = Host(rawValue: \"cdn.example.com\") // assets\n}\n\nextension Path {\n}\n";
        let merge = ensure_host_binding(doc, "cdn.example.com").unwrap();
        assert!(!merge.changed);
        assert_eq!(merge.name, "cdn");
        assert_eq!(merge.document, doc);
    }

    #[test]
    fn update_host_path_reports_both_names() {
        let update =
            update_host_path(SCAFFOLD, "/user/profile", "Fetch", "api.cdn.example.com").unwrap();
        assert!(!update.changed);
        assert_eq!(update.host_name, "api");
        assert_eq!(update.path_name, "userProfile");

        let update = update_host_path(SCAFFOLD, "/feed", "Home feed", "m.example.com").unwrap();
        assert!(update.changed);
        assert_eq!(update.host_name, "m");
        assert_eq!(update.path_name, "feed");
        let again = update_host_path(&update.document, "/feed", "Home feed", "m.example.com")
            .unwrap();
        assert!(!again.changed);
        assert_eq!(again.document, update.document);
    }
}
