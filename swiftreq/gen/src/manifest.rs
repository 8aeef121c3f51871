//! Idempotent registration of generated files in `project.pbxproj`.
//!
//! A new source file needs four records in the Xcode project:
//!
//! 1. a `PBXBuildFile` record (build-file section)
//! 2. a `PBXFileReference` record (file-reference section)
//! 3. a membership line in its group's `children` list
//! 4. a line in the `Sources` build phase's `files` list
//!
//! Every insertion is anchored to an existing file that is permanently part
//! of the project (by default `HostPath.swift`): each new record goes right
//! after the anchor's record of the same role, and the target group is the
//! named child of whichever group lists the anchor.
//!
//! All insertion points are located before anything is inserted, so a
//! missing anchor produces an error and never a partially patched document.
//! A file whose name already occurs anywhere in the document is treated as
//! registered and the document is returned unchanged.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::diagnostics::Diagnostic;
use crate::document::{Insertion, LineDocument, indent_of};
use crate::errors::GeneratorError;

/// Length of an object identifier in hex characters.
pub const TOKEN_LEN: usize = 24;

static BLOCK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9A-F]{24}) /\* (.+?) \*/ = \{\s*$").expect("block header pattern is valid")
});

static LIST_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9A-F]{24}) /\* (.+?) \*/,\s*$").expect("list entry pattern is valid")
});

/// What to do when the target group cannot be found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupPolicy {
    /// Fail the whole patch.
    #[default]
    Require,
    /// Skip only the group membership record and report a diagnostic.
    WarnAndSkip,
}

/// The role a manifest record plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRole {
    BuildFile { file_ref: String },
    FileReference,
    GroupMember,
    CompileSource,
}

/// One record to be written into the manifest.
///
/// ## Examples
///
/// ```
/// use swiftreq_gen::manifest::{EntryRole, ManifestEntry};
///
/// let entry = ManifestEntry {
///     id: "0123456789ABCDEF01234567".to_string(),
///     display_name: "FeedRequest.swift".to_string(),
///     role: EntryRole::CompileSource,
/// };
/// assert_eq!(
///     entry.render("\t\t\t\t"),
///     "\t\t\t\t0123456789ABCDEF01234567 /* FeedRequest.swift in Sources */,"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: String,
    pub display_name: String,
    pub role: EntryRole,
}

impl ManifestEntry {
    /// Renders the record as one manifest line with the given indentation.
    pub fn render(&self, indent: &str) -> String {
        let id = &self.id;
        let name = &self.display_name;
        match &self.role {
            EntryRole::BuildFile { file_ref } => format!(
                "{indent}{id} /* {name} in Sources */ = {{isa = PBXBuildFile; fileRef = {file_ref} /* {name} */; }};"
            ),
            EntryRole::FileReference => format!(
                "{indent}{id} /* {name} */ = {{isa = PBXFileReference; lastKnownFileType = {}; path = {name}; sourceTree = \"<group>\"; }};",
                file_type(name)
            ),
            EntryRole::GroupMember => format!("{indent}{id} /* {name} */,"),
            EntryRole::CompileSource => format!("{indent}{id} /* {name} in Sources */,"),
        }
    }
}

fn file_type(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext) {
        Some("swift") => "sourcecode.swift",
        Some("m") => "sourcecode.c.objc",
        Some("h") => "sourcecode.c.h",
        _ => "text",
    }
}

/// The anchor file's records, located in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorRecords {
    pub build_file_line: usize,
    pub file_ref_line: usize,
    pub compile_source_line: usize,
    pub build_file_id: String,
    pub file_ref_id: String,
}

impl AnchorRecords {
    /// Locates the build-file, file-reference and compile-sources records
    /// of `anchor`.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::MissingAnchor`] naming the first record
    /// that could not be found.
    pub fn locate(doc: &LineDocument, anchor: &str) -> Result<Self, GeneratorError> {
        let name = regex::escape(anchor);
        let build_pattern = Regex::new(&format!(
            r"^\s*([0-9A-F]{{24}}) /\* {name} in Sources \*/ = \{{isa = PBXBuildFile;"
        ))
        .map_err(|e| GeneratorError::MissingAnchor(e.to_string()))?;
        let ref_pattern = Regex::new(&format!(
            r"^\s*([0-9A-F]{{24}}) /\* {name} \*/ = \{{isa = PBXFileReference;"
        ))
        .map_err(|e| GeneratorError::MissingAnchor(e.to_string()))?;

        let (build_file_line, build_file_id) = find_capture(doc, &build_pattern)
            .ok_or_else(|| GeneratorError::MissingAnchor(format!("{anchor} build file")))?;
        let (file_ref_line, file_ref_id) = find_capture(doc, &ref_pattern)
            .ok_or_else(|| GeneratorError::MissingAnchor(format!("{anchor} file reference")))?;

        let sources_line = format!("{build_file_id} /* {anchor} in Sources */,");
        let compile_source_line = doc
            .find(|line| line.trim() == sources_line)
            .ok_or_else(|| GeneratorError::MissingAnchor(format!("{anchor} in Sources")))?;

        Ok(Self {
            build_file_line,
            file_ref_line,
            compile_source_line,
            build_file_id,
            file_ref_id,
        })
    }
}

fn find_capture(doc: &LineDocument, pattern: &Regex) -> Option<(usize, String)> {
    doc.lines().iter().enumerate().find_map(|(idx, line)| {
        pattern
            .captures(line)
            .map(|caps| (idx, caps[1].to_string()))
    })
}

/// An entry of a `children = ( ... );` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub id: String,
    pub name: String,
    pub line: usize,
}

/// A `children` list inside a group block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildList {
    /// Line index of `children = (`.
    pub open: usize,
    /// Line index of the closing `);`.
    pub close: usize,
    pub entries: Vec<ChildEntry>,
}

/// An object block `ID /* name */ = { ... };` that has a `children` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBlock {
    pub id: String,
    pub name: String,
    pub header: usize,
    pub end: usize,
    pub children: ChildList,
}

impl GroupBlock {
    /// Extracts every multi-line object block with a `children` list.
    ///
    /// A block ends at the first `};` with the same indentation as its
    /// header. Blocks without a closing line are ignored.
    pub fn scan(doc: &LineDocument) -> Vec<GroupBlock> {
        let mut groups = Vec::new();
        for (header, line) in doc.lines().iter().enumerate() {
            let Some(caps) = BLOCK_HEADER.captures(line) else {
                continue;
            };
            let indent = indent_of(line);
            let Some(end) = doc.find_from(header + 1, |l| l.trim() == "};" && indent_of(l) == indent)
            else {
                continue;
            };
            if let Some(children) = child_list(doc, header + 1, end) {
                groups.push(GroupBlock {
                    id: caps[1].to_string(),
                    name: caps[2].to_string(),
                    header,
                    end,
                    children,
                });
            }
        }
        groups
    }

    fn child_named(&self, name: &str) -> Option<&ChildEntry> {
        self.children.entries.iter().find(|c| c.name == name)
    }
}

fn child_list(doc: &LineDocument, start: usize, end: usize) -> Option<ChildList> {
    let open = (start..end).find(|&idx| doc.line(idx).is_some_and(|l| l.trim() == "children = ("))?;
    let close = (open + 1..end).find(|&idx| doc.line(idx).is_some_and(|l| l.trim() == ");"))?;
    let entries = (open + 1..close)
        .filter_map(|idx| {
            let caps = LIST_ENTRY.captures(doc.line(idx)?)?;
            Some(ChildEntry {
                id: caps[1].to_string(),
                name: caps[2].to_string(),
                line: idx,
            })
        })
        .collect();
    Some(ChildList {
        open,
        close,
        entries,
    })
}

/// Finds the child group `group` of a group that lists `anchor`.
pub fn find_target_group<'a>(
    groups: &'a [GroupBlock],
    anchor: &str,
    group: &str,
) -> Option<&'a GroupBlock> {
    groups
        .iter()
        .filter(|parent| parent.child_named(anchor).is_some())
        .filter_map(|parent| parent.child_named(group))
        .find_map(|child| groups.iter().find(|g| g.id == child.id))
}

/// Settings for one manifest patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRequest<'a> {
    /// File name of the generated artifact, e.g. `FeedRequest.swift`.
    pub artifact: &'a str,
    /// Name of the group the artifact belongs to, e.g. `Request`.
    pub group: &'a str,
    /// File name of the anchor, e.g. `HostPath.swift`.
    pub anchor: &'a str,
    pub policy: GroupPolicy,
}

/// The result of a manifest patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPatch {
    pub document: String,
    pub changed: bool,
    /// The records that were inserted, in role order.
    pub entries: Vec<ManifestEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Registers `request.artifact` in the manifest using thread-local randomness
/// for new identifiers.
pub fn patch_manifest(
    document: &str,
    request: &PatchRequest<'_>,
) -> Result<ManifestPatch, GeneratorError> {
    patch_manifest_with_rng(document, request, &mut rand::thread_rng())
}

/// Registers `request.artifact` in the manifest, drawing identifiers from
/// `rng`.
///
/// ## Errors
///
/// - [`GeneratorError::MissingAnchor`] when any anchor record is missing
/// - [`GeneratorError::MissingGroup`] when the target group is missing and
///   the policy is [`GroupPolicy::Require`]
pub fn patch_manifest_with_rng<R: Rng>(
    document: &str,
    request: &PatchRequest<'_>,
    rng: &mut R,
) -> Result<ManifestPatch, GeneratorError> {
    if is_registered(document, request.artifact) {
        tracing::debug!(artifact = request.artifact, "already registered in project.pbxproj");
        return Ok(ManifestPatch {
            document: document.to_string(),
            changed: false,
            entries: Vec::new(),
            diagnostics: Vec::new(),
        });
    }

    let mut doc = LineDocument::parse(document);
    let anchor = AnchorRecords::locate(&doc, request.anchor)?;
    let groups = GroupBlock::scan(&doc);
    let target = find_target_group(&groups, request.anchor, request.group);

    let mut diagnostics = Vec::new();
    if target.is_none() {
        match request.policy {
            GroupPolicy::Require => {
                return Err(GeneratorError::MissingGroup {
                    group: request.group.to_string(),
                    anchor: request.anchor.to_string(),
                });
            }
            GroupPolicy::WarnAndSkip => diagnostics.push(Diagnostic::GroupSkipped {
                group: request.group.to_string(),
                file: request.artifact.to_string(),
            }),
        }
    }

    let mut tokens = TokenDrawer::new(document);
    let file_ref_id = tokens.draw(rng);
    let build_file_id = tokens.draw(rng);

    let name = request.artifact.to_string();
    let build_file = ManifestEntry {
        id: build_file_id.clone(),
        display_name: name.clone(),
        role: EntryRole::BuildFile {
            file_ref: file_ref_id.clone(),
        },
    };
    let file_ref = ManifestEntry {
        id: file_ref_id.clone(),
        display_name: name.clone(),
        role: EntryRole::FileReference,
    };
    let compile_source = ManifestEntry {
        id: build_file_id,
        display_name: name.clone(),
        role: EntryRole::CompileSource,
    };

    let line_indent = |idx: usize| doc.line(idx).map(indent_of).unwrap_or_default().to_string();
    let mut insertions = vec![
        Insertion::after(
            anchor.build_file_line,
            vec![build_file.render(&line_indent(anchor.build_file_line))],
        ),
        Insertion::after(
            anchor.file_ref_line,
            vec![file_ref.render(&line_indent(anchor.file_ref_line))],
        ),
        Insertion::after(
            anchor.compile_source_line,
            vec![compile_source.render(&line_indent(anchor.compile_source_line))],
        ),
    ];

    let mut entries = vec![build_file, file_ref];
    if let Some(group) = target {
        let member = ManifestEntry {
            id: file_ref_id,
            display_name: name,
            role: EntryRole::GroupMember,
        };
        let indent = match group.children.entries.last() {
            Some(last) => line_indent(last.line),
            None => format!("{}\t", line_indent(group.children.close)),
        };
        insertions.push(Insertion::before(
            group.children.close,
            vec![member.render(&indent)],
        ));
        entries.push(member);
    }
    entries.push(compile_source);

    doc.apply(insertions);
    tracing::info!(
        artifact = request.artifact,
        group = request.group,
        records = entries.len(),
        "registered file in project.pbxproj"
    );

    Ok(ManifestPatch {
        document: doc.render(),
        changed: true,
        entries,
        diagnostics,
    })
}

/// True when some record names `artifact` exactly: a `/* name */` or
/// `/* name in Sources */` comment, or a `path = name;` file reference.
///
/// ## Examples
///
/// ```
/// use swiftreq_gen::manifest::is_registered;
///
/// let doc = "\t\tAB /* MyFeedRequest.swift in Sources */,";
/// assert!(is_registered(doc, "MyFeedRequest.swift"));
/// assert!(!is_registered(doc, "FeedRequest.swift"));
/// ```
pub fn is_registered(document: &str, artifact: &str) -> bool {
    let name = regex::escape(artifact);
    let pattern = format!(r#"/\* {name}(?: in Sources)? \*/|\bpath = "?(?:[^";]*/)?{name}"?;"#);
    match Regex::new(&pattern) {
        Ok(pattern) => pattern.is_match(document),
        Err(_) => document.contains(artifact),
    }
}

/// Draws identifiers that occur neither in the document nor among earlier
/// draws.
struct TokenDrawer<'a> {
    document: &'a str,
    drawn: HashSet<String>,
}

impl<'a> TokenDrawer<'a> {
    fn new(document: &'a str) -> Self {
        Self {
            document,
            drawn: HashSet::new(),
        }
    }

    fn draw<R: Rng>(&mut self, rng: &mut R) -> String {
        loop {
            let token = random_token(rng);
            if !self.document.contains(&token) && self.drawn.insert(token.clone()) {
                return token;
            }
        }
    }
}

/// A random 24-character uppercase hexadecimal identifier.
pub fn random_token<R: Rng>(rng: &mut R) -> String {
    let mut bytes = [0u8; TOKEN_LEN / 2];
    rng.fill(&mut bytes[..]);
    bytes.iter().fold(String::with_capacity(TOKEN_LEN), |mut out, b| {
        let _ = write!(out, "{b:02X}");
        out
    })
}
