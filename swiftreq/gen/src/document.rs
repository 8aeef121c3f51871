//! Line-preserving text documents with planned insertions.
//!
//! Both patched documents (`HostPath.swift` and `project.pbxproj`) are
//! hand-edited text without a grammar we fully parse. [`LineDocument`]
//! splits them on `\n` only, so rendering an unmodified document is
//! byte-identical to its input (including `\r` and a trailing newline).
//!
//! Mutations are collected as [`Insertion`]s and applied in one step once
//! every insertion point has been located, so a failed lookup never leaves
//! a half-patched document behind.

/// A block of new lines to place before line `before`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// Index of the existing line the new lines go in front of. Equal to
    /// the line count to append at the end.
    pub before: usize,
    pub lines: Vec<String>,
}

impl Insertion {
    /// Inserts `lines` immediately after existing line `line`.
    pub fn after(line: usize, lines: Vec<String>) -> Self {
        Self {
            before: line + 1,
            lines,
        }
    }

    /// Inserts `lines` immediately before existing line `line`.
    pub fn before(line: usize, lines: Vec<String>) -> Self {
        Self { before: line, lines }
    }
}

/// A text document viewed as a sequence of lines.
///
/// ## Examples
///
/// ```
/// use swiftreq_gen::document::{Insertion, LineDocument};
///
/// let mut doc = LineDocument::parse("a\nc\n");
/// doc.apply(vec![Insertion::after(0, vec!["b".to_string()])]);
/// assert_eq!(doc.render(), "a\nb\nc\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDocument {
    lines: Vec<String>,
}

impl LineDocument {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the first line at or after `from` matching `predicate`.
    pub fn find_from(&self, from: usize, predicate: impl Fn(&str) -> bool) -> Option<usize> {
        self.lines
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, line)| predicate(line))
            .map(|(idx, _)| idx)
    }

    /// Index of the first line matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&str) -> bool) -> Option<usize> {
        self.find_from(0, predicate)
    }

    /// Applies all insertions.
    ///
    /// Positions refer to the document as it was before this call. Several
    /// insertions at the same position keep their relative order. New lines
    /// take the `\r\n` terminator of the line they follow (or precede, at
    /// the top), so CRLF documents stay CRLF.
    pub fn apply(&mut self, mut insertions: Vec<Insertion>) {
        // Stable sort, then splice bottom-up so earlier indices stay valid.
        insertions.sort_by_key(|insertion| insertion.before);
        for insertion in insertions.into_iter().rev() {
            let at = insertion.before.min(self.lines.len());
            let neighbour = match at {
                0 => self.lines.first(),
                _ => self.lines.get(at - 1),
            };
            let crlf = neighbour.is_some_and(|line| line.ends_with('\r'));
            let lines = insertion.lines.into_iter().map(|mut line| {
                if crlf && !line.ends_with('\r') {
                    line.push('\r');
                }
                line
            });
            self.lines.splice(at..at, lines);
        }
    }
}

/// The leading whitespace of `line`.
pub fn indent_of(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}
