//! Non-fatal findings collected during a generation run.
//!
//! Engines return diagnostics as values next to their results; the
//! orchestrator forwards them to `tracing` once the run has been planned.
//! None of them affect the exit status.

use std::fmt;

/// A data-quality warning with the default that was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An array with no non-null element; typed as `[String]`.
    EmptyArray { key: String },
    /// A null value with nothing to infer from; typed as `String`.
    NullValue { key: String },
    /// Later array elements differ in JSON kind from the first one, which
    /// alone decided the element type.
    HeterogeneousArray { key: String },
    /// An unrecognized response type annotation; typed as `String`.
    UnknownResponseType { raw: String },
    /// An unrecognized parameter type; typed as `String`.
    UnknownParamType { name: String, raw: String },
    /// The response had no usable `data` envelope; no models were generated.
    NoData { raw_response: String },
    /// The manifest group was missing and group membership was skipped.
    GroupSkipped { group: String, file: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyArray { key } => {
                write!(f, "empty array for key '{key}', defaulting to [String]")
            }
            Self::NullValue { key } => {
                write!(f, "null response value for key '{key}', defaulting to String")
            }
            Self::HeterogeneousArray { key } => write!(
                f,
                "array for key '{key}' mixes element kinds; element type taken from the first element"
            ),
            Self::UnknownResponseType { raw } => {
                write!(f, "unknown response type '{raw}', defaulting to String")
            }
            Self::UnknownParamType { name, raw } => {
                write!(f, "unknown type '{raw}' for param '{name}', defaulting to String")
            }
            Self::NoData { raw_response } => {
                write!(f, "no data to parse")?;
                if !raw_response.is_empty() {
                    write!(f, "\nraw response:\n{raw_response}")?;
                }
                Ok(())
            }
            Self::GroupSkipped { group, file } => write!(
                f,
                "{group} group not found in project.pbxproj; skipping group insertion for {file}"
            ),
        }
    }
}

/// Logs each diagnostic at WARN level.
pub fn emit(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        tracing::warn!("{diagnostic}");
    }
}
