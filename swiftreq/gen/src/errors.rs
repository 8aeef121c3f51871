//! Error types for the swiftreq generator.
//!
//! Every variant is fatal: it aborts the run before any file is written.
//! Non-fatal findings live in [`crate::diagnostics`].

use thiserror::Error;

/// Errors that can occur during generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// HTTP method other than GET/POST.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// A `name:type` item without a type, or with an empty name.
    #[error("param missing type: {0}")]
    MalformedParam(String),

    /// A response field list item without a type.
    #[error("response field missing type: {0}")]
    MalformedResponseField(String),

    /// Array annotation without an element type; no sample exists to infer one.
    #[error(
        "response array type requires element type, e.g. {field}:[string] or {field}:array<int>"
    )]
    ArrayElementTypeRequired { field: String },

    /// Object annotation without a sample payload.
    #[error("response object type for '{field}' requires JSON schema or example payload")]
    ObjectSampleRequired { field: String },

    /// A response key that is not a strict identifier.
    ///
    /// Response keys are never renamed silently, since a rename could
    /// desynchronize the encode/decode key mapping.
    #[error("response field name '{0}' is not a valid Swift identifier; strict spelling is required")]
    InvalidFieldName(String),

    /// A registry key that can't be written as a plain Swift string literal.
    #[error("'{0}' can't be used as a registry key: quotes, backslashes and line breaks are not allowed")]
    InvalidRegistryKey(String),

    /// Response JSON failed to parse.
    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A structural marker of the registry document is missing.
    #[error("failed to locate {marker} in {document}")]
    MissingMarker {
        document: String,
        marker: String,
    },

    /// An anchor line of the manifest document is missing.
    #[error("failed to locate insertion point in project.pbxproj: {0}")]
    MissingAnchor(String),

    /// The target group of a manifest insertion is missing.
    #[error("{group} group next to {anchor} not found in project.pbxproj")]
    MissingGroup { group: String, anchor: String },

    /// A required project file does not exist.
    #[error("{what} not found at {path}")]
    ProjectFileNotFound { what: String, path: String },

    /// Invalid configuration file.
    #[error("invalid configuration '{path}': {message}")]
    ConfigError { path: String, message: String },

    /// Failed to read an input file.
    #[error("failed to read '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
