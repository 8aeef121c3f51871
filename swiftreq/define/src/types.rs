//! Invocation-level types: HTTP methods and output modes.
//!
//! - [`HttpMethod`] - The request verbs the generator knows how to scaffold
//! - [`OutputMode`] - How far a generation run is allowed to touch the project

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// HTTP methods supported by the request generator.
///
/// Only `GET` and `POST` have a networking call shape in the target project;
/// anything else is rejected while parsing.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use swiftreq_define::HttpMethod;
///
/// assert_eq!(HttpMethod::from_str("get").unwrap(), HttpMethod::Get);
/// assert_eq!(HttpMethod::Post.to_string(), "POST");
/// assert!(HttpMethod::from_str("DELETE").is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    /// HTTP GET - parameters travel in the query string
    Get,
    /// HTTP POST - parameters travel as a JSON body
    Post,
}

/// Selects which side effects a generation run performs.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use swiftreq_define::OutputMode;
///
/// let mode = OutputMode::from_str("full").unwrap();
/// assert!(mode.writes_files());
/// assert!(mode.patches_manifest());
/// assert!(!OutputMode::Print.writes_files());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputMode {
    /// Emit the generated sources to standard output; touch nothing on disk.
    Print,
    /// Write request/model files and update the host/path registry.
    #[default]
    Files,
    /// Everything `Files` does, plus register the new files in the Xcode project.
    Full,
}

impl OutputMode {
    /// Returns true when generated artifacts and the registry are persisted.
    pub fn writes_files(self) -> bool {
        matches!(self, Self::Files | Self::Full)
    }

    /// Returns true when the project manifest is patched.
    pub fn patches_manifest(self) -> bool {
        matches!(self, Self::Full)
    }
}
