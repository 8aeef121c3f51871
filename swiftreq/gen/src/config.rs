//! Project layout configuration.
//!
//! Every location the generator reads or writes is relative to the project
//! root. The defaults match the iOS project the tool was written for; a
//! `swiftreq.toml` in the project root overrides any subset of them.
//!
//! ```toml
//! registry_path = "App/Networking/HostPath.swift"
//! require_group = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codegen::RequestTemplate;
use crate::errors::GeneratorError;
use crate::manifest::GroupPolicy;

/// Name of the optional configuration file in the project root.
pub const CONFIG_FILE: &str = "swiftreq.toml";

const NETWORKING_DIR: &str = "living/Classes/Swift/Networking";

/// Where things live inside a project, and the names generated code uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLayout {
    /// The host/path registry document.
    pub registry_path: PathBuf,
    /// The Xcode build manifest.
    pub manifest_path: PathBuf,
    /// Directory receiving `<Name>Request.swift`.
    pub request_dir: PathBuf,
    /// Directory receiving `<Name>Model.swift`.
    pub model_dir: PathBuf,
    /// Manifest entry new files are inserted next to.
    pub anchor: String,
    pub request_group: String,
    pub model_group: String,
    pub base_class: String,
    pub import_module: String,
    /// Whether a missing manifest group aborts the run.
    pub require_group: bool,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        let template = RequestTemplate::default();
        Self {
            registry_path: PathBuf::from(NETWORKING_DIR).join("HostPath.swift"),
            manifest_path: PathBuf::from("living.xcodeproj/project.pbxproj"),
            request_dir: PathBuf::from(NETWORKING_DIR).join("Request"),
            model_dir: PathBuf::from(NETWORKING_DIR).join("Model"),
            anchor: "HostPath.swift".to_string(),
            request_group: "Request".to_string(),
            model_group: "Model".to_string(),
            base_class: template.base_class,
            import_module: template.import_module,
            require_group: true,
        }
    }
}

impl ProjectLayout {
    /// Loads `swiftreq.toml` from `project_root`, or the defaults when the
    /// file does not exist.
    ///
    /// ## Errors
    ///
    /// - [`GeneratorError::ReadError`] if the file exists but can't be read
    /// - [`GeneratorError::ConfigError`] if it is not valid TOML for this layout
    pub fn load(project_root: &Path) -> Result<Self, GeneratorError> {
        let path = project_root.join(CONFIG_FILE);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no config file, using default layout");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path).map_err(|e| GeneratorError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let layout: Self = toml::from_str(&text).map_err(|e| GeneratorError::ConfigError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded project layout");
        Ok(layout)
    }

    pub fn template(&self) -> RequestTemplate {
        RequestTemplate {
            import_module: self.import_module.clone(),
            base_class: self.base_class.clone(),
        }
    }

    /// The manifest group policy, with `allow_missing_group` overriding
    /// `require_group`.
    pub fn group_policy(&self, allow_missing_group: bool) -> GroupPolicy {
        if self.require_group && !allow_missing_group {
            GroupPolicy::Require
        } else {
            GroupPolicy::WarnAndSkip
        }
    }
}
