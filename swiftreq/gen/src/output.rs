//! Planning and committing a generation run.
//!
//! A run has two phases:
//!
//! 1. **Plan**: parse the invocation, infer records, render the request and
//!    model sources, merge the registry and patch the manifest, all in
//!    memory. Every fatal error surfaces here.
//! 2. **Commit**: write the planned files, each through a temp file and a
//!    rename.
//!
//! Nothing touches the disk unless planning succeeded as a whole, so a
//! missing anchor in `project.pbxproj` can't leave a half-updated
//! `HostPath.swift` behind.
//!
//! ## Output Modes
//!
//! | Mode    | Request/model files | `HostPath.swift` | `project.pbxproj` |
//! |---------|---------------------|------------------|-------------------|
//! | `print` | stdout only         | read if present  | untouched         |
//! | `files` | written             | updated          | untouched         |
//! | `full`  | written             | updated          | patched           |

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde_json::Value;
use swiftreq_define::{HttpMethod, OutputMode, RecordDefinition, RequestDefinition};

use crate::annotations::{parse_params, parse_response_fields};
use crate::codegen::{
    build_model_file, build_models, build_request_class, build_request_file, build_usage_skeleton,
    model_name, request_class_name,
};
use crate::config::ProjectLayout;
use crate::diagnostics::{self, Diagnostic};
use crate::errors::GeneratorError;
use crate::inference::{extract_envelope, infer};
use crate::manifest::{PatchRequest, patch_manifest_with_rng};
use crate::names::NameRegistry;
use crate::registry::update_host_path;

/// Registry used in print mode when the project has none.
const EMPTY_REGISTRY: &str = "extension Host {\n}\n\nextension Path {\n}\n";

/// Where the response description comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponseSource {
    #[default]
    None,
    /// Inline JSON (starting with `{` or `[`) or a `name:type` field list.
    Inline(String),
    /// A JSON file.
    File(PathBuf),
}

impl ResponseSource {
    /// Builds the source from the two CLI flags; a file wins over inline text.
    pub fn from_args(inline: Option<String>, file: Option<PathBuf>) -> Self {
        match (file, inline) {
            (Some(path), _) => Self::File(path),
            (None, Some(text)) if !text.trim().is_empty() => Self::Inline(text),
            _ => Self::None,
        }
    }
}

/// One generation request, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub method: HttpMethod,
    pub path: String,
    pub summary: String,
    pub server: String,
    /// Raw `name:type,...` parameter list.
    pub params: Option<String>,
    pub response: ResponseSource,
    pub mode: OutputMode,
    pub allow_missing_group: bool,
}

/// A file the commit phase will write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    pub path: PathBuf,
    pub content: String,
}

/// Everything a run decided, before any side effect.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub request: RequestDefinition,
    pub class_name: String,
    pub class_source: String,
    pub skeleton: String,
    pub records: Vec<RecordDefinition>,
    pub host_name: String,
    pub path_name: String,
    pub mode: OutputMode,
    pub writes: Vec<PlannedWrite>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationPlan {
    /// The combined source printed in `print` mode: request class, models
    /// and usage skeleton.
    pub fn print_source(&self) -> String {
        let mut sections = vec![self.class_source.clone()];
        if !self.records.is_empty() {
            sections.push(format!("import Foundation\n\n{}", build_models(&self.records)));
        }
        sections.push(self.skeleton.clone());
        format!("{}\n", sections.join("\n\n"))
    }
}

/// Resolves the response description into record definitions.
///
/// JSON payloads must carry a non-null `data` envelope; without one no
/// records are produced and a [`Diagnostic::NoData`] is recorded. A field
/// list becomes a single keyed record named `root_name`.
///
/// ## Errors
///
/// - [`GeneratorError::ReadError`] if the response file can't be read
/// - [`GeneratorError::InvalidJson`] if the payload isn't JSON
/// - any annotation or field-name error from the field list or inference
pub fn resolve_response(
    source: &ResponseSource,
    root_name: &str,
    names: &mut NameRegistry,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<RecordDefinition>, GeneratorError> {
    let text = match source {
        ResponseSource::None => return Ok(Vec::new()),
        ResponseSource::File(path) => {
            fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
                path: path.display().to_string(),
                source: e,
            })?
        }
        ResponseSource::Inline(text) => {
            let trimmed = text.trim_start();
            if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                let fields = parse_response_fields(text, diagnostics)?;
                if fields.is_empty() {
                    return Ok(Vec::new());
                }
                let name = names.allocate(root_name);
                return Ok(vec![RecordDefinition::keyed(name, fields)]);
            }
            text.clone()
        }
    };

    let payload: Value = serde_json::from_str(&text)?;
    let Some(data) = extract_envelope(&payload) else {
        diagnostics.push(Diagnostic::NoData {
            raw_response: text.trim().to_string(),
        });
        return Ok(Vec::new());
    };

    let inference = infer(data, root_name, names)?;
    diagnostics.extend(inference.diagnostics);
    Ok(inference.records)
}

/// Plans a run using thread-local randomness for manifest identifiers.
pub fn plan(
    invocation: &Invocation,
    project_root: &Path,
    layout: &ProjectLayout,
) -> Result<GenerationPlan, GeneratorError> {
    plan_with_rng(invocation, project_root, layout, &mut rand::thread_rng())
}

/// Plans a run without touching the disk beyond reading inputs.
///
/// ## Errors
///
/// Any fatal condition of the run: bad annotations, invalid response JSON,
/// missing project files, missing registry blocks, missing manifest
/// anchors or (under [`GroupPolicy::Require`](crate::manifest::GroupPolicy))
/// missing manifest groups.
pub fn plan_with_rng<R: Rng>(
    invocation: &Invocation,
    project_root: &Path,
    layout: &ProjectLayout,
    rng: &mut R,
) -> Result<GenerationPlan, GeneratorError> {
    let mut diagnostics = Vec::new();
    let params = parse_params(invocation.params.as_deref().unwrap_or_default(), &mut diagnostics)?;
    let request = RequestDefinition {
        method: invocation.method,
        path: invocation.path.clone(),
        summary: invocation.summary.clone(),
        server: invocation.server.clone(),
        params,
    };

    let class_name = request_class_name(&request.path);
    let root_model = model_name(&request.path);
    let mut names = NameRegistry::new();
    let records = resolve_response(&invocation.response, &root_model, &mut names, &mut diagnostics)?;

    let registry_path = project_root.join(&layout.registry_path);
    let registry_text = if invocation.mode.writes_files() || registry_path.is_file() {
        read_project_file(&registry_path, "host/path registry")?
    } else {
        tracing::debug!(path = %registry_path.display(), "no registry, resolving names against an empty one");
        EMPTY_REGISTRY.to_string()
    };
    let registry = update_host_path(
        &registry_text,
        &request.path,
        &request.summary,
        &request.server,
    )?;

    let class_source = build_request_class(
        &class_name,
        &registry.host_name,
        &registry.path_name,
        &request.params,
        &layout.template(),
    );
    let skeleton = build_usage_skeleton(&class_name, &request.params, request.method);

    let mut writes = Vec::new();
    if invocation.mode.writes_files() {
        let request_file = format!("{class_name}.swift");
        writes.push(PlannedWrite {
            path: project_root.join(&layout.request_dir).join(&request_file),
            content: build_request_file(&class_source, &skeleton),
        });
        if !records.is_empty() {
            writes.push(PlannedWrite {
                path: project_root
                    .join(&layout.model_dir)
                    .join(format!("{root_model}.swift")),
                content: build_model_file(&build_models(&records)),
            });
        }
        if registry.changed {
            writes.push(PlannedWrite {
                path: registry_path,
                content: registry.document.clone(),
            });
        }
    }

    if invocation.mode.patches_manifest() {
        let manifest_path = project_root.join(&layout.manifest_path);
        let mut manifest = read_project_file(&manifest_path, "project manifest")?;
        let policy = layout.group_policy(invocation.allow_missing_group);

        let mut artifacts = vec![(format!("{class_name}.swift"), layout.request_group.as_str())];
        if !records.is_empty() {
            artifacts.push((format!("{root_model}.swift"), layout.model_group.as_str()));
        }

        let mut changed = false;
        for (artifact, group) in &artifacts {
            let patch_request = PatchRequest {
                artifact: artifact.as_str(),
                group: *group,
                anchor: &layout.anchor,
                policy,
            };
            let patch = patch_manifest_with_rng(&manifest, &patch_request, rng)?;
            changed |= patch.changed;
            diagnostics.extend(patch.diagnostics);
            manifest = patch.document;
        }
        if changed {
            writes.push(PlannedWrite {
                path: manifest_path,
                content: manifest,
            });
        }
    }

    tracing::info!(
        class = %class_name,
        records = records.len(),
        writes = writes.len(),
        "planned generation"
    );

    Ok(GenerationPlan {
        request,
        class_name,
        class_source,
        skeleton,
        records,
        host_name: registry.host_name,
        path_name: registry.path_name,
        mode: invocation.mode,
        writes,
        diagnostics,
    })
}

/// Writes every planned file.
pub fn commit(plan: &GenerationPlan) -> Result<(), GeneratorError> {
    for write in &plan.writes {
        write_atomic(&write.path, &write.content)?;
        tracing::info!(path = %write.path.display(), "wrote file");
    }
    Ok(())
}

/// Plans a run, reports its diagnostics and commits it unless in print mode.
///
/// ## Returns
///
/// The plan, so callers can print [`GenerationPlan::print_source`] or report
/// what was written.
///
/// ## Errors
///
/// Returns an error if planning or writing fails. Planning errors leave the
/// project untouched.
pub fn generate(
    invocation: &Invocation,
    project_root: &Path,
    layout: &ProjectLayout,
) -> Result<GenerationPlan, GeneratorError> {
    let plan = plan(invocation, project_root, layout)?;
    diagnostics::emit(&plan.diagnostics);
    if plan.mode.writes_files() {
        commit(&plan)?;
    }
    Ok(plan)
}

fn read_project_file(path: &Path, what: &str) -> Result<String, GeneratorError> {
    if !path.is_file() {
        return Err(GeneratorError::ProjectFileNotFound {
            what: what.to_string(),
            path: path.display().to_string(),
        });
    }
    fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Writes content to a file atomically using a temp file + rename pattern.
///
/// This ensures that the file is either completely written or not modified
/// at all, preventing partial writes on crashes or errors.
///
/// ## Errors
///
/// Returns [`GeneratorError::WriteError`] if the parent directory can't be
/// created or the temp file can't be written or renamed.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    // <name>.tmp next to the target, e.g. `FooRequest.swift.tmp`.
    let mut temp_name = path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
