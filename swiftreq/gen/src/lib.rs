//! swiftreq code generator library.
//!
//! Generates Swift networking boilerplate for one endpoint and registers it
//! in a hand-maintained iOS project:
//!
//! - A `<Name>Request.swift` class with typed parameters and a commented
//!   usage skeleton
//! - A `<Name>Model.swift` file of `Codable` structs inferred from a sample
//!   response (or an explicit field list)
//! - Host and path bindings in `HostPath.swift`
//! - Build-file, file-reference, group and compile-source records in
//!   `project.pbxproj`
//!
//! Re-running with the same inputs changes nothing: existing bindings and
//! manifest records are found and reused.
//!
//! ## Modules
//!
//! - [`sanitize`] - Identifier sanitizing and Swift naming rules
//! - [`names`] - Run-scoped record name allocation
//! - [`inference`] - JSON payload to record definitions
//! - [`annotations`] - `name:type` lists for parameters and response fields
//! - [`document`] - Line-preserving documents with planned insertions
//! - [`registry`] - `HostPath.swift` binding merges
//! - [`manifest`] - `project.pbxproj` patching
//! - [`codegen`] - Swift source rendering
//! - [`config`] - Project layout and `swiftreq.toml`
//! - [`output`] - Planning, diagnostics and atomic writes
//! - [`diagnostics`] - Non-fatal findings
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use swiftreq_define::{HttpMethod, OutputMode};
//! use swiftreq_gen::config::ProjectLayout;
//! use swiftreq_gen::output::{Invocation, ResponseSource, generate};
//!
//! let invocation = Invocation {
//!     method: HttpMethod::Get,
//!     path: "/user/profile".to_string(),
//!     summary: "Fetch the user profile".to_string(),
//!     server: "api.example.com".to_string(),
//!     params: Some("userId:int".to_string()),
//!     response: ResponseSource::Inline(r#"{"data": {"name": "x"}}"#.to_string()),
//!     mode: OutputMode::Full,
//!     allow_missing_group: false,
//! };
//! let root = Path::new(".");
//! let layout = ProjectLayout::load(root).unwrap();
//! let plan = generate(&invocation, root, &layout).unwrap();
//! println!("{} files written", plan.writes.len());
//! ```

pub mod annotations;
pub mod codegen;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod errors;
pub mod inference;
pub mod manifest;
pub mod names;
pub mod output;
pub mod registry;
pub mod sanitize;
