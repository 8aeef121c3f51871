//! Library-level generation runs against a throwaway project.
//!
//! Each test copies the fixture `HostPath.swift` and `project.pbxproj` into
//! a temp directory laid out like the default project.

use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use swiftreq_define::{HttpMethod, OutputMode};
use swiftreq_gen::config::ProjectLayout;
use swiftreq_gen::diagnostics::Diagnostic;
use swiftreq_gen::errors::GeneratorError;
use swiftreq_gen::output::{Invocation, ResponseSource, commit, generate, plan_with_rng};
use tempfile::TempDir;

const HOST_PATH: &str = include_str!("fixtures/HostPath.swift");
const MANIFEST: &str = include_str!("fixtures/project.pbxproj");

fn project() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let layout = ProjectLayout::default();
    for (rel, content) in [
        (&layout.registry_path, HOST_PATH),
        (&layout.manifest_path, MANIFEST),
    ] {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn read(root: &Path, rel: &Path) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

fn profile_invocation(mode: OutputMode) -> Invocation {
    Invocation {
        method: HttpMethod::Get,
        path: "/user/detail".to_string(),
        summary: "Fetch user detail".to_string(),
        server: "api.example.com".to_string(),
        params: Some("userId:int,name:string".to_string()),
        response: ResponseSource::Inline(
            r#"{"data": {"id": 1, "tags": ["a","b"], "user": {"name": "x"}}}"#.to_string(),
        ),
        mode,
        allow_missing_group: false,
    }
}

#[test]
fn full_run_writes_every_artifact() {
    let dir = project();
    let layout = ProjectLayout::default();

    let plan = generate(&profile_invocation(OutputMode::Full), dir.path(), &layout).unwrap();
    assert!(plan.diagnostics.is_empty());

    let request = read(dir.path(), &layout.request_dir.join("UserDetailRequest.swift"));
    assert!(request.contains("@objcMembers class UserDetailRequest: HJServiceRequestInfoBase {"));
    assert!(request.contains("    var userId: Int?\n    var name: String?\n"));
    assert!(request.contains("override var host: String { Host.api.rawValue }"));
    assert!(request.contains("override var path: String { Path.userDetail.rawValue }"));
    assert!(request.contains("//     request.userId = <#userId#>"));
    assert!(request.contains("//     request.name = <#name#>"));

    let model = read(dir.path(), &layout.model_dir.join("UserDetailModel.swift"));
    assert_eq!(
        model,
        "import Foundation\n\
         \n\
         struct UserDetailModelUser: Codable {\n\
         \x20   let name: String?\n\
         }\n\
         \n\
         struct UserDetailModel: Codable {\n\
         \x20   let id: Int?\n\
         \x20   let tags: [String]?\n\
         \x20   let user: UserDetailModelUser?\n\
         }\n"
    );

    let registry = read(dir.path(), &layout.registry_path);
    assert!(registry.contains(
        "    /// Fetch user detail\n    static let userDetail = Path(rawValue: \"/user/detail\")\n}"
    ));

    let manifest = read(dir.path(), &layout.manifest_path);
    assert!(manifest.contains("/* UserDetailRequest.swift in Sources */ = {isa = PBXBuildFile;"));
    assert!(manifest.contains("/* UserDetailModel.swift */ = {isa = PBXFileReference;"));
}

#[test]
fn second_run_leaves_project_files_identical() {
    let dir = project();
    let layout = ProjectLayout::default();
    let invocation = profile_invocation(OutputMode::Full);

    generate(&invocation, dir.path(), &layout).unwrap();
    let registry = read(dir.path(), &layout.registry_path);
    let manifest = read(dir.path(), &layout.manifest_path);

    let plan = generate(&invocation, dir.path(), &layout).unwrap();

    assert_eq!(plan.path_name, "userDetail");
    assert_eq!(plan.writes.len(), 2, "only request and model files are rewritten");
    assert_eq!(read(dir.path(), &layout.registry_path), registry);
    assert_eq!(read(dir.path(), &layout.manifest_path), manifest);
}

#[test]
fn new_domain_is_normalized_and_bound() {
    let dir = project();
    let layout = ProjectLayout::default();
    let mut invocation = profile_invocation(OutputMode::Files);
    invocation.server = "foo.bar.example.com".to_string();

    let plan = generate(&invocation, dir.path(), &layout).unwrap();

    assert_eq!(plan.host_name, "foo");
    let registry = read(dir.path(), &layout.registry_path);
    assert!(registry.contains("    static let foo = Host(rawValue: \"foo.example.com\")\n}"));
    assert_eq!(read(dir.path(), &layout.manifest_path), MANIFEST);
}

#[test]
fn missing_group_aborts_without_writing() {
    let dir = project();
    let layout = ProjectLayout {
        model_group: "Entities".to_string(),
        ..ProjectLayout::default()
    };

    let err = generate(&profile_invocation(OutputMode::Full), dir.path(), &layout).unwrap_err();

    assert!(matches!(err, GeneratorError::MissingGroup { ref group, .. } if group == "Entities"));
    assert_eq!(read(dir.path(), &layout.registry_path), HOST_PATH);
    assert_eq!(read(dir.path(), &layout.manifest_path), MANIFEST);
    assert!(!dir.path().join(&layout.request_dir).exists());
}

#[test]
fn missing_group_can_degrade_to_warning() {
    let dir = project();
    let layout = ProjectLayout {
        model_group: "Entities".to_string(),
        ..ProjectLayout::default()
    };
    let mut invocation = profile_invocation(OutputMode::Full);
    invocation.allow_missing_group = true;

    let mut rng = StdRng::seed_from_u64(3);
    let plan = plan_with_rng(&invocation, dir.path(), &layout, &mut rng).unwrap();
    commit(&plan).unwrap();

    assert_eq!(
        plan.diagnostics,
        vec![Diagnostic::GroupSkipped {
            group: "Entities".to_string(),
            file: "UserDetailModel.swift".to_string(),
        }]
    );
    let manifest = read(dir.path(), &layout.manifest_path);
    // Build file, file reference and compile source; no group member.
    assert_eq!(manifest.matches("UserDetailModel.swift").count(), 5);
    assert_eq!(manifest.matches("UserDetailRequest.swift").count(), 6);
}

#[test]
fn null_payload_generates_request_only() {
    let dir = project();
    let layout = ProjectLayout::default();
    let mut invocation = profile_invocation(OutputMode::Full);
    invocation.response = ResponseSource::Inline(r#"{"data": null}"#.to_string());

    let plan = generate(&invocation, dir.path(), &layout).unwrap();

    assert!(plan.records.is_empty());
    assert!(matches!(plan.diagnostics[..], [Diagnostic::NoData { .. }]));
    assert!(!dir.path().join(&layout.model_dir).exists());
    let manifest = read(dir.path(), &layout.manifest_path);
    assert!(!manifest.contains("UserDetailModel.swift"));
}

#[test]
fn config_file_changes_layout() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("swiftreq.toml"),
        "registry_path = \"Sources/HostPath.swift\"\n\
         request_dir = \"Sources/Requests\"\n\
         base_class = \"BaseRequest\"\n\
         import_module = \"Networking\"\n",
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("Sources")).unwrap();
    fs::write(dir.path().join("Sources/HostPath.swift"), HOST_PATH).unwrap();

    let layout = ProjectLayout::load(dir.path()).unwrap();
    let mut invocation = profile_invocation(OutputMode::Files);
    invocation.response = ResponseSource::None;
    generate(&invocation, dir.path(), &layout).unwrap();

    let request = fs::read_to_string(dir.path().join("Sources/Requests/UserDetailRequest.swift"))
        .unwrap();
    assert!(request.starts_with("import Networking\n\n@objcMembers class UserDetailRequest: BaseRequest {"));
}
