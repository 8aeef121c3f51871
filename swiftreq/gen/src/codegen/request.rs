//! Request class generation.
//!
//! Produces the `@objcMembers` request class for an endpoint and a
//! commented-out usage skeleton showing how to fire it.

use swiftreq_define::{HttpMethod, RequestParam};

use crate::codegen::param_type;
use crate::sanitize::to_record_name;

/// Project-specific names the request class is written against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTemplate {
    /// Module imported at the top of the request file.
    pub import_module: String,
    /// Superclass of every generated request.
    pub base_class: String,
}

impl Default for RequestTemplate {
    fn default() -> Self {
        Self {
            import_module: "FalconFoundation".to_string(),
            base_class: "HJServiceRequestInfoBase".to_string(),
        }
    }
}

/// The request class name for a path, e.g. `/user/profile` -> `UserProfileRequest`.
///
/// Follows the record naming rules, so `/3d/render` becomes
/// `Type3dRenderRequest` and `/` falls back to `RequestRequest`.
pub fn request_class_name(path: &str) -> String {
    format!("{}Request", to_record_name(path))
}

/// The root model name for a path, e.g. `/user/profile` -> `UserProfileModel`.
pub fn model_name(path: &str) -> String {
    format!("{}Model", to_record_name(path))
}

/// Generates the request class.
///
/// Every parameter becomes an optional `var`; `host` and `path` resolve
/// through the registry symbols.
///
/// ## Examples
///
/// ```
/// use swiftreq_define::{ParamType, RequestParam, ScalarKind};
/// use swiftreq_gen::codegen::{RequestTemplate, build_request_class};
///
/// let params = vec![RequestParam::new("userId", ParamType::Scalar(ScalarKind::Integer))];
/// let source = build_request_class(
///     "UserProfileRequest",
///     "api",
///     "userProfile",
///     &params,
///     &RequestTemplate::default(),
/// );
/// assert!(source.contains("@objcMembers class UserProfileRequest: HJServiceRequestInfoBase {"));
/// assert!(source.contains("    var userId: Int?"));
/// assert!(source.contains("override var host: String { Host.api.rawValue }"));
/// ```
pub fn build_request_class(
    class_name: &str,
    host_name: &str,
    path_name: &str,
    params: &[RequestParam],
    template: &RequestTemplate,
) -> String {
    let base = &template.base_class;
    let mut lines = vec![
        format!("import {}", template.import_module),
        String::new(),
        format!("@objcMembers class {class_name}: {base} {{"),
    ];

    for param in params {
        lines.push(format!("    var {}: {}?", param.name, param_type(param.ty)));
    }

    lines.extend([
        String::new(),
        format!("    override var host: String {{ Host.{host_name}.rawValue }}"),
        String::new(),
        format!("    override var path: String {{ Path.{path_name}.rawValue }}"),
        String::new(),
        "    override var params: [AnyHashable : Any] {".to_string(),
        format!(
            "        return pep_dictionaryWithValues(forExceptKeys: {base}.pep_allPropertyKeys as! [String])"
        ),
        "    }".to_string(),
        "}".to_string(),
    ]);

    lines.join("\n")
}

/// Generates a commented usage skeleton for the request.
pub fn build_usage_skeleton(class_name: &str, params: &[RequestParam], method: HttpMethod) -> String {
    let call_line = match method {
        HttpMethod::Get => "    pep_networkTaskController.getRequestInfo(request) { _, err in",
        HttpMethod::Post => {
            "    pep_networkTaskController.postJSONRequestInfo(request) { [weak self] result, err in"
        }
    };

    let mut lines = vec![
        "// func request() {".to_string(),
        format!("//     let request = {class_name}()"),
    ];
    for param in params {
        lines.push(format!("//     request.{0} = <#{0}#>", param.name));
    }
    lines.extend([
        format!("//{call_line}"),
        "//         if err != nil {".to_string(),
        "//             DDLogError(\" error \\(String(describing: err?.localizedDescription))\")"
            .to_string(),
        "//         }".to_string(),
        "//     }".to_string(),
        "// }".to_string(),
    ]);

    lines.join("\n")
}

/// The full request file: class, blank line, skeleton.
pub fn build_request_file(class_source: &str, skeleton: &str) -> String {
    format!("{class_source}\n\n{skeleton}\n")
}
