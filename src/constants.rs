//! Common constants used throughout the Stencil application.

/// Supported context file names, tried in order.
pub const CONTEXT_FILES: [&str; 3] = ["project.json", "project.yml", "project.yaml"];

/// Directory under the template root holding the files to render.
pub const TEMPLATE_DIR: &str = "template";

/// File written next to a generated project describing where it came from.
pub const METADATA_FILE: &str = "__metadata.json";

/// Default length of passwords produced by the `password()` helper.
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Default format used by the `now()` helper.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
