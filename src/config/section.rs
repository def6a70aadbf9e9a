//! Configuration section definitions for `packplan.toml`.
//!
//! | Section    | Purpose                                            |
//! |------------|----------------------------------------------------|
//! | `[paths]`  | Project roots (src, dist, public, script, style)   |
//! | `[entry]`  | Entry template discovery                           |
//! | `[assets]` | Extension families and the inline size threshold   |
//! | `[output]` | Output base filename                               |

use serde::{Deserialize, Serialize};

use super::ConfigDiagnostics;
use crate::graph::entry::glob_to_regex;

// ============================================================================
// [paths]
// ============================================================================

/// Named project roots. `src`, `dist` and `public` are required; missing
/// fields are a fatal startup error.
///
/// Stored consistently per role after load: `public` in absolute form (it is
/// a URL base), everything else project-relative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Source root, relative to the project root.
    pub src: String,

    /// Distribution root the bundle is emitted into.
    pub dist: String,

    /// Absolute URL prefix under which assets are served in production.
    pub public: String,

    /// Sub-root for emitted scripts.
    #[serde(default = "default_script_root")]
    pub script_root: String,

    /// Sub-root for emitted styles.
    #[serde(default = "default_style_root")]
    pub style_root: String,
}

fn default_script_root() -> String {
    "js".to_string()
}

fn default_style_root() -> String {
    "css".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            src: "src".to_string(),
            dist: "dist".to_string(),
            public: "/".to_string(),
            script_root: default_script_root(),
            style_root: default_style_root(),
        }
    }
}

impl PathsConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.src.is_empty() {
            diag.error("paths.src", "must not be empty");
        }
        if self.dist.is_empty() {
            diag.error("paths.dist", "must not be empty");
        }
        if self.src == self.dist {
            diag.error("paths.dist", "must differ from paths.src");
        }
    }
}

// ============================================================================
// [entry]
// ============================================================================

/// Entry template discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    /// Glob matched against paths relative to the source root. Files whose
    /// name begins with an underscore are includable partials by convention.
    pub template_glob: String,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            template_glob: "**/[^_]*.pug".to_string(),
        }
    }
}

impl EntryConfig {
    pub fn validate(&self, src_exists: bool, diag: &mut ConfigDiagnostics) {
        if self.template_glob.is_empty() {
            diag.error("entry.template_glob", "must not be empty");
            return;
        }
        if let Err(err) = glob_to_regex(&self.template_glob) {
            diag.error("entry.template_glob", err.to_string());
        }
        if !src_exists {
            diag.error_with_hint(
                "entry.template_glob",
                "glob references no existing source root",
                "create the paths.src directory or point it elsewhere",
            );
        }
    }
}

// ============================================================================
// [assets]
// ============================================================================

/// Extension families driving asset classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Fonts and generic binary resources: always extracted.
    pub resource_extensions: Vec<String>,

    /// Raster image family: size-gated inlining.
    pub raster_extensions: Vec<String>,

    /// Vector image family: size-gated inlining.
    pub vector_extensions: Vec<String>,

    /// Inclusive byte threshold below which images inline. Small by design:
    /// inlined data keeps the emitted document compact only for tiny files.
    pub inline_threshold: u64,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            resource_extensions: ["woff", "woff2", "ttf", "otf", "eot"]
                .map(String::from)
                .to_vec(),
            raster_extensions: ["png", "jpg", "jpeg", "gif"].map(String::from).to_vec(),
            vector_extensions: ["svg"].map(String::from).to_vec(),
            inline_threshold: 1024 / 4,
        }
    }
}

impl AssetsConfig {
    pub fn is_resource(&self, ext: &str) -> bool {
        self.resource_extensions.iter().any(|e| e == ext)
    }

    pub fn is_image(&self, ext: &str) -> bool {
        self.raster_extensions.iter().any(|e| e == ext)
            || self.vector_extensions.iter().any(|e| e == ext)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.inline_threshold == 0 {
            diag.warn(
                "assets.inline_threshold",
                "0 disables inlining entirely".to_string(),
            );
        }

        // An extension in both the resource and an image family would make
        // rule order ambiguous
        for ext in &self.resource_extensions {
            if self.is_image(ext) {
                diag.error(
                    "assets.resource_extensions",
                    format!("`{ext}` is also listed in an image family"),
                );
            }
        }
    }
}

// ============================================================================
// [output]
// ============================================================================

/// Output naming settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base filename stem shared by script and style outputs.
    pub filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: "[name]".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.filename.is_empty() {
            diag.error("output.filename", "must not be empty");
        }
    }
}

// ============================================================================
// tests
// ============================================================================
