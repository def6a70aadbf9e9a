//! Build-graph resolution.
//!
//! # Module Structure
//!
//! ```text
//! graph/
//! ├── path       # project path normalization (relative/absolute forms)
//! ├── entry      # entry discovery (template glob -> EntryMap)
//! ├── classify   # per-file emission strategy + rule list
//! ├── output     # mode-dependent output strategy
//! └── mod.rs     # BuildGraph assembly (this file)
//! ```
//!
//! The assembled [`BuildGraph`] is the configuration the external bundler
//! consumes: the entry map (compilation units), the ordered asset-rule list
//! (per-file routing) and the output strategy (naming/caching/minification).
//! It is a freshly constructed, immutable value - rebuild-on-change discards
//! the previous graph and recomputes.

pub mod classify;
pub mod entry;
pub mod output;
pub mod path;

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::config::BundleConfig;

pub use classify::{AssetMarker, AssetRule, EmissionStrategy};
pub use entry::EntryMap;
pub use output::{BuildMode, OutputStrategy};

// ============================================================================
// Errors
// ============================================================================

/// Build-graph resolution errors.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Two templates normalize to the same logical entry name. Fatal.
    #[error(
        "ambiguous entry `{name}`: `{first}` and `{second}` resolve to the same logical name"
    )]
    EntryCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Directory scan failed. Transient during watch: the previous graph is
    /// retained and no partial graph is installed.
    #[error("failed to scan `{path}`")]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Template glob does not compile. Fatal.
    #[error("invalid template glob `{glob}`: {reason}")]
    Pattern { glob: String, reason: String },
}

impl GraphError {
    /// Whether a watch-triggered recompute may recover by keeping the
    /// previous graph. Collision and pattern errors never recover locally.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Scan { .. })
    }
}

// ============================================================================
// Build graph
// ============================================================================

/// Shared-chunk splitting rule: modules reachable from at least
/// `min_entries` entries are hoisted into one chunk named `name`.
#[derive(Debug, Clone, Serialize)]
pub struct VendorChunk {
    pub name: String,
    pub min_entries: u32,
}

/// The composed configuration consumed by the external bundler.
///
/// Never mutated in place: every recompute produces a new value.
#[derive(Debug, Serialize)]
pub struct BuildGraph {
    pub entries: EntryMap,
    pub rules: Vec<AssetRule>,
    pub output: OutputStrategy,
    pub vendor_chunk: VendorChunk,
}

/// Assemble the build graph: one discovery pass, one strategy composition,
/// the static rule list and the vendor-chunk rule. Pure composition - errors
/// from sub-components propagate unchanged.
pub fn assemble(config: &BundleConfig, mode: BuildMode) -> Result<BuildGraph, GraphError> {
    let entries = entry::discover(
        &entry::FsLister,
        &config.src_dir(),
        &config.entry.template_glob,
    )?;

    Ok(BuildGraph {
        entries,
        rules: classify::default_rules(&config.assets),
        output: OutputStrategy::compose(mode, config),
        vendor_chunk: VendorChunk {
            name: format!("{}/vendor", config.paths.script_root),
            min_entries: 2,
        },
    })
}

/// Watch-facing entry point: recompute the graph from the current
/// filesystem state. Same semantics as [`assemble`], fresh value per call.
#[inline]
pub fn recompute(config: &BundleConfig, mode: BuildMode) -> Result<BuildGraph, GraphError> {
    assemble(config, mode)
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn project(dir: &Path) -> BundleConfig {
        let mut config = BundleConfig::default();
        config.root = dir.to_path_buf();
        config.paths.public = "/static/site".to_string();
        config
    }

    /// Full scenario: partials excluded from the entry map, assets routed by
    /// size and marker.
    #[test]
    fn test_end_to_end_scenario() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("pages")).unwrap();
        fs::create_dir_all(src.join("assets")).unwrap();
        fs::write(src.join("pages/home.pug"), "extends _partial\n").unwrap();
        fs::write(src.join("pages/_partial.pug"), "block content\n").unwrap();
        fs::write(src.join("assets/logo.svg"), vec![b'x'; 4096]).unwrap();
        fs::write(src.join("assets/icon.svg"), vec![b'x'; 200]).unwrap();

        let config = project(dir.path());
        let graph = assemble(&config, BuildMode::Development).unwrap();

        // Partial excluded, nested name preserved
        assert_eq!(graph.entries.len(), 1);
        assert_eq!(
            graph.entries.get("pages/home"),
            Some(&src.join("pages/home.pug"))
        );

        // logo.svg (4KB, over threshold) is extracted; icon.svg (200B,
        // explicitly marked) inlines
        assert_eq!(
            classify::classify_file(&src.join("assets/logo.svg"), None, &config.assets).unwrap(),
            EmissionStrategy::ExtractedResource
        );
        assert_eq!(
            classify::classify_file(
                &src.join("assets/icon.svg"),
                Some(AssetMarker::Inline),
                &config.assets
            )
            .unwrap(),
            EmissionStrategy::Inline
        );
    }

    #[test]
    fn test_vendor_chunk_derived_from_script_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();

        let mut config = project(dir.path());
        config.paths.script_root = "scripts".to_string();

        let graph = assemble(&config, BuildMode::Production).unwrap();
        assert_eq!(graph.vendor_chunk.name, "scripts/vendor");
        assert_eq!(graph.vendor_chunk.min_entries, 2);
    }

    #[test]
    fn test_missing_source_root_is_transient_scan_error() {
        let dir = TempDir::new().unwrap();
        let config = project(dir.path()); // src/ never created

        let err = assemble(&config, BuildMode::Development).unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn test_recompute_reflects_filesystem_changes() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("index.pug"), "").unwrap();

        let config = project(dir.path());
        let first = recompute(&config, BuildMode::Development).unwrap();
        assert_eq!(first.entries.len(), 1);

        fs::write(src.join("about.pug"), "").unwrap();
        let second = recompute(&config, BuildMode::Development).unwrap();
        assert_eq!(second.entries.len(), 2);

        // The first graph is untouched by the recompute
        assert_eq!(first.entries.len(), 1);
    }

    #[test]
    fn test_graph_serializes_to_json() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("index.pug"), "").unwrap();

        let config = project(dir.path());
        let graph = assemble(&config, BuildMode::Production).unwrap();

        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["output"]["mode"], "production");
        assert_eq!(json["output"]["minify"], true);
        assert_eq!(json["vendor_chunk"]["min_entries"], 2);
        assert!(json["entries"]["index"].as_str().is_some());
        assert_eq!(json["rules"].as_array().unwrap().len(), 5);
    }
}
