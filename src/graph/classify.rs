//! Asset classification.
//!
//! Decides how an individual asset file is emitted: embedded into its
//! referencing document (`inline`), written as a standalone hashed file
//! (`extracted-resource`), or passed through as raw source text. The
//! decision is a pure function of the file's extension, its size, and an
//! optional explicit marker attached by the referencing code.
//!
//! Decision order (first match wins):
//! 1. resource-family extension (fonts, generic binaries) - always extracted,
//!    markers notwithstanding
//! 2. explicit source-text marker
//! 3. explicit inline marker
//! 4. image families - inline at or below the configured byte threshold
//! 5. everything else - extracted

use std::io;
use std::path::Path;

use serde::Serialize;

use crate::config::AssetsConfig;

// ============================================================================
// Strategy and markers
// ============================================================================

/// How an asset is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmissionStrategy {
    /// Embed the file's content into the referencing document.
    Inline,
    /// Emit as a standalone output file referenced by a generated path.
    ExtractedResource,
    /// Include the file's raw text in place (e.g. inlined SVG markup).
    SourceText,
}

impl EmissionStrategy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::ExtractedResource => "extracted-resource",
            Self::SourceText => "source-text",
        }
    }
}

/// Explicit per-reference marker overriding extension defaults.
///
/// Typed counterpart of the ad hoc `?inline` / `?include` query markers
/// found in bundler configs; never parsed out of free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetMarker {
    Inline,
    SourceText,
}

impl AssetMarker {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::SourceText => "source-text",
        }
    }

    /// Resolve a marker list to a single marker: the first listed wins.
    ///
    /// Conflicting markers on one file are not expected; when they occur a
    /// warning is surfaced instead of aborting.
    pub fn resolve(markers: &[AssetMarker]) -> Option<AssetMarker> {
        let first = markers.first().copied()?;
        if markers.iter().any(|m| *m != first) {
            crate::log!(
                "warning";
                "conflicting asset markers, first listed wins: {}",
                first.label()
            );
        }
        Some(first)
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Classify an asset from its path, size and optional marker.
///
/// Pure and deterministic; reads nothing.
pub fn classify(
    path: &Path,
    size: u64,
    marker: Option<AssetMarker>,
    assets: &AssetsConfig,
) -> EmissionStrategy {
    let ext = extension_lower(path);

    // Fonts and generic binary resources are always extracted, even when a
    // marker requests otherwise
    if assets.is_resource(&ext) {
        return EmissionStrategy::ExtractedResource;
    }

    match marker {
        Some(AssetMarker::SourceText) => return EmissionStrategy::SourceText,
        Some(AssetMarker::Inline) => return EmissionStrategy::Inline,
        None => {}
    }

    if assets.is_image(&ext) {
        // Inclusive boundary: a file exactly at the threshold inlines
        return if size <= assets.inline_threshold {
            EmissionStrategy::Inline
        } else {
            EmissionStrategy::ExtractedResource
        };
    }

    EmissionStrategy::ExtractedResource
}

/// Classify a file on disk. The only I/O performed is reading its size.
pub fn classify_file(
    path: &Path,
    marker: Option<AssetMarker>,
    assets: &AssetsConfig,
) -> io::Result<EmissionStrategy> {
    let size = path.metadata()?.len();
    Ok(classify(path, size, marker, assets))
}

fn extension_lower(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

// ============================================================================
// Rule list (bundler routing view)
// ============================================================================

/// A file-pattern matcher paired with an emission strategy.
///
/// The ordered rule list is the external bundler's per-file routing table;
/// it mirrors [`classify`] exactly, so resolution order is significant.
#[derive(Debug, Clone, Serialize)]
pub struct AssetRule {
    #[serde(rename = "match")]
    pub matcher: RuleMatcher,
    pub strategy: EmissionStrategy,
    /// Inclusive byte threshold; only set on size-gated image rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_inline_size: Option<u64>,
}

/// What a rule matches on.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleMatcher {
    /// Extension family (lowercase, no dot).
    Extensions(Vec<String>),
    /// Explicit per-reference marker.
    Marker(AssetMarker),
    /// Fallback, matches anything.
    Any,
}

/// Build the ordered rule list from the configured extension families.
pub fn default_rules(assets: &AssetsConfig) -> Vec<AssetRule> {
    let images: Vec<String> = assets
        .raster_extensions
        .iter()
        .chain(assets.vector_extensions.iter())
        .cloned()
        .collect();

    vec![
        AssetRule {
            matcher: RuleMatcher::Extensions(assets.resource_extensions.clone()),
            strategy: EmissionStrategy::ExtractedResource,
            max_inline_size: None,
        },
        AssetRule {
            matcher: RuleMatcher::Marker(AssetMarker::SourceText),
            strategy: EmissionStrategy::SourceText,
            max_inline_size: None,
        },
        AssetRule {
            matcher: RuleMatcher::Marker(AssetMarker::Inline),
            strategy: EmissionStrategy::Inline,
            max_inline_size: None,
        },
        AssetRule {
            matcher: RuleMatcher::Extensions(images),
            strategy: EmissionStrategy::Inline,
            max_inline_size: Some(assets.inline_threshold),
        },
        AssetRule {
            matcher: RuleMatcher::Any,
            strategy: EmissionStrategy::ExtractedResource,
            max_inline_size: None,
        },
    ]
}

// ============================================================================
// tests
// ============================================================================
