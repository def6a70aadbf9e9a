//! Project path normalization.
//!
//! Configured roots are plain `/`-separated strings (they describe the
//! project layout, not host filesystem locations). This module keeps them in
//! a canonical form:
//! - `to_relative` - project-relative form (no leading separator)
//! - `to_absolute` - absolute form (single leading separator)
//!
//! Both are idempotent and accept any string; there is no failure mode.

use std::path::{Path, PathBuf};

/// Canonicalize a path string: collapse redundant separators, resolve `.`
/// and empty segments, strip trailing separators.
///
/// `..` segments are kept as-is; a path that escapes the project root is
/// accepted unchanged (no sandboxing here).
///
/// # Examples
/// ```ignore
/// assert_eq!(normalize("src//pages/./"), "src/pages");
/// assert_eq!(normalize("/assets/"), "/assets");
/// assert_eq!(normalize(""), "");
/// ```
#[inline]
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let joined = path
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect::<Vec<_>>()
        .join("/");

    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Convert a path string to project-relative form.
///
/// Strips the leading root marker if present; the empty string normalizes
/// to the project root (empty relative path).
///
/// # Examples
/// ```ignore
/// assert_eq!(to_relative("/src/js/"), "src/js");
/// assert_eq!(to_relative("src/js"), "src/js");
/// ```
#[inline]
pub fn to_relative(path: &str) -> String {
    let normalized = normalize(path);
    normalized
        .strip_prefix('/')
        .map_or(normalized.clone(), str::to_string)
}

/// Convert a path string to absolute form.
///
/// Already-absolute paths are returned unchanged (after canonicalization);
/// relative paths get the root separator prefixed. The empty string maps to
/// the root path `/`.
///
/// # Examples
/// ```ignore
/// assert_eq!(to_absolute("assets/img"), "/assets/img");
/// assert_eq!(to_absolute("/assets/img/"), "/assets/img");
/// ```
#[inline]
pub fn to_absolute(path: &str) -> String {
    let normalized = normalize(path);
    if normalized.starts_with('/') {
        normalized
    } else {
        format!("/{normalized}")
    }
}

/// Compute the output location for an extracted asset, preserving the
/// source file's directory relative to the source root.
///
/// The external bundler calls this when it needs to know where an extracted
/// resource lands: the asset keeps its sub-directory, its name is replaced
/// by the configured filename stem, its extension is kept.
///
/// ```text
/// src/pages/about/photo.png + stem "[name]" -> pages/about/[name].png
/// ```
pub fn asset_output_path(source: &Path, src_root: &Path, filename_stem: &str) -> PathBuf {
    let rel_dir = source
        .parent()
        .and_then(|dir| dir.strip_prefix(src_root).ok())
        .unwrap_or_else(|| Path::new(""));

    let name = match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{filename_stem}.{ext}"),
        None => filename_stem.to_string(),
    };

    rel_dir.join(name)
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_separators() {
        assert_eq!(normalize("src//pages///home"), "src/pages/home");
        assert_eq!(normalize("src/./pages/."), "src/pages");
        assert_eq!(normalize("src/pages/"), "src/pages");
    }

    #[test]
    fn test_normalize_preserves_parent_segments() {
        // No sandboxing: `..` passes through untouched
        assert_eq!(normalize("../outside/src"), "../outside/src");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("/"), "/");
    }

    #[test]
    fn test_to_relative() {
        assert_eq!(to_relative("/src/js/"), "src/js");
        assert_eq!(to_relative("src/js"), "src/js");
        assert_eq!(to_relative(""), "");
        assert_eq!(to_relative("/"), "");
    }

    #[test]
    fn test_to_absolute() {
        assert_eq!(to_absolute("assets/img"), "/assets/img");
        assert_eq!(to_absolute("/assets/img/"), "/assets/img");
        assert_eq!(to_absolute(""), "/");
        assert_eq!(to_absolute("/"), "/");
    }

    #[test]
    fn test_idempotence() {
        for input in ["", "/", "a//b/", "/a/b", "../x", "a/./b"] {
            assert_eq!(to_relative(&to_relative(input)), to_relative(input));
            assert_eq!(to_absolute(&to_absolute(input)), to_absolute(input));
        }
    }

    #[test]
    fn test_round_trip_equivalence() {
        for input in ["a/b", "/a/b", "a//b/./c/", ""] {
            assert_eq!(to_absolute(&to_relative(input)), to_absolute(input));
        }
    }

    #[test]
    fn test_asset_output_path_preserves_directory() {
        let out = asset_output_path(
            Path::new("/proj/src/pages/about/photo.png"),
            Path::new("/proj/src"),
            "[name]",
        );
        assert_eq!(out, PathBuf::from("pages/about/[name].png"));
    }

    #[test]
    fn test_asset_output_path_top_level() {
        let out = asset_output_path(
            Path::new("/proj/src/favicon.ico"),
            Path::new("/proj/src"),
            "[name]",
        );
        assert_eq!(out, PathBuf::from("[name].ico"));
    }

    #[test]
    fn test_asset_output_path_no_extension() {
        let out = asset_output_path(Path::new("/proj/src/data/CNAME"), Path::new("/proj/src"), "x");
        assert_eq!(out, PathBuf::from("data/x"));
    }
}
