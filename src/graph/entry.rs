//! Entry point discovery.
//!
//! Scans the source root for template files matching the configured glob and
//! derives the logical entry name for each match: the template's path
//! relative to the source root, extension stripped, directories preserved.
//! Nested templates keep their directory prefix so the emitted bundle
//! mirrors the source layout.
//!
//! Discovery is re-run from scratch on every rebuild trigger; nothing is
//! cached between calls except the glob pattern itself.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::GraphError;

// ============================================================================
// File listing (impure boundary)
// ============================================================================

/// Capability interface over the directory scan, so matching and naming can
/// be tested with an in-memory fake.
pub trait FileLister {
    /// List all files under `root`, as paths relative to `root`.
    fn list(&self, root: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Real filesystem lister.
pub struct FsLister;

impl FileLister for FsLister {
    fn list(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        walk(root, root, &mut files)?;
        Ok(files)
    }
}

/// Recursive helper collecting files relative to `base`.
fn walk(dir: &Path, base: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, base, out)?;
        } else {
            let rel = path.strip_prefix(base).unwrap_or(&path);
            out.push(rel.to_path_buf());
        }
    }
    Ok(())
}

// ============================================================================
// Glob matching
// ============================================================================

/// Compile a template glob into an anchored regex.
///
/// Supported syntax (matched against `/`-separated relative paths):
/// - `**/` - zero or more directory levels
/// - `*`   - any run of characters within one segment
/// - `?`   - one character within a segment
/// - `[...]` / `[^...]` - character class, never crossing `/`
///
/// The conventional default `**/[^_]*.pug` matches templates at any depth
/// while excluding underscore-prefixed partials.
pub fn glob_to_regex(glob: &str) -> Result<Regex, GraphError> {
    let mut pattern = String::from("^");
    let mut chars = glob.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        chars.next();
                        // `**/` matches zero or more whole directories
                        pattern.push_str("(?:[^/]+/)*");
                    } else {
                        pattern.push_str(".*");
                    }
                } else {
                    pattern.push_str("[^/]*");
                }
            }
            '?' => pattern.push_str("[^/]"),
            '[' => {
                pattern.push('[');
                if chars.peek() == Some(&'^') {
                    chars.next();
                    // Negated classes must also never match a separator
                    pattern.push_str("^/");
                }
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == ']' {
                        closed = true;
                        break;
                    }
                    if matches!(inner, '\\' | '^') {
                        pattern.push('\\');
                    }
                    pattern.push(inner);
                }
                if !closed {
                    return Err(GraphError::Pattern {
                        glob: glob.to_string(),
                        reason: "unterminated character class".to_string(),
                    });
                }
                pattern.push(']');
            }
            '.' | '+' | '(' | ')' | '{' | '}' | '|' | '^' | '$' | '\\' => {
                pattern.push('\\');
                pattern.push(c);
            }
            _ => pattern.push(c),
        }
    }
    pattern.push('$');

    Regex::new(&pattern).map_err(|err| GraphError::Pattern {
        glob: glob.to_string(),
        reason: err.to_string(),
    })
}

// ============================================================================
// Entry map
// ============================================================================

/// Mapping from logical entry name to absolute template source path.
///
/// Keys are unique: two templates normalizing to the same logical name are
/// a fatal configuration error.
#[derive(Debug, Default, Clone, Serialize)]
pub struct EntryMap(FxHashMap<String, PathBuf>);

impl EntryMap {
    /// Insert an entry, failing on a logical name collision.
    pub fn insert(&mut self, name: String, source: PathBuf) -> Result<(), GraphError> {
        if let Some(first) = self.0.get(&name) {
            return Err(GraphError::EntryCollision {
                first: first.clone(),
                second: source,
                name,
            });
        }
        self.0.insert(name, source);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PathBuf> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PathBuf)> {
        self.0.iter()
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// Discover entry points under `source_root` matching `template_glob`.
///
/// Reflects the current filesystem state on every call. Scan I/O failures
/// surface as [`GraphError::Scan`] (transient during watch; the previous
/// graph is retained by the caller).
pub fn discover(
    lister: &dyn FileLister,
    source_root: &Path,
    template_glob: &str,
) -> Result<EntryMap, GraphError> {
    let pattern = glob_to_regex(template_glob)?;

    let files = lister.list(source_root).map_err(|source| GraphError::Scan {
        path: source_root.to_path_buf(),
        source,
    })?;

    let mut entries = EntryMap::default();
    for rel in files {
        let slash = rel_to_slash(&rel);
        if !pattern.is_match(&slash) {
            continue;
        }
        entries.insert(strip_extension(&slash), source_root.join(&rel))?;
    }
    Ok(entries)
}

/// Render a relative path with `/` separators regardless of platform.
fn rel_to_slash(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Strip the extension from the final segment of a `/`-separated path.
///
/// A leading dot in the final segment is a hidden file, not an extension.
fn strip_extension(path: &str) -> String {
    let stem_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[stem_start..].rfind('.') {
        Some(0) | None => path.to_string(),
        Some(dot) => path[..stem_start + dot].to_string(),
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// In-memory lister for testing matching/naming without a filesystem.
    struct FakeLister(Vec<&'static str>);

    impl FileLister for FakeLister {
        fn list(&self, _root: &Path) -> io::Result<Vec<PathBuf>> {
            Ok(self.0.iter().map(PathBuf::from).collect())
        }
    }

    /// Lister that always fails, for transient-error propagation.
    struct FailingLister;

    impl FileLister for FailingLister {
        fn list(&self, _root: &Path) -> io::Result<Vec<PathBuf>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    const GLOB: &str = "**/[^_]*.pug";

    #[test]
    fn test_glob_matches_nested_and_top_level() {
        let re = glob_to_regex(GLOB).unwrap();
        assert!(re.is_match("index.pug"));
        assert!(re.is_match("pages/home.pug"));
        assert!(re.is_match("pages/blog/post.pug"));
    }

    #[test]
    fn test_glob_excludes_partials_and_other_extensions() {
        let re = glob_to_regex(GLOB).unwrap();
        assert!(!re.is_match("_layout.pug"));
        assert!(!re.is_match("pages/_partial.pug"));
        assert!(!re.is_match("pages/home.html"));
        assert!(!re.is_match("script.pug.js"));
    }

    #[test]
    fn test_glob_negated_class_never_crosses_separator() {
        // Without the `/` exclusion, `[^_]*` could swallow directory levels
        let re = glob_to_regex("[^_]*.pug").unwrap();
        assert!(re.is_match("home.pug"));
        assert!(!re.is_match("pages/home.pug"));
    }

    #[test]
    fn test_glob_escapes_regex_metacharacters() {
        let re = glob_to_regex("**/*.pug").unwrap();
        assert!(re.is_match("a/b.pug"));
        assert!(!re.is_match("a/bxpug")); // dot is literal
    }

    #[test]
    fn test_glob_invalid_pattern() {
        // Unclosed character class is rejected
        assert!(matches!(
            glob_to_regex("[a-"),
            Err(GraphError::Pattern { .. })
        ));
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("pages/home.pug"), "pages/home");
        assert_eq!(strip_extension("home.pug"), "home");
        assert_eq!(strip_extension("pages/README"), "pages/README");
        assert_eq!(strip_extension("pages/.hidden"), "pages/.hidden");
        assert_eq!(strip_extension("a.b/c.d.pug"), "a.b/c.d");
    }

    #[test]
    fn test_discover_preserves_directory_prefix() {
        let lister = FakeLister(vec!["index.pug", "pages/home.pug", "pages/blog/post.pug"]);
        let entries = discover(&lister, Path::new("/proj/src"), GLOB).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries.get("pages/home"),
            Some(&PathBuf::from("/proj/src/pages/home.pug"))
        );
        assert_eq!(
            entries.get("pages/blog/post"),
            Some(&PathBuf::from("/proj/src/pages/blog/post.pug"))
        );
    }

    #[test]
    fn test_discover_excludes_partials() {
        let lister = FakeLister(vec!["pages/home.pug", "pages/_partial.pug", "_base.pug"]);
        let entries = discover(&lister, Path::new("/src"), GLOB).unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries.get("pages/home").is_some());
    }

    #[test]
    fn test_discover_same_stem_different_matched_extension_collides() {
        // A glob matching both extensions: .pug and .jade strip to the same
        // logical name, which is a fatal configuration error
        let lister = FakeLister(vec!["a/index.pug", "a/index.jade"]);
        let err = discover(&lister, Path::new("/src"), "**/[^_]*.*").unwrap_err();
        match err {
            GraphError::EntryCollision { name, first, second } => {
                assert_eq!(name, "a/index");
                assert_eq!(first, PathBuf::from("/src/a/index.pug"));
                assert_eq!(second, PathBuf::from("/src/a/index.jade"));
            }
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn test_discover_different_extension_no_collision() {
        // a/index.pug and a/index.html: only .pug matches the glob, so the
        // .html file is not an entry and cannot collide
        let lister = FakeLister(vec!["a/index.pug", "a/index.html"]);
        let entries = discover(&lister, Path::new("/src"), GLOB).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_discover_scan_error_is_transient() {
        let err = discover(&FailingLister, Path::new("/src"), GLOB).unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn test_fs_lister_walks_recursively() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pages/blog")).unwrap();
        fs::write(dir.path().join("index.pug"), "").unwrap();
        fs::write(dir.path().join("pages/home.pug"), "").unwrap();
        fs::write(dir.path().join("pages/blog/post.pug"), "").unwrap();

        let mut files = FsLister.list(dir.path()).unwrap();
        files.sort();
        assert_eq!(
            files,
            vec![
                PathBuf::from("index.pug"),
                PathBuf::from("pages/blog/post.pug"),
                PathBuf::from("pages/home.pug"),
            ]
        );
    }

    #[test]
    fn test_fs_lister_missing_root_errors() {
        let dir = TempDir::new().unwrap();
        assert!(FsLister.list(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_discover_reflects_current_state() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("one.pug"), "").unwrap();

        let entries = discover(&FsLister, dir.path(), GLOB).unwrap();
        assert_eq!(entries.len(), 1);

        // No caching across calls: a new file shows up on the next scan
        fs::write(dir.path().join("two.pug"), "").unwrap();
        let entries = discover(&FsLister, dir.path(), GLOB).unwrap();
        assert_eq!(entries.len(), 2);
    }
}
