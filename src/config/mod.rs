//! Project configuration management for `packplan.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section    # [paths], [entry], [assets], [output] definitions
//! ├── error      # ConfigError + collected diagnostics
//! ├── handle     # Global config handle (arc-swap)
//! └── mod.rs     # BundleConfig (this file)
//! ```

mod error;
mod handle;
mod section;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use handle::{cfg, init_config, reload_config};
pub use section::{AssetsConfig, EntryConfig, OutputConfig, PathsConfig};

use crate::{cli::Cli, graph::path, log};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing packplan.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Named project roots (required section)
    pub paths: PathsConfig,

    /// Entry template discovery
    #[serde(default)]
    pub entry: EntryConfig,

    /// Asset extension families and inline threshold
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Output naming
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            cli: None,
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            paths: PathsConfig::default(),
            entry: EntryConfig::default(),
            assets: AssetsConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl BundleConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file; the project root is
    /// the config file's parent directory. Loaded once at process start -
    /// a missing file or missing required field is a fatal startup error.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let Some(config_path) = find_config_file(&cli.config) else {
            log!(
                "error";
                "Config file '{}' not found in this or any parent directory.",
                cli.config.display()
            );
            std::process::exit(1);
        };

        let mut config = Self::from_path(&config_path)?;

        config.config_path = normalize_fs_path(&config_path);
        config.root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.cli = Some(cli);
        config.finalize();
        config.validate()?;

        Ok(config)
    }

    /// Canonicalize the configured roots into their declared forms:
    /// public base stays absolute (a URL base), everything else
    /// project-relative.
    fn finalize(&mut self) {
        self.paths.src = path::to_relative(&self.paths.src);
        self.paths.dist = path::to_relative(&self.paths.dist);
        self.paths.script_root = path::to_relative(&self.paths.script_root);
        self.paths.style_root = path::to_relative(&self.paths.style_root);
        self.paths.public = path::to_absolute(&self.paths.public);
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
            if !Self::prompt_continue()? {
                bail!("Aborted due to unknown config fields");
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        eprintln!();
        log!("warning"; "unknown fields in {}:", display_path);
        log!("warning"; "ignoring:");
        for field in fields {
            eprintln!("- {}", field);
        }
        eprintln!();
    }

    /// Prompt user to continue. Returns true only if user explicitly confirms.
    fn prompt_continue() -> Result<bool> {
        use std::io::{self, Write};

        eprint!("Continue? [y/N] ");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let input = input.trim().to_lowercase();
        // Default no (empty input), explicit "y" or "yes" to continue
        Ok(input == "y" || input == "yes")
    }

    /// Validate configuration, collecting all errors before failing.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.paths.validate(&mut diag);
        self.entry.validate(self.src_dir().is_dir(), &mut diag);
        self.assets.validate(&mut diag);
        self.output.validate(&mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// Absolute source root directory.
    pub fn src_dir(&self) -> PathBuf {
        self.root.join(&self.paths.src)
    }

    /// Absolute distribution root directory.
    pub fn dist_dir(&self) -> PathBuf {
        self.root.join(&self.paths.dist)
    }

    /// Get CLI arguments reference
    pub const fn get_cli(&self) -> &'static Cli {
        self.cli.unwrap()
    }
}

// ============================================================================
// helpers
// ============================================================================

/// Normalize a filesystem path to absolute form (canonicalize with fallback).
fn normalize_fs_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;

    if config_name.is_absolute() && config_name.exists() {
        return Some(config_name.to_path_buf());
    }

    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================
