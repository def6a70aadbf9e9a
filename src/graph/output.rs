//! Output strategy composition.
//!
//! Exactly two build modes, selected once at process start; there is no
//! mid-run transition. The mode is threaded explicitly through
//! [`OutputStrategy::compose`] - nothing deeper in the crate reads
//! environment state.
//!
//! | field            | development | production              |
//! |------------------|-------------|-------------------------|
//! | public_path      | `/`         | configured public path  |
//! | source_map       | inline      | none                    |
//! | minify           | false       | true                    |
//! | persistent_cache | true        | false                   |

use serde::Serialize;

use crate::config::{BundleConfig, ConfigError};

// ============================================================================
// Build mode
// ============================================================================

/// Build mode, fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Parse a mode string. Unrecognized values are a fatal configuration
    /// error - there is no silent default.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }

    /// Resolve the mode once at process start: explicit CLI flag first,
    /// then the `NODE_ENV` environment variable, else development.
    ///
    /// Absence defaults to development; a *present* but unrecognized value
    /// is still fatal.
    pub fn resolve(cli_mode: Option<&str>) -> Result<Self, ConfigError> {
        match cli_mode {
            Some(value) => Self::parse(value),
            None => match std::env::var("NODE_ENV") {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(Self::Development),
            },
        }
    }

    #[inline]
    pub const fn is_dev(self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Source-map emission policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMapMode {
    None,
    Inline,
    External,
}

// ============================================================================
// Output strategy
// ============================================================================

/// Concrete output settings derived from the build mode.
#[derive(Debug, Clone, Serialize)]
pub struct OutputStrategy {
    pub mode: BuildMode,
    /// URL base under which emitted assets are served.
    pub public_path: String,
    pub script_filename: String,
    pub style_filename: String,
    pub source_map: SourceMapMode,
    pub minify: bool,
    pub persistent_cache: bool,
}

impl OutputStrategy {
    /// Derive the output strategy for `mode`.
    ///
    /// Script and style templates share one configured base stem,
    /// distinguished by extension and rooted at their configured roots.
    /// Production additionally inserts a `[contenthash]` placeholder for
    /// cache-busting; development favors rebuild speed over caching.
    pub fn compose(mode: BuildMode, config: &BundleConfig) -> Self {
        let stem = if mode.is_dev() {
            config.output.filename.clone()
        } else {
            format!("{}.[contenthash]", config.output.filename)
        };

        Self {
            mode,
            public_path: if mode.is_dev() {
                "/".to_string()
            } else {
                config.paths.public.clone()
            },
            script_filename: format!("{}/{stem}.js", config.paths.script_root),
            style_filename: format!("{}/{stem}.css", config.paths.style_root),
            source_map: if mode.is_dev() {
                SourceMapMode::Inline
            } else {
                SourceMapMode::None
            },
            minify: !mode.is_dev(),
            persistent_cache: mode.is_dev(),
        }
    }
}

// ============================================================================
// tests
// ============================================================================
