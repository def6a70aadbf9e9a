//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::graph::AssetMarker;

/// Packplan build-graph planner CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: packplan.toml)
    #[arg(short = 'C', long, default_value = "packplan.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve the build graph once and print it as JSON
    #[command(visible_alias = "p")]
    Plan {
        #[command(flatten)]
        plan_args: PlanArgs,
    },

    /// Watch the source tree and recompute the graph on changes
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        plan_args: PlanArgs,
    },

    /// Classify a single asset file and print its emission strategy
    #[command(visible_alias = "c")]
    Classify {
        #[command(flatten)]
        args: ClassifyArgs,
    },
}

/// Shared arguments for Plan and Watch commands
#[derive(clap::Args, Debug, Clone)]
pub struct PlanArgs {
    /// Build mode (development or production).
    ///
    /// Falls back to the NODE_ENV environment variable when omitted,
    /// then to development.
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Write the graph to a file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Classify command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// Asset file to classify
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub path: PathBuf,

    /// Explicit markers attached to the reference (repeatable, first wins)
    #[arg(short = 'M', long = "marker", value_enum)]
    pub markers: Vec<MarkerArg>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// CLI-facing marker names.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerArg {
    /// Embed the file content into the referencing document
    Inline,
    /// Include the raw source text in place
    Source,
}

impl From<MarkerArg> for AssetMarker {
    fn from(arg: MarkerArg) -> Self {
        match arg {
            MarkerArg::Inline => AssetMarker::Inline,
            MarkerArg::Source => AssetMarker::SourceText,
        }
    }
}

#[allow(unused)]
impl Cli {
    pub const fn is_plan(&self) -> bool {
        matches!(self.command, Commands::Plan { .. })
    }
    pub const fn is_watch(&self) -> bool {
        matches!(self.command, Commands::Watch { .. })
    }
    pub const fn is_classify(&self) -> bool {
        matches!(self.command, Commands::Classify { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_arg_maps_to_asset_marker() {
        assert_eq!(AssetMarker::from(MarkerArg::Inline), AssetMarker::Inline);
        assert_eq!(
            AssetMarker::from(MarkerArg::Source),
            AssetMarker::SourceText
        );
    }

    #[test]
    fn test_parse_plan_with_mode() {
        let cli = Cli::parse_from(["packplan", "plan", "--mode", "production"]);
        assert!(cli.is_plan());
        let Commands::Plan { plan_args } = &cli.command else {
            unreachable!()
        };
        assert_eq!(plan_args.mode.as_deref(), Some("production"));
    }

    #[test]
    fn test_parse_classify_markers() {
        let cli = Cli::parse_from([
            "packplan", "classify", "icon.svg", "-M", "inline", "-M", "source",
        ]);
        let Commands::Classify { args } = &cli.command else {
            unreachable!()
        };
        assert_eq!(args.markers, vec![MarkerArg::Inline, MarkerArg::Source]);
    }

    #[test]
    fn test_aliases() {
        assert!(Cli::parse_from(["packplan", "w"]).is_watch());
        assert!(Cli::parse_from(["packplan", "c", "a.png"]).is_classify());
    }
}
