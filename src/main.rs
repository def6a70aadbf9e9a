//! Packplan - a build-graph planner for template-driven bundles.
//!
//! Resolves a project's source tree into the configuration an external
//! bundler consumes: the entry map, the ordered asset-rule list and the
//! mode-dependent output strategy.

#![allow(dead_code)]

mod cli;
mod config;
mod graph;
mod logger;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{BundleConfig, init_config};
use graph::BuildMode;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    watch::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = init_config(BundleConfig::load(cli)?);

    match &cli.command {
        Commands::Plan { plan_args } => {
            logger::set_verbose(plan_args.verbose);
            let mode = BuildMode::resolve(plan_args.mode.as_deref())?;
            cli::plan::run_plan(plan_args, &config, mode)
        }
        Commands::Watch { plan_args } => {
            logger::set_verbose(plan_args.verbose);
            let mode = BuildMode::resolve(plan_args.mode.as_deref())?;
            watch::run(mode)
        }
        Commands::Classify { args } => {
            logger::set_verbose(args.verbose);
            cli::classify::run_classify(args, &config)
        }
    }
}
