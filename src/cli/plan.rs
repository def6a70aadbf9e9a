//! Plan command: resolve the build graph once and emit it as JSON.

use std::fs;

use anyhow::{Context, Result};

use crate::cli::PlanArgs;
use crate::config::BundleConfig;
use crate::graph::{self, BuildMode};
use crate::log;

/// Resolve the graph for the requested mode and print (or write) it.
pub fn run_plan(args: &PlanArgs, config: &BundleConfig, mode: BuildMode) -> Result<()> {
    let graph = graph::assemble(config, mode)?;

    log!(
        "plan";
        "{} mode, {} entr{}",
        mode.label(),
        graph.entries.len(),
        if graph.entries.len() == 1 { "y" } else { "ies" }
    );

    let json = serde_json::to_string_pretty(&graph).context("failed to serialize build graph")?;

    match &args.output {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log!("plan"; "wrote {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
