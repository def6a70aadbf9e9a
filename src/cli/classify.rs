//! Classify command: report the emission strategy for one asset file.

use anyhow::{Context, Result};

use crate::cli::ClassifyArgs;
use crate::config::BundleConfig;
use crate::graph::{AssetMarker, EmissionStrategy, classify, path};
use crate::{debug, log};

/// Classify a single file against the configured extension families.
pub fn run_classify(args: &ClassifyArgs, config: &BundleConfig) -> Result<()> {
    let markers: Vec<AssetMarker> = args.markers.iter().map(|m| AssetMarker::from(*m)).collect();
    let marker = AssetMarker::resolve(&markers);

    if let Some(marker) = marker {
        debug!("classify"; "marker: {}", marker.label());
    }

    let strategy = classify::classify_file(&args.path, marker, &config.assets)
        .with_context(|| format!("failed to read {}", args.path.display()))?;

    log!("classify"; "{}: {}", args.path.display(), strategy.label());

    if strategy == EmissionStrategy::ExtractedResource {
        let out = path::asset_output_path(
            &args.path.canonicalize().unwrap_or_else(|_| args.path.clone()),
            &config.src_dir(),
            &config.output.filename,
        );
        log!("classify"; "emits to {}", out.display());
    }
    Ok(())
}
