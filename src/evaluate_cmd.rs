//! Evaluate command: per-year metrics of every model at one threshold.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use thermos_evaluate::{evaluate_batch, to_json};

use crate::cli::EvaluateArgs;
use crate::config::ThermosConfig;
use crate::{convert, inputs};

/// Run the single-threshold evaluation over all configured models.
pub fn run(args: EvaluateArgs) -> Result<()> {
    let _cmd = info_span!("evaluate").entered();

    let config = ThermosConfig::from_file(&args.config)?;
    let mut eval_cfg = convert::build_evaluate_config(&config.evaluate, &config.sweep)?;
    if let Some(threshold) = args.threshold {
        eval_cfg = eval_cfg.with_threshold(threshold);
    }
    if let Some(filter) = &args.filter {
        eval_cfg = eval_cfg.with_filter(filter.parse()?);
    }

    let obs = inputs::load_obs(&config)?;
    let (models, load_skipped) = inputs::load_models(&config)?;

    info!(
        threshold = eval_cfg.threshold(),
        filter = %eval_cfg.filter(),
        "running evaluation"
    );
    let mut report = evaluate_batch(&obs, &models, &eval_cfg).context("evaluation failed")?;
    report.skipped.extend(load_skipped);

    for r in &report.evaluated {
        println!(
            "{:<30} mean RMSE brut {:>7.3}  cor {:>7.3}   mean bias brut {:>7.3}  cor {:>7.3}",
            r.model, r.brut.mean_rmse, r.cor.mean_rmse, r.brut.mean_bias, r.cor.mean_bias
        );
    }

    let path = args
        .output
        .unwrap_or_else(|| config.paths.output_dir.join("metrics.json"));
    write_json(&path, &to_json(&report)?)?;
    info!(path = %path.display(), "metrics written");

    Ok(())
}

/// Write a JSON string, creating the parent directory if needed.
pub fn write_json(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write output: {}", path.display()))
}
