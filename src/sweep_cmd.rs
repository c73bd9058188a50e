//! Sweep command: threshold sensitivity of the correction's RMSE gain.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use thermos_evaluate::{FilterMode, sweep_batch, to_json};

use crate::cli::SweepArgs;
use crate::config::{SweepToml, ThermosConfig};
use crate::evaluate_cmd::write_json;
use crate::{convert, inputs};

/// Run the threshold sweep over all configured models.
pub fn run(args: SweepArgs) -> Result<()> {
    let _cmd = info_span!("sweep").entered();

    let config = ThermosConfig::from_file(&args.config)?;
    let sweep = SweepToml {
        start: args.start.unwrap_or(config.sweep.start),
        stop: args.stop.unwrap_or(config.sweep.stop),
        step: args.step.unwrap_or(config.sweep.step),
    };
    // Sweeps vary the corrected-series filter whatever the evaluate filter is.
    let eval_cfg = convert::build_evaluate_config(&config.evaluate, &sweep)?
        .with_filter(FilterMode::Corrected);

    let obs = inputs::load_obs(&config)?;
    let (models, load_skipped) = inputs::load_models(&config)?;

    info!(
        n_thresholds = eval_cfg.thresholds().len(),
        "running threshold sweep"
    );
    let mut report = sweep_batch(&obs, &models, &eval_cfg).context("threshold sweep failed")?;
    report.skipped.extend(load_skipped);

    for r in &report.evaluated {
        let best = r
            .points
            .iter()
            .filter(|p| !p.gain.is_nan())
            .max_by(|a, b| a.gain.total_cmp(&b.gain));
        match best {
            Some(p) => println!(
                "{:<30} best gain {:>7.3} at threshold {}",
                r.model, p.gain, p.threshold
            ),
            None => println!("{:<30} no threshold with data", r.model),
        }
    }

    let path = args
        .output
        .unwrap_or_else(|| config.paths.output_dir.join("threshold_sweep.json"));
    write_json(&path, &to_json(&report)?)?;
    info!(path = %path.display(), "sweep written");

    Ok(())
}
