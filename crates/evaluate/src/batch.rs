//! Batch evaluation over many independent models.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use thermos_grid::GriddedSeries;
use tracing::{info, warn};

use crate::compare::{compare, restrict_obs, sweep, validate_sweep};
use crate::config::EvaluateConfig;
use crate::error::EvaluateError;
use crate::input::ModelInputs;
use crate::output::{BatchReport, ConfigSummary, ModelReport, SkippedModel, SweepReport};

/// Evaluate every model at the configured threshold, in parallel.
///
/// Recoverable failures are logged and listed in
/// [`BatchReport::skipped`]; output order follows `models`.
///
/// # Errors
///
/// Returns [`EvaluateError::Validation`] for an invalid configuration, or
/// the first unrecoverable error (a contract violation) hit by any model.
pub fn evaluate_batch(
    obs: &GriddedSeries,
    models: &[ModelInputs],
    config: &EvaluateConfig,
) -> Result<BatchReport<ModelReport>, EvaluateError> {
    config.validate()?;
    let obs = restrict_obs(obs, config);
    run(models, config, |m| {
        compare(&obs, m, config.threshold(), config.filter())
    })
}

/// Run the threshold sweep for every model, in parallel.
///
/// # Errors
///
/// Same conditions as [`evaluate_batch`], plus
/// [`EvaluateError::Validation`] for an unfiltered configuration.
pub fn sweep_batch(
    obs: &GriddedSeries,
    models: &[ModelInputs],
    config: &EvaluateConfig,
) -> Result<BatchReport<SweepReport>, EvaluateError> {
    validate_sweep(config)?;
    let obs = restrict_obs(obs, config);
    run(models, config, |m| sweep(&obs, m, config.thresholds()))
}

fn run<T, F>(
    models: &[ModelInputs],
    config: &EvaluateConfig,
    f: F,
) -> Result<BatchReport<T>, EvaluateError>
where
    T: Send,
    F: Fn(&ModelInputs) -> Result<T, EvaluateError> + Sync,
{
    let results: Vec<(&str, Result<T, EvaluateError>)> = models
        .par_iter()
        .map(|m| (m.name(), f(m)))
        .collect();

    let mut evaluated = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    for (name, result) in results {
        match result {
            Ok(report) => evaluated.push(report),
            Err(e) if e.is_recoverable() => {
                warn!(model = name, error = %e, "skipping model");
                skipped.push(SkippedModel {
                    model: name.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        n_evaluated = evaluated.len(),
        n_skipped = skipped.len(),
        "batch complete"
    );

    Ok(BatchReport {
        config: ConfigSummary::from(config),
        evaluated,
        skipped,
    })
}
