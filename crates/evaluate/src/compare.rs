//! Single-model comparison of raw and corrected series against observations.
//!
//! Both model series are aligned onto the observation grid. By default they
//! are filtered by the bias-corrected series: a cell counts when
//! `cor >= threshold`. Unfiltered comparisons use the observations as their
//! own filter with no threshold.

use thermos_grid::{GriddedSeries, align, compute_metrics};
use tracing::{debug, info_span};

use crate::config::{EvaluateConfig, FilterMode};
use crate::error::EvaluateError;
use crate::input::ModelInputs;
use crate::output::{MetricsOutput, ModelReport, SweepPoint, SweepReport};

/// Evaluate one model at the configured threshold and filter mode.
///
/// Observations are first restricted to the configured year range.
///
/// # Errors
///
/// Returns [`EvaluateError::Validation`] for an invalid configuration and
/// [`EvaluateError::Grid`] if alignment fails or no year is shared.
pub fn evaluate_model(
    obs: &GriddedSeries,
    model: &ModelInputs,
    config: &EvaluateConfig,
) -> Result<ModelReport, EvaluateError> {
    config.validate()?;
    compare(&restrict_obs(obs, config), model, config.threshold(), config.filter())
}

/// Mean-over-years RMSE of raw and corrected series for every sweep threshold.
///
/// A threshold no cell reaches gives NaN for that point. The sweep always
/// filters by the corrected series.
///
/// # Errors
///
/// Same conditions as [`evaluate_model`], plus
/// [`EvaluateError::Validation`] if the configuration asks for an
/// unfiltered comparison.
pub fn sweep_model(
    obs: &GriddedSeries,
    model: &ModelInputs,
    config: &EvaluateConfig,
) -> Result<SweepReport, EvaluateError> {
    validate_sweep(config)?;
    sweep(&restrict_obs(obs, config), model, config.thresholds())
}

/// A sweep varies the filter threshold, so it needs a filter.
pub(crate) fn validate_sweep(config: &EvaluateConfig) -> Result<(), EvaluateError> {
    config.validate()?;
    if config.filter() == FilterMode::Unfiltered {
        return Err(EvaluateError::Validation {
            count: 1,
            details: "a threshold sweep needs filter 'cor', got 'none'".to_string(),
        });
    }
    Ok(())
}

/// Apply the configured observation year range.
pub(crate) fn restrict_obs(obs: &GriddedSeries, config: &EvaluateConfig) -> GriddedSeries {
    match config.obs_years() {
        Some(years) => obs.select_years(years.clone()),
        None => obs.clone(),
    }
}

/// Align both model series onto `obs`.
fn aligned(obs: &GriddedSeries, model: &ModelInputs) -> Result<(GriddedSeries, GriddedSeries), EvaluateError> {
    let brut = align(model.brut(), obs)?;
    let cor = align(model.cor(), obs)?;
    Ok((brut, cor))
}

pub(crate) fn compare(
    obs: &GriddedSeries,
    model: &ModelInputs,
    threshold: f64,
    filter: FilterMode,
) -> Result<ModelReport, EvaluateError> {
    let _span = info_span!("evaluate", model = model.name(), %filter).entered();

    let (brut, cor) = aligned(obs, model)?;
    let (filter_ref, applied) = match filter {
        FilterMode::Corrected => (&cor, Some(threshold)),
        FilterMode::Unfiltered => (obs, None),
    };
    let cutoff = applied.unwrap_or(f64::NEG_INFINITY);
    let brut_metrics = compute_metrics(&brut, obs, filter_ref, cutoff)?;
    let cor_metrics = compute_metrics(&cor, obs, filter_ref, cutoff)?;

    debug!(
        n_years = cor_metrics.len(),
        mean_rmse_brut = brut_metrics.mean_rmse(),
        mean_rmse_cor = cor_metrics.mean_rmse(),
        "compared"
    );

    Ok(ModelReport {
        model: model.name().to_string(),
        threshold: applied,
        brut: MetricsOutput::from(&brut_metrics),
        cor: MetricsOutput::from(&cor_metrics),
    })
}

pub(crate) fn sweep(
    obs: &GriddedSeries,
    model: &ModelInputs,
    thresholds: &[f64],
) -> Result<SweepReport, EvaluateError> {
    let _span = info_span!("sweep", model = model.name()).entered();

    let (brut, cor) = aligned(obs, model)?;
    let points = thresholds
        .iter()
        .map(|&threshold| {
            let rmse_brut = compute_metrics(&brut, obs, &cor, threshold)?.mean_rmse();
            let rmse_cor = compute_metrics(&cor, obs, &cor, threshold)?.mean_rmse();
            Ok(SweepPoint {
                threshold,
                rmse_brut,
                rmse_cor,
                gain: rmse_brut - rmse_cor,
            })
        })
        .collect::<Result<Vec<_>, EvaluateError>>()?;

    debug!(n_thresholds = points.len(), "swept");

    Ok(SweepReport {
        model: model.name().to_string(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{ArrayD, IxDyn};
    use thermos_grid::{GridError, SpatialAxis};

    fn series(years: Vec<i32>, f: impl Fn(usize, usize) -> f64) -> GriddedSeries {
        let values = ArrayD::from_shape_fn(IxDyn(&[years.len(), 1, 2]), |ix| f(ix[0], ix[2]));
        GriddedSeries::new(
            "tx",
            values,
            years,
            vec![SpatialAxis::indexed("y", 1), SpatialAxis::indexed("x", 2)],
        )
        .unwrap()
        .normalize_units()
    }

    #[test]
    fn test_restrict_obs() {
        let obs = series(vec![1950, 1960, 2030], |_, _| 0.0);
        let config = EvaluateConfig::default();
        assert_eq!(restrict_obs(&obs, &config).years(), &[1960]);
        let all = EvaluateConfig::default().with_obs_years(None);
        assert_eq!(restrict_obs(&obs, &all).n_years(), 3);
    }

    #[test]
    fn test_brut_filtered_by_cor() {
        let obs = series(vec![2000], |_, _| 30.0);
        // brut exceeds threshold everywhere, cor only in cell 1.
        let brut = series(vec![2000], |_, x| if x == 0 { 34.0 } else { 36.0 });
        let cor = series(vec![2000], |_, x| if x == 0 { 29.0 } else { 31.0 });
        let model = ModelInputs::new("m", brut, cor);

        let report = compare(&obs, &model, 30.0, FilterMode::Corrected).unwrap();
        assert_relative_eq!(report.brut.bias[0], 6.0);
        assert_relative_eq!(report.cor.bias[0], 1.0);
        assert_relative_eq!(report.cor.mean_rmse, 1.0);
    }

    #[test]
    fn test_sweep_gain_and_nan() {
        let obs = series(vec![2000, 2001], |_, _| 30.0);
        let brut = series(vec![2000, 2001], |_, _| 33.0);
        let cor = series(vec![2000, 2001], |_, _| 31.0);
        let model = ModelInputs::new("m", brut, cor);

        let report = sweep(&obs, &model, &[30.0, 40.0]).unwrap();
        assert_eq!(report.points.len(), 2);
        assert_relative_eq!(report.points[0].rmse_brut, 3.0);
        assert_relative_eq!(report.points[0].rmse_cor, 1.0);
        assert_relative_eq!(report.points[0].gain, 2.0);
        assert!(report.points[1].gain.is_nan());
    }

    #[test]
    fn test_no_common_years() {
        let obs = series(vec![1959], |_, _| 30.0);
        let model = ModelInputs::new(
            "m",
            series(vec![2050], |_, _| 30.0),
            series(vec![2050], |_, _| 30.0),
        );
        let err = evaluate_model(&obs, &model, &EvaluateConfig::default()).unwrap_err();
        assert!(matches!(err, EvaluateError::Grid(GridError::NoCommonYears)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_unfiltered_uses_each_series_own_years() {
        let obs = series(vec![2000, 2001, 2002], |_, _| 30.0);
        let brut = series(vec![2000, 2001, 2002], |_, x| if x == 0 { 31.0 } else { 33.0 });
        // cor is short one year and missing in cell 1.
        let cor = series(vec![2001, 2002], |_, x| if x == 0 { 29.0 } else { f64::NAN });
        let model = ModelInputs::new("m", brut, cor);

        let filtered = compare(&obs, &model, f64::NEG_INFINITY, FilterMode::Corrected).unwrap();
        assert_eq!(filtered.brut.years, vec![2001, 2002]);
        assert_relative_eq!(filtered.brut.bias[0], 1.0);

        let report = compare(&obs, &model, 30.0, FilterMode::Unfiltered).unwrap();
        assert_eq!(report.threshold, None);
        assert_eq!(report.brut.years, vec![2000, 2001, 2002]);
        assert_eq!(report.cor.years, vec![2001, 2002]);
        // brut keeps the cell where cor is missing: bias = mean(1, 3).
        assert_relative_eq!(report.brut.bias[0], 2.0);
        assert_relative_eq!(report.brut.bias[1], 2.0);
        assert_relative_eq!(report.cor.bias[1], -1.0);
    }

    #[test]
    fn test_sweep_rejects_unfiltered() {
        let obs = series(vec![2000], |_, _| 30.0);
        let model = ModelInputs::new(
            "m",
            series(vec![2000], |_, _| 31.0),
            series(vec![2000], |_, _| 31.0),
        );
        let config = EvaluateConfig::default()
            .with_obs_years(None)
            .with_filter(FilterMode::Unfiltered);
        let err = sweep_model(&obs, &model, &config).unwrap_err();
        assert!(matches!(err, EvaluateError::Validation { .. }));
    }
}
