//! Threshold-masked spatial error metrics, one value per common year.
//!
//! Every metric here is built from the same per-cell rule: a cell of a year
//! counts when the filter field at that cell is at least the threshold and
//! the model/observation difference is not NaN. Excluded cells are dropped
//! from the mean, never treated as zero, and a year with no counted cell
//! yields NaN.

use std::collections::{BTreeSet, HashMap};

use ndarray::{ArrayD, Axis, Zip};

use crate::error::GridError;
use crate::series::GriddedSeries;

/// Per-year RMSE and bias over the masked cells.
///
/// `years` is sorted ascending; `rmse` and `bias` are parallel to it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    years: Vec<i32>,
    rmse: Vec<f64>,
    bias: Vec<f64>,
}

impl MetricSeries {
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn rmse(&self) -> &[f64] {
        &self.rmse
    }

    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    /// Number of common years.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// [`mean_over_years`] of the RMSE series.
    pub fn mean_rmse(&self) -> f64 {
        mean_over_years(&self.rmse)
    }

    /// [`mean_over_years`] of the bias series.
    pub fn mean_bias(&self) -> f64 {
        mean_over_years(&self.bias)
    }
}

/// Mean of a per-year metric, skipping missing (NaN) years.
///
/// NaN only when every year is missing or the slice is empty.
pub fn mean_over_years(values: &[f64]) -> f64 {
    thermos_stats::nan_mean(values)
}

/// Compare `model` with `obs` on the cells where `filter_ref >= threshold`.
///
/// The three series are restricted to the years they all share, in
/// ascending order. For each year, `bias` is the mean of `model - obs`
/// over the included cells and `rmse` is the square root of the mean
/// squared difference. A threshold of `f64::NEG_INFINITY` includes every
/// cell whose filter value is not NaN.
///
/// `model` and `filter_ref` must already be aligned to `obs` with
/// [`align`](crate::align).
///
/// # Errors
///
/// Returns [`GridError::NoCommonYears`] if the year sets do not intersect,
/// and [`GridError::ContractViolation`] if any series is not
/// unit-normalised or its spatial axes differ from `obs` in name or length.
pub fn compute_metrics(
    model: &GriddedSeries,
    obs: &GriddedSeries,
    filter_ref: &GriddedSeries,
    threshold: f64,
) -> Result<MetricSeries, GridError> {
    check_contract(model, obs, filter_ref)?;

    let years = common_years(&[model, obs, filter_ref]);
    if years.is_empty() {
        return Err(GridError::NoCommonYears);
    }

    let model = select(model, &years);
    let obs = select(obs, &years);
    let filter = select(filter_ref, &years);

    let (rmse, bias) = model
        .axis_iter(Axis(0))
        .zip(obs.axis_iter(Axis(0)))
        .zip(filter.axis_iter(Axis(0)))
        .map(|((m, o), f)| {
            let mut sum = 0.0;
            let mut sum_sq = 0.0;
            let mut n = 0usize;
            Zip::from(m).and(o).and(f).for_each(|&mv, &ov, &fv| {
                let diff = mv - ov;
                if fv >= threshold && !diff.is_nan() {
                    sum += diff;
                    sum_sq += diff * diff;
                    n += 1;
                }
            });
            if n == 0 {
                (f64::NAN, f64::NAN)
            } else {
                let n = n as f64;
                ((sum_sq / n).sqrt(), sum / n)
            }
        })
        .unzip();

    Ok(MetricSeries { years, rmse, bias })
}

/// Sorted intersection of the series' year labels.
pub(crate) fn common_years(series: &[&GriddedSeries]) -> Vec<i32> {
    let mut iter = series.iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };
    let mut common: BTreeSet<i32> = first.years().iter().copied().collect();
    for s in iter {
        let years: BTreeSet<i32> = s.years().iter().copied().collect();
        common.retain(|y| years.contains(y));
    }
    common.into_iter().collect()
}

/// Values of `series` at `years`, in that order. Every year must be present.
pub(crate) fn select(series: &GriddedSeries, years: &[i32]) -> ArrayD<f64> {
    let position: HashMap<i32, usize> = series
        .years()
        .iter()
        .enumerate()
        .map(|(i, &y)| (y, i))
        .collect();
    let idx: Vec<usize> = years.iter().filter_map(|y| position.get(y).copied()).collect();
    series.values().select(Axis(0), &idx)
}

fn check_contract(
    model: &GriddedSeries,
    obs: &GriddedSeries,
    filter_ref: &GriddedSeries,
) -> Result<(), GridError> {
    for s in [model, obs, filter_ref] {
        if !s.is_normalized() {
            return Err(GridError::ContractViolation {
                reason: format!("series '{}' has not been unit-normalised", s.name()),
            });
        }
    }
    for (role, s) in [("model", model), ("filter", filter_ref)] {
        let same_axes = s.spatial().len() == obs.spatial().len()
            && s
                .spatial()
                .iter()
                .zip(obs.spatial())
                .all(|(a, b)| a.name() == b.name() && a.len() == b.len());
        if !same_axes {
            return Err(GridError::ContractViolation {
                reason: format!(
                    "{role} series '{}' is not aligned to observation series '{}'",
                    s.name(),
                    obs.name()
                ),
            });
        }
    }
    Ok(())
}
