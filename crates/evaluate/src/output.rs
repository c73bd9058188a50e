//! JSON output structures for evaluation results.
//!
//! Missing values (NaN) serialize as JSON `null`.

use serde::Serialize;
use thermos_grid::MetricSeries;

use crate::config::{EvaluateConfig, FilterMode};
use crate::error::EvaluateError;

/// Summary of the configuration used.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub threshold: f64,
    pub filter: FilterMode,
    /// Inclusive `[first, last]` observation years, if restricted.
    pub obs_years: Option<[i32; 2]>,
    pub thresholds: Vec<f64>,
}

impl From<&EvaluateConfig> for ConfigSummary {
    fn from(config: &EvaluateConfig) -> Self {
        Self {
            threshold: config.threshold(),
            filter: config.filter(),
            obs_years: config.obs_years().map(|r| [*r.start(), *r.end()]),
            thresholds: config.thresholds().to_vec(),
        }
    }
}

/// Per-year and year-averaged metrics of one series against observations.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsOutput {
    pub years: Vec<i32>,
    pub rmse: Vec<f64>,
    pub bias: Vec<f64>,
    pub mean_rmse: f64,
    pub mean_bias: f64,
}

impl From<&MetricSeries> for MetricsOutput {
    fn from(m: &MetricSeries) -> Self {
        Self {
            years: m.years().to_vec(),
            rmse: m.rmse().to_vec(),
            bias: m.bias().to_vec(),
            mean_rmse: m.mean_rmse(),
            mean_bias: m.mean_bias(),
        }
    }
}

/// Raw and corrected metrics of one model at one threshold.
#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub model: String,
    /// Filter threshold applied, `None` for an unfiltered comparison.
    pub threshold: Option<f64>,
    pub brut: MetricsOutput,
    pub cor: MetricsOutput,
}

/// One threshold of a sensitivity sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub threshold: f64,
    pub rmse_brut: f64,
    pub rmse_cor: f64,
    /// `rmse_brut - rmse_cor`; positive when the correction helps.
    pub gain: f64,
}

/// Threshold-sensitivity curve of one model.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub model: String,
    pub points: Vec<SweepPoint>,
}

/// A model left out of a batch and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedModel {
    pub model: String,
    pub reason: String,
}

/// Top-level output of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport<T> {
    pub config: ConfigSummary,
    pub evaluated: Vec<T>,
    pub skipped: Vec<SkippedModel>,
}

/// Serialize any report to a pretty JSON string.
///
/// # Errors
///
/// Returns [`EvaluateError::Serialization`] if serialization fails.
pub fn to_json<T: Serialize>(output: &T) -> Result<String, EvaluateError> {
    serde_json::to_string_pretty(output).map_err(|e| EvaluateError::Serialization {
        reason: e.to_string(),
    })
}
