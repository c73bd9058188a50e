//! Evaluation configuration.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Serialize;

use crate::error::EvaluateError;

/// Which cells count in a single-threshold comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum FilterMode {
    /// Cells where the corrected series reaches the threshold, for both the
    /// raw and the corrected series, over the years all three share.
    #[default]
    #[serde(rename = "cor")]
    Corrected,
    /// Every cell where model and observation are both present. Each model
    /// series is compared over the years it shares with the observations,
    /// and the threshold is ignored.
    #[serde(rename = "none")]
    Unfiltered,
}

impl FilterMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Corrected => "cor",
            Self::Unfiltered => "none",
        }
    }
}

impl FromStr for FilterMode {
    type Err = EvaluateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cor" => Ok(Self::Corrected),
            "none" => Ok(Self::Unfiltered),
            other => Err(EvaluateError::Validation {
                count: 1,
                details: format!("unknown filter '{other}', expected 'cor' or 'none'"),
            }),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build an inclusive, evenly spaced list of thresholds.
///
/// `threshold_range(30.0, 50.0, 1.0)` yields the 21 values `30.0..=50.0`.
/// Each value is computed as `start + i * step`, so rounding does not
/// accumulate.
///
/// # Errors
///
/// Returns [`EvaluateError::Validation`] if `step` is not strictly
/// positive, `stop < start`, or any bound is not finite.
pub fn threshold_range(start: f64, stop: f64, step: f64) -> Result<Vec<f64>, EvaluateError> {
    if !(start.is_finite() && stop.is_finite() && step.is_finite()) || step <= 0.0 || stop < start {
        return Err(EvaluateError::Validation {
            count: 1,
            details: format!("invalid threshold range start={start} stop={stop} step={step}"),
        });
    }
    let n = ((stop - start) / step + 1e-9).floor() as usize + 1;
    Ok((0..n).map(|i| start + i as f64 * step).collect())
}

/// Configuration for the evaluation pipeline.
#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    threshold: f64,
    filter: FilterMode,
    obs_years: Option<RangeInclusive<i32>>,
    thresholds: Vec<f64>,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            threshold: 30.0,
            filter: FilterMode::Corrected,
            obs_years: Some(1959..=2024),
            thresholds: (30..=50).map(f64::from).collect(),
        }
    }
}

impl EvaluateConfig {
    /// Set the filter threshold (°C) for single-threshold evaluation.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Choose which cells count in [`evaluate_model`](crate::evaluate_model).
    /// Threshold sweeps always filter by the corrected series.
    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Restrict observations to a year range, or `None` to keep all years.
    pub fn with_obs_years(mut self, years: Option<RangeInclusive<i32>>) -> Self {
        self.obs_years = years;
        self
    }

    /// Set the thresholds visited by the sensitivity sweep.
    pub fn with_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Returns the filter threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the filter mode.
    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Returns the observation year range, if any.
    pub fn obs_years(&self) -> Option<&RangeInclusive<i32>> {
        self.obs_years.as_ref()
    }

    /// Returns the sweep thresholds.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluateError::Validation`] listing every problem found.
    pub fn validate(&self) -> Result<(), EvaluateError> {
        let mut problems = Vec::new();
        if self.threshold.is_nan() {
            problems.push("threshold must not be NaN".to_string());
        }
        if let Some(years) = &self.obs_years
            && years.is_empty()
        {
            problems.push(format!(
                "observation years {}..={} are empty",
                years.start(),
                years.end()
            ));
        }
        if self.thresholds.is_empty() {
            problems.push("sweep thresholds must not be empty".to_string());
        }
        if self.thresholds.iter().any(|t| t.is_nan()) {
            problems.push("sweep thresholds must not contain NaN".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(EvaluateError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }
}
