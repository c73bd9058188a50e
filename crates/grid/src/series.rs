//! The gridded series type shared by the loader, aligner and metric engine.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use ndarray::{ArrayD, Axis};
use thermos_stats::Summary;

use crate::error::GridError;
use crate::metrics::{common_years, select};
use crate::units::{is_kelvin, kelvin_to_celsius};

/// One named spatial dimension with its coordinate labels.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialAxis {
    name: String,
    coords: Vec<f64>,
}

impl SpatialAxis {
    pub fn new(name: impl Into<String>, coords: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            coords,
        }
    }

    /// Axis with integer position labels `0..len`, for dimensions the source
    /// gives no coordinate variable for.
    pub fn indexed(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, (0..len).map(|i| i as f64).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

/// Temperature values on (year, spatial...) axes.
///
/// Axis 0 of `values` is time, labelled by unique integer years. The
/// remaining axes match `spatial` in order and length. Missing cells are NaN.
#[derive(Debug, Clone)]
pub struct GriddedSeries {
    name: String,
    values: ArrayD<f64>,
    years: Vec<i32>,
    spatial: Vec<SpatialAxis>,
    units_normalized: bool,
}

impl GriddedSeries {
    /// Build a series, checking its shape invariants.
    ///
    /// The result is not yet unit-normalised; call
    /// [`normalize_units`](Self::normalize_units) before handing it to the
    /// aligner or the metric engine.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSeries`] if the array rank or axis lengths
    /// disagree with `years` and `spatial`, or if a year label repeats.
    pub fn new(
        name: impl Into<String>,
        values: ArrayD<f64>,
        years: Vec<i32>,
        spatial: Vec<SpatialAxis>,
    ) -> Result<Self, GridError> {
        let name = name.into();
        let invalid = |reason: String| GridError::InvalidSeries {
            name: name.clone(),
            reason,
        };

        if values.ndim() != spatial.len() + 1 {
            return Err(invalid(format!(
                "array has {} axes, expected 1 time axis plus {} spatial axes",
                values.ndim(),
                spatial.len()
            )));
        }
        if values.shape()[0] != years.len() {
            return Err(invalid(format!(
                "time axis has {} steps but {} year labels",
                values.shape()[0],
                years.len()
            )));
        }
        for (i, axis) in spatial.iter().enumerate() {
            let len = values.shape()[i + 1];
            if axis.len() != len {
                return Err(invalid(format!(
                    "spatial axis '{}' has {} labels but array length {len}",
                    axis.name(),
                    axis.len()
                )));
            }
        }
        let mut seen = HashSet::with_capacity(years.len());
        if let Some(dup) = years.iter().find(|y| !seen.insert(**y)) {
            return Err(invalid(format!("year {dup} appears more than once")));
        }

        Ok(Self {
            name,
            values,
            years,
            spatial,
            units_normalized: false,
        })
    }

    /// Reassemble a series whose invariants the caller already guarantees.
    pub(crate) fn from_parts(
        name: String,
        values: ArrayD<f64>,
        years: Vec<i32>,
        spatial: Vec<SpatialAxis>,
        units_normalized: bool,
    ) -> Self {
        Self {
            name,
            values,
            years,
            spatial,
            units_normalized,
        }
    }

    /// Bring the series to degrees Celsius.
    ///
    /// Subtracts 273.15 from every value when [`is_kelvin`] holds for the
    /// whole field. Calling this on an already-normalised series is a no-op,
    /// so the offset is never applied twice.
    pub fn normalize_units(mut self) -> Self {
        if self.units_normalized {
            return self;
        }
        if is_kelvin(self.values.iter()) {
            tracing::debug!(series = %self.name, "converting Kelvin to Celsius");
            self.values.mapv_inplace(kelvin_to_celsius);
        }
        self.units_normalized = true;
        self
    }

    /// Series name (usually the source variable name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Values with time on axis 0.
    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    /// Year labels of axis 0.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Spatial axes, in array order after time.
    pub fn spatial(&self) -> &[SpatialAxis] {
        &self.spatial
    }

    /// Whether [`normalize_units`](Self::normalize_units) has run.
    pub fn is_normalized(&self) -> bool {
        self.units_normalized
    }

    /// Number of time steps.
    pub fn n_years(&self) -> usize {
        self.years.len()
    }

    /// Keep only the time steps whose year lies in `range`.
    pub fn select_years(&self, range: RangeInclusive<i32>) -> Self {
        let (idx, years): (Vec<usize>, Vec<i32>) = self
            .years
            .iter()
            .enumerate()
            .filter(|(_, y)| range.contains(*y))
            .map(|(i, &y)| (i, y))
            .unzip();
        Self::from_parts(
            self.name.clone(),
            self.values.select(Axis(0), &idx),
            years,
            self.spatial.clone(),
            self.units_normalized,
        )
    }

    /// Same series under another name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Cell-wise `self - other` for every year both series share, in
    /// ascending year order, on `self`'s axes. NaN where either is NaN.
    ///
    /// Cells are paired by position, so `other` should already be aligned
    /// to `self` with [`align`](crate::align).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ContractViolation`] if either series is not
    /// unit-normalised, [`GridError::AlignmentFailure`] if the spatial
    /// shapes differ, and [`GridError::NoCommonYears`] if no year is shared.
    pub fn difference(&self, other: &GriddedSeries) -> Result<GriddedSeries, GridError> {
        for s in [self, other] {
            if !s.units_normalized {
                return Err(GridError::ContractViolation {
                    reason: format!("series '{}' has not been unit-normalised", s.name),
                });
            }
        }
        if self.values.shape()[1..] != other.values.shape()[1..] {
            return Err(GridError::AlignmentFailure {
                reason: format!(
                    "series '{}' has spatial shape {:?} but '{}' has {:?}",
                    self.name,
                    &self.values.shape()[1..],
                    other.name,
                    &other.values.shape()[1..]
                ),
            });
        }

        let years = common_years(&[self, other]);
        if years.is_empty() {
            return Err(GridError::NoCommonYears);
        }
        let values = select(self, &years) - select(other, &years);

        Ok(Self::from_parts(
            format!("{}_minus_{}", self.name, other.name),
            values,
            years,
            self.spatial.clone(),
            true,
        ))
    }

    /// Descriptive statistics over every non-NaN cell. `None` if all missing.
    pub fn summary(&self) -> Option<Summary> {
        match self.values.as_slice() {
            Some(s) => thermos_stats::describe(s),
            None => {
                let owned: Vec<f64> = self.values.iter().copied().collect();
                thermos_stats::describe(&owned)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::IxDyn;

    fn axes() -> Vec<SpatialAxis> {
        vec![SpatialAxis::indexed("y", 2), SpatialAxis::indexed("x", 2)]
    }

    fn filled(value: f64, years: Vec<i32>) -> GriddedSeries {
        let values = ArrayD::from_elem(IxDyn(&[years.len(), 2, 2]), value);
        GriddedSeries::new("t", values, years, axes()).unwrap()
    }

    #[test]
    fn rejects_rank_mismatch() {
        let values = ArrayD::zeros(IxDyn(&[2, 2]));
        let err = GriddedSeries::new("t", values, vec![1, 2], axes()).unwrap_err();
        assert!(matches!(err, GridError::InvalidSeries { .. }));
    }

    #[test]
    fn rejects_time_length_mismatch() {
        let values = ArrayD::zeros(IxDyn(&[3, 2, 2]));
        assert!(GriddedSeries::new("t", values, vec![1, 2], axes()).is_err());
    }

    #[test]
    fn rejects_spatial_length_mismatch() {
        let values = ArrayD::zeros(IxDyn(&[1, 2, 3]));
        assert!(GriddedSeries::new("t", values, vec![1], axes()).is_err());
    }

    #[test]
    fn rejects_duplicate_years() {
        let values = ArrayD::zeros(IxDyn(&[2, 2, 2]));
        let err = GriddedSeries::new("t", values, vec![2000, 2000], axes()).unwrap_err();
        assert!(err.to_string().contains("2000"));
    }

    #[test]
    fn normalize_converts_once() {
        let s = filled(300.0, vec![2000]).normalize_units();
        assert!(s.is_normalized());
        assert_relative_eq!(s.values()[[0, 0, 0]], 26.85, epsilon = 1e-9);
        let again = s.normalize_units();
        assert_relative_eq!(again.values()[[0, 0, 0]], 26.85, epsilon = 1e-9);
    }

    #[test]
    fn normalize_leaves_celsius() {
        let s = filled(200.0, vec![2000]).normalize_units();
        assert_relative_eq!(s.values()[[0, 1, 1]], 200.0);
    }

    #[test]
    fn select_years_subset() {
        let s = filled(1.0, vec![1950, 1960, 1970, 2030]).select_years(1959..=2024);
        assert_eq!(s.years(), &[1960, 1970]);
        assert_eq!(s.values().shape(), &[2, 2, 2]);
    }

    #[test]
    fn summary_ignores_nan() {
        let mut values = ArrayD::from_elem(IxDyn(&[1, 2, 2]), 2.0);
        values[[0, 0, 0]] = f64::NAN;
        values[[0, 1, 1]] = 4.0;
        let s = GriddedSeries::new("t", values, vec![2000], axes()).unwrap();
        let sum = s.summary().unwrap();
        assert_eq!(sum.count, 3);
        assert_relative_eq!(sum.max, 4.0);
    }
    #[test]
    fn difference_over_common_years() {
        let cor = filled(31.0, vec![2000, 2001, 2002]).normalize_units();
        let brut = filled(33.0, vec![2002, 2001, 1999]).normalize_units();
        let diff = cor.difference(&brut).unwrap();
        assert_eq!(diff.name(), "t_minus_t");
        assert_eq!(diff.years(), &[2001, 2002]);
        assert!(diff.is_normalized());
        assert!(diff.values().iter().all(|&v| v == -2.0));
    }

    #[test]
    fn difference_keeps_nan() {
        let mut a = filled(1.0, vec![2000]);
        a.values[[0, 1, 1]] = f64::NAN;
        let a = a.normalize_units();
        let b = filled(0.5, vec![2000]).normalize_units();
        let diff = a.difference(&b).unwrap();
        assert!(diff.values()[[0, 1, 1]].is_nan());
        assert_relative_eq!(diff.values()[[0, 0, 0]], 0.5);
    }

    #[test]
    fn difference_checks_inputs() {
        let a = filled(1.0, vec![2000]).normalize_units();
        let raw = filled(1.0, vec![2000]);
        assert!(matches!(
            a.difference(&raw).unwrap_err(),
            GridError::ContractViolation { .. }
        ));

        let other_shape = GriddedSeries::new(
            "u",
            ArrayD::zeros(IxDyn(&[1, 2, 3])),
            vec![2000],
            vec![SpatialAxis::indexed("y", 2), SpatialAxis::indexed("x", 3)],
        )
        .unwrap()
        .normalize_units();
        assert!(matches!(
            a.difference(&other_shape).unwrap_err(),
            GridError::AlignmentFailure { .. }
        ));

        let later = filled(1.0, vec![2050]).normalize_units();
        assert_eq!(a.difference(&later).unwrap_err(), GridError::NoCommonYears);
    }

    #[test]
    fn renamed_keeps_values() {
        let s = filled(2.0, vec![2000]).renamed("diff");
        assert_eq!(s.name(), "diff");
        assert_eq!(s.n_years(), 1);
    }
}
