//! Time-mean maps and their differences.

use ndarray::{Array2, Axis, Ix2};

use crate::error::GridError;
use crate::series::{GriddedSeries, SpatialAxis};

/// A 2-D field over two spatial axes, usually a mean over years.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanMap {
    name: String,
    values: Array2<f64>,
    axes: [SpatialAxis; 2],
}

impl MeanMap {
    /// Build a map, checking the axis lengths against the array shape.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSeries`] if an axis length differs from
    /// the matching array dimension.
    pub fn new(
        name: impl Into<String>,
        values: Array2<f64>,
        axes: [SpatialAxis; 2],
    ) -> Result<Self, GridError> {
        let name = name.into();
        if values.dim() != (axes[0].len(), axes[1].len()) {
            return Err(GridError::InvalidSeries {
                name,
                reason: format!(
                    "map shape {:?} does not match axes ({}, {})",
                    values.dim(),
                    axes[0].len(),
                    axes[1].len()
                ),
            });
        }
        Ok(Self { name, values, axes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn axes(&self) -> &[SpatialAxis; 2] {
        &self.axes
    }

    /// Same map under another name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Cell-wise `self - other`, on `self`'s axes. NaN where either is NaN.
    ///
    /// Cells are paired by position, so `other` must have the same shape.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::AlignmentFailure`] if the shapes differ.
    pub fn difference(&self, other: &MeanMap) -> Result<MeanMap, GridError> {
        if self.values.dim() != other.values.dim() {
            return Err(GridError::AlignmentFailure {
                reason: format!(
                    "map '{}' has shape {:?} but '{}' has shape {:?}",
                    self.name,
                    self.values.dim(),
                    other.name,
                    other.values.dim()
                ),
            });
        }
        Ok(MeanMap {
            name: format!("{}_minus_{}", self.name, other.name),
            values: &self.values - &other.values,
            axes: self.axes.clone(),
        })
    }
}

/// NaN-ignoring mean over the time axis of a series with two spatial axes.
///
/// A cell that is NaN in every year is NaN in the map.
///
/// # Errors
///
/// Returns [`GridError::AlignmentFailure`] if the series does not have
/// exactly two spatial dimensions.
pub fn time_mean(series: &GriddedSeries) -> Result<MeanMap, GridError> {
    let [a, b] = series.spatial() else {
        return Err(GridError::AlignmentFailure {
            reason: format!(
                "series '{}' has {} spatial dimensions, expected 2",
                series.name(),
                series.spatial().len()
            ),
        });
    };

    let values = series
        .values()
        .map_axis(Axis(0), |lane| thermos_stats::nan_mean_iter(lane.iter().copied()))
        .into_dimensionality::<Ix2>()
        .map_err(|e| GridError::InvalidSeries {
            name: series.name().to_string(),
            reason: e.to_string(),
        })?;

    MeanMap::new(series.name(), values, [a.clone(), b.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{ArrayD, IxDyn};

    fn series(values: Vec<f64>, n_years: usize) -> GriddedSeries {
        let arr = ArrayD::from_shape_vec(IxDyn(&[n_years, 1, 2]), values).unwrap();
        let years = (0..n_years as i32).map(|i| 2000 + i).collect();
        GriddedSeries::new(
            "tx",
            arr,
            years,
            vec![SpatialAxis::new("lat", vec![45.0]), SpatialAxis::new("lon", vec![1.0, 2.0])],
        )
        .unwrap()
        .normalize_units()
    }

    #[test]
    fn mean_skips_nan_years() {
        let s = series(vec![1.0, f64::NAN, 3.0, f64::NAN], 2);
        let m = time_mean(&s).unwrap();
        assert_eq!(m.values().dim(), (1, 2));
        assert_relative_eq!(m.values()[[0, 0]], 2.0);
        assert!(m.values()[[0, 1]].is_nan());
        assert_eq!(m.axes()[1].coords(), &[1.0, 2.0]);
    }

    #[test]
    fn difference_of_maps() {
        let cor = time_mean(&series(vec![3.0, 5.0], 1)).unwrap().renamed("cor");
        let brut = time_mean(&series(vec![1.0, 1.0], 1)).unwrap().renamed("brut");
        let d = cor.difference(&brut).unwrap();
        assert_eq!(d.name(), "cor_minus_brut");
        assert_relative_eq!(d.values()[[0, 0]], 2.0);
        assert_relative_eq!(d.values()[[0, 1]], 4.0);
    }

    #[test]
    fn difference_shape_mismatch() {
        let a = MeanMap::new(
            "a",
            Array2::zeros((1, 2)),
            [SpatialAxis::indexed("y", 1), SpatialAxis::indexed("x", 2)],
        )
        .unwrap();
        let b = MeanMap::new(
            "b",
            Array2::zeros((2, 1)),
            [SpatialAxis::indexed("y", 2), SpatialAxis::indexed("x", 1)],
        )
        .unwrap();
        assert!(matches!(
            a.difference(&b),
            Err(GridError::AlignmentFailure { .. })
        ));
    }

    #[test]
    fn one_spatial_dim_rejected() {
        let s = GriddedSeries::new(
            "tx",
            ArrayD::zeros(IxDyn(&[1, 3])),
            vec![2000],
            vec![SpatialAxis::indexed("station", 3)],
        )
        .unwrap();
        assert!(time_mean(&s).is_err());
    }

    #[test]
    fn new_rejects_axis_mismatch() {
        let err = MeanMap::new(
            "a",
            Array2::zeros((1, 2)),
            [SpatialAxis::indexed("y", 2), SpatialAxis::indexed("x", 2)],
        );
        assert!(err.is_err());
    }
}
