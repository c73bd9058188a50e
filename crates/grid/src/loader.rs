//! Extraction of a [`GriddedSeries`] from a raw dataset.

use std::collections::HashSet;

use ndarray::IxDyn;
use thermos_calendar::{Calendar, CalendarError, TimeUnits, decode_years};
use tracing::{debug, warn};

use crate::error::GridError;
use crate::raw::{RawDataset, TimeAxis};
use crate::series::{GriddedSeries, SpatialAxis};

/// Default variable names tried for daily maximum temperature.
pub const DEFAULT_ALIASES: [&str; 3] = ["tasmax", "tx", "tasmaxAdjust"];

/// Map a time axis to integer calendar years.
///
/// Encoded axes are decoded with their CF `units` and `calendar`
/// attributes (a missing calendar means `standard`).
///
/// # Errors
///
/// Returns a [`CalendarError`] if the units or calendar are not understood
/// or an offset cannot be placed on the calendar.
pub fn years_from_time_axis(axis: &TimeAxis) -> Result<Vec<i32>, CalendarError> {
    match axis {
        TimeAxis::Encoded {
            values,
            units,
            calendar,
        } => {
            let units = TimeUnits::parse(units)?;
            let calendar: Calendar = match calendar {
                Some(name) => name.parse()?,
                None => Calendar::default(),
            };
            decode_years(values, &units, calendar)
        }
        TimeAxis::Dates(dates) => Ok(dates.iter().map(|d| d.year()).collect()),
        TimeAxis::Years(years) => Ok(years.clone()),
    }
}

/// Extract the first variable matching `aliases` as a unit-normalised series.
///
/// The time dimension is moved to axis 0 and its labels are mapped to
/// years. If year mapping fails the raw time labels are kept and a warning
/// is logged. Spatial dimensions without a coordinate variable are labelled
/// `0..len`. Loading the same dataset twice yields identical series.
///
/// # Errors
///
/// Returns [`GridError::NotFound`] if no alias is present and
/// [`GridError::InvalidSeries`] if the variable has no time dimension, its
/// coordinates disagree with its shape, or its year labels repeat. Raw
/// labels kept after a failed year mapping must be finite and distinct
/// once rounded.
pub fn load<S: AsRef<str>>(dataset: &RawDataset, aliases: &[S]) -> Result<GriddedSeries, GridError> {
    let Some((name, var)) = aliases
        .iter()
        .map(AsRef::as_ref)
        .find_map(|a| dataset.get(a).map(|v| (a, v)))
    else {
        return Err(GridError::NotFound {
            aliases: aliases.iter().map(|a| a.as_ref().to_string()).collect(),
        });
    };
    let invalid = |reason: String| GridError::InvalidSeries {
        name: name.to_string(),
        reason,
    };

    let dims = var.dims();
    let values = var.values();
    if dims.len() != values.ndim() {
        return Err(invalid(format!(
            "{} dimension names for a {}-d array",
            dims.len(),
            values.ndim()
        )));
    }

    let Some((time_dim, time_axis)) = var.time() else {
        return Err(invalid("no time dimension".to_string()));
    };
    let Some(time_pos) = dims.iter().position(|d| d == time_dim) else {
        return Err(invalid(format!("time dimension '{time_dim}' is not a dimension of the variable")));
    };
    if time_axis.len() != values.shape()[time_pos] {
        return Err(invalid(format!(
            "time axis has {} labels but dimension '{time_dim}' has length {}",
            time_axis.len(),
            values.shape()[time_pos]
        )));
    }

    let mut order = Vec::with_capacity(dims.len());
    order.push(time_pos);
    order.extend((0..dims.len()).filter(|&i| i != time_pos));

    let mut spatial = Vec::with_capacity(dims.len() - 1);
    for &i in &order[1..] {
        let dim = dims[i].as_str();
        let len = values.shape()[i];
        let axis = match var.coord(dim) {
            Some(labels) if labels.len() == len => SpatialAxis::new(dim, labels.to_vec()),
            Some(labels) => {
                return Err(invalid(format!(
                    "coordinate '{dim}' has {} labels but dimension length {len}",
                    labels.len()
                )));
            }
            None => SpatialAxis::indexed(dim, len),
        };
        spatial.push(axis);
    }

    let values = values
        .clone()
        .permuted_axes(IxDyn(&order))
        .as_standard_layout()
        .into_owned();

    let years = match years_from_time_axis(time_axis) {
        Ok(years) => years,
        Err(e) => {
            let Some(labels) = time_axis.raw_labels() else {
                return Err(invalid(format!(
                    "time axis has non-finite values and cannot be mapped to years: {e}"
                )));
            };
            let mut seen = HashSet::with_capacity(labels.len());
            if let Some(dup) = labels.iter().find(|l| !seen.insert(**l)) {
                return Err(invalid(format!(
                    "time labels repeat ({dup}) once rounded, after year mapping failed: {e}"
                )));
            }
            warn!(variable = name, error = %e, "could not map time to years, keeping raw labels");
            labels
        }
    };

    debug!(
        variable = name,
        n_years = years.len(),
        spatial_dims = spatial.len(),
        "loaded series"
    );

    Ok(GriddedSeries::new(name, values, years, spatial)?.normalize_units())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawVariable;
    use approx::assert_relative_eq;
    use ndarray::ArrayD;

    fn variable(dims: &[&str], shape: &[usize], fill: f64) -> RawVariable {
        RawVariable::new(
            dims.iter().map(|d| d.to_string()).collect(),
            ArrayD::from_elem(IxDyn(shape), fill),
        )
    }

    #[test]
    fn years_from_encoded_axis() {
        let axis = TimeAxis::Encoded {
            values: vec![181.0, 546.0],
            units: "days since 1959-01-01".to_string(),
            calendar: Some("noleap".to_string()),
        };
        assert_eq!(years_from_time_axis(&axis).unwrap(), vec![1959, 1960]);
    }

    #[test]
    fn years_from_unknown_calendar_fails() {
        let axis = TimeAxis::Encoded {
            values: vec![0.0],
            units: "days since 1959-01-01".to_string(),
            calendar: Some("lunar".to_string()),
        };
        assert!(years_from_time_axis(&axis).is_err());
    }

    #[test]
    fn first_present_alias_wins() {
        let ds = RawDataset::new()
            .with_variable(
                "tx",
                variable(&["time", "y", "x"], &[1, 1, 1], 1.0)
                    .with_time("time", TimeAxis::Years(vec![2000])),
            )
            .with_variable(
                "tasmaxAdjust",
                variable(&["time", "y", "x"], &[1, 1, 1], 2.0)
                    .with_time("time", TimeAxis::Years(vec![2000])),
            );
        let s = load(&ds, &DEFAULT_ALIASES).unwrap();
        assert_eq!(s.name(), "tx");
        assert_relative_eq!(s.values()[[0, 0, 0]], 1.0);
    }

    #[test]
    fn missing_aliases_is_not_found() {
        let ds = RawDataset::new().with_variable("pr", variable(&["time"], &[1], 0.0));
        let err = load(&ds, &DEFAULT_ALIASES).unwrap_err();
        assert_eq!(
            err,
            GridError::NotFound {
                aliases: vec!["tasmax".into(), "tx".into(), "tasmaxAdjust".into()]
            }
        );
    }

    #[test]
    fn no_time_dimension_is_invalid() {
        let ds = RawDataset::new().with_variable("tx", variable(&["y", "x"], &[2, 2], 0.0));
        assert!(matches!(
            load(&ds, &["tx"]),
            Err(GridError::InvalidSeries { .. })
        ));
    }

    #[test]
    fn time_moved_to_front() {
        let mut values = ArrayD::zeros(IxDyn(&[2, 3]));
        values[[1, 2]] = 5.0;
        let var = RawVariable::new(vec!["x".into(), "time".into()], values)
            .with_coord("x", vec![10.0, 20.0])
            .with_time("time", TimeAxis::Years(vec![2000, 2001, 2002]));
        let ds = RawDataset::new().with_variable("tx", var);

        let s = load(&ds, &["tx"]).unwrap();
        assert_eq!(s.values().shape(), &[3, 2]);
        assert_relative_eq!(s.values()[[2, 1]], 5.0);
        assert_eq!(s.spatial()[0].coords(), &[10.0, 20.0]);
    }

    #[test]
    fn coordinate_length_mismatch_is_invalid() {
        let var = variable(&["time", "x"], &[1, 2], 0.0)
            .with_coord("x", vec![1.0, 2.0, 3.0])
            .with_time("time", TimeAxis::Years(vec![2000]));
        let ds = RawDataset::new().with_variable("tx", var);
        assert!(load(&ds, &["tx"]).is_err());
    }

    #[test]
    fn undecodable_time_keeps_raw_labels() {
        let var = variable(&["time", "x"], &[2, 1], 0.0).with_time(
            "time",
            TimeAxis::Encoded {
                values: vec![1990.0, 1991.0],
                units: "fortnights".to_string(),
                calendar: None,
            },
        );
        let ds = RawDataset::new().with_variable("tx", var);
        let s = load(&ds, &["tx"]).unwrap();
        assert_eq!(s.years(), &[1990, 1991]);
    }

    #[test]
    fn undecodable_nan_time_is_invalid() {
        let var = variable(&["time", "x"], &[2, 1], 0.0).with_time(
            "time",
            TimeAxis::Encoded {
                values: vec![1990.0, f64::NAN],
                units: "days since 1950-01-01".to_string(),
                calendar: None,
            },
        );
        let ds = RawDataset::new().with_variable("tx", var);
        let err = load(&ds, &["tx"]).unwrap_err();
        assert!(matches!(err, GridError::InvalidSeries { .. }));
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn undecodable_colliding_labels_are_invalid() {
        let var = variable(&["time", "x"], &[2, 1], 0.0).with_time(
            "time",
            TimeAxis::Encoded {
                values: vec![1990.2, 1989.8],
                units: "fortnights".to_string(),
                calendar: None,
            },
        );
        let ds = RawDataset::new().with_variable("tx", var);
        let err = load(&ds, &["tx"]).unwrap_err();
        assert!(err.to_string().contains("repeat (1990)"));
    }

    #[test]
    fn kelvin_input_is_converted() {
        let var = variable(&["time", "x"], &[1, 2], 310.15)
            .with_time("time", TimeAxis::Years(vec![2000]));
        let ds = RawDataset::new().with_variable("tx", var);
        let s = load(&ds, &["tx"]).unwrap();
        assert!(s.is_normalized());
        assert_relative_eq!(s.values()[[0, 0]], 37.0, epsilon = 1e-9);
    }
}
