//! Positional alignment of a series onto a reference grid.

use crate::error::GridError;
use crate::series::GriddedSeries;

/// Relabel `target`'s spatial axes with `reference`'s names and coordinates.
///
/// Both series must have exactly two spatial dimensions with equal lengths.
/// Axes are paired by position, never by coordinate value: the values and
/// year labels of `target` are kept unchanged and only the spatial labels
/// are replaced. Aligning a series that already carries the reference's
/// labels returns an equal series.
///
/// # Errors
///
/// Returns [`GridError::AlignmentFailure`] if either series does not have
/// two spatial dimensions or their lengths differ, and
/// [`GridError::ContractViolation`] if either series is not unit-normalised.
pub fn align(target: &GriddedSeries, reference: &GriddedSeries) -> Result<GriddedSeries, GridError> {
    for s in [target, reference] {
        if !s.is_normalized() {
            return Err(GridError::ContractViolation {
                reason: format!("series '{}' has not been unit-normalised", s.name()),
            });
        }
        if s.spatial().len() != 2 {
            return Err(GridError::AlignmentFailure {
                reason: format!(
                    "series '{}' has {} spatial dimensions, expected 2",
                    s.name(),
                    s.spatial().len()
                ),
            });
        }
    }

    for (t, r) in target.spatial().iter().zip(reference.spatial()) {
        if t.len() != r.len() {
            return Err(GridError::AlignmentFailure {
                reason: format!(
                    "dimension '{}' of '{}' has length {} but '{}' of '{}' has length {}",
                    t.name(),
                    target.name(),
                    t.len(),
                    r.name(),
                    reference.name(),
                    r.len()
                ),
            });
        }
    }

    Ok(GriddedSeries::from_parts(
        target.name().to_string(),
        target.values().clone(),
        target.years().to_vec(),
        reference.spatial().to_vec(),
        true,
    ))
}
