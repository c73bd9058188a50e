//! Corrected-minus-raw differences of one model: per year and as time means.

use thermos_grid::{GriddedSeries, MeanMap, align, time_mean};

use crate::error::EvaluateError;
use crate::input::ModelInputs;

/// Time-mean maps of one model.
#[derive(Debug, Clone)]
pub struct DifferenceMaps {
    pub brut: MeanMap,
    pub cor: MeanMap,
    /// `cor - brut`.
    pub diff: MeanMap,
}

impl DifferenceMaps {
    /// The three maps in writing order: difference first.
    pub fn into_vec(self) -> Vec<MeanMap> {
        vec![self.diff, self.brut, self.cor]
    }
}

/// Average raw and corrected series over time and subtract them.
///
/// The corrected series is aligned onto the raw one first, so the maps are
/// labelled with the raw series' spatial axes.
///
/// # Errors
///
/// Returns [`EvaluateError::Grid`] if the series cannot be aligned.
pub fn mean_difference(model: &ModelInputs) -> Result<DifferenceMaps, EvaluateError> {
    let cor = align(model.cor(), model.brut())?;
    let brut = time_mean(model.brut())?.renamed("brut");
    let cor = time_mean(&cor)?.renamed("cor");
    let diff = cor.difference(&brut)?.renamed("diff");
    Ok(DifferenceMaps { brut, cor, diff })
}

/// Per-year `cor - brut` field, named `diff`, over the years both share.
///
/// The corrected series is aligned onto the raw one first.
///
/// # Errors
///
/// Returns [`EvaluateError::Grid`] if the series cannot be aligned or share
/// no year.
pub fn yearly_difference(model: &ModelInputs) -> Result<GriddedSeries, EvaluateError> {
    let cor = align(model.cor(), model.brut())?;
    Ok(cor.difference(model.brut())?.renamed("diff"))
}
