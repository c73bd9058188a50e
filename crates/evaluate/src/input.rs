//! Per-model inputs to the evaluation.

use thermos_grid::GriddedSeries;

/// Raw and bias-corrected series of one model, both already loaded.
#[derive(Debug, Clone)]
pub struct ModelInputs {
    name: String,
    brut: GriddedSeries,
    cor: GriddedSeries,
}

impl ModelInputs {
    pub fn new(name: impl Into<String>, brut: GriddedSeries, cor: GriddedSeries) -> Self {
        Self {
            name: name.into(),
            brut,
            cor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uncorrected model series.
    pub fn brut(&self) -> &GriddedSeries {
        &self.brut
    }

    /// Bias-corrected model series.
    pub fn cor(&self) -> &GriddedSeries {
        &self.cor
    }
}

/// Derive a model name from a file name by removing `prefix` and a `.nc`
/// extension, e.g. `txx_CNRM-ALADIN63.nc` with prefix `txx_` gives
/// `CNRM-ALADIN63`.
pub fn model_name(file_name: &str, prefix: &str) -> String {
    let stem = file_name.strip_suffix(".nc").unwrap_or(file_name);
    stem.strip_prefix(prefix).unwrap_or(stem).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name() {
        assert_eq!(model_name("txx_CNRM-ALADIN63.nc", "txx_"), "CNRM-ALADIN63");
        assert_eq!(model_name("IPSL.nc", "txx_"), "IPSL");
        assert_eq!(model_name("txx_MPI", "txx_"), "MPI");
        assert_eq!(model_name("txx_MPI.nc", ""), "txx_MPI");
    }
}
