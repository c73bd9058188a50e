//! High-level NetCDF reader configuration and orchestration.

use std::collections::BTreeMap;
use std::path::Path;

use ndarray::{ArrayD, IxDyn};
use thermos_grid::{RawDataset, RawVariable, TimeAxis};
use tracing::{debug, info};

use crate::error::IoError;
use crate::netcdf_read;

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for materialising a NetCDF file into a [`RawDataset`].
///
/// Use the builder methods (`with_*`) to customise the time coordinate
/// names, CF masking and which variables are read. The [`Default`]
/// implementation reads every data variable and applies CF masking.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Dimension names recognised as the time axis.
    time_aliases: Vec<String>,
    /// Whether to apply `_FillValue` / `missing_value` / `scale_factor` / `add_offset`.
    mask_and_scale: bool,
    /// Restrict reading to these data variables. `None` reads all.
    variables: Option<Vec<String>>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            time_aliases: vec!["time".into(), "t".into()],
            mask_and_scale: true,
            variables: None,
        }
    }
}

impl ReaderConfig {
    /// Set the dimension names recognised as time.
    pub fn with_time_aliases<S: Into<String>>(mut self, aliases: impl IntoIterator<Item = S>) -> Self {
        self.time_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable CF fill-value masking and unpacking.
    pub fn with_mask_and_scale(mut self, enabled: bool) -> Self {
        self.mask_and_scale = enabled;
        self
    }

    /// Read only the named data variables. Names absent from the file are
    /// ignored as long as one of them is present, so a list of aliases can
    /// be passed directly.
    pub fn with_variables<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.variables = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if no time alias is configured or a
    /// requested variable list is empty.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if self.time_aliases.is_empty() {
            problems.push("time_aliases must not be empty".to_string());
        }
        if self.variables.as_ref().is_some_and(Vec::is_empty) {
            problems.push("variables list must not be empty when given".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }

    fn is_time(&self, dim: &str) -> bool {
        self.time_aliases.iter().any(|a| a == dim)
    }

    fn wants(&self, name: &str) -> bool {
        self.variables
            .as_ref()
            .is_none_or(|names| names.iter().any(|n| n == name))
    }
}

// ---------------------------------------------------------------------------
// read_dataset
// ---------------------------------------------------------------------------

/// Materialise a NetCDF file into a [`RawDataset`].
///
/// Every data variable (anything that is not a 1-D coordinate variable) is
/// read as `f64`. Coordinate variables are attached to the data variables
/// that use their dimension. A dimension listed in the time aliases becomes
/// the variable's time axis: [`TimeAxis::Encoded`] when its coordinate has
/// a `"<unit> since <epoch>"` units attribute, [`TimeAxis::Years`]
/// otherwise. Variables that cannot be read as numbers are skipped unless
/// they were requested explicitly.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist,
/// [`IoError::Validation`] for an invalid configuration,
/// [`IoError::MissingVariable`] if a variable list was given and none of
/// its names is a data variable of the file, and [`IoError::Netcdf`] if the
/// library fails to read a requested variable.
pub fn read_dataset(path: &Path, config: &ReaderConfig) -> Result<RawDataset, IoError> {
    config.validate()?;

    let file = netcdf_read::open_file(path)?;

    // -- Coordinates --------------------------------------------------------

    let mut coords: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut time_axes: BTreeMap<String, TimeAxis> = BTreeMap::new();

    for var in file.variables().filter(|v| netcdf_read::is_coordinate(v)) {
        let name = var.name();
        let values = netcdf_read::read_values(&var, config.mask_and_scale)?;
        if config.is_time(&name) {
            time_axes.insert(name.clone(), time_axis(&var, &values));
        }
        coords.insert(name, values);
    }

    // -- Data variables -----------------------------------------------------

    let mut dataset = RawDataset::new();
    for var in file.variables() {
        let name = var.name();
        if netcdf_read::is_coordinate(&var) || !config.wants(&name) {
            continue;
        }

        let values = match netcdf_read::read_values(&var, config.mask_and_scale) {
            Ok(v) => v,
            Err(e) if config.variables.is_none() => {
                debug!(variable = %name, error = %e, "skipping non-numeric variable");
                continue;
            }
            Err(e) => return Err(e),
        };

        let dims = netcdf_read::dimension_names(&var);
        let shape = netcdf_read::shape(&var);
        let array = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| {
            IoError::Validation {
                count: 1,
                details: format!("variable '{name}' has shape {shape:?}: {e}"),
            }
        })?;

        let mut raw = RawVariable::new(dims.clone(), array);
        for dim in &dims {
            if let Some(labels) = coords.get(dim) {
                raw = raw.with_coord(dim.clone(), labels.clone());
            }
            if let Some(axis) = time_axes.get(dim) {
                raw = raw.with_time(dim.clone(), axis.clone());
            }
        }

        debug!(variable = %name, ?shape, "read variable");
        dataset.insert(name, raw);
    }

    if let Some(names) = &config.variables
        && dataset.is_empty()
    {
        return Err(IoError::MissingVariable {
            name: names.join("|"),
            path: path.to_path_buf(),
        });
    }

    info!(
        path = %path.display(),
        n_variables = dataset.len(),
        n_coordinates = coords.len(),
        "read dataset"
    );

    Ok(dataset)
}

/// Build the time axis of a coordinate variable from its attributes.
///
/// Values without a `"<unit> since <epoch>"` units attribute are taken as
/// years when they are all finite. Otherwise they stay encoded, and the
/// loader decides what to do with them.
fn time_axis(var: &netcdf::Variable<'_>, values: &[f64]) -> TimeAxis {
    let units = netcdf_read::attribute_string(var, "units");
    match units {
        Some(units) if units.to_ascii_lowercase().contains(" since ") => TimeAxis::Encoded {
            values: values.to_vec(),
            units,
            calendar: netcdf_read::attribute_string(var, "calendar"),
        },
        units => {
            let encoded = TimeAxis::Encoded {
                values: values.to_vec(),
                units: units.unwrap_or_default(),
                calendar: None,
            };
            match encoded.raw_labels() {
                Some(years) => TimeAxis::Years(years),
                None => encoded,
            }
        }
    }
}
