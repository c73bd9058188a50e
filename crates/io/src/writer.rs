//! NetCDF output of 2-D map fields and per-year series.

use std::collections::HashSet;
use std::path::Path;

use thermos_grid::{GriddedSeries, MeanMap};
use tracing::info;

use crate::error::IoError;

/// `units` attribute of every written field. Loaded series are in °C.
const UNITS: &str = "degC";

/// Name of the time dimension of written series.
const TIME_DIM: &str = "time";

/// Configuration for writing fields to NetCDF.
#[derive(Debug, Clone, Default)]
pub struct WriterConfig {
    /// Optional global `title` attribute.
    title: Option<String>,
}

impl WriterConfig {
    /// Sets the global `title` attribute.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn write_title(&self, file: &mut netcdf::FileMut) -> Result<(), IoError> {
        if let Some(title) = &self.title {
            file.add_attribute("title", title.as_str())?;
        }
        Ok(())
    }
}

/// Write one or more maps sharing the same spatial axes to a new NetCDF file.
///
/// The axes of the first map become the file's dimensions and coordinate
/// variables. Each map is stored as a `f64` variable named after the map
/// with a NaN `_FillValue`. An existing file at `path` is replaced.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if `maps` is empty, names collide or the
/// axis names differ between maps, [`IoError::DimensionMismatch`] if the
/// map shapes differ, and [`IoError::Netcdf`] if writing fails.
pub fn write_maps(path: &Path, maps: &[MeanMap], config: &WriterConfig) -> Result<(), IoError> {
    let Some(first) = maps.first() else {
        return Err(IoError::Validation {
            count: 1,
            details: "no maps to write".to_string(),
        });
    };
    let [row, col] = first.axes();
    check_layout(maps, row.name(), col.name())?;

    let mut file = netcdf::create(path)?;
    file.add_dimension(row.name(), row.len())?;
    file.add_dimension(col.name(), col.len())?;

    for axis in [row, col] {
        let mut var = file.add_variable::<f64>(axis.name(), &[axis.name()])?;
        var.put_values(axis.coords(), ..)?;
    }

    for map in maps {
        let mut var = file.add_variable::<f64>(map.name(), &[row.name(), col.name()])?;
        var.put_attribute("_FillValue", f64::NAN)?;
        var.put_attribute("units", UNITS)?;
        let data: Vec<f64> = map.values().iter().copied().collect();
        var.put_values(&data, ..)?;
    }
    config.write_title(&mut file)?;

    info!(path = %path.display(), n_maps = maps.len(), "wrote maps");
    Ok(())
}

/// Write a series as one `(time, spatial...)` variable named after it.
///
/// The `time` coordinate holds the year labels as plain numbers, so
/// [`read_dataset`](crate::read_dataset) reads them back as years. Spatial
/// axes get coordinate variables as in [`write_maps`]. An existing file at
/// `path` is replaced.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if two axes share a name or the series
/// is named after an axis, and [`IoError::Netcdf`] if writing fails.
pub fn write_series(path: &Path, series: &GriddedSeries, config: &WriterConfig) -> Result<(), IoError> {
    let mut dims: Vec<&str> = vec![TIME_DIM];
    dims.extend(series.spatial().iter().map(|a| a.name()));

    let mut names: HashSet<&str> = HashSet::with_capacity(dims.len() + 1);
    let mut problems: Vec<String> = dims
        .iter()
        .filter(|d| !names.insert(**d))
        .map(|d| format!("dimension name '{d}' is used twice"))
        .collect();
    if !names.insert(series.name()) {
        problems.push(format!("series name '{}' collides with a dimension", series.name()));
    }
    if !problems.is_empty() {
        return Err(IoError::Validation {
            count: problems.len(),
            details: problems.join("; "),
        });
    }

    let mut file = netcdf::create(path)?;
    file.add_dimension(TIME_DIM, series.n_years())?;
    for axis in series.spatial() {
        file.add_dimension(axis.name(), axis.len())?;
    }

    {
        let years: Vec<f64> = series.years().iter().map(|&y| f64::from(y)).collect();
        let mut var = file.add_variable::<f64>(TIME_DIM, &[TIME_DIM])?;
        var.put_values(&years, ..)?;
        var.put_attribute("long_name", "year")?;
    }
    for axis in series.spatial() {
        let mut var = file.add_variable::<f64>(axis.name(), &[axis.name()])?;
        var.put_values(axis.coords(), ..)?;
    }

    let mut var = file.add_variable::<f64>(series.name(), &dims)?;
    var.put_attribute("_FillValue", f64::NAN)?;
    var.put_attribute("units", UNITS)?;
    let data: Vec<f64> = series.values().iter().copied().collect();
    var.put_values(&data, ..)?;
    config.write_title(&mut file)?;

    info!(path = %path.display(), series = series.name(), n_years = series.n_years(), "wrote series");
    Ok(())
}

fn check_layout(maps: &[MeanMap], row: &str, col: &str) -> Result<(), IoError> {
    if row == col {
        return Err(IoError::Validation {
            count: 1,
            details: format!("both spatial axes are named '{row}'"),
        });
    }

    let mut names: HashSet<&str> = HashSet::from([row, col]);
    let (n_rows, n_cols) = maps[0].values().dim();
    for map in maps {
        let [r, c] = map.axes();
        if r.name() != row || c.name() != col {
            return Err(IoError::Validation {
                count: 1,
                details: format!(
                    "map '{}' has axes ({}, {}), expected ({row}, {col})",
                    map.name(),
                    r.name(),
                    c.name()
                ),
            });
        }
        let (nr, nc) = map.values().dim();
        if nr != n_rows {
            return Err(IoError::DimensionMismatch {
                name: row.to_string(),
                expected: n_rows,
                got: nr,
            });
        }
        if nc != n_cols {
            return Err(IoError::DimensionMismatch {
                name: col.to_string(),
                expected: n_cols,
                got: nc,
            });
        }
        if !names.insert(map.name()) {
            return Err(IoError::Validation {
                count: 1,
                details: format!("variable name '{}' is used twice", map.name()),
            });
        }
    }
    Ok(())
}
