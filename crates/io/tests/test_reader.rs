//! Integration tests for materialising NetCDF files and loading series.

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use tempfile::tempdir;
use thermos_grid::{TimeAxis, load};
use thermos_io::{IoError, ReaderConfig, read_dataset};

// ---------------------------------------------------------------------------
// Helper: programmatic NetCDF fixture builder
// ---------------------------------------------------------------------------

/// A (time, lat, lon) annual-maximum temperature file.
struct FixtureBuilder {
    nt: usize,
    ny: usize,
    nx: usize,
    var_name: String,
    first_year: i32,
    /// Flat data in `[t, lat, lon]` order.
    data: Vec<f64>,
    fill_value: Option<f64>,
    /// `units` of the time variable; `None` stores plain years.
    time_units: Option<String>,
    calendar: Option<String>,
}

impl FixtureBuilder {
    fn new(nt: usize, ny: usize, nx: usize) -> Self {
        let data = (0..nt * ny * nx).map(|i| 300.0 + (i % 7) as f64).collect();
        Self {
            nt,
            ny,
            nx,
            var_name: "tasmax".into(),
            first_year: 1960,
            data,
            fill_value: None,
            time_units: Some("days since 1950-01-01".into()),
            calendar: Some("noleap".into()),
        }
    }

    fn with_var_name(mut self, name: &str) -> Self {
        self.var_name = name.into();
        self
    }

    fn with_data(mut self, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), self.nt * self.ny * self.nx);
        self.data = data;
        self
    }

    fn with_fill_value(mut self, fv: f64) -> Self {
        self.fill_value = Some(fv);
        self
    }

    fn with_year_labels(mut self) -> Self {
        self.time_units = None;
        self.calendar = None;
        self
    }

    fn with_time_units(mut self, units: &str) -> Self {
        self.time_units = Some(units.into());
        self
    }

    fn time_values(&self) -> Vec<f64> {
        (0..self.nt)
            .map(|t| {
                let year = self.first_year + t as i32;
                match self.time_units {
                    // Mid-year offsets on a 365-day calendar.
                    Some(_) => (year - 1950) as f64 * 365.0 + 182.0,
                    None => year as f64,
                }
            })
            .collect()
    }

    fn write(&self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        let mut file = netcdf::create(&path).expect("failed to create NetCDF file");

        file.add_dimension("time", self.nt).expect("add dim time");
        file.add_dimension("lat", self.ny).expect("add dim lat");
        file.add_dimension("lon", self.nx).expect("add dim lon");

        {
            let lons: Vec<f64> = (0..self.nx).map(|i| 5.0 + 0.25 * i as f64).collect();
            let mut var = file.add_variable::<f64>("lon", &["lon"]).expect("add var lon");
            var.put_values(&lons, ..).expect("put lon values");
        }
        {
            let lats: Vec<f64> = (0..self.ny).map(|i| 43.0 + 0.25 * i as f64).collect();
            let mut var = file.add_variable::<f64>("lat", &["lat"]).expect("add var lat");
            var.put_values(&lats, ..).expect("put lat values");
        }
        {
            let mut var = file.add_variable::<f64>("time", &["time"]).expect("add var time");
            var.put_values(&self.time_values(), ..).expect("put time values");
            if let Some(units) = &self.time_units {
                var.put_attribute("units", units.as_str()).expect("add time units");
            }
            if let Some(calendar) = &self.calendar {
                var.put_attribute("calendar", calendar.as_str())
                    .expect("add time calendar");
            }
        }
        {
            let mut var = file
                .add_variable::<f64>(&self.var_name, &["time", "lat", "lon"])
                .expect("add data var");
            if let Some(fv) = self.fill_value {
                var.put_attribute("_FillValue", fv).expect("add _FillValue");
            }
            var.put_attribute("units", "K").expect("add units");
            var.put_values(&self.data, ..).expect("put data values");
        }

        path
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn reads_data_and_coordinates() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(3, 2, 4).write(dir.path(), "txx_model.nc");

    let ds = read_dataset(&path, &ReaderConfig::default()).unwrap();
    assert_eq!(ds.names().collect::<Vec<_>>(), vec!["tasmax"]);

    let var = ds.get("tasmax").unwrap();
    assert_eq!(var.dims(), &["time", "lat", "lon"]);
    assert_eq!(var.values().shape(), &[3, 2, 4]);
    assert_eq!(var.coord("lon").unwrap().len(), 4);

    let (dim, axis) = var.time().unwrap();
    assert_eq!(dim, "time");
    assert!(matches!(axis, TimeAxis::Encoded { calendar: Some(c), .. } if c == "noleap"));
}

#[test]
fn load_decodes_years_and_converts_kelvin() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(3, 2, 2).write(dir.path(), "txx_model.nc");

    let ds = read_dataset(&path, &ReaderConfig::default()).unwrap();
    let series = load(&ds, &["tasmax", "tx", "tasmaxAdjust"]).unwrap();
    assert_eq!(series.years(), &[1960, 1961, 1962]);
    assert_relative_eq!(series.values()[[0, 0, 0]], 300.0 - 273.15, epsilon = 1e-9);
    assert_eq!(series.spatial()[0].name(), "lat");
    assert_relative_eq!(series.spatial()[1].coords()[1], 5.25);
}

#[test]
fn plain_year_axis() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(2, 1, 1)
        .with_year_labels()
        .write(dir.path(), "obs.nc");

    let ds = read_dataset(&path, &ReaderConfig::default()).unwrap();
    let series = load(&ds, &["tasmax"]).unwrap();
    assert_eq!(series.years(), &[1960, 1961]);
}

#[test]
fn fill_values_become_nan() {
    let dir = tempdir().unwrap();
    let mut data = vec![30.0; 4];
    data[2] = -9999.0;
    let path = FixtureBuilder::new(1, 2, 2)
        .with_data(data)
        .with_fill_value(-9999.0)
        .write(dir.path(), "masked.nc");

    let ds = read_dataset(&path, &ReaderConfig::default()).unwrap();
    let values = ds.get("tasmax").unwrap().values();
    assert!(values[[0, 1, 0]].is_nan());
    assert_relative_eq!(values[[0, 0, 0]], 30.0);

    let raw = read_dataset(&path, &ReaderConfig::default().with_mask_and_scale(false)).unwrap();
    assert_relative_eq!(raw.get("tasmax").unwrap().values()[[0, 1, 0]], -9999.0);
}

#[test]
fn variable_selection() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(1, 1, 1)
        .with_var_name("tx")
        .write(dir.path(), "obs.nc");

    let aliases = ReaderConfig::default().with_variables(["tasmax", "tx"]);
    let ds = read_dataset(&path, &aliases).unwrap();
    assert_eq!(ds.names().collect::<Vec<_>>(), vec!["tx"]);
    assert!(load(&ds, &["tasmax", "tx"]).is_ok());
}

#[test]
fn requested_variables_all_missing() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(1, 1, 1)
        .with_var_name("tx")
        .write(dir.path(), "obs.nc");

    let only_pr = ReaderConfig::default().with_variables(["pr", "prAdjust"]);
    let err = read_dataset(&path, &only_pr).unwrap_err();
    match err {
        IoError::MissingVariable { name, path: p } => {
            assert_eq!(name, "pr|prAdjust");
            assert_eq!(p, path);
        }
        other => panic!("expected MissingVariable, got {other:?}"),
    }
}

#[test]
fn unknown_time_units_soft_fail() {
    let dir = tempdir().unwrap();
    let path = FixtureBuilder::new(2, 1, 1)
        .with_time_units("weeks since 1950-01-01")
        .write(dir.path(), "odd.nc");

    let ds = read_dataset(&path, &ReaderConfig::default()).unwrap();
    let series = load(&ds, &["tasmax"]).unwrap();
    // Raw offsets are kept when years cannot be decoded.
    assert_eq!(series.years(), &[3832, 4197]);
}

#[test]
fn missing_file() {
    let err = read_dataset(Path::new("/nonexistent/txx.nc"), &ReaderConfig::default())
        .unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}
