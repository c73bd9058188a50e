//! Materialised dataset handle handed to the loader by the data-access layer.
//!
//! Nothing in this module touches a file. An I/O crate (or a test) fills a
//! [`RawDataset`] and passes it to [`load`](crate::load).

use std::collections::BTreeMap;

use ndarray::ArrayD;
use thermos_calendar::CalendarDate;

/// Time coordinate of a raw variable, as found in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeAxis {
    /// CF numeric offsets with their `units` and optional `calendar` attributes.
    Encoded {
        values: Vec<f64>,
        units: String,
        calendar: Option<String>,
    },
    /// Timestamps already decoded to calendar dates.
    Dates(Vec<CalendarDate>),
    /// Plain integer labels, taken to be years.
    Years(Vec<i32>),
}

impl TimeAxis {
    /// Number of time steps.
    pub fn len(&self) -> usize {
        match self {
            Self::Encoded { values, .. } => values.len(),
            Self::Dates(d) => d.len(),
            Self::Years(y) => y.len(),
        }
    }

    /// Returns `true` if the axis has no time steps.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The axis values rounded to integers, without any calendar
    /// interpretation. `None` if an encoded value is NaN, infinite or
    /// outside the `i32` range.
    ///
    /// Used when year extraction fails and the stored labels are kept.
    pub fn raw_labels(&self) -> Option<Vec<i32>> {
        match self {
            Self::Encoded { values, .. } => values
                .iter()
                .map(|v| {
                    let r = v.round();
                    (r.is_finite() && r >= f64::from(i32::MIN) && r <= f64::from(i32::MAX))
                        .then_some(r as i32)
                })
                .collect(),
            Self::Dates(d) => Some(d.iter().map(|d| d.year()).collect()),
            Self::Years(y) => Some(y.clone()),
        }
    }
}

/// One named array of a dataset, with its dimension names and coordinates.
#[derive(Debug, Clone)]
pub struct RawVariable {
    dims: Vec<String>,
    values: ArrayD<f64>,
    coords: BTreeMap<String, Vec<f64>>,
    time: Option<(String, TimeAxis)>,
}

impl RawVariable {
    /// Create a variable from its dimension names and values (NaN = missing).
    ///
    /// Consistency between `dims`, coordinates and the array shape is checked
    /// by the loader, not here.
    pub fn new(dims: Vec<String>, values: ArrayD<f64>) -> Self {
        Self {
            dims,
            values,
            coords: BTreeMap::new(),
            time: None,
        }
    }

    /// Attach coordinate labels for one dimension.
    pub fn with_coord(mut self, dim: impl Into<String>, labels: Vec<f64>) -> Self {
        self.coords.insert(dim.into(), labels);
        self
    }

    /// Mark `dim` as the time dimension and attach its axis.
    pub fn with_time(mut self, dim: impl Into<String>, axis: TimeAxis) -> Self {
        self.time = Some((dim.into(), axis));
        self
    }

    /// Dimension names in array-axis order.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Array values.
    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    /// Coordinate labels of `dim`, if the source provided any.
    pub fn coord(&self, dim: &str) -> Option<&[f64]> {
        self.coords.get(dim).map(Vec::as_slice)
    }

    /// Time dimension name and axis, if the variable has one.
    pub fn time(&self) -> Option<(&str, &TimeAxis)> {
        self.time.as_ref().map(|(d, a)| (d.as_str(), a))
    }
}

/// An opened, fully materialised dataset: variable name to variable.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    variables: BTreeMap<String, RawVariable>,
}

impl RawDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a variable.
    pub fn insert(&mut self, name: impl Into<String>, variable: RawVariable) {
        self.variables.insert(name.into(), variable);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_variable(mut self, name: impl Into<String>, variable: RawVariable) -> Self {
        self.insert(name, variable);
        self
    }

    /// Look up a variable by exact name.
    pub fn get(&self, name: &str) -> Option<&RawVariable> {
        self.variables.get(name)
    }

    /// Variable names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if the dataset holds no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
