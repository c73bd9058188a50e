//! Temperature unit detection and conversion.

/// Offset between Kelvin and degrees Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Mean above which a temperature field is taken to be in Kelvin.
pub const KELVIN_MEAN_THRESHOLD: f64 = 200.0;

/// Decide whether a temperature field is in Kelvin.
///
/// The field is taken to be Kelvin when the NaN-ignoring mean of all its
/// values is strictly greater than [`KELVIN_MEAN_THRESHOLD`]. An all-NaN
/// field is never Kelvin.
pub fn is_kelvin<'a>(values: impl IntoIterator<Item = &'a f64>) -> bool {
    let mean = thermos_stats::nan_mean_iter(values.into_iter().copied());
    mean > KELVIN_MEAN_THRESHOLD
}

/// Convert a Kelvin value to degrees Celsius. NaN stays NaN.
#[inline]
pub fn kelvin_to_celsius(value: f64) -> f64 {
    value - KELVIN_OFFSET
}
