//! NaN-aware descriptive statistics for gridded climate fields.
//!
//! Missing cells are stored as NaN throughout thermos. Every function here
//! skips them instead of letting them poison the result, and reports NaN
//! (or `None`) only when nothing is left to aggregate.

use serde::Serialize;

/// Mean of the non-NaN values. Returns NaN if none remain.
pub fn nan_mean(data: &[f64]) -> f64 {
    nan_mean_iter(data.iter().copied())
}

/// [`nan_mean`] over any iterator of values, for strided array views.
pub fn nan_mean_iter(data: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = data
        .into_iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Population variance (N denominator) of the non-NaN values.
/// Returns NaN if none remain.
pub fn nan_variance(data: &[f64]) -> f64 {
    let m = nan_mean(data);
    if m.is_nan() {
        return f64::NAN;
    }
    nan_mean_iter(data.iter().map(|&x| (x - m) * (x - m)))
}

/// Population standard deviation of the non-NaN values.
pub fn nan_sd(data: &[f64]) -> f64 {
    nan_variance(data).sqrt()
}

/// Smallest non-NaN value, or NaN if none.
pub fn nan_min(data: &[f64]) -> f64 {
    data.iter()
        .copied()
        .filter(|x| !x.is_nan())
        .fold(f64::NAN, f64::min)
}

/// Largest non-NaN value, or NaN if none.
pub fn nan_max(data: &[f64]) -> f64 {
    data.iter()
        .copied()
        .filter(|x| !x.is_nan())
        .fold(f64::NAN, f64::max)
}

/// Descriptive summary of a field, ignoring missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// Number of non-NaN values.
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub sd: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarise the non-NaN values of `data`.
///
/// Returns `None` when every value is missing.
pub fn describe(data: &[f64]) -> Option<Summary> {
    let count = data.iter().filter(|x| !x.is_nan()).count();
    if count == 0 {
        return None;
    }
    Some(Summary {
        count,
        mean: nan_mean(data),
        sd: nan_sd(data),
        min: nan_min(data),
        max: nan_max(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nan_mean() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(nan_mean(&data), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_mean_skips_nan() {
        let data = [1.0, f64::NAN, 3.0];
        assert_relative_eq!(nan_mean(&data), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_mean_all_nan() {
        assert!(nan_mean(&[f64::NAN, f64::NAN]).is_nan());
    }

    #[test]
    fn test_nan_mean_empty() {
        assert!(nan_mean(&[]).is_nan());
    }

    #[test]
    fn test_nan_mean_iter_strided() {
        let m = nan_mean_iter([10.0, f64::NAN, 20.0].into_iter());
        assert_relative_eq!(m, 15.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_sd_population() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // Population variance is exactly 4.
        assert_relative_eq!(nan_variance(&data), 4.0, epsilon = 1e-12);
        assert_relative_eq!(nan_sd(&data), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_sd_single() {
        assert_eq!(nan_sd(&[5.0]), 0.0);
    }

    #[test]
    fn test_min_max_skip_nan() {
        let data = [f64::NAN, -3.5, 12.0, f64::NAN, 0.0];
        assert_eq!(nan_min(&data), -3.5);
        assert_eq!(nan_max(&data), 12.0);
    }

    #[test]
    fn test_min_max_all_nan() {
        assert!(nan_min(&[f64::NAN]).is_nan());
        assert!(nan_max(&[]).is_nan());
    }

    #[test]
    fn test_describe() {
        let data = [1.0, 2.0, f64::NAN, 3.0, 4.0];
        let s = describe(&data).unwrap();
        assert_eq!(s.count, 4);
        assert_relative_eq!(s.mean, 2.5, epsilon = 1e-12);
        assert_relative_eq!(s.sd, 1.25_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn test_describe_all_missing() {
        assert!(describe(&[f64::NAN; 3]).is_none());
    }
}
