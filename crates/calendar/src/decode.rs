//! Decoding of numeric CF time offsets into dates and years.

use crate::calendar::Calendar;
use crate::date::CalendarDate;
use crate::error::CalendarError;
use crate::units::TimeUnits;

/// Largest offset, in days, accepted before the arithmetic is refused.
const MAX_ABS_DAYS: f64 = 1.0e9;

/// Decode raw offsets into calendar dates.
///
/// Each value is scaled by the unit length, shifted by the epoch's time of
/// day, floored to whole days, and added to the epoch on `calendar`.
///
/// # Errors
///
/// Returns [`CalendarError::NonFiniteOffset`] for NaN or infinite values,
/// [`CalendarError::OffsetOutOfRange`] for offsets too large to place, and
/// any error from placing the epoch on `calendar`.
pub fn decode_dates(
    offsets: &[f64],
    units: &TimeUnits,
    calendar: Calendar,
) -> Result<Vec<CalendarDate>, CalendarError> {
    let epoch = units.epoch(calendar)?;

    offsets
        .iter()
        .enumerate()
        .map(|(index, &offset)| {
            if !offset.is_finite() {
                return Err(CalendarError::NonFiniteOffset { index });
            }
            let days = units.whole_days(offset);
            if days.abs() > MAX_ABS_DAYS {
                return Err(CalendarError::OffsetOutOfRange { value: days });
            }
            epoch.add_days(days as i64)
        })
        .collect()
}

/// Decode raw offsets straight to calendar years.
///
/// # Errors
///
/// Same conditions as [`decode_dates`].
pub fn decode_years(
    offsets: &[f64],
    units: &TimeUnits,
    calendar: Calendar,
) -> Result<Vec<i32>, CalendarError> {
    Ok(decode_dates(offsets, units, calendar)?
        .into_iter()
        .map(CalendarDate::year)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_years_noleap_annual() {
        let units = TimeUnits::parse("days since 1950-01-01").unwrap();
        let offsets: Vec<f64> = (0..5).map(|i| i as f64 * 365.0 + 181.0).collect();
        let years = decode_years(&offsets, &units, Calendar::NoLeap).unwrap();
        assert_eq!(years, vec![1950, 1951, 1952, 1953, 1954]);
    }

    #[test]
    fn decode_years_360_day() {
        let units = TimeUnits::parse("days since 2006-01-01").unwrap();
        let years = decode_years(&[0.0, 359.0, 360.0, 3600.0], &units, Calendar::Day360).unwrap();
        assert_eq!(years, vec![2006, 2006, 2007, 2016]);
    }

    #[test]
    fn decode_dates_standard_hours() {
        let units = TimeUnits::parse("hours since 2000-02-28 00:00:00").unwrap();
        let dates = decode_dates(&[0.0, 24.0, 48.0], &units, Calendar::Standard).unwrap();
        let md: Vec<(u8, u8)> = dates.iter().map(|d| (d.month(), d.day())).collect();
        assert_eq!(md, vec![(2, 28), (2, 29), (3, 1)]);
    }

    #[test]
    fn decode_dates_epoch_time_of_day_rolls_over() {
        // 18:00 + 12h lands on the next day.
        let units = TimeUnits::parse("hours since 1999-12-31 18:00:00").unwrap();
        let dates = decode_dates(&[12.0], &units, Calendar::Standard).unwrap();
        assert_eq!(
            (dates[0].year(), dates[0].month(), dates[0].day()),
            (2000, 1, 1)
        );
    }

    #[test]
    fn decode_rejects_nan_with_index() {
        let units = TimeUnits::parse("days since 2000-01-01").unwrap();
        let err = decode_years(&[0.0, f64::NAN], &units, Calendar::NoLeap).unwrap_err();
        assert_eq!(err, CalendarError::NonFiniteOffset { index: 1 });
    }

    #[test]
    fn decode_rejects_huge_offsets() {
        let units = TimeUnits::parse("days since 2000-01-01").unwrap();
        let err = decode_years(&[1.0e12], &units, Calendar::NoLeap).unwrap_err();
        assert!(matches!(err, CalendarError::OffsetOutOfRange { .. }));
    }

    #[test]
    fn decode_empty() {
        let units = TimeUnits::parse("days since 2000-01-01").unwrap();
        assert!(decode_years(&[], &units, Calendar::NoLeap).unwrap().is_empty());
    }
}
