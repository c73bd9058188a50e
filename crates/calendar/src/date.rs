//! Calendar-aware date with day arithmetic.

use chrono::{Datelike, NaiveDate, TimeDelta};

use crate::calendar::{Calendar, GREGORIAN_START};
use crate::error::CalendarError;

/// A date on a specific CF [`Calendar`].
///
/// Unlike [`chrono::NaiveDate`], this can represent February 30 on a
/// `360_day` calendar or refuse February 29 on a `noleap` one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarDate {
    year: i32,
    month: u8,
    day: u8,
    calendar: Calendar,
}

impl CalendarDate {
    /// Creates a new date after checking it exists on `calendar`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] or [`CalendarError::InvalidDay`]
    /// when the date does not exist on `calendar`.
    pub fn new(year: i32, month: u8, day: u8, calendar: Calendar) -> Result<Self, CalendarError> {
        let max_day = calendar.days_in_month(year, month)?;
        if day == 0 || day > max_day {
            return Err(CalendarError::InvalidDay {
                day,
                month,
                max_day,
            });
        }
        Ok(Self {
            year,
            month,
            day,
            calendar,
        })
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u8 {
        self.month
    }

    /// Returns the day within the month.
    pub fn day(self) -> u8 {
        self.day
    }

    /// Returns the calendar this date lives on.
    pub fn calendar(self) -> Calendar {
        self.calendar
    }

    /// Zero-based day index within the year (January 1 is 0).
    pub fn ordinal0(self) -> u16 {
        let before: u16 = (1..self.month)
            .map(|m| {
                // Months before `self.month` are always valid.
                self.calendar.days_in_month(self.year, m).unwrap_or(0) as u16
            })
            .sum();
        before + self.day as u16 - 1
    }

    /// Moves the date by `days` (negative values move backwards).
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OffsetOutOfRange`] if the result cannot be
    /// represented.
    pub fn add_days(self, days: i64) -> Result<Self, CalendarError> {
        if self.calendar.is_gregorian() {
            return self.add_days_gregorian(days);
        }
        if self.calendar == Calendar::Standard {
            return self.add_days_mixed(days);
        }

        let out_of_range = || CalendarError::OffsetOutOfRange {
            value: days as f64,
        };

        let mut year = self.year as i64;
        let mut ordinal = self.ordinal0() as i64 + days;

        // Collapse whole cycles first so the year walk below is short.
        let cycle_days = match self.calendar {
            Calendar::NoLeap => 365,
            Calendar::AllLeap => 366,
            Calendar::Day360 => 360,
            // Any four consecutive Julian years hold exactly one leap day.
            _ => 1461,
        };
        let cycle_years = if self.calendar == Calendar::Julian { 4 } else { 1 };
        let cycles = ordinal.div_euclid(cycle_days);
        year += cycles * cycle_years;
        ordinal -= cycles * cycle_days;

        loop {
            let y = i32::try_from(year).map_err(|_| out_of_range())?;
            let len = self.calendar.days_in_year(y) as i64;
            if ordinal < len {
                break;
            }
            ordinal -= len;
            year += 1;
        }

        let year = i32::try_from(year).map_err(|_| out_of_range())?;
        let mut remaining = ordinal as u16;
        for month in 1..=12u8 {
            let len = self.calendar.days_in_month(year, month)? as u16;
            if remaining < len {
                return Self::new(year, month, remaining as u8 + 1, self.calendar);
            }
            remaining -= len;
        }
        Err(out_of_range())
    }

    fn add_days_gregorian(self, days: i64) -> Result<Self, CalendarError> {
        let out_of_range = || CalendarError::OffsetOutOfRange {
            value: days as f64,
        };
        let base = NaiveDate::from_ymd_opt(self.year, self.month as u32, self.day as u32)
            .ok_or_else(out_of_range)?;
        let delta = TimeDelta::try_days(days).ok_or_else(out_of_range)?;
        let moved = base.checked_add_signed(delta).ok_or_else(out_of_range)?;
        Ok(Self::from_naive(moved, self.calendar))
    }

    /// Day arithmetic on the `standard` calendar through Julian day numbers,
    /// switching rules at 1582-10-15.
    fn add_days_mixed(self, days: i64) -> Result<Self, CalendarError> {
        let out_of_range = || CalendarError::OffsetOutOfRange {
            value: days as f64,
        };

        let start = if (self.year, self.month, self.day) >= GREGORIAN_START {
            NaiveDate::from_ymd_opt(self.year, self.month as u32, self.day as u32)
                .map(|d| i64::from(d.num_days_from_ce()) + CE_TO_JDN)
                .ok_or_else(out_of_range)?
        } else {
            julian_to_jdn(self.year, self.month, self.day)
        };
        let jdn = start.checked_add(days).ok_or_else(out_of_range)?;

        if jdn >= GREGORIAN_START_JDN {
            let ce = i32::try_from(jdn - CE_TO_JDN).map_err(|_| out_of_range())?;
            let moved = NaiveDate::from_num_days_from_ce_opt(ce).ok_or_else(out_of_range)?;
            Ok(Self::from_naive(moved, self.calendar))
        } else {
            let (year, month, day) = jdn_to_julian(jdn);
            let year = i32::try_from(year).map_err(|_| out_of_range())?;
            Ok(Self {
                year,
                month,
                day,
                calendar: self.calendar,
            })
        }
    }

    fn from_naive(date: NaiveDate, calendar: Calendar) -> Self {
        Self {
            year: date.year(),
            month: date.month() as u8,
            day: date.day() as u8,
            calendar,
        }
    }
}

/// Offset from chrono's days-from-CE count to the Julian day number.
const CE_TO_JDN: i64 = 1_721_425;

/// Julian day number of 1582-10-15 (Gregorian).
const GREGORIAN_START_JDN: i64 = 2_299_161;

/// Julian day number of a Julian-calendar date.
fn julian_to_jdn(year: i32, month: u8, day: u8) -> i64 {
    let a = (14 - i64::from(month)) / 12;
    let y = i64::from(year) + 4800 - a;
    let m = i64::from(month) + 12 * a - 3;
    i64::from(day) + (153 * m + 2) / 5 + 365 * y + y.div_euclid(4) - 32_083
}

/// Julian-calendar `(year, month, day)` of a Julian day number.
fn jdn_to_julian(jdn: i64) -> (i64, u8, u8) {
    let c = jdn + 32_082;
    let d = (4 * c + 3).div_euclid(1461);
    let e = c - (1461 * d).div_euclid(4);
    let m = (5 * e + 2) / 153;
    let day = e - (153 * m + 2) / 5 + 1;
    let month = m + 3 - 12 * (m / 10);
    let year = d - 4800 + m / 10;
    (year, month as u8, day as u8)
}
