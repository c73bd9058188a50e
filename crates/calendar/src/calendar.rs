//! CF calendar kinds and their month and year lengths.

use std::fmt;
use std::str::FromStr;

use crate::error::CalendarError;

/// Number of days in each month of a common (non-leap) year
/// (index 0 unused, index 1 = January, ..., index 12 = December).
const DAYS_PER_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// First day of Gregorian rules in the `standard` calendar.
pub(crate) const GREGORIAN_START: (i32, u8, u8) = (1582, 10, 15);

/// Calendars recognised in the `calendar` attribute of a CF time variable.
///
/// `standard` and `gregorian` follow CF: Julian rules up to 1582-10-04,
/// Gregorian rules from 1582-10-15 on. The ten skipped days are accepted as
/// Julian dates when constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Calendar {
    /// Mixed Julian/Gregorian calendar.
    #[default]
    Standard,
    /// Gregorian rules extended to all years.
    ProlepticGregorian,
    /// Every year has 365 days.
    NoLeap,
    /// Every year has 366 days.
    AllLeap,
    /// Twelve months of 30 days.
    Day360,
    /// Leap year every fourth year.
    Julian,
}

impl Calendar {
    /// Returns `true` if `year` has a February 29 in this calendar.
    pub fn is_leap_year(self, year: i32) -> bool {
        match self {
            Self::Standard if year < GREGORIAN_START.0 => year.rem_euclid(4) == 0,
            Self::Standard | Self::ProlepticGregorian => {
                year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
            }
            Self::Julian => year.rem_euclid(4) == 0,
            Self::AllLeap => true,
            Self::NoLeap | Self::Day360 => false,
        }
    }

    /// Number of days in `month` of `year`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
    pub fn days_in_month(self, year: i32, month: u8) -> Result<u8, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        if self == Self::Day360 {
            return Ok(30);
        }
        if month == 2 && self.is_leap_year(year) {
            return Ok(29);
        }
        Ok(DAYS_PER_MONTH[month as usize])
    }

    /// Number of days in `year`.
    pub fn days_in_year(self, year: i32) -> u16 {
        match self {
            Self::Day360 => 360,
            _ if self.is_leap_year(year) => 366,
            _ => 365,
        }
    }

    /// Canonical CF name of this calendar.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::ProlepticGregorian => "proleptic_gregorian",
            Self::NoLeap => "noleap",
            Self::AllLeap => "all_leap",
            Self::Day360 => "360_day",
            Self::Julian => "julian",
        }
    }

    /// Returns `true` for the calendar whose arithmetic is delegated to chrono.
    pub(crate) fn is_gregorian(self) -> bool {
        self == Self::ProlepticGregorian
    }
}

impl FromStr for Calendar {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "standard" | "gregorian" => Ok(Self::Standard),
            "proleptic_gregorian" => Ok(Self::ProlepticGregorian),
            "noleap" | "no_leap" | "365_day" => Ok(Self::NoLeap),
            "all_leap" | "366_day" => Ok(Self::AllLeap),
            "360_day" => Ok(Self::Day360),
            "julian" => Ok(Self::Julian),
            _ => Err(CalendarError::UnknownCalendar {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
