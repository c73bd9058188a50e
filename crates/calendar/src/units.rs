//! Parsing of CF `units` strings of the form `"<unit> since <epoch>"`.

use crate::calendar::Calendar;
use crate::date::CalendarDate;
use crate::error::CalendarError;

/// Time step named before `since` in a CF `units` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    /// Length of one unit expressed in days.
    pub fn in_days(self) -> f64 {
        match self {
            Self::Days => 1.0,
            Self::Hours => 1.0 / 24.0,
            Self::Minutes => 1.0 / 1_440.0,
            Self::Seconds => 1.0 / 86_400.0,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "days" | "day" | "d" => Some(Self::Days),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(Self::Hours),
            "minutes" | "minute" | "mins" | "min" => Some(Self::Minutes),
            "seconds" | "second" | "secs" | "sec" | "s" => Some(Self::Seconds),
            _ => None,
        }
    }
}

/// Parsed CF time units: a step length and a reference epoch.
///
/// The epoch is kept as a plain year, month and day and placed on the
/// data's calendar at decode time, so `"days since 1949-12-01"` works for
/// every calendar whose months contain that day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    unit: TimeUnit,
    epoch: (i32, u8, u8),
    /// Time of day of the epoch, as a fraction of a day.
    epoch_day_fraction: f64,
}

impl TimeUnits {
    /// Parses strings such as `"days since 1950-01-01"`,
    /// `"hours since 1949-12-01 00:00:00"` or `"seconds since 1970-1-1T12:00:00Z"`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidUnits`] when the string does not
    /// follow the `"<unit> since <epoch>"` layout or names an unsupported unit.
    pub fn parse(units: &str) -> Result<Self, CalendarError> {
        let invalid = |reason: &str| CalendarError::InvalidUnits {
            units: units.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = units.trim().splitn(3, char::is_whitespace);
        let unit_str = parts.next().unwrap_or_default();
        let since = parts.next().unwrap_or_default();
        let epoch_str = parts.next().unwrap_or_default().trim();

        if !since.eq_ignore_ascii_case("since") {
            return Err(invalid("expected '<unit> since <epoch>'"));
        }
        let unit = TimeUnit::parse(unit_str)
            .ok_or_else(|| invalid(&format!("unsupported time unit '{unit_str}'")))?;

        let (date_part, time_part) = match epoch_str.split_once(['T', ' ']) {
            Some((d, t)) => (d, Some(t.trim())),
            None => (epoch_str, None),
        };

        let epoch = parse_ymd(date_part).ok_or_else(|| invalid("malformed epoch date"))?;
        // Reject impossible epochs early; the day is re-checked per calendar later.
        if !(1..=12).contains(&epoch.1) || !(1..=31).contains(&epoch.2) {
            return Err(invalid("epoch date out of range"));
        }

        let epoch_day_fraction = match time_part {
            Some(t) if !t.is_empty() => {
                parse_hms(t).ok_or_else(|| invalid("malformed epoch time of day"))?
            }
            _ => 0.0,
        };

        Ok(Self {
            unit,
            epoch,
            epoch_day_fraction,
        })
    }

    /// Returns the time step.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Returns the epoch as a date on `calendar`.
    ///
    /// # Errors
    ///
    /// Fails when the epoch day does not exist on `calendar`.
    pub fn epoch(&self, calendar: Calendar) -> Result<CalendarDate, CalendarError> {
        let (y, m, d) = self.epoch;
        CalendarDate::new(y, m, d, calendar)
    }

    /// Converts one raw offset to whole days after the epoch date,
    /// accounting for the epoch's time of day. Fractions round down.
    pub(crate) fn whole_days(&self, offset: f64) -> f64 {
        (offset * self.unit.in_days() + self.epoch_day_fraction).floor()
    }
}

/// Parses `Y-M-D` with optional sign on the year and unpadded fields.
fn parse_ymd(s: &str) -> Option<(i32, u8, u8)> {
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let mut fields = body.split('-');
    let year: i32 = fields.next()?.parse().ok()?;
    let month: u8 = fields.next()?.parse().ok()?;
    let day: u8 = fields.next().unwrap_or("1").parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((if negative { -year } else { year }, month, day))
}

/// Parses `HH[:MM[:SS[.fff]]]` with an optional trailing `Z` or `UTC`
/// into a fraction of a day.
fn parse_hms(s: &str) -> Option<f64> {
    let s = s
        .trim_end_matches("UTC")
        .trim_end_matches('Z')
        .trim();
    let mut fields = s.split(':');
    let h: f64 = fields.next()?.parse().ok()?;
    let m: f64 = fields.next().map_or(Ok(0.0), str::parse::<f64>).ok()?;
    let sec: f64 = fields.next().map_or(Ok(0.0), str::parse::<f64>).ok()?;
    if fields.next().is_some() || !(0.0..24.0).contains(&h) {
        return None;
    }
    Some((h * 3_600.0 + m * 60.0 + sec) / 86_400.0)
}
