//! Error types for the thermos-calendar crate.

/// Error type for all fallible operations in the thermos-calendar crate.
///
/// This enum covers invalid calendar dates, unrecognised calendar names,
/// malformed CF `units` strings, and time offsets that cannot be placed on
/// a calendar.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a day number exceeds the number of days in the given month.
    #[error("invalid day: {day} for month {month} (max {max_day})")]
    InvalidDay {
        /// The invalid day number that was provided.
        day: u8,
        /// The month for which the day is invalid.
        month: u8,
        /// The maximum valid day for the given month.
        max_day: u8,
    },

    /// Returned when a `calendar` attribute names an unsupported calendar.
    #[error("unknown calendar: '{name}'")]
    UnknownCalendar {
        /// The calendar name as found in the file.
        name: String,
    },

    /// Returned when a `units` string does not follow `"<unit> since <epoch>"`.
    #[error("invalid time units '{units}': {reason}")]
    InvalidUnits {
        /// The offending units string.
        units: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Returned when a time offset is NaN or infinite.
    #[error("non-finite time offset at index {index}")]
    NonFiniteOffset {
        /// Position of the offending value in the time axis.
        index: usize,
    },

    /// Returned when a time offset lands outside the representable date range.
    #[error("time offset {value} is out of range")]
    OffsetOutOfRange {
        /// The offset, in days, that could not be represented.
        value: f64,
    },
}
