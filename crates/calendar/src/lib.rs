//! # thermos-calendar
//!
//! Decode CF-convention time coordinates (`"days since 1950-01-01"` plus a
//! `calendar` attribute) into calendar dates and years.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["calendar attribute"] -->|"Calendar::from_str()"| B["Calendar"]
//!     C["units attribute"] -->|"TimeUnits::parse()"| D["TimeUnits"]
//!     E["numeric offsets"] --> F["decode_dates()"]
//!     B --> F
//!     D --> F
//!     F --> G["Vec of CalendarDate"]
//!     G -->|".year()"| H["decode_years()"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use thermos_calendar::{Calendar, TimeUnits, decode_years};
//!
//! let units = TimeUnits::parse("days since 1950-01-01 00:00:00").unwrap();
//! let calendar: Calendar = "noleap".parse().unwrap();
//! let years = decode_years(&[0.0, 365.0, 730.0], &units, calendar).unwrap();
//! assert_eq!(years, vec![1950, 1951, 1952]);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `calendar` | CF calendar kinds and month/year lengths |
//! | `date` | Calendar-aware date with day arithmetic |
//! | `units` | `"<unit> since <epoch>"` parsing |
//! | `decode` | Offset-to-date and offset-to-year decoding |
//! | `error` | Error types |

mod calendar;
mod date;
mod decode;
mod error;
mod units;

pub use calendar::Calendar;
pub use date::CalendarDate;
pub use decode::{decode_dates, decode_years};
pub use error::CalendarError;
pub use units::{TimeUnit, TimeUnits};
