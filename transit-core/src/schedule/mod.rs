//! Day-windowed timetables.
//!
//! [`TripPatternForDate`] holds the trips of a pattern running on one date;
//! [`MultiDaySchedule`] merges those of a whole search window onto one time
//! axis with per-date, daylight-saving-aware offsets.

mod error;
mod for_date;
mod merge;

pub use error::ScheduleError;
pub use for_date::TripPatternForDate;
pub use merge::{MergedTripSchedule, MultiDaySchedule};
