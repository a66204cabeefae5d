//! Schedule validation errors.

use chrono::NaiveDate;

use crate::domain::{DomainError, TimeError};

/// Errors raised while building per-date or merged schedules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Trip times do not fit the pattern
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Service-day conversion failed
    #[error(transparent)]
    Time(#[from] TimeError),

    /// A later trip overtakes an earlier one somewhere along the pattern
    #[error("trip {trip} overtakes {previous} at stop position {position} of pattern {pattern}")]
    Overtaking {
        pattern: String,
        trip: String,
        previous: String,
        position: usize,
    },

    /// A per-date schedule belongs to a different pattern than the merge
    #[error("schedule for {date} belongs to pattern {found}, expected {expected}")]
    PatternMismatch {
        date: NaiveDate,
        expected: String,
        found: String,
    },

    /// The date is not covered by the search window
    #[error("date {0} is outside the search window")]
    DateOutsideWindow(NaiveDate),

    /// A replacement schedule is for a different date than the one replaced
    #[error("replacement schedule is for {found}, expected {expected}")]
    DateMismatch { expected: NaiveDate, found: NaiveDate },

    /// Two per-date schedules for the same date were supplied
    #[error("duplicate schedule for {0}")]
    DuplicateDate(NaiveDate),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ScheduleError::Overtaking {
            pattern: "R1:0".into(),
            trip: "R1-2".into(),
            previous: "R1-1".into(),
            position: 3,
        };
        assert_eq!(
            err.to_string(),
            "trip R1-2 overtakes R1-1 at stop position 3 of pattern R1:0"
        );

        let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(
            ScheduleError::DateOutsideWindow(date).to_string(),
            "date 2024-03-31 is outside the search window"
        );

        let err: ScheduleError = TimeError::OutOfRange.into();
        assert_eq!(err.to_string(), "time offset out of range");
    }
}
