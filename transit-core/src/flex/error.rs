//! Flexible-service construction errors.

use crate::domain::TimeError;

/// Errors raised while building flex trips, booking rules or flex legs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlexError {
    /// A path duration is negative
    #[error("{what} duration must not be negative, got {seconds}s")]
    NegativeDuration { what: &'static str, seconds: i32 },

    /// A stop time window ends before it starts
    #[error("time window ends ({end}) before it starts ({start})")]
    InvalidTimeWindow { start: i32, end: i32 },

    /// A booking window sets neither a deadline nor a notice period
    #[error("booking window must set a latest booking time or a minimum notice")]
    EmptyBookingWindow,

    /// A latest booking time is not a time of day
    #[error("latest booking time {0}s is not within a day")]
    InvalidTimeOfDay(i32),

    /// A flex trip has no stops
    #[error("flex trip {0} has no stops")]
    NoStops(String),

    /// A stop position is outside the flex trip
    #[error("stop position {position} is out of range for flex trip {trip} ({num_stops} stops)")]
    InvalidStopPosition {
        trip: String,
        position: usize,
        num_stops: usize,
    },

    /// The boarding position comes after the alighting position
    #[error("boarding position {from} is after alighting position {to}")]
    PositionsOutOfOrder { from: usize, to: usize },

    /// Service-day conversion failed
    #[error(transparent)]
    Time(#[from] TimeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FlexError::NegativeDuration {
            what: "access",
            seconds: -30,
        };
        assert_eq!(err.to_string(), "access duration must not be negative, got -30s");

        let err = FlexError::InvalidTimeWindow {
            start: 100,
            end: 50,
        };
        assert_eq!(err.to_string(), "time window ends (50) before it starts (100)");

        assert_eq!(
            FlexError::EmptyBookingWindow.to_string(),
            "booking window must set a latest booking time or a minimum notice"
        );
    }
}
