//! Transfer construction errors.

/// Errors raised while constructing transfer rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    /// A duration in a constraint is negative
    #[error("{what} must not be negative, got {seconds}s")]
    NegativeDuration { what: &'static str, seconds: i64 },

    /// A duration in a constraint does not fit the time axis
    #[error("{what} is too large: {seconds}s")]
    DurationTooLarge { what: &'static str, seconds: i64 },

    /// A route or trip point names a stop position outside its pattern
    #[error("stop position {position} is out of range for {point} ({num_stops} stops)")]
    InvalidStopPosition {
        point: String,
        position: usize,
        num_stops: usize,
    },

    /// A stay-seated rule anchored at a station or a stop
    #[error("stay-seated transfer must reference routes or trips, not {0}")]
    StaySeatedNeedsTrip(String),
}
