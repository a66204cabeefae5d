//! Domain error types.
//!
//! These errors represent validation failures when constructing catalog
//! entities. They are raised at import/build time, never during search.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// The same identifier was registered twice
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    /// Stop handle does not belong to the stop index
    #[error("unknown stop handle: {0}")]
    UnknownStopHandle(u32),

    /// More stops than a stop handle can address
    #[error("too many stops: {0}")]
    TooManyStops(usize),

    /// Pattern must visit at least two stops
    #[error("pattern {0} must have at least two stops")]
    PatternTooShort(String),

    /// Trip times do not line up with the pattern's stops
    #[error("trip {trip} has {actual} stop times but its pattern has {expected} stops")]
    StopCountMismatch {
        trip: String,
        expected: usize,
        actual: usize,
    },

    /// Trip times are not consistent (departure before arrival, time going backwards)
    #[error("invalid trip times for {trip}: {reason}")]
    InvalidTripTimes { trip: String, reason: &'static str },
}
