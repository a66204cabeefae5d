//! Trip patterns: ordered stop sequences shared by trips of one route.

use super::{DomainError, PatternId, RouteId, StopHandle, TransitMode, TripTimes};

/// An ordered sequence of stops visited by a set of trips.
///
/// A stop may appear more than once (loops), so positions, not stops,
/// identify a call on the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripPattern {
    id: PatternId,
    route: RouteId,
    mode: TransitMode,
    stops: Vec<StopHandle>,
}

impl TripPattern {
    /// Create a pattern; it must visit at least two stops.
    pub fn new(
        id: PatternId,
        route: RouteId,
        mode: TransitMode,
        stops: Vec<StopHandle>,
    ) -> Result<Self, DomainError> {
        if stops.len() < 2 {
            return Err(DomainError::PatternTooShort(id.to_string()));
        }
        Ok(Self {
            id,
            route,
            mode,
            stops,
        })
    }

    pub fn id(&self) -> &PatternId {
        &self.id
    }

    pub fn route(&self) -> &RouteId {
        &self.route
    }

    pub fn mode(&self) -> TransitMode {
        self.mode
    }

    pub fn stops(&self) -> &[StopHandle] {
        &self.stops
    }

    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    /// Stop visited at a position.
    pub fn stop_at(&self, stop_position: usize) -> Option<StopHandle> {
        self.stops.get(stop_position).copied()
    }

    /// All positions at which the pattern visits `stop`.
    pub fn positions_of(&self, stop: StopHandle) -> impl Iterator<Item = usize> + '_ {
        self.stops
            .iter()
            .enumerate()
            .filter(move |(_, s)| **s == stop)
            .map(|(i, _)| i)
    }

    pub fn is_valid_position(&self, stop_position: usize) -> bool {
        stop_position < self.stops.len()
    }

    /// Check that trip times line up with this pattern.
    pub fn check_trip_times(&self, times: &TripTimes) -> Result<(), DomainError> {
        if times.num_stops() != self.stops.len() {
            return Err(DomainError::StopCountMismatch {
                trip: times.trip().id.to_string(),
                expected: self.stops.len(),
                actual: times.num_stops(),
            });
        }
        Ok(())
    }
}
