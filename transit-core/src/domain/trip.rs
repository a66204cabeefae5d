//! Routes, trips and per-trip stop times.

use std::sync::Arc;

use super::{DomainError, RouteId, ServiceId, TransitMode, TripId};

/// A route (line) operated in one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub id: RouteId,
    pub mode: TransitMode,
}

/// A scheduled vehicle journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub id: TripId,
    pub route: RouteId,
    /// Calendar service deciding which dates the trip runs.
    pub service: ServiceId,
    pub mode: TransitMode,
}

/// Arrival and departure times of one trip at each stop of its pattern.
///
/// Times are seconds since the start of the trip's service day and may
/// exceed 24 hours for trips running past midnight.
///
/// # Invariants
///
/// - `arrivals.len() == departures.len()`
/// - `departure >= arrival` at every stop
/// - `arrival[i + 1] >= departure[i]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripTimes {
    trip: Arc<Trip>,
    arrivals: Vec<i32>,
    departures: Vec<i32>,
}

impl TripTimes {
    /// Construct trip times, validating ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use transit_core::domain::{RouteId, ServiceId, TransitMode, Trip, TripId, TripTimes};
    ///
    /// let trip = Arc::new(Trip {
    ///     id: TripId::new("R1-1").unwrap(),
    ///     route: RouteId::new("R1").unwrap(),
    ///     service: ServiceId::new("DAILY").unwrap(),
    ///     mode: TransitMode::Bus,
    /// });
    ///
    /// let times = TripTimes::new(trip.clone(), vec![600, 900], vec![600, 900]).unwrap();
    /// assert_eq!(times.departure(0), Some(600));
    ///
    /// // Time travel is rejected
    /// assert!(TripTimes::new(trip, vec![600, 500], vec![600, 500]).is_err());
    /// ```
    pub fn new(
        trip: Arc<Trip>,
        arrivals: Vec<i32>,
        departures: Vec<i32>,
    ) -> Result<Self, DomainError> {
        let invalid = |reason| DomainError::InvalidTripTimes {
            trip: trip.id.to_string(),
            reason,
        };

        if arrivals.len() != departures.len() {
            return Err(invalid("arrival and departure counts differ"));
        }
        if arrivals.is_empty() {
            return Err(invalid("no stop times"));
        }
        for (arr, dep) in arrivals.iter().zip(&departures) {
            if dep < arr {
                return Err(invalid("departure before arrival"));
            }
        }
        for i in 1..arrivals.len() {
            if arrivals[i] < departures[i - 1] {
                return Err(invalid("arrival before previous departure"));
            }
        }

        Ok(Self {
            trip,
            arrivals,
            departures,
        })
    }

    pub fn trip(&self) -> &Arc<Trip> {
        &self.trip
    }

    pub fn num_stops(&self) -> usize {
        self.arrivals.len()
    }

    pub fn arrival(&self, stop_position: usize) -> Option<i32> {
        self.arrivals.get(stop_position).copied()
    }

    pub fn departure(&self, stop_position: usize) -> Option<i32> {
        self.departures.get(stop_position).copied()
    }

    /// Departure at the first stop, used to order trips.
    pub fn first_departure(&self) -> i32 {
        // Non-empty by construction.
        self.departures[0]
    }
}
