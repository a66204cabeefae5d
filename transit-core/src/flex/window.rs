//! Flex trips and their per-stop time windows.

use crate::domain::{RouteId, ServiceId, StopHandle, TripId};

use super::{BookingWindow, FlexError};

/// An inclusive window of seconds since service-day start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    start: i32,
    end: i32,
}

impl TimeWindow {
    pub fn new(start: i32, end: i32) -> Result<Self, FlexError> {
        if end < start {
            return Err(FlexError::InvalidTimeWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, time: i32) -> bool {
        self.start <= time && time <= self.end
    }
}

/// A stop (or zone) served by a flex trip during a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexStopTime {
    pub stop: StopHandle,
    pub window: TimeWindow,
}

/// A demand-responsive trip: no fixed times, only windows per stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlexTrip {
    id: TripId,
    route: RouteId,
    service: ServiceId,
    stops: Vec<FlexStopTime>,
    booking: Option<BookingWindow>,
}

impl FlexTrip {
    /// # Errors
    ///
    /// Fails if the trip has no stops.
    pub fn new(
        id: TripId,
        route: RouteId,
        service: ServiceId,
        stops: Vec<FlexStopTime>,
        booking: Option<BookingWindow>,
    ) -> Result<Self, FlexError> {
        if stops.is_empty() {
            return Err(FlexError::NoStops(id.to_string()));
        }
        Ok(Self {
            id,
            route,
            service,
            stops,
            booking,
        })
    }

    pub fn id(&self) -> &TripId {
        &self.id
    }

    pub fn route(&self) -> &RouteId {
        &self.route
    }

    pub fn service(&self) -> &ServiceId {
        &self.service
    }

    pub fn stops(&self) -> &[FlexStopTime] {
        &self.stops
    }

    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn booking(&self) -> Option<&BookingWindow> {
        self.booking.as_ref()
    }

    /// Positions at which the trip serves `stop`.
    pub fn positions_of(&self, stop: StopHandle) -> impl Iterator<Item = usize> + '_ {
        self.stops
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.stop == stop)
            .map(|(i, _)| i)
    }

    /// Check a boarding/alighting position pair.
    pub fn check_positions(&self, from: usize, to: usize) -> Result<(), FlexError> {
        for position in [from, to] {
            if position >= self.stops.len() {
                return Err(FlexError::InvalidStopPosition {
                    trip: self.id.to_string(),
                    position,
                    num_stops: self.stops.len(),
                });
            }
        }
        if from > to {
            return Err(FlexError::PositionsOutOfOrder { from, to });
        }
        Ok(())
    }

    /// Earliest pickup at `from` no earlier than `departure_time` such that
    /// the drop-off at `to`, `trip_duration` later, is still in its window.
    ///
    /// All times are trip-local. `None` if no such pickup exists.
    pub fn earliest_departure_time(
        &self,
        departure_time: i32,
        from: usize,
        to: usize,
        trip_duration: i32,
    ) -> Option<i32> {
        let pickup = self.stops.get(from)?.window;
        let drop_off = self.stops.get(to)?.window;

        let departure = departure_time.max(pickup.start);
        if departure > pickup.end {
            return None;
        }
        let arrival = departure.saturating_add(trip_duration);
        if arrival > drop_off.end {
            return None;
        }
        // Waiting for the drop-off window to open delays the pickup too.
        let departure = departure.max(drop_off.start.saturating_sub(trip_duration));
        if departure > pickup.end {
            return None;
        }
        Some(departure)
    }

    /// Latest drop-off at `to` no later than `arrival_time` such that the
    /// pickup at `from`, `trip_duration` earlier, is still in its window.
    ///
    /// All times are trip-local. `None` if no such drop-off exists.
    pub fn latest_arrival_time(
        &self,
        arrival_time: i32,
        from: usize,
        to: usize,
        trip_duration: i32,
    ) -> Option<i32> {
        let pickup = self.stops.get(from)?.window;
        let drop_off = self.stops.get(to)?.window;

        let arrival = arrival_time.min(drop_off.end);
        if arrival < drop_off.start {
            return None;
        }
        let departure = arrival.saturating_sub(trip_duration);
        if departure < pickup.start {
            return None;
        }
        let arrival = arrival.min(pickup.end.saturating_add(trip_duration));
        if arrival < drop_off.start {
            return None;
        }
        Some(arrival)
    }
}
