//! Flex access and egress legs as time functions for the search.

use std::sync::Arc;

use tracing::trace;

use super::{FlexError, FlexPathDurations, FlexTrip, RoutingBookingInfo};

/// One flex leg: ride `trip` from `from` to `to` on one service date.
///
/// The search calls [`earliest_departure_time`](Self::earliest_departure_time)
/// for access legs and [`latest_arrival_time`](Self::latest_arrival_time) for
/// egress legs in reverse search. `None` means the leg is unreachable for
/// this request; the search simply ignores it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use transit_core::domain::{RouteId, ServiceId, StopHandle, TripId};
/// use transit_core::flex::*;
///
/// let trip = Arc::new(FlexTrip::new(
///     TripId::new("F1").unwrap(),
///     RouteId::new("FLEX").unwrap(),
///     ServiceId::new("S").unwrap(),
///     vec![
///         FlexStopTime { stop: StopHandle(0), window: TimeWindow::new(28_800, 64_800).unwrap() },
///         FlexStopTime { stop: StopHandle(1), window: TimeWindow::new(28_800, 64_800).unwrap() },
///     ],
///     None,
/// ).unwrap());
///
/// let durations = FlexPathDurations::new(120, 900, 60, 0).unwrap();
/// let booking = RoutingBookingInfo::unrestricted();
/// let leg = FlexAccessEgress::new(trip, 0, 1, durations, booking).unwrap();
///
/// // Before the service opens the rider waits for 08:00.
/// assert_eq!(leg.earliest_departure_time(25_000, None), Some(28_800 - 120));
/// // After it closes there is no ride.
/// assert_eq!(leg.earliest_departure_time(70_000, None), None);
/// ```
#[derive(Debug, Clone)]
pub struct FlexAccessEgress {
    trip: Arc<FlexTrip>,
    from: usize,
    to: usize,
    durations: FlexPathDurations,
    booking: RoutingBookingInfo,
}

impl FlexAccessEgress {
    /// # Errors
    ///
    /// Fails if the positions are not a valid boarding/alighting pair.
    pub fn new(
        trip: Arc<FlexTrip>,
        from_stop_position: usize,
        to_stop_position: usize,
        durations: FlexPathDurations,
        booking: RoutingBookingInfo,
    ) -> Result<Self, FlexError> {
        trip.check_positions(from_stop_position, to_stop_position)?;
        Ok(Self {
            trip,
            from: from_stop_position,
            to: to_stop_position,
            durations,
            booking,
        })
    }

    pub fn trip(&self) -> &Arc<FlexTrip> {
        &self.trip
    }

    pub fn durations(&self) -> &FlexPathDurations {
        &self.durations
    }

    pub fn booking(&self) -> &RoutingBookingInfo {
        &self.booking
    }

    /// Earliest router departure at or after `requested_departure`, or
    /// `None` if the trip cannot be reached or booked.
    ///
    /// `booking_time` is when the request is made, in window seconds; with
    /// `None` booking rules are not applied.
    pub fn earliest_departure_time(
        &self,
        requested_departure: i32,
        booking_time: Option<i32>,
    ) -> Option<i32> {
        let d = &self.durations;
        let requested = d.map_to_flex_trip_departure_time(requested_departure);
        let pickup = self
            .trip
            .earliest_departure_time(requested, self.from, self.to, d.trip())?;

        if !self.can_book(pickup.saturating_add(d.offset()), booking_time) {
            return None;
        }
        Some(d.map_to_router_departure_time(pickup))
    }

    /// Latest router arrival at or before `requested_arrival`, or `None` if
    /// the trip cannot be reached or booked.
    pub fn latest_arrival_time(
        &self,
        requested_arrival: i32,
        booking_time: Option<i32>,
    ) -> Option<i32> {
        let d = &self.durations;
        let requested = d.map_to_flex_trip_arrival_time(requested_arrival);
        let drop_off = self
            .trip
            .latest_arrival_time(requested, self.from, self.to, d.trip())?;

        let pickup = drop_off.saturating_sub(d.trip());
        if !self.can_book(pickup.saturating_add(d.offset()), booking_time) {
            return None;
        }
        Some(d.map_to_router_arrival_time(drop_off))
    }

    fn can_book(&self, pickup_time: i32, booking_time: Option<i32>) -> bool {
        let Some(request) = booking_time else {
            return true;
        };
        let ok = self.booking.is_there_enough_time_to_book(pickup_time, request);
        if !ok {
            trace!(trip = %self.trip.id(), pickup_time, request, "flex leg too late to book");
        }
        ok
    }
}
