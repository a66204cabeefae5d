//! Durations of a flex path and the mapping between time axes.

use super::FlexError;

/// Access, in-vehicle and egress durations of a flex path.
///
/// `offset` is the service-day start of the flex trip's date in window
/// seconds; trip-local times are router times minus the offset.
///
/// # Examples
///
/// ```
/// use transit_core::flex::FlexPathDurations;
///
/// let d = FlexPathDurations::new(300, 1_200, 120, 86_400).unwrap();
///
/// // Leaving at 08:00 on day two, the vehicle is reached after the walk.
/// let local = d.map_to_flex_trip_departure_time(86_400 + 28_800);
/// assert_eq!(local, 28_800 + 300);
/// assert_eq!(d.map_to_router_departure_time(local), 86_400 + 28_800);
///
/// assert!(FlexPathDurations::new(-1, 0, 0, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexPathDurations {
    access: i32,
    trip: i32,
    egress: i32,
    offset: i32,
}

impl FlexPathDurations {
    /// # Errors
    ///
    /// Fails if any duration is negative.
    pub fn new(access: i32, trip: i32, egress: i32, offset: i32) -> Result<Self, FlexError> {
        for (what, seconds) in [("access", access), ("trip", trip), ("egress", egress)] {
            if seconds < 0 {
                return Err(FlexError::NegativeDuration { what, seconds });
            }
        }
        Ok(Self {
            access,
            trip,
            egress,
            offset,
        })
    }

    pub fn access(&self) -> i32 {
        self.access
    }

    pub fn trip(&self) -> i32 {
        self.trip
    }

    pub fn egress(&self) -> i32 {
        self.egress
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Access, trip and egress together.
    pub fn total(&self) -> i32 {
        self.access
            .saturating_add(self.trip)
            .saturating_add(self.egress)
    }

    /// Pickup time on the trip axis for a router departure time.
    pub fn map_to_flex_trip_departure_time(&self, router_departure_time: i32) -> i32 {
        router_departure_time
            .saturating_add(self.access)
            .saturating_sub(self.offset)
    }

    /// Router departure time for a pickup time on the trip axis.
    pub fn map_to_router_departure_time(&self, flex_trip_departure_time: i32) -> i32 {
        flex_trip_departure_time
            .saturating_sub(self.access)
            .saturating_add(self.offset)
    }

    /// Drop-off time on the trip axis for a router arrival time.
    pub fn map_to_flex_trip_arrival_time(&self, router_arrival_time: i32) -> i32 {
        router_arrival_time
            .saturating_sub(self.egress)
            .saturating_sub(self.offset)
    }

    /// Router arrival time for a drop-off time on the trip axis.
    pub fn map_to_router_arrival_time(&self, flex_trip_arrival_time: i32) -> i32 {
        flex_trip_arrival_time
            .saturating_add(self.egress)
            .saturating_add(self.offset)
    }
}
