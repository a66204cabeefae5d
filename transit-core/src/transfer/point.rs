//! Transfer points: where a constrained transfer anchors.

use std::fmt;

use crate::domain::{RouteId, StationId, StopHandle, Trip, TripId};

/// One side of a concrete transfer: a trip calling at a stop position.
///
/// This is what the search knows when it alights or boards.
#[derive(Debug, Clone, Copy)]
pub struct TransferLocation<'a> {
    pub trip: &'a Trip,
    pub stop_position: usize,
    pub stop: StopHandle,
    /// Parent station of `stop`, if it has one.
    pub station: Option<&'a StationId>,
}

/// The endpoint of a constrained transfer, at one of four granularities.
///
/// # Examples
///
/// ```
/// use transit_core::domain::{RouteId, StopHandle, TripId};
/// use transit_core::transfer::TransferPoint;
///
/// let stop = TransferPoint::Stop { stop: StopHandle(1) };
/// let trip = TransferPoint::Trip { trip: TripId::new("R1-2").unwrap(), stop_position: 1 };
///
/// assert!(stop.rank() < trip.rank());
/// assert!(stop.applies_to_all_trips_of_route());
/// assert!(!trip.applies_to_all_trips_of_route());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransferPoint {
    /// Any stop of the station, any trip.
    Station { station: StationId },
    /// One stop, any trip.
    Stop { stop: StopHandle },
    /// Any trip of the route at a stop position of its pattern.
    Route {
        route: RouteId,
        stop_position: usize,
    },
    /// One trip at a stop position of its pattern.
    Trip { trip: TripId, stop_position: usize },
}

impl TransferPoint {
    /// Specificity rank: Station=0, Stop=1, Route=2, Trip=3.
    pub fn rank(&self) -> i32 {
        match self {
            TransferPoint::Station { .. } => 0,
            TransferPoint::Stop { .. } => 1,
            TransferPoint::Route { .. } => 2,
            TransferPoint::Trip { .. } => 3,
        }
    }

    /// False only for trip points, which bind one specific trip.
    pub fn applies_to_all_trips_of_route(&self) -> bool {
        !matches!(self, TransferPoint::Trip { .. })
    }

    /// Stop position for route and trip points.
    pub fn stop_position(&self) -> Option<usize> {
        match self {
            TransferPoint::Route { stop_position, .. }
            | TransferPoint::Trip { stop_position, .. } => Some(*stop_position),
            TransferPoint::Station { .. } | TransferPoint::Stop { .. } => None,
        }
    }

    /// Whether this point covers the given location.
    pub fn matches(&self, location: &TransferLocation<'_>) -> bool {
        match self {
            TransferPoint::Station { station } => location.station == Some(station),
            TransferPoint::Stop { stop } => *stop == location.stop,
            TransferPoint::Route {
                route,
                stop_position,
            } => location.trip.route == *route && location.stop_position == *stop_position,
            TransferPoint::Trip {
                trip,
                stop_position,
            } => location.trip.id == *trip && location.stop_position == *stop_position,
        }
    }

    /// Every point that could cover `location`, most specific first.
    ///
    /// Used as lookup keys in the transfer indexes.
    pub fn candidates_for(location: &TransferLocation<'_>) -> Vec<TransferPoint> {
        let mut keys = Vec::with_capacity(4);
        keys.push(TransferPoint::Trip {
            trip: location.trip.id.clone(),
            stop_position: location.stop_position,
        });
        keys.push(TransferPoint::Route {
            route: location.trip.route.clone(),
            stop_position: location.stop_position,
        });
        keys.push(TransferPoint::Stop {
            stop: location.stop,
        });
        if let Some(station) = location.station {
            keys.push(TransferPoint::Station {
                station: station.clone(),
            });
        }
        keys
    }
}

impl fmt::Display for TransferPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferPoint::Station { station } => write!(f, "station {station}"),
            TransferPoint::Stop { stop } => write!(f, "stop {stop}"),
            TransferPoint::Route {
                route,
                stop_position,
            } => write!(f, "route {route} @ {stop_position}"),
            TransferPoint::Trip {
                trip,
                stop_position,
            } => write!(f, "trip {trip} @ {stop_position}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ServiceId, TransitMode};

    fn trip(id: &str, route: &str) -> Trip {
        Trip {
            id: TripId::new(id).unwrap(),
            route: RouteId::new(route).unwrap(),
            service: ServiceId::new("S").unwrap(),
            mode: TransitMode::Bus,
        }
    }

    fn station(id: &str) -> StationId {
        StationId::new(id).unwrap()
    }

    #[test]
    fn ranks() {
        let points = [
            TransferPoint::Station { station: station("S") },
            TransferPoint::Stop { stop: StopHandle(0) },
            TransferPoint::Route {
                route: RouteId::new("R").unwrap(),
                stop_position: 0,
            },
            TransferPoint::Trip {
                trip: TripId::new("T").unwrap(),
                stop_position: 0,
            },
        ];
        let ranks: Vec<_> = points.iter().map(|p| p.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
        let all: Vec<_> = points.iter().map(|p| p.applies_to_all_trips_of_route()).collect();
        assert_eq!(all, vec![true, true, true, false]);
    }

    #[test]
    fn matching() {
        let t = trip("R1-2", "R1");
        let s = station("B");
        let location = TransferLocation {
            trip: &t,
            stop_position: 1,
            stop: StopHandle(4),
            station: Some(&s),
        };

        assert!(TransferPoint::Station { station: station("B") }.matches(&location));
        assert!(!TransferPoint::Station { station: station("C") }.matches(&location));
        assert!(TransferPoint::Stop { stop: StopHandle(4) }.matches(&location));
        assert!(!TransferPoint::Stop { stop: StopHandle(5) }.matches(&location));

        let route = |r: &str, pos| TransferPoint::Route {
            route: RouteId::new(r).unwrap(),
            stop_position: pos,
        };
        assert!(route("R1", 1).matches(&location));
        assert!(!route("R1", 2).matches(&location));
        assert!(!route("R2", 1).matches(&location));

        let trip_point = |id: &str, pos| TransferPoint::Trip {
            trip: TripId::new(id).unwrap(),
            stop_position: pos,
        };
        assert!(trip_point("R1-2", 1).matches(&location));
        assert!(!trip_point("R1-1", 1).matches(&location));
        assert!(!trip_point("R1-2", 0).matches(&location));
    }

    #[test]
    fn station_point_needs_parent_station() {
        let t = trip("R1-2", "R1");
        let location = TransferLocation {
            trip: &t,
            stop_position: 0,
            stop: StopHandle(0),
            station: None,
        };
        assert!(!TransferPoint::Station { station: station("B") }.matches(&location));
    }

    #[test]
    fn candidates_all_match_their_location() {
        let t = trip("R1-2", "R1");
        let s = station("B");
        let location = TransferLocation {
            trip: &t,
            stop_position: 2,
            stop: StopHandle(7),
            station: Some(&s),
        };
        let candidates = TransferPoint::candidates_for(&location);
        assert_eq!(candidates.len(), 4);
        assert!(candidates.iter().all(|p| p.matches(&location)));
        let ranks: Vec<_> = candidates.iter().map(|p| p.rank()).collect();
        assert_eq!(ranks, vec![3, 2, 1, 0]);
    }

    #[test]
    fn display() {
        let p = TransferPoint::Trip {
            trip: TripId::new("R2-1").unwrap(),
            stop_position: 0,
        };
        assert_eq!(p.to_string(), "trip R2-1 @ 0");
        assert_eq!(TransferPoint::Stop { stop: StopHandle(2) }.to_string(), "stop #2");
    }
}
