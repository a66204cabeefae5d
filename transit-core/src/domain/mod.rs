//! Domain types for the transit network.
//!
//! This module contains the catalog types the rest of the crate works on:
//! validated identifiers, stops and the dense stop index, routes, trips,
//! patterns and service-day time arithmetic. All types enforce their
//! invariants at construction time, so code that receives them can trust
//! their validity.

mod error;
mod ids;
mod mode;
mod pattern;
mod stop;
mod time;
mod trip;

pub use error::DomainError;
pub use ids::{InvalidId, PatternId, RouteId, ServiceId, StationId, StopId, TripId};
pub use mode::TransitMode;
pub use pattern::TripPattern;
pub use stop::{Station, Stop, StopHandle, StopIndex};
pub use time::{
    SECONDS_PER_DAY, SearchWindow, TimeError, format_service_time, parse_service_time,
    parse_time_zone, service_day_start,
};
pub use trip::{Route, Trip, TripTimes};
