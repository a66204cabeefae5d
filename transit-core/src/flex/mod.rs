//! Flexible (demand-responsive) service.
//!
//! Flex trips have no timetable, only per-stop service windows and
//! optional booking rules. This module turns a flex leg into the two time
//! functions the search consumes and signals unreachable legs with `None`.

mod adapter;
mod booking;
mod durations;
mod error;
mod window;

pub use adapter::FlexAccessEgress;
pub use booking::{BookingWindow, LatestBookingTime, RoutingBookingInfo};
pub use durations::FlexPathDurations;
pub use error::FlexError;
pub use window::{FlexStopTime, FlexTrip, TimeWindow};
