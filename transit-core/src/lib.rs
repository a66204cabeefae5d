//! Transit routing core.
//!
//! The pieces a round-based transit search needs around its main loop:
//! constrained transfers between trips, timetables merged over several
//! service days (DST-aware), and flexible on-demand legs with booking
//! rules. Everything is built once into an immutable snapshot that searches
//! share.

pub mod domain;
pub mod flex;
pub mod schedule;
pub mod search;
pub mod snapshot;
pub mod transfer;
