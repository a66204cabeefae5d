//! The trips of one pattern running on one service date.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{TripPattern, TripTimes};

use super::ScheduleError;

/// A pattern together with the trips it runs on one date.
///
/// Trips are sorted by departure and never overtake each other, so a
/// binary search on any stop position finds the next trip. Once built the
/// value is immutable; a change for the date builds a replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripPatternForDate {
    pattern: Arc<TripPattern>,
    date: NaiveDate,
    trips: Vec<Arc<TripTimes>>,
}

impl TripPatternForDate {
    /// Sort and validate the trips of `pattern` running on `date`.
    ///
    /// # Errors
    ///
    /// Fails if a trip's stop count does not match the pattern, or if a trip
    /// arrives or departs earlier than the trip before it at any stop.
    pub fn new(
        pattern: Arc<TripPattern>,
        date: NaiveDate,
        mut trips: Vec<Arc<TripTimes>>,
    ) -> Result<Self, ScheduleError> {
        for times in &trips {
            pattern.check_trip_times(times)?;
        }

        trips.sort_by(|a, b| {
            a.first_departure()
                .cmp(&b.first_departure())
                .then_with(|| a.trip().id.as_str().cmp(b.trip().id.as_str()))
        });

        for pair in trips.windows(2) {
            check_no_overtaking(&pattern, &pair[0], 0, &pair[1], 0)?;
        }

        Ok(Self {
            pattern,
            date,
            trips,
        })
    }

    pub fn pattern(&self) -> &Arc<TripPattern> {
        &self.pattern
    }

    /// The service date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Trips in departure order.
    pub fn trips(&self) -> &[Arc<TripTimes>] {
        &self.trips
    }

    pub fn num_trips(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Fail if `next` (shifted by `next_offset`) is earlier than `previous`
/// (shifted by `previous_offset`) at any stop position.
pub(super) fn check_no_overtaking(
    pattern: &TripPattern,
    previous: &TripTimes,
    previous_offset: i32,
    next: &TripTimes,
    next_offset: i32,
) -> Result<(), ScheduleError> {
    for position in 0..pattern.num_stops() {
        let earlier = |f: fn(&TripTimes, usize) -> Option<i32>| {
            match (f(previous, position), f(next, position)) {
                (Some(p), Some(n)) => n + next_offset < p + previous_offset,
                _ => false,
            }
        };
        if earlier(TripTimes::arrival) || earlier(TripTimes::departure) {
            return Err(ScheduleError::Overtaking {
                pattern: pattern.id().to_string(),
                trip: next.trip().id.to_string(),
                previous: previous.trip().id.to_string(),
                position,
            });
        }
    }
    Ok(())
}
