//! Trip boarding searches over a merged timetable.
//!
//! The multi-criteria sweep asks, at every stop it reaches, which trip of a
//! pattern it can board next (forward) or which trip it must have come off
//! (reverse). [`RegularBoardingSearch`] answers this from times alone;
//! [`ConstrainedBoardingSearch`] first applies the constrained transfers
//! that target the pattern.

use std::iter::Rev;
use std::ops::Range;

use tracing::trace;

use crate::schedule::MultiDaySchedule;
use crate::transfer::{
    TransferConstraint, TransferForPattern, TransferForPatternByStopPos, TransferLocation,
    TransferTimingConfig,
};

use super::SearchDirection;

/// A trip selected for boarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boarding {
    /// Index into the [`MultiDaySchedule`].
    pub trip_index: usize,
    pub stop_position: usize,
    /// Departure (forward) or arrival (reverse) in window seconds.
    pub time: i32,
    /// The constraint the boarding was made under, if any.
    pub constraint: Option<TransferConstraint>,
}

/// Time a trip is boarded at a stop position in `direction`.
fn board_time(
    timetable: &MultiDaySchedule,
    direction: SearchDirection,
    trip_index: usize,
    stop_position: usize,
) -> Option<i32> {
    match direction {
        SearchDirection::Forward => timetable.departure(trip_index, stop_position),
        SearchDirection::Reverse => timetable.arrival(trip_index, stop_position),
    }
}

/// Trip indices in search order.
#[derive(Debug, Clone)]
pub(super) enum TripOrder {
    Forward(Range<usize>),
    Reverse(Rev<Range<usize>>),
}

impl Iterator for TripOrder {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            TripOrder::Forward(trips) => trips.next(),
            TripOrder::Reverse(trips) => trips.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            TripOrder::Forward(trips) => trips.size_hint(),
            TripOrder::Reverse(trips) => trips.size_hint(),
        }
    }
}

/// Trip indices in search order, starting with the first trip that is not
/// before `time` at `stop_position`.
pub(super) fn trips_from(
    timetable: &MultiDaySchedule,
    direction: SearchDirection,
    stop_position: usize,
    time: i32,
) -> TripOrder {
    match direction {
        SearchDirection::Forward => {
            let start = timetable.first_departing_at_or_after(stop_position, time);
            TripOrder::Forward(start..timetable.num_trips())
        }
        SearchDirection::Reverse => {
            let end = timetable.count_arriving_at_or_before(stop_position, time);
            TripOrder::Reverse((0..end).rev())
        }
    }
}

/// Time-ordered boarding without any transfer rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegularBoardingSearch {
    direction: SearchDirection,
}

impl RegularBoardingSearch {
    pub fn new(direction: SearchDirection) -> Self {
        Self { direction }
    }

    /// First trip boardable at `stop_position` no earlier (forward) or no
    /// later (reverse) than `earliest_board_time`.
    pub fn find(
        &self,
        timetable: &MultiDaySchedule,
        stop_position: usize,
        earliest_board_time: i32,
    ) -> Option<Boarding> {
        let trip_index =
            trips_from(timetable, self.direction, stop_position, earliest_board_time).next()?;
        let time = board_time(timetable, self.direction, trip_index, stop_position)?;
        Some(Boarding {
            trip_index,
            stop_position,
            time,
            constraint: None,
        })
    }
}

/// Boarding search honoring the constrained transfers of one pattern.
///
/// Call [`transfer_exist`](Self::transfer_exist) first; it selects the stop
/// position and returns whether any rule targets it. When it returns
/// `false` the caller should use the regular search.
///
/// # Examples
///
/// ```
/// use transit_core::search::{ConstrainedBoardingSearch, SearchDirection};
/// use transit_core::transfer::TransferTimingConfig;
///
/// let config = TransferTimingConfig::default();
/// let mut search = ConstrainedBoardingSearch::new(None, SearchDirection::Forward, &config);
/// assert!(!search.transfer_exist(0));
/// ```
#[derive(Debug, Clone)]
pub struct ConstrainedBoardingSearch<'a> {
    transfers: Option<&'a TransferForPatternByStopPos>,
    direction: SearchDirection,
    config: &'a TransferTimingConfig,
    stop_position: usize,
    current: &'a [TransferForPattern],
}

impl<'a> ConstrainedBoardingSearch<'a> {
    /// `transfers` are the pattern's transfers for `direction`, if any.
    pub fn new(
        transfers: Option<&'a TransferForPatternByStopPos>,
        direction: SearchDirection,
        config: &'a TransferTimingConfig,
    ) -> Self {
        Self {
            transfers,
            direction,
            config,
            stop_position: 0,
            current: &[],
        }
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    /// Select `stop_position` and tell whether any rule boards there.
    pub fn transfer_exist(&mut self, stop_position: usize) -> bool {
        self.stop_position = stop_position;
        self.current = self
            .transfers
            .map(|t| t.get(stop_position))
            .unwrap_or_default();
        !self.current.is_empty()
    }

    /// Find the trip to board at the selected stop position.
    ///
    /// `source` is where the rider comes from: the alighting call forward,
    /// the boarding call reverse. `source_time` is the arrival (forward) or
    /// departure (reverse) at that call, and `earliest_board_time` the time
    /// a regular transfer allows. Trips are visited in time order from
    /// `source_time` on:
    ///
    /// - a matching `NotAllowed` rule skips the trip;
    /// - a guaranteed or stay-seated rule boards it regardless of slack;
    /// - another matching rule boards it if the rule's transfer time and
    ///   maximum wait allow;
    /// - without a matching rule the regular time check applies.
    pub fn find(
        &self,
        timetable: &MultiDaySchedule,
        source: &TransferLocation<'_>,
        source_time: i32,
        earliest_board_time: i32,
    ) -> Option<Boarding> {
        let direction = self.direction;
        let position = self.stop_position;

        for trip_index in trips_from(timetable, direction, position, source_time) {
            let Some(schedule) = timetable.trip_schedule(trip_index) else {
                break;
            };
            let Some(time) = board_time(timetable, direction, trip_index, position) else {
                continue;
            };
            let trip_id = &schedule.trip().id;

            let rule = self
                .current
                .iter()
                .find(|tx| tx.matches_source(source) && tx.matches_target_trip(trip_id));
            let Some(tx) = rule else {
                if direction.is_before_or_equal(earliest_board_time, time) {
                    return Some(Boarding {
                        trip_index,
                        stop_position: position,
                        time,
                        constraint: None,
                    });
                }
                continue;
            };

            let constraint = *tx.constraint();
            if constraint.is_not_allowed() {
                trace!(trip = %trip_id, position, "transfer not allowed, trying next trip");
                continue;
            }

            if !constraint.is_facilitated() {
                let target = constraint.calculate_transfer_target_time(
                    source_time,
                    self.config,
                    || earliest_board_time,
                    direction,
                );
                if direction.is_before(time, target) {
                    continue;
                }
                if let Some(max_wait) = constraint.max_wait_time() {
                    if direction.duration(source_time, time) > max_wait {
                        trace!(trip = %trip_id, max_wait, "maximum wait exceeded");
                        continue;
                    }
                }
            }

            trace!(
                trip = %trip_id,
                position,
                time,
                facilitated = constraint.is_facilitated(),
                "boarding via constrained transfer"
            );
            return Some(Boarding {
                trip_index,
                stop_position: position,
                time,
                constraint: Some(constraint),
            });
        }

        None
    }
}
