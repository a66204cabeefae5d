//! Constrained transfers pre-grouped by the stop positions of a target pattern.
//!
//! The boarding search sees transfers from the perspective of the pattern it
//! is about to board. Forward, that is the `to` side of a rule; reverse, the
//! search boards the `from` side. Each list is sorted by descending
//! specificity so the first matching entry is the one the
//! [`TransferService`](super::TransferService) would return.

use crate::domain::{StopIndex, TripId, TripPattern};
use crate::search::SearchDirection;

use super::{ConstrainedTransfer, TransferConstraint, TransferLocation, TransferPoint};

/// One constrained transfer as seen from a target pattern's stop position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferForPattern {
    source_point: TransferPoint,
    /// `None` if the rule applies to every trip of the pattern.
    target_trip: Option<TripId>,
    constraint: TransferConstraint,
    specificity: i32,
}

impl TransferForPattern {
    pub fn source_point(&self) -> &TransferPoint {
        &self.source_point
    }

    pub fn constraint(&self) -> &TransferConstraint {
        &self.constraint
    }

    pub fn specificity_ranking(&self) -> i32 {
        self.specificity
    }

    pub fn applies_to_all_target_trips(&self) -> bool {
        self.target_trip.is_none()
    }

    pub fn matches_source(&self, source: &TransferLocation<'_>) -> bool {
        self.source_point.matches(source)
    }

    pub fn matches_target_trip(&self, trip: &TripId) -> bool {
        self.target_trip.as_ref().is_none_or(|t| t == trip)
    }
}

/// Per-stop-position lists of [`TransferForPattern`] for one pattern and
/// one search direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForPatternByStopPos {
    by_stop_pos: Vec<Vec<TransferForPattern>>,
}

impl TransferForPatternByStopPos {
    /// Collect the transfers that board `pattern` in `direction`.
    ///
    /// `is_pattern_trip` tells whether a trip id belongs to the pattern.
    /// Returns `None` if no transfer targets the pattern at all.
    pub fn generate<'a>(
        pattern: &TripPattern,
        is_pattern_trip: impl Fn(&TripId) -> bool,
        transfers: impl IntoIterator<Item = &'a ConstrainedTransfer>,
        stops: &StopIndex,
        direction: SearchDirection,
    ) -> Option<Self> {
        let mut by_stop_pos: Vec<Vec<TransferForPattern>> = vec![Vec::new(); pattern.num_stops()];
        let mut any = false;

        for transfer in transfers {
            let (source, target) = match direction {
                SearchDirection::Forward => (transfer.from(), transfer.to()),
                SearchDirection::Reverse => (transfer.to(), transfer.from()),
            };

            let target_trip = match target {
                TransferPoint::Trip { trip, .. } => {
                    if !is_pattern_trip(trip) {
                        continue;
                    }
                    Some(trip.clone())
                }
                TransferPoint::Route { route, .. } if route != pattern.route() => continue,
                _ => None,
            };

            for position in target_positions(pattern, target, stops) {
                by_stop_pos[position].push(TransferForPattern {
                    source_point: source.clone(),
                    target_trip: target_trip.clone(),
                    constraint: *transfer.constraint(),
                    specificity: transfer.specificity_ranking(),
                });
                any = true;
            }
        }

        if !any {
            return None;
        }

        for list in &mut by_stop_pos {
            // Stable: registration order survives among equal rankings.
            list.sort_by(|a, b| b.specificity.cmp(&a.specificity));
        }
        Some(Self { by_stop_pos })
    }

    /// Transfers boarding at `stop_position`, most specific first.
    pub fn get(&self, stop_position: usize) -> &[TransferForPattern] {
        self.by_stop_pos
            .get(stop_position)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of stop positions with at least one transfer.
    pub fn positions_with_transfers(&self) -> usize {
        self.by_stop_pos.iter().filter(|l| !l.is_empty()).count()
    }
}

/// Stop positions of `pattern` covered by `point`.
fn target_positions(pattern: &TripPattern, point: &TransferPoint, stops: &StopIndex) -> Vec<usize> {
    match point {
        TransferPoint::Station { station } => pattern
            .stops()
            .iter()
            .enumerate()
            .filter(|(_, s)| stops.parent_station(**s) == Some(station))
            .map(|(i, _)| i)
            .collect(),
        TransferPoint::Stop { stop } => pattern.positions_of(*stop).collect(),
        TransferPoint::Route { stop_position, .. } | TransferPoint::Trip { stop_position, .. } => {
            if pattern.is_valid_position(*stop_position) {
                vec![*stop_position]
            } else {
                Vec::new()
            }
        }
    }
}
