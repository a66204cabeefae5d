//! Lookup of the most specific constrained transfer for a concrete transfer.

use std::collections::HashMap;

use crate::domain::{StationId, StopHandle, StopIndex, Trip};

use super::{ConstrainedTransfer, TransferLocation, TransferPoint};

/// All constrained transfers of a snapshot, indexed by from-point.
///
/// A query builds the (at most four) points that can cover the alighting
/// location and looks each up, so lookup cost does not grow with the total
/// number of rules.
///
/// # Examples
///
/// ```
/// use transit_core::domain::{
///     RouteId, ServiceId, Stop, StopHandle, StopId, StopIndex, TransitMode, Trip, TripId,
/// };
/// use transit_core::transfer::{
///     ConstrainedTransfer, TransferConstraint, TransferPoint, TransferService,
/// };
///
/// let stops = StopIndex::new(vec![Stop::new(StopId::new("B").unwrap(), "B")]).unwrap();
/// let trip = |id: &str, route: &str| Trip {
///     id: TripId::new(id).unwrap(),
///     route: RouteId::new(route).unwrap(),
///     service: ServiceId::new("S").unwrap(),
///     mode: TransitMode::Bus,
/// };
/// let (r1, r2) = (trip("R1-2", "R1"), trip("R2-1", "R2"));
///
/// let mut service = TransferService::new(&stops);
/// service.add(ConstrainedTransfer::new(
///     TransferPoint::Trip { trip: r1.id.clone(), stop_position: 1 },
///     TransferPoint::Trip { trip: r2.id.clone(), stop_position: 0 },
///     TransferConstraint::builder().guaranteed().build().unwrap(),
/// ));
///
/// let found = service.find_transfer(&r1, 1, StopHandle(0), &r2, 0, StopHandle(0));
/// assert!(found.unwrap().constraint().is_guaranteed());
/// assert!(service.find_transfer(&r2, 0, StopHandle(0), &r1, 1, StopHandle(0)).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransferService {
    transfers: Vec<ConstrainedTransfer>,
    by_from_point: HashMap<TransferPoint, Vec<usize>>,
    /// Parent station per stop handle.
    stations: Vec<Option<StationId>>,
}

impl TransferService {
    /// Create an empty service for the stops of one snapshot.
    pub fn new(stops: &StopIndex) -> Self {
        Self {
            transfers: Vec::new(),
            by_from_point: HashMap::new(),
            stations: stops.iter().map(|(_, s)| s.parent_station.clone()).collect(),
        }
    }

    /// Register a transfer. Registration order breaks specificity ties.
    pub fn add(&mut self, transfer: ConstrainedTransfer) {
        let index = self.transfers.len();
        self.by_from_point
            .entry(transfer.from().clone())
            .or_default()
            .push(index);
        self.transfers.push(transfer);
    }

    /// Register several transfers in order.
    pub fn add_all(&mut self, transfers: impl IntoIterator<Item = ConstrainedTransfer>) {
        for transfer in transfers {
            self.add(transfer);
        }
    }

    /// All transfers in registration order.
    pub fn transfers(&self) -> &[ConstrainedTransfer] {
        &self.transfers
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Parent station of a stop, as known to this service.
    pub fn station_of(&self, stop: StopHandle) -> Option<&StationId> {
        self.stations.get(stop.index()).and_then(Option::as_ref)
    }

    /// Build the location for a trip calling at a stop position.
    pub fn location<'a>(
        &'a self,
        trip: &'a Trip,
        stop_position: usize,
        stop: StopHandle,
    ) -> TransferLocation<'a> {
        TransferLocation {
            trip,
            stop_position,
            stop,
            station: self.station_of(stop),
        }
    }

    /// Find the single best constrained transfer between two calls.
    ///
    /// Among all rules whose from-point covers the alighting call and whose
    /// to-point covers the boarding call, the one with the highest
    /// specificity wins; equal specificity goes to the rule registered
    /// first. `None` means the transfer is a regular, unconstrained one.
    pub fn find_transfer(
        &self,
        from_trip: &Trip,
        from_stop_position: usize,
        from_stop: StopHandle,
        to_trip: &Trip,
        to_stop_position: usize,
        to_stop: StopHandle,
    ) -> Option<&ConstrainedTransfer> {
        if self.transfers.is_empty() {
            return None;
        }

        let from = self.location(from_trip, from_stop_position, from_stop);
        let to = self.location(to_trip, to_stop_position, to_stop);

        let mut best: Option<(i32, usize)> = None;
        for key in TransferPoint::candidates_for(&from) {
            let Some(indices) = self.by_from_point.get(&key) else {
                continue;
            };
            for &index in indices {
                let transfer = &self.transfers[index];
                if !transfer.to().matches(&to) {
                    continue;
                }
                let ranking = transfer.specificity_ranking();
                let better = match best {
                    None => true,
                    Some((best_ranking, best_index)) => {
                        ranking > best_ranking || (ranking == best_ranking && index < best_index)
                    }
                };
                if better {
                    best = Some((ranking, index));
                }
            }
        }

        best.map(|(_, index)| &self.transfers[index])
    }
}
