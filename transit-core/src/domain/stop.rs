//! Stops, stations and the dense stop index.
//!
//! The search never touches `Stop` values in its inner loop. Every stop is
//! addressed by a [`StopHandle`], a dense integer in `[0, stop_count)`
//! assigned by the [`StopIndex`] of one snapshot.

use std::collections::HashMap;
use std::fmt;

use super::{DomainError, StationId, StopId};

/// Dense handle of a stop within one [`StopIndex`].
///
/// Handles are only meaningful together with the index that issued them.
///
/// # Examples
///
/// ```
/// use transit_core::domain::StopHandle;
///
/// let h = StopHandle(3);
/// assert_eq!(h.index(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopHandle(pub u32);

impl StopHandle {
    /// Returns the handle as a slice index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Handle for the stop at slice position `index`.
    ///
    /// # Errors
    ///
    /// Fails if `index` does not fit a handle.
    pub fn from_index(index: usize) -> Result<Self, DomainError> {
        u32::try_from(index)
            .map(StopHandle)
            .map_err(|_| DomainError::TooManyStops(index))
    }
}

impl fmt::Display for StopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A station groups stops that riders consider the same place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

/// A physical stop where vehicles board and alight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    /// Station this stop belongs to, if any.
    pub parent_station: Option<StationId>,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_station: None,
        }
    }

    /// Attach the stop to a station.
    pub fn with_parent_station(mut self, station: StationId) -> Self {
        self.parent_station = Some(station);
        self
    }
}

/// Bidirectional mapping between stops and dense handles.
///
/// The mapping is fixed at construction: handles are assigned in insertion
/// order and never change for the lifetime of the index.
#[derive(Debug, Clone, Default)]
pub struct StopIndex {
    stops: Vec<Stop>,
    by_id: HashMap<StopId, StopHandle>,
}

impl StopIndex {
    /// Build an index from stops, assigning handles in iteration order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateId` if two stops share an id.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_core::domain::{Stop, StopHandle, StopId, StopIndex};
    ///
    /// let a = Stop::new(StopId::new("A").unwrap(), "Alpha");
    /// let b = Stop::new(StopId::new("B").unwrap(), "Bravo");
    /// let index = StopIndex::new(vec![a, b]).unwrap();
    ///
    /// let h = index.handle_of(&StopId::new("B").unwrap()).unwrap();
    /// assert_eq!(h, StopHandle(1));
    /// assert_eq!(index.stop(h).unwrap().name, "Bravo");
    /// ```
    pub fn new(stops: impl IntoIterator<Item = Stop>) -> Result<Self, DomainError> {
        let mut index = Self::default();
        for stop in stops {
            let handle = StopHandle::from_index(index.stops.len())?;
            if index.by_id.insert(stop.id.clone(), handle).is_some() {
                return Err(DomainError::DuplicateId {
                    kind: "stop",
                    id: stop.id.to_string(),
                });
            }
            index.stops.push(stop);
        }
        Ok(index)
    }

    /// Look up the handle of a stop id.
    pub fn handle_of(&self, id: &StopId) -> Option<StopHandle> {
        self.by_id.get(id).copied()
    }

    /// Look up the stop behind a handle.
    pub fn stop(&self, handle: StopHandle) -> Option<&Stop> {
        self.stops.get(handle.index())
    }

    /// Station the stop belongs to, if any.
    pub fn parent_station(&self, handle: StopHandle) -> Option<&StationId> {
        self.stop(handle).and_then(|s| s.parent_station.as_ref())
    }

    /// Number of stops; every handle is below this.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Iterate over `(handle, stop)` in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (StopHandle, &Stop)> {
        self.stops
            .iter()
            .enumerate()
            .map(|(i, s)| (StopHandle(i as u32), s))
    }
}
