//! Shared, atomically replaceable snapshot pointer.

use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{PatternId, TripTimes};

use super::{BuildError, TransitSnapshot};

/// The current snapshot, shared between searches and the update path.
///
/// Readers take an `Arc` to the snapshot and keep it for the whole search;
/// publishing never disturbs a search already running.
///
/// # Examples
///
/// ```
/// use transit_core::snapshot::{
///     BuildConfig, NetworkDefinition, SnapshotHandle, TransitSnapshot,
/// };
///
/// let def: NetworkDefinition = serde_json::from_str(
///     r#"{
///         "stops": [], "routes": [], "trips": [],
///         "calendar": [{"id": "S", "dates": ["2024-06-03"]}]
///     }"#,
/// )
/// .unwrap();
/// let snapshot = TransitSnapshot::build(&def, &BuildConfig::default()).unwrap();
///
/// let handle = SnapshotHandle::new(snapshot);
/// let current = handle.load();
/// assert_eq!(current.num_patterns(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotHandle {
    inner: Arc<RwLock<Arc<TransitSnapshot>>>,
}

impl SnapshotHandle {
    pub fn new(snapshot: TransitSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// The current snapshot.
    pub fn load(&self) -> Arc<TransitSnapshot> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }

    /// Replace the current snapshot, returning the previous one.
    pub fn publish(&self, snapshot: TransitSnapshot) -> Arc<TransitSnapshot> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let previous = std::mem::replace(&mut *guard, Arc::new(snapshot));
        debug!(
            patterns = guard.num_patterns(),
            merged_trips = guard.num_merged_trips(),
            "published snapshot"
        );
        previous
    }

    /// Replace the trips of one pattern on one date and publish the result.
    ///
    /// The write lock is held while the pattern is rebuilt, so concurrent
    /// updates apply one after the other.
    ///
    /// # Errors
    ///
    /// See [`TransitSnapshot::with_pattern_date_replaced`]; on error the
    /// current snapshot stays published.
    pub fn replace_pattern_date(
        &self,
        pattern: &PatternId,
        date: NaiveDate,
        trips: Vec<Arc<TripTimes>>,
    ) -> Result<(), BuildError> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let next = guard.with_pattern_date_replaced(pattern, date, trips)?;
        *guard = Arc::new(next);
        Ok(())
    }
}
