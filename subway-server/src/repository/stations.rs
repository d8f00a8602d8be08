//! Station registry.
//!
//! Operations that must see a consistent set of stations across several
//! steps (checking a station exists, then writing a line that uses it) hold
//! a [`StationsRead`] or [`StationsWrite`] guard for the whole operation.
//! The registry lock is always taken before any line lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{DomainError, Station, StationId};

#[derive(Default)]
struct StationTable {
    stations: BTreeMap<StationId, Station>,
    /// Highest id handed out so far. Ids are never reused.
    last_id: u64,
}

/// Thread-safe registry of stations, keyed by id.
#[derive(Clone, Default)]
pub struct StationRegistry {
    inner: Arc<RwLock<StationTable>>,
}

/// Shared access to the registry. No station can be removed while held.
pub struct StationsRead<'a> {
    table: RwLockReadGuard<'a, StationTable>,
}

/// Exclusive access to the registry.
pub struct StationsWrite<'a> {
    table: RwLockWriteGuard<'a, StationTable>,
}

impl StationRegistry {
    /// Create an empty registry. Ids are handed out from 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new station under the next free id.
    pub async fn create(&self, name: &str) -> Result<Station, DomainError> {
        let mut guard = self.inner.write().await;
        let id = StationId(guard.last_id + 1);
        let station = Station::new(id, name)?;
        guard.last_id = id.get();
        guard.stations.insert(id, station.clone());
        Ok(station)
    }

    /// All stations, ordered by id.
    pub async fn list(&self) -> Vec<Station> {
        let guard = self.inner.read().await;
        guard.stations.values().cloned().collect()
    }

    /// Take shared access for a multi-step read.
    pub async fn read(&self) -> StationsRead<'_> {
        StationsRead {
            table: self.inner.read().await,
        }
    }

    /// Take exclusive access for a check-then-remove.
    pub async fn write(&self) -> StationsWrite<'_> {
        StationsWrite {
            table: self.inner.write().await,
        }
    }

    /// Get the number of registered stations.
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.stations.len()
    }

    /// Check if the registry is empty.
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.stations.is_empty()
    }
}

impl StationsRead<'_> {
    /// Whether a station with this id exists.
    pub fn contains(&self, id: StationId) -> bool {
        self.table.stations.contains_key(&id)
    }

    /// Look up several stations, preserving the order of `ids`.
    ///
    /// Returns the first id that is not registered as the error.
    pub fn get_many(&self, ids: &[StationId]) -> Result<Vec<Station>, StationId> {
        ids.iter()
            .map(|id| self.table.stations.get(id).cloned().ok_or(*id))
            .collect()
    }
}

impl StationsWrite<'_> {
    /// Whether a station with this id exists.
    pub fn contains(&self, id: StationId) -> bool {
        self.table.stations.contains_key(&id)
    }

    /// Remove a station, returning it if it existed.
    pub fn remove(&mut self, id: StationId) -> Option<Station> {
        self.table.stations.remove(&id)
    }
}
