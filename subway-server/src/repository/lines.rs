//! Line repository.
//!
//! Lock order is always table first, then line. Section mutations only
//! hold the table lock long enough to clone a [`LineHandle`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::domain::{Line, LineId};

/// Shared handle to one stored line. Locking it gives exclusive access
/// for the duration of a mutation.
pub type LineHandle = Arc<Mutex<Line>>;

/// Error returned when a line name is already claimed by another line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line name {0:?} is already in use")]
pub struct NameTaken(pub String);

#[derive(Default)]
struct LineTable {
    lines: BTreeMap<LineId, LineHandle>,
    /// Name index for the uniqueness check.
    names: HashMap<String, LineId>,
    /// Highest id handed out so far. Ids are never reused.
    last_id: u64,
}

/// Thread-safe store of lines with unique names.
#[derive(Clone, Default)]
pub struct LineRepository {
    inner: Arc<RwLock<LineTable>>,
}

impl LineRepository {
    /// Create an empty repository. Ids are handed out from 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new line built by `build` under the next free id.
    ///
    /// The name check and the insert happen under one write lock, so two
    /// concurrent creations with the same name cannot both succeed.
    pub async fn insert_with<E>(
        &self,
        build: impl FnOnce(LineId) -> Result<Line, E>,
    ) -> Result<Line, E>
    where
        E: From<NameTaken>,
    {
        let mut table = self.inner.write().await;
        let id = LineId(table.last_id + 1);
        let line = build(id)?;

        if table.names.contains_key(line.name()) {
            return Err(NameTaken(line.name().to_string()).into());
        }

        table.last_id = id.get();
        table.names.insert(line.name().to_string(), id);
        table.lines.insert(id, Arc::new(Mutex::new(line.clone())));
        Ok(line)
    }

    /// Apply `change` to a copy of the line and commit it if it succeeds
    /// and the resulting name is not used by a different line.
    ///
    /// Returns `Ok(None)` if there is no such line.
    pub async fn update_with<E>(
        &self,
        id: LineId,
        change: impl FnOnce(&mut Line) -> Result<(), E>,
    ) -> Result<Option<Line>, E>
    where
        E: From<NameTaken>,
    {
        let mut table = self.inner.write().await;
        let Some(handle) = table.lines.get(&id).cloned() else {
            return Ok(None);
        };
        let mut line = handle.lock().await;

        let mut updated = line.clone();
        change(&mut updated)?;

        if updated.name() != line.name() {
            if table
                .names
                .get(updated.name())
                .is_some_and(|owner| *owner != id)
            {
                return Err(NameTaken(updated.name().to_string()).into());
            }
            table.names.remove(line.name());
            table.names.insert(updated.name().to_string(), id);
        }

        *line = updated.clone();
        Ok(Some(updated))
    }

    /// Get a handle to a line.
    pub async fn get(&self, id: LineId) -> Option<LineHandle> {
        let table = self.inner.read().await;
        table.lines.get(&id).cloned()
    }

    /// Handles to all lines, ordered by id.
    pub async fn all(&self) -> Vec<LineHandle> {
        let table = self.inner.read().await;
        table.lines.values().cloned().collect()
    }

    /// Remove a line and release its name. Returns the removed line.
    pub async fn remove(&self, id: LineId) -> Option<Line> {
        let mut table = self.inner.write().await;
        let handle = table.lines.remove(&id)?;
        let line = handle.lock().await.clone();
        table.names.remove(line.name());
        Some(line)
    }

    /// Get the number of stored lines.
    pub async fn len(&self) -> usize {
        let table = self.inner.read().await;
        table.lines.len()
    }

    /// Check if the repository is empty.
    pub async fn is_empty(&self) -> bool {
        let table = self.inner.read().await;
        table.lines.is_empty()
    }
}
