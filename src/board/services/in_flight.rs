//! Registry of remote writes that have not settled yet.
//!
//! Each `(task, field)` pair has at most one current request. A newer
//! mutation of the same pair supersedes the older one: the older request is
//! cancelled if its call has not been issued, and its eventual result is
//! ignored otherwise. The registry also keeps the last confirmed value of
//! the pair, which is what a failed current request rolls back to.

use super::store::{TaskStoreError, TaskStoreResult};
use crate::board::domain::{FieldSnapshot, TaskField, TaskId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// How a settled request relates to the current state of its pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Settlement {
    /// The request was the newest one for its pair.
    Current,
    /// A newer request for the pair was applied afterwards.
    Superseded,
}

/// Shared in-flight request registry.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    state: Arc<Mutex<RegistryState>>,
}

#[derive(Debug, Default)]
struct RegistryState {
    entries: HashMap<(TaskId, TaskField), InFlightEntry>,
    next_generation: u64,
    closed: bool,
}

#[derive(Debug)]
struct InFlightEntry {
    generation: u64,
    baseline: FieldSnapshot,
    baseline_generation: u64,
}

impl InFlightRegistry {
    /// Creates an empty, open registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> TaskStoreResult<MutexGuard<'_, RegistryState>> {
        self.state.lock().map_err(TaskStoreError::poisoned)
    }

    /// Registers a new request and returns its generation.
    ///
    /// `previous` becomes the rollback baseline only when no request for the
    /// pair is already in flight; otherwise the older confirmed baseline is
    /// kept.
    pub(crate) fn begin(
        &self,
        task_id: &TaskId,
        previous: FieldSnapshot,
    ) -> TaskStoreResult<u64> {
        let mut state = self.lock()?;
        state.next_generation = state.next_generation.wrapping_add(1);
        let generation = state.next_generation;
        let key = (task_id.clone(), previous.field());
        state
            .entries
            .entry(key)
            .and_modify(|entry| entry.generation = generation)
            .or_insert(InFlightEntry {
                generation,
                baseline: previous,
                baseline_generation: 0,
            });
        Ok(generation)
    }

    /// Returns `true` when `generation` is the newest request for the pair.
    pub(crate) fn is_current(
        &self,
        task_id: &TaskId,
        field: TaskField,
        generation: u64,
    ) -> TaskStoreResult<bool> {
        let state = self.lock()?;
        Ok(state
            .entries
            .get(&(task_id.clone(), field))
            .is_some_and(|entry| entry.generation == generation))
    }

    /// Records a successful response.
    ///
    /// A current request clears the pair. A superseded one moves the
    /// baseline forward to the value the server has now accepted, unless a
    /// newer confirmation already did.
    pub(crate) fn confirm(
        &self,
        task_id: &TaskId,
        generation: u64,
        confirmed: FieldSnapshot,
    ) -> TaskStoreResult<Settlement> {
        let mut state = self.lock()?;
        let key = (task_id.clone(), confirmed.field());
        let is_current = state
            .entries
            .get(&key)
            .is_some_and(|entry| entry.generation == generation);
        if is_current {
            state.entries.remove(&key);
            return Ok(Settlement::Current);
        }
        if let Some(entry) = state
            .entries
            .get_mut(&key)
            .filter(|entry| generation > entry.baseline_generation)
        {
            entry.baseline = confirmed;
            entry.baseline_generation = generation;
        }
        Ok(Settlement::Superseded)
    }

    /// Records a failed response.
    ///
    /// Returns the baseline to restore when the request was current, and
    /// `None` when it was superseded.
    pub(crate) fn fail(
        &self,
        task_id: &TaskId,
        field: TaskField,
        generation: u64,
    ) -> TaskStoreResult<Option<FieldSnapshot>> {
        let mut state = self.lock()?;
        let key = (task_id.clone(), field);
        let is_current = state
            .entries
            .get(&key)
            .is_some_and(|entry| entry.generation == generation);
        if !is_current {
            return Ok(None);
        }
        Ok(state.entries.remove(&key).map(|entry| entry.baseline))
    }

    /// Drops the pair's entry if `generation` still owns it.
    ///
    /// Used when a pending mutation is discarded without settling: the
    /// value it wrote stays in the store and becomes the baseline of the
    /// next request for the pair.
    pub(crate) fn release(
        &self,
        task_id: &TaskId,
        field: TaskField,
        generation: u64,
    ) -> TaskStoreResult<bool> {
        let mut state = self.lock()?;
        let key = (task_id.clone(), field);
        let owned = state
            .entries
            .get(&key)
            .is_some_and(|entry| entry.generation == generation);
        if owned {
            state.entries.remove(&key);
        }
        Ok(owned)
    }

    /// Marks the owning board as gone. Results arriving afterwards are
    /// dead-lettered.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Poisoned`] when the lock is poisoned.
    pub fn close(&self) -> TaskStoreResult<()> {
        let mut state = self.lock()?;
        state.closed = true;
        Ok(())
    }

    /// Returns `true` once [`Self::close`] has been called.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Poisoned`] when the lock is poisoned.
    pub fn is_closed(&self) -> TaskStoreResult<bool> {
        Ok(self.lock()?.closed)
    }

    /// Returns `true` when a request for the pair has not settled.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Poisoned`] when the lock is poisoned.
    pub fn is_in_flight(&self, task_id: &TaskId, field: TaskField) -> TaskStoreResult<bool> {
        Ok(self.lock()?.entries.contains_key(&(task_id.clone(), field)))
    }

    /// Returns the number of pairs with an unsettled request.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Poisoned`] when the lock is poisoned.
    pub fn len(&self) -> TaskStoreResult<usize> {
        Ok(self.lock()?.entries.len())
    }

    /// Returns `true` when nothing is in flight.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Poisoned`] when the lock is poisoned.
    pub fn is_empty(&self) -> TaskStoreResult<bool> {
        Ok(self.lock()?.entries.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let registry = self.clone();
        let handle = std::thread::spawn(move || {
            let _guard = registry.state.lock();
            panic!("poisoning in-flight registry");
        });
        assert!(handle.join().is_err());
    }
}
