//! Optimistic mutation engine.
//!
//! [`OptimisticMutator::apply`] writes a mutation into the task store
//! synchronously and hands back a [`PendingMutation`]. Settling the pending
//! mutation issues the remote call and either keeps the optimistic value or
//! restores the field exactly as it was. The store therefore reflects the
//! optimistic value before the caller reaches any await point.

use super::{
    error::{BoardError, BoardResult, MutationFailed},
    in_flight::{InFlightRegistry, Settlement},
    store::TaskStore,
};
use crate::board::{
    domain::{FieldSnapshot, MutationRequest, RemoteCall, TaskField, TaskId},
    ports::{RemoteResult, TaskBoardApi},
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of settling a pending mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The remote write succeeded, or the mutation was local-only.
    Committed,
    /// The remote write succeeded after a newer local mutation of the same
    /// field; the newer local value was kept.
    StaleConfirmation,
    /// The remote write failed and the field was restored.
    RolledBack(MutationFailed),
    /// The remote write failed after a newer local mutation of the same
    /// field; nothing was restored.
    StaleFailure(MutationFailed),
    /// A newer mutation of the same field superseded this one before its
    /// remote call was issued; no call was made.
    Cancelled,
    /// The result arrived after the board was closed and was discarded.
    DeadLettered,
}

impl MutationOutcome {
    /// Returns `true` when the server accepted the write.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Committed | Self::StaleConfirmation)
    }

    /// Returns the failure, if the remote write was rejected.
    #[must_use]
    pub const fn failure(&self) -> Option<&MutationFailed> {
        match self {
            Self::RolledBack(failure) | Self::StaleFailure(failure) => Some(failure),
            Self::Committed | Self::StaleConfirmation | Self::Cancelled | Self::DeadLettered => {
                None
            }
        }
    }
}

/// Apply/confirm/rollback engine over the task store.
pub struct OptimisticMutator<A>
where
    A: TaskBoardApi,
{
    store: TaskStore,
    registry: InFlightRegistry,
    api: Arc<A>,
}

impl<A> Clone for OptimisticMutator<A>
where
    A: TaskBoardApi,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            registry: self.registry.clone(),
            api: Arc::clone(&self.api),
        }
    }
}

impl<A> OptimisticMutator<A>
where
    A: TaskBoardApi,
{
    /// Creates a mutator writing to `store` and persisting through `api`.
    #[must_use]
    pub fn new(store: TaskStore, api: Arc<A>) -> Self {
        Self {
            store,
            registry: InFlightRegistry::new(),
            api,
        }
    }

    /// Returns the task store.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Returns the in-flight request registry.
    #[must_use]
    pub const fn registry(&self) -> &InFlightRegistry {
        &self.registry
    }

    /// Returns the remote API.
    #[must_use]
    pub const fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Applies a mutation to the store and returns the pending remote write.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] without touching the store when the
    /// task is absent, or [`BoardError::Store`] when board state is poisoned.
    pub fn apply(&self, request: MutationRequest) -> BoardResult<PendingMutation<A>> {
        let MutationRequest { task_id, mutation } = request;
        let field = mutation.field();
        let task = self
            .store
            .get(&task_id)?
            .ok_or_else(|| BoardError::NotFound(task_id.clone()))?;

        let previous = task.snapshot(field);
        let next = mutation.applied_to(&task);
        let optimistic = next.snapshot(field);
        let in_flight = match mutation.remote_call(&next) {
            Some(call) => Some((self.registry.begin(&task_id, previous)?, call)),
            None => None,
        };

        if !self.store.write_field(&task_id, optimistic.clone())? {
            return Err(BoardError::NotFound(task_id));
        }

        let mutation_id = Uuid::new_v4();
        debug!(
            %mutation_id,
            %task_id,
            %field,
            generation = in_flight.as_ref().map(|(generation, _)| *generation),
            "applied optimistic mutation"
        );

        Ok(PendingMutation {
            mutation_id,
            task_id,
            field,
            optimistic,
            in_flight,
            store: self.store.clone(),
            registry: self.registry.clone(),
            api: Arc::clone(&self.api),
        })
    }
}

/// Mutation already visible in the store, awaiting its remote write.
///
/// Dropping it without [`Self::settle`] skips the remote call. The written
/// value stays in the store and the pair stops counting as in flight.
#[must_use = "a pending mutation must be settled to reach the remote API"]
pub struct PendingMutation<A>
where
    A: TaskBoardApi,
{
    mutation_id: Uuid,
    task_id: TaskId,
    field: TaskField,
    optimistic: FieldSnapshot,
    in_flight: Option<(u64, RemoteCall)>,
    store: TaskStore,
    registry: InFlightRegistry,
    api: Arc<A>,
}

impl<A> std::fmt::Debug for PendingMutation<A>
where
    A: TaskBoardApi,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingMutation")
            .field("mutation_id", &self.mutation_id)
            .field("task_id", &self.task_id)
            .field("field", &self.field)
            .field("optimistic", &self.optimistic)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl<A> Drop for PendingMutation<A>
where
    A: TaskBoardApi,
{
    fn drop(&mut self) {
        let Some((generation, _)) = self.in_flight.as_ref() else {
            return;
        };
        match self.registry.release(&self.task_id, self.field, *generation) {
            Ok(true) => debug!(
                mutation_id = %self.mutation_id,
                task_id = %self.task_id,
                field = %self.field,
                "pending mutation released"
            ),
            Ok(false) => {}
            Err(err) => warn!(
                mutation_id = %self.mutation_id,
                error = %err,
                "could not release pending mutation"
            ),
        }
    }
}

impl<A> PendingMutation<A>
where
    A: TaskBoardApi,
{
    /// Returns the identifier used to correlate log lines.
    #[must_use]
    pub const fn mutation_id(&self) -> Uuid {
        self.mutation_id
    }

    /// Returns the mutated task.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the mutated field group.
    #[must_use]
    pub const fn field(&self) -> TaskField {
        self.field
    }

    /// Returns the value written optimistically.
    #[must_use]
    pub const fn optimistic_value(&self) -> &FieldSnapshot {
        &self.optimistic
    }

    /// Returns the remote call this mutation will issue, if any.
    #[must_use]
    pub fn remote_call(&self) -> Option<&RemoteCall> {
        self.in_flight.as_ref().map(|(_, call)| call)
    }

    /// Issues the remote call and reconciles the store with its result.
    ///
    /// Remote failures never surface as `Err`; they are reported through
    /// [`MutationOutcome::RolledBack`] after the field has been restored.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] when board state is poisoned.
    pub async fn settle(self) -> BoardResult<MutationOutcome> {
        let Some((generation, call)) = self
            .in_flight
            .as_ref()
            .map(|(generation, call)| (*generation, call))
        else {
            return Ok(MutationOutcome::Committed);
        };

        if !self
            .registry
            .is_current(&self.task_id, self.field, generation)?
        {
            debug!(
                mutation_id = %self.mutation_id,
                task_id = %self.task_id,
                field = %self.field,
                "superseded before dispatch, remote call skipped"
            );
            return Ok(MutationOutcome::Cancelled);
        }

        let result = dispatch(&*self.api, call).await;

        if self.registry.is_closed()? {
            debug!(
                mutation_id = %self.mutation_id,
                task_id = %self.task_id,
                field = %self.field,
                succeeded = result.is_ok(),
                "board closed, remote result dead-lettered"
            );
            return Ok(MutationOutcome::DeadLettered);
        }

        match result {
            Ok(()) => self.confirm(generation),
            Err(err) => self.roll_back(generation, err.to_string()),
        }
    }

    fn confirm(&self, generation: u64) -> BoardResult<MutationOutcome> {
        let settlement =
            self.registry
                .confirm(&self.task_id, generation, self.optimistic.clone())?;
        if settlement == Settlement::Superseded {
            debug!(
                mutation_id = %self.mutation_id,
                task_id = %self.task_id,
                field = %self.field,
                "stale confirmation ignored"
            );
            return Ok(MutationOutcome::StaleConfirmation);
        }
        info!(
            mutation_id = %self.mutation_id,
            task_id = %self.task_id,
            field = %self.field,
            "mutation committed"
        );
        Ok(MutationOutcome::Committed)
    }

    fn roll_back(&self, generation: u64, reason: String) -> BoardResult<MutationOutcome> {
        let failure = MutationFailed {
            task_id: self.task_id.clone(),
            field: self.field,
            reason,
        };
        let Some(baseline) = self.registry.fail(&self.task_id, self.field, generation)? else {
            warn!(
                mutation_id = %self.mutation_id,
                task_id = %self.task_id,
                field = %self.field,
                reason = %failure.reason,
                "stale mutation failed, newer local value kept"
            );
            return Ok(MutationOutcome::StaleFailure(failure));
        };

        if !self.store.write_field(&self.task_id, baseline)? {
            debug!(
                mutation_id = %self.mutation_id,
                task_id = %self.task_id,
                "task left the store before rollback"
            );
        }
        warn!(
            mutation_id = %self.mutation_id,
            task_id = %self.task_id,
            field = %self.field,
            reason = %failure.reason,
            "mutation failed, rolled back"
        );
        Ok(MutationOutcome::RolledBack(failure))
    }
}

async fn dispatch<A>(api: &A, call: &RemoteCall) -> RemoteResult<()>
where
    A: TaskBoardApi + ?Sized,
{
    match call {
        RemoteCall::PersistTaskStatus {
            task_id,
            status,
            priority,
        } => api.persist_task_status(task_id, *status, *priority).await,
        RemoteCall::PersistAssignment(payload) => api.persist_assignment(payload).await,
    }
}
