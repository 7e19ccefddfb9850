//! Service layer for task creation, lifecycle transitions, and polling.

use crate::task::{
    domain::{Task, TaskId, TaskKind, TaskParams},
    ports::{TaskFilter, TaskRegistry, TaskRegistryError},
};
use mockable::Clock;
use std::cmp::Reverse;
use std::sync::Arc;
use thiserror::Error;

/// Attempts at drawing an unused identifier before giving up.
const MAX_ID_ATTEMPTS: usize = 8;

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskManagerError {
    /// No task exists with the given identifier.
    #[error("task '{0}' not found")]
    NotFound(TaskId),
    /// Registry operation failed.
    #[error(transparent)]
    Registry(#[from] TaskRegistryError),
}

/// Result type for task manager operations.
pub type TaskManagerResult<T> = Result<T, TaskManagerError>;

/// Task tracking service.
///
/// Supplies timestamps from the injected clock and delegates storage to
/// the registry port. Cloning is cheap and clones share state.
pub struct TaskManager<R, C>
where
    R: TaskRegistry,
    C: Clock + Send + Sync,
{
    registry: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskManager<R, C>
where
    R: TaskRegistry,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskManager<R, C>
where
    R: TaskRegistry,
    C: Clock + Send + Sync,
{
    /// Creates a new task manager.
    #[must_use]
    pub const fn new(registry: Arc<R>, clock: Arc<C>) -> Self {
        Self { registry, clock }
    }

    /// Creates a pending task and returns its identifier.
    ///
    /// A freshly drawn identifier that collides with a known task is
    /// redrawn.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagerError::Registry`] when storage fails or no
    /// unused identifier could be drawn.
    pub async fn create_task(&self, kind: TaskKind, params: TaskParams) -> TaskManagerResult<TaskId> {
        let mut task = Task::new(kind, params, &*self.clock);
        let mut attempt = 1;
        loop {
            match self.registry.create(&task).await {
                Ok(()) => return Ok(task.id().clone()),
                Err(TaskRegistryError::DuplicateTask(_)) if attempt < MAX_ID_ATTEMPTS => {
                    attempt += 1;
                    task = task.with_fresh_id();
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Marks a task as running. Unknown identifiers are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagerError::Registry`] when storage fails.
    pub async fn start_task(&self, id: &TaskId) -> TaskManagerResult<()> {
        Ok(self.registry.start(id, self.clock.utc()).await?)
    }

    /// Overwrites a task's progress. Unknown identifiers are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagerError::Registry`] when storage fails.
    pub async fn update_progress(
        &self,
        id: &TaskId,
        text: impl Into<String> + Send,
        percent: u8,
    ) -> TaskManagerResult<()> {
        Ok(self
            .registry
            .update_progress(id, text.into(), percent)
            .await?)
    }

    /// Marks a task as completed. Unknown identifiers are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagerError::Registry`] when storage fails.
    pub async fn complete_task(
        &self,
        id: &TaskId,
        result: impl Into<String> + Send,
    ) -> TaskManagerResult<()> {
        Ok(self
            .registry
            .complete(id, result.into(), self.clock.utc())
            .await?)
    }

    /// Marks a task as failed. Unknown identifiers are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagerError::Registry`] when storage fails.
    pub async fn fail_task(
        &self,
        id: &TaskId,
        error: impl Into<String> + Send,
    ) -> TaskManagerResult<()> {
        Ok(self
            .registry
            .fail(id, error.into(), self.clock.utc())
            .await?)
    }

    /// Returns a snapshot of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagerError::NotFound`] for unknown identifiers and
    /// [`TaskManagerError::Registry`] when storage fails.
    pub async fn get_task(&self, id: &TaskId) -> TaskManagerResult<Task> {
        self.registry
            .find_by_id(id)
            .await?
            .ok_or_else(|| TaskManagerError::NotFound(id.clone()))
    }

    /// Lists tasks matching the filter, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagerError::Registry`] when storage fails.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> TaskManagerResult<Vec<Task>> {
        let mut tasks = self.registry.list(filter).await?;
        tasks.sort_by_key(|task| Reverse(task.created_at()));
        Ok(tasks)
    }
}
