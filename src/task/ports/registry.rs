//! Registry port for task records and their lifecycle transitions.

use crate::task::domain::{Task, TaskId, TaskKind, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task registry operations.
pub type TaskRegistryResult<T> = Result<T, TaskRegistryError>;

/// Optional filters for listing tasks. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Exact kind to match.
    pub kind: Option<TaskKind>,
    /// Exact status to match.
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    /// Creates a filter that matches every task.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            kind: None,
            status: None,
        }
    }

    /// Restricts the filter to one kind.
    #[must_use]
    pub fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restricts the filter to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns `true` when the task satisfies every set filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.kind.as_ref().is_none_or(|kind| task.kind() == kind)
            && self.status.is_none_or(|status| task.status() == status)
    }
}

/// Task record storage with in-place lifecycle transitions.
///
/// Mutations on an identifier the registry does not know are silent
/// no-ops: they are only ever issued by the worker that created the task,
/// so a missing identifier is an upstream logic fault rather than a
/// recoverable condition.
#[async_trait]
pub trait TaskRegistry: Send + Sync {
    /// Stores a newly created task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::DuplicateTask`] when the identifier is
    /// already known.
    async fn create(&self, task: &Task) -> TaskRegistryResult<()>;

    /// Marks a task as running.
    async fn start(&self, id: &TaskId, at: DateTime<Utc>) -> TaskRegistryResult<()>;

    /// Overwrites a task's progress text and percentage.
    async fn update_progress(
        &self,
        id: &TaskId,
        text: String,
        percent: u8,
    ) -> TaskRegistryResult<()>;

    /// Marks a task as completed with its result payload.
    async fn complete(
        &self,
        id: &TaskId,
        result: String,
        at: DateTime<Utc>,
    ) -> TaskRegistryResult<()>;

    /// Marks a task as failed with the operation's error message.
    async fn fail(&self, id: &TaskId, error: String, at: DateTime<Utc>) -> TaskRegistryResult<()>;

    /// Returns a snapshot of the task, or `None` when it is unknown.
    async fn find_by_id(&self, id: &TaskId) -> TaskRegistryResult<Option<Task>>;

    /// Returns snapshots of all tasks matching the filter, in no
    /// particular order.
    async fn list(&self, filter: &TaskFilter) -> TaskRegistryResult<Vec<Task>>;
}

/// Errors returned by task registry implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRegistryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// Storage-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRegistryError {
    /// Wraps a storage error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
