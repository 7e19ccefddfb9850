//! In-memory task registry.
//!
//! Task history lives for the lifetime of the process and is never evicted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskFilter, TaskRegistry, TaskRegistryError, TaskRegistryResult},
};

/// Thread-safe in-memory task registry.
///
/// Clones share the same underlying map. Reads take the shared lock and
/// may run concurrently; every mutation takes the exclusive lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRegistry {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRegistry {
    /// Creates an empty in-memory registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `mutate` to the task with the given identifier, if present.
    fn modify(&self, id: &TaskId, mutate: impl FnOnce(&mut Task)) -> TaskRegistryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if let Some(task) = state.get_mut(id) {
            mutate(task);
        }
        Ok(())
    }
}

#[async_trait]
impl TaskRegistry for InMemoryTaskRegistry {
    async fn create(&self, task: &Task) -> TaskRegistryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.contains_key(task.id()) {
            return Err(TaskRegistryError::DuplicateTask(task.id().clone()));
        }
        state.insert(task.id().clone(), task.clone());
        Ok(())
    }

    async fn start(&self, id: &TaskId, at: DateTime<Utc>) -> TaskRegistryResult<()> {
        self.modify(id, |task| task.mark_started(at))
    }

    async fn update_progress(
        &self,
        id: &TaskId,
        text: String,
        percent: u8,
    ) -> TaskRegistryResult<()> {
        self.modify(id, |task| task.record_progress(text, percent))
    }

    async fn complete(
        &self,
        id: &TaskId,
        result: String,
        at: DateTime<Utc>,
    ) -> TaskRegistryResult<()> {
        self.modify(id, |task| task.mark_completed(result, at))
    }

    async fn fail(&self, id: &TaskId, error: String, at: DateTime<Utc>) -> TaskRegistryResult<()> {
        self.modify(id, |task| task.mark_failed(error, at))
    }

    async fn find_by_id(&self, id: &TaskId) -> TaskRegistryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(id).cloned())
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRegistryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }
}
