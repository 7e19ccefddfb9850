//! Sync-versus-async execution of long-running operations.

use crate::task::{
    domain::{TaskId, TaskKind, TaskParams, TimeRange},
    ports::TaskRegistry,
    services::{ProgressEstimator, TaskManager, TaskManagerResult},
};
use mockable::Clock;
use serde_json::Value;
use std::fmt::Display;
use std::future::Future;
use tracing::{error, info, warn};

/// Data span, in days, beyond which an operation runs in the background.
///
/// Shared by every task kind.
pub const ASYNC_THRESHOLD_DAYS: u32 = 30;

/// Returns `true` when the range spans strictly more than
/// [`ASYNC_THRESHOLD_DAYS`].
#[must_use]
pub fn should_run_async(range: &TimeRange) -> bool {
    range.span_days() > f64::from(ASYNC_THRESHOLD_DAYS)
}

/// Outcome of submitting an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<E> {
    /// The operation ran inline and returned a result.
    Completed(Value),
    /// The operation ran inline and returned an error.
    Failed(E),
    /// The operation was handed to a background worker.
    Spawned(TaskId),
}

impl<E> SubmitOutcome<E> {
    /// Returns `true` when the operation ran inline.
    #[must_use]
    pub const fn is_sync(&self) -> bool {
        !matches!(self, Self::Spawned(_))
    }

    /// Returns the background task identifier, if one was issued.
    #[must_use]
    pub const fn task_id(&self) -> Option<&TaskId> {
        match self {
            Self::Spawned(id) => Some(id),
            Self::Completed(_) | Self::Failed(_) => None,
        }
    }
}

/// One long-running operation to run, described for task tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    kind: TaskKind,
    range: TimeRange,
    params: TaskParams,
}

impl SubmitRequest {
    /// Creates a request for an operation of `kind` over `range`.
    #[must_use]
    pub fn new(kind: impl Into<TaskKind>, range: TimeRange) -> Self {
        Self {
            kind: kind.into(),
            range,
            params: TaskParams::new(),
        }
    }

    /// Records a parameter echoed back on every task read.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replaces all recorded parameters.
    #[must_use]
    pub fn with_params(mut self, params: TaskParams) -> Self {
        self.params = params;
        self
    }

    /// Returns the task kind.
    #[must_use]
    pub const fn kind(&self) -> &TaskKind {
        &self.kind
    }

    /// Returns the data range.
    #[must_use]
    pub const fn range(&self) -> &TimeRange {
        &self.range
    }
}

/// Runs operations inline or in the background according to
/// [`should_run_async`].
pub struct TaskDispatcher<R, C>
where
    R: TaskRegistry,
    C: Clock + Send + Sync,
{
    manager: TaskManager<R, C>,
    estimator: ProgressEstimator<R, C>,
}

impl<R, C> Clone for TaskDispatcher<R, C>
where
    R: TaskRegistry,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
            estimator: self.estimator.clone(),
        }
    }
}

impl<R, C> TaskDispatcher<R, C>
where
    R: TaskRegistry + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a dispatcher.
    #[must_use]
    pub const fn new(manager: TaskManager<R, C>, estimator: ProgressEstimator<R, C>) -> Self {
        Self { manager, estimator }
    }

    /// Returns the task manager used for background tasks.
    #[must_use]
    pub const fn manager(&self) -> &TaskManager<R, C> {
        &self.manager
    }

    /// Submits an operation.
    ///
    /// Short ranges run inline and their result or error is returned
    /// directly. Long ranges create a pending task, spawn a worker that
    /// starts the task, ticks the estimator, awaits the operation, and
    /// records the outcome; the task identifier is returned immediately and
    /// the operation's error is only observable by polling.
    ///
    /// # Errors
    ///
    /// Returns registry errors raised while creating the background task.
    pub async fn submit<F, Fut, E>(
        &self,
        request: SubmitRequest,
        operation: F,
    ) -> TaskManagerResult<SubmitOutcome<E>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Value, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        if !should_run_async(&request.range) {
            return Ok(match operation().await {
                Ok(value) => SubmitOutcome::Completed(value),
                Err(err) => SubmitOutcome::Failed(err),
            });
        }

        let SubmitRequest {
            kind,
            range,
            params,
        } = request;
        let task_id = self.manager.create_task(kind.clone(), params).await?;
        info!(task_id = %task_id, kind = %kind, "running task in background");

        let manager = self.manager.clone();
        let estimator = self.estimator.clone();
        let worker_id = task_id.clone();
        tokio::spawn(async move {
            run_in_background(&manager, &estimator, worker_id, &kind, &range, operation).await;
        });

        Ok(SubmitOutcome::Spawned(task_id))
    }
}

async fn run_in_background<R, C, F, Fut, E>(
    manager: &TaskManager<R, C>,
    estimator: &ProgressEstimator<R, C>,
    task_id: TaskId,
    kind: &TaskKind,
    range: &TimeRange,
    operation: F,
) where
    R: TaskRegistry + 'static,
    C: Clock + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    if let Err(err) = manager.start_task(&task_id).await {
        warn!(task_id = %task_id, error = %err, "failed to mark task running");
    }
    let ticker = estimator.start(task_id.clone(), kind, range);

    // A panicking operation must still leave the task failed.
    let outcome = tokio::spawn(operation()).await;
    ticker.stop().await;

    let recorded = match outcome {
        Ok(Ok(value)) => {
            let payload = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
            let recorded = manager.complete_task(&task_id, payload).await;
            info!(task_id = %task_id, kind = %kind, "background task completed");
            recorded
        }
        Ok(Err(err)) => {
            let message = err.to_string();
            error!(task_id = %task_id, kind = %kind, error = %message, "background task failed");
            manager.fail_task(&task_id, message).await
        }
        Err(join_err) => {
            let message = if join_err.is_panic() {
                format!("operation panicked: {join_err}")
            } else {
                format!("operation cancelled: {join_err}")
            };
            error!(task_id = %task_id, kind = %kind, error = %message, "background task aborted");
            manager.fail_task(&task_id, message).await
        }
    };
    if let Err(err) = recorded {
        warn!(task_id = %task_id, error = %err, "failed to record task outcome");
    }
}
