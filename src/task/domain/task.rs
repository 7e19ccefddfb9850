//! Task aggregate and lifecycle status.

use super::{ParseTaskStatusError, TaskId, TaskKind};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters captured when a task is created and echoed on every read.
pub type TaskParams = BTreeMap<String, String>;

/// Progress text of a task that has not started yet.
pub const PROGRESS_PENDING: &str = "waiting to start";
/// Progress text written by the pending to running transition.
pub const PROGRESS_RUNNING: &str = "running";
/// Progress text written on successful completion.
pub const PROGRESS_COMPLETED: &str = "completed";
/// Progress text written on failure.
pub const PROGRESS_FAILED: &str = "failed";

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created but its worker has not started.
    Pending,
    /// The wrapped operation is in flight.
    Running,
    /// The operation returned a result.
    Completed,
    /// The operation returned an error.
    Failed,
}

impl TaskStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` for `completed` and `failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Trackable record of one asynchronous operation.
///
/// Transitions follow `pending -> running -> {completed | failed}`.
/// Requests that do not fit are ignored: `completed` and `failed` are
/// terminal, and only a pending task can start. A pending task may be
/// completed or failed directly, leaving `started_at` unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    kind: TaskKind,
    status: TaskStatus,
    progress_text: String,
    percent: u8,
    result: Option<String>,
    error: Option<String>,
    params: TaskParams,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a pending task with a fresh identifier.
    #[must_use]
    pub fn new(kind: TaskKind, params: TaskParams, clock: &impl Clock) -> Self {
        Self {
            id: TaskId::new(),
            kind,
            status: TaskStatus::Pending,
            progress_text: PROGRESS_PENDING.to_owned(),
            percent: 0,
            result: None,
            error: None,
            params,
            created_at: clock.utc(),
            started_at: None,
            ended_at: None,
        }
    }

    /// Returns a copy of this task carrying a different identifier.
    ///
    /// Used to redraw an identifier that collided with a known task.
    #[must_use]
    pub fn with_fresh_id(mut self) -> Self {
        self.id = TaskId::new();
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the task kind.
    #[must_use]
    pub const fn kind(&self) -> &TaskKind {
        &self.kind
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the latest human-readable progress description.
    #[must_use]
    pub fn progress_text(&self) -> &str {
        &self.progress_text
    }

    /// Returns the latest completion percentage.
    #[must_use]
    pub const fn percent(&self) -> u8 {
        self.percent
    }

    /// Returns the result payload of a completed task.
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Returns the error message of a failed task.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the creation parameters.
    #[must_use]
    pub const fn params(&self) -> &TaskParams {
        &self.params
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the start timestamp, if the task was started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns the end timestamp, if the task reached a terminal state.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Returns the run time between start and end.
    ///
    /// `None` unless both timestamps are set, which excludes tasks that were
    /// completed or failed without ever being started.
    #[must_use]
    pub fn duration(&self) -> Option<TimeDelta> {
        match (self.started_at, self.ended_at) {
            (Some(started), Some(ended)) => Some(ended - started),
            _ => None,
        }
    }

    /// Moves a pending task to `running`. No-op in any other status.
    pub fn mark_started(&mut self, at: DateTime<Utc>) {
        if self.status != TaskStatus::Pending {
            return;
        }
        self.status = TaskStatus::Running;
        self.started_at = Some(at);
        PROGRESS_RUNNING.clone_into(&mut self.progress_text);
    }

    /// Overwrites progress text and percentage without any bounds check.
    ///
    /// No-op once the task is terminal.
    pub fn record_progress(&mut self, text: impl Into<String>, percent: u8) {
        if self.status.is_terminal() {
            return;
        }
        self.progress_text = text.into();
        self.percent = percent;
    }

    /// Moves the task to `completed` with its result payload.
    ///
    /// No-op once the task is terminal.
    pub fn mark_completed(&mut self, result: impl Into<String>, at: DateTime<Utc>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = TaskStatus::Completed;
        self.result = Some(result.into());
        self.error = None;
        PROGRESS_COMPLETED.clone_into(&mut self.progress_text);
        self.percent = 100;
        self.ended_at = Some(at);
    }

    /// Moves the task to `failed` with the operation's error message.
    ///
    /// The percentage is left at its last estimated value. No-op once the
    /// task is terminal.
    pub fn mark_failed(&mut self, error: impl Into<String>, at: DateTime<Utc>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = TaskStatus::Failed;
        self.error = Some(error.into());
        self.result = None;
        PROGRESS_FAILED.clone_into(&mut self.progress_text);
        self.ended_at = Some(at);
    }
}
