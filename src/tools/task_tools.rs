//! Polling tools over the task manager, and submission responses.

use super::{ToolResponse, format_duration, format_timestamp};
use crate::task::{
    domain::{Task, TaskId, TaskKind, TaskParams, TaskStatus},
    ports::{TaskFilter, TaskRegistry},
    services::{ASYNC_THRESHOLD_DAYS, SubmitOutcome, TaskManager},
};
use mockable::Clock;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView<'a> {
    task_id: &'a TaskId,
    #[serde(rename = "type")]
    kind: &'a TaskKind,
    status: TaskStatus,
    progress: &'a str,
    percent: u8,
    params: &'a TaskParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ended_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletedView<'a> {
    task_id: &'a TaskId,
    #[serde(rename = "type")]
    kind: &'a TaskKind,
    status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<String>,
    result: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FailedView<'a> {
    task_id: &'a TaskId,
    #[serde(rename = "type")]
    kind: &'a TaskKind,
    status: TaskStatus,
    error: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InFlightView<'a> {
    task_id: &'a TaskId,
    #[serde(rename = "type")]
    kind: &'a TaskKind,
    status: TaskStatus,
    progress: &'a str,
    percent: u8,
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryView<'a> {
    id: &'a TaskId,
    #[serde(rename = "type")]
    kind: &'a TaskKind,
    status: TaskStatus,
    progress: &'a str,
    percent: u8,
    created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<String>,
}

#[derive(Serialize)]
struct ListView<'a> {
    total: usize,
    tasks: Vec<SummaryView<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpawnedView<'a> {
    #[serde(rename = "async")]
    is_async: bool,
    task_id: &'a TaskId,
    message: String,
}

impl<'a> From<&'a Task> for SummaryView<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: task.id(),
            kind: task.kind(),
            status: task.status(),
            progress: task.progress_text(),
            percent: task.percent(),
            created_at: format_timestamp(task.created_at()),
            duration: task.duration().map(format_duration),
        }
    }
}

/// Embeds a stored result as JSON when it parses, else as a string.
fn embed_result(raw: Option<&str>) -> Value {
    let text = raw.unwrap_or_default();
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

/// The `get_task_status`, `get_task_result`, and `list_tasks` tools.
pub struct TaskTools<R, C>
where
    R: TaskRegistry,
    C: Clock + Send + Sync,
{
    manager: TaskManager<R, C>,
}

impl<R, C> TaskTools<R, C>
where
    R: TaskRegistry,
    C: Clock + Send + Sync,
{
    /// Creates the polling tools over a task manager.
    #[must_use]
    pub const fn new(manager: TaskManager<R, C>) -> Self {
        Self { manager }
    }

    /// Reports status, progress, and timing of a task.
    pub async fn get_task_status(&self, task_id: &str) -> ToolResponse {
        let task = match self.manager.get_task(&TaskId::from_raw(task_id)).await {
            Ok(task) => task,
            Err(err) => return ToolResponse::error(err.to_string()),
        };

        ToolResponse::json(&StatusView {
            task_id: task.id(),
            kind: task.kind(),
            status: task.status(),
            progress: task.progress_text(),
            percent: task.percent(),
            params: task.params(),
            started_at: task.started_at().map(format_timestamp),
            ended_at: task.ended_at().map(format_timestamp),
            duration: task.duration().map(format_duration),
            error: task.error().filter(|_| task.status() == TaskStatus::Failed),
        })
    }

    /// Returns the final result of a completed task, the error of a failed
    /// one, or an advisory to keep polling.
    pub async fn get_task_result(&self, task_id: &str) -> ToolResponse {
        let task = match self.manager.get_task(&TaskId::from_raw(task_id)).await {
            Ok(task) => task,
            Err(err) => return ToolResponse::error(err.to_string()),
        };

        match task.status() {
            TaskStatus::Completed => ToolResponse::json(&CompletedView {
                task_id: task.id(),
                kind: task.kind(),
                status: task.status(),
                duration: task.duration().map(format_duration),
                result: embed_result(task.result()),
            }),
            TaskStatus::Failed => ToolResponse::json_error(&FailedView {
                task_id: task.id(),
                kind: task.kind(),
                status: task.status(),
                error: task.error().unwrap_or_default(),
            }),
            TaskStatus::Pending | TaskStatus::Running => ToolResponse::json(&InFlightView {
                task_id: task.id(),
                kind: task.kind(),
                status: task.status(),
                progress: task.progress_text(),
                percent: task.percent(),
                message: format!(
                    "Task is still {}. Use get_task_status to continue polling.",
                    task.status().as_str()
                ),
            }),
        }
    }

    /// Lists task summaries, most recent first.
    ///
    /// Empty filters match everything; an unrecognised status matches
    /// nothing.
    pub async fn list_tasks(&self, kind: Option<&str>, status: Option<&str>) -> ToolResponse {
        let mut filter = TaskFilter::any();
        if let Some(label) = kind.filter(|label| !label.is_empty()) {
            filter = filter.with_kind(TaskKind::new(label));
        }
        if let Some(raw) = status.filter(|raw| !raw.is_empty()) {
            match TaskStatus::try_from(raw) {
                Ok(parsed) => filter = filter.with_status(parsed),
                Err(_) => {
                    return ToolResponse::json(&ListView {
                        total: 0,
                        tasks: Vec::new(),
                    });
                }
            }
        }

        let tasks = match self.manager.list_tasks(&filter).await {
            Ok(tasks) => tasks,
            Err(err) => return ToolResponse::error(err.to_string()),
        };
        let summaries: Vec<SummaryView<'_>> = tasks.iter().map(SummaryView::from).collect();
        ToolResponse::json(&ListView {
            total: summaries.len(),
            tasks: summaries,
        })
    }
}

/// Renders the immediate response to a submission.
///
/// Inline results are returned as-is, inline errors as error responses,
/// and background submissions as an `async` advisory carrying the task
/// identifier.
#[must_use]
pub fn submission_response<E: Display>(outcome: &SubmitOutcome<E>) -> ToolResponse {
    match outcome {
        SubmitOutcome::Completed(value) => ToolResponse::json(value),
        SubmitOutcome::Failed(err) => ToolResponse::error(err.to_string()),
        SubmitOutcome::Spawned(task_id) => ToolResponse::json(&SpawnedView {
            is_async: true,
            task_id,
            message: format!(
                "Time range exceeds {ASYNC_THRESHOLD_DAYS} days, running asynchronously. \
                 Use get_task_status with taskId '{task_id}' to check progress, or \
                 get_task_result to retrieve the final result."
            ),
        }),
    }
}
