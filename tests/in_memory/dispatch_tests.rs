//! In-memory integration tests for sync and background dispatch.

use crate::in_memory::helpers::{TestDispatcher, dispatcher, wait_for_status};
use quantbridge::task::{
    domain::{TaskKind, TaskStatus},
    ports::TaskFilter,
    services::{SubmitOutcome, SubmitRequest},
};
use quantbridge::tools::{TaskTools, parse_time_range, submission_response};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn managed_backtest_over_a_quarter_runs_in_background(
    dispatcher: TestDispatcher,
) -> Result<(), eyre::Report> {
    let range = parse_time_range("2024-01-01 00:00:00", "2024-04-01 00:00:00")?;
    let request = SubmitRequest::new(TaskKind::BACKTEST_MANAGED, range)
        .with_param("script", "grid.js")
        .with_param("symbol", "BTCUSDT");

    let outcome = dispatcher
        .submit(request, || async {
            Ok::<_, String>(json!({"trades": 12, "profit": 3.5}))
        })
        .await?;
    let id = outcome
        .task_id()
        .cloned()
        .ok_or_else(|| eyre::eyre!("expected a background task"))?;

    let done = wait_for_status(dispatcher.manager(), &id, TaskStatus::Completed).await?;
    eyre::ensure!(done.kind().as_str() == "backtest_managed", "kind is recorded");
    eyre::ensure!(done.params().get("script").map(String::as_str) == Some("grid.js"), "params");

    let tools = TaskTools::new(dispatcher.manager().clone());
    let body = tools
        .get_task_result(id.as_str())
        .await
        .body()
        .ok_or_else(|| eyre::eyre!("result is not JSON"))?;
    eyre::ensure!(body["result"] == json!({"trades": 12, "profit": 3.5}), "result: {body}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn month_long_download_answers_inline(dispatcher: TestDispatcher) -> Result<(), eyre::Report> {
    let range = parse_time_range("2024-01-01 00:00:00", "2024-01-31 00:00:00")?;

    let outcome = dispatcher
        .submit(SubmitRequest::new(TaskKind::DOWNLOAD, range), || async {
            Err::<serde_json::Value, _>("exchange timeout".to_owned())
        })
        .await?;

    eyre::ensure!(
        matches!(outcome, SubmitOutcome::Failed(ref message) if message == "exchange timeout"),
        "inline failure is returned directly"
    );
    let response = submission_response(&outcome);
    eyre::ensure!(response.is_error(), "inline failure is an error response");
    let tasks = dispatcher.manager().list_tasks(&TaskFilter::any()).await?;
    eyre::ensure!(tasks.is_empty(), "no task is tracked for inline work");
    Ok(())
}
