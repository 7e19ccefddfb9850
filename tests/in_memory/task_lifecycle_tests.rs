//! In-memory integration tests for task lifecycle operations.

use crate::in_memory::helpers::{TestManager, manager};
use quantbridge::task::{
    domain::{PROGRESS_COMPLETED, PROGRESS_RUNNING, TaskId, TaskKind, TaskParams, TaskStatus},
    ports::TaskFilter,
    services::TaskManagerError,
};
use rstest::rstest;

fn download_params() -> TaskParams {
    TaskParams::from([
        ("exchange".to_owned(), "binance".to_owned()),
        ("symbol".to_owned(), "BTCUSDT".to_owned()),
    ])
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_is_observable_by_polling(manager: TestManager) -> Result<(), eyre::Report> {
    let id = manager
        .create_task(TaskKind::new(TaskKind::DOWNLOAD), download_params())
        .await?;

    manager.start_task(&id).await?;
    let running = manager.get_task(&id).await?;
    eyre::ensure!(running.status() == TaskStatus::Running, "task should be running");
    eyre::ensure!(running.progress_text() == PROGRESS_RUNNING, "running placeholder");

    manager
        .update_progress(&id, "processing... 90 days range, elapsed 20s", 40)
        .await?;
    manager.complete_task(&id, "downloaded 129600 klines").await?;

    let done = manager.get_task(&id).await?;
    eyre::ensure!(done.status() == TaskStatus::Completed, "task should be completed");
    eyre::ensure!(done.percent() == 100, "completion reports 100");
    eyre::ensure!(done.progress_text() == PROGRESS_COMPLETED, "completed placeholder");
    eyre::ensure!(done.error().is_none(), "completed task has no error");
    eyre::ensure!(done.duration().is_some(), "completed task has a duration");
    eyre::ensure!(done.params() == &download_params(), "params are echoed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_reads_fail_and_writes_do_nothing(manager: TestManager) {
    let ghost = TaskId::from_raw("deadbeef");

    manager.start_task(&ghost).await.expect("start is a no-op");
    manager
        .update_progress(&ghost, "processing", 50)
        .await
        .expect("progress is a no-op");
    manager
        .fail_task(&ghost, "exchange timeout")
        .await
        .expect("fail is a no-op");

    assert!(matches!(
        manager.get_task(&ghost).await,
        Err(TaskManagerError::NotFound(ref id)) if id == &ghost
    ));
    assert!(
        manager
            .list_tasks(&TaskFilter::any())
            .await
            .expect("list should succeed")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filters_combine_kind_and_status(manager: TestManager) {
    let backtest = manager
        .create_task(TaskKind::new(TaskKind::BACKTEST), TaskParams::new())
        .await
        .expect("create should succeed");
    manager
        .create_task(TaskKind::new(TaskKind::BACKTEST), TaskParams::new())
        .await
        .expect("create should succeed");
    manager
        .create_task(TaskKind::new(TaskKind::DOWNLOAD), TaskParams::new())
        .await
        .expect("create should succeed");
    manager.start_task(&backtest).await.expect("start should succeed");

    let running_backtests = manager
        .list_tasks(
            &TaskFilter::any()
                .with_kind(TaskKind::new(TaskKind::BACKTEST))
                .with_status(TaskStatus::Running),
        )
        .await
        .expect("list should succeed");
    let pending = manager
        .list_tasks(&TaskFilter::any().with_status(TaskStatus::Pending))
        .await
        .expect("list should succeed");

    assert_eq!(running_backtests.len(), 1);
    assert_eq!(running_backtests.first().map(|t| t.id()), Some(&backtest));
    assert_eq!(pending.len(), 2);
}
