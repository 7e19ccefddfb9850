//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;
use std::time::Duration;

use quantbridge::task::{
    adapters::memory::InMemoryTaskRegistry,
    domain::{Task, TaskId, TaskStatus},
    services::{EstimatorSettings, ProgressEstimator, TaskDispatcher, TaskManager},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Manager type shared by the integration tests.
pub type TestManager = TaskManager<InMemoryTaskRegistry, DefaultClock>;

/// Dispatcher type shared by the integration tests.
pub type TestDispatcher = TaskDispatcher<InMemoryTaskRegistry, DefaultClock>;

/// Provides a manager over a fresh registry.
#[fixture]
pub fn manager() -> TestManager {
    TaskManager::new(Arc::new(InMemoryTaskRegistry::new()), Arc::new(DefaultClock))
}

/// Provides a dispatcher with the default calibration.
#[fixture]
pub fn dispatcher(manager: TestManager) -> TestDispatcher {
    let estimator = ProgressEstimator::new(manager.clone(), Arc::new(EstimatorSettings::default()));
    TaskDispatcher::new(manager, estimator)
}

/// Polls until a task reaches `status`.
///
/// # Errors
///
/// Returns an error if the task cannot be read or never reaches `status`.
pub async fn wait_for_status(
    manager: &TestManager,
    id: &TaskId,
    status: TaskStatus,
) -> Result<Task, eyre::Report> {
    for _ in 0..200 {
        let task = manager.get_task(id).await?;
        if task.status() == status {
            return Ok(task);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    Err(eyre::eyre!("task {id} never reached {}", status.as_str()))
}
