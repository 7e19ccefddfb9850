//! Shared world state for submission BDD scenarios.

use std::sync::Arc;

use quantbridge::task::{
    adapters::memory::InMemoryTaskRegistry,
    domain::{TaskId, TimeRange},
    services::{EstimatorSettings, ProgressEstimator, TaskDispatcher, TaskManager},
};
use quantbridge::tools::{TaskTools, ToolResponse};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::Value;
use tokio::sync::oneshot;

/// Manager type used by the BDD world.
pub type TestManager = TaskManager<InMemoryTaskRegistry, DefaultClock>;

/// Scenario world for submission behaviour tests.
pub struct SubmissionWorld {
    pub manager: TestManager,
    pub dispatcher: TaskDispatcher<InMemoryTaskRegistry, DefaultClock>,
    pub tools: TaskTools<InMemoryTaskRegistry, DefaultClock>,
    pub pending_range: Option<TimeRange>,
    pub planned_outcome: Option<Result<Value, String>>,
    pub release: Option<oneshot::Sender<()>>,
    pub last_response: Option<ToolResponse>,
    pub task_id: Option<TaskId>,
}

impl SubmissionWorld {
    /// Creates a world with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        let manager = TaskManager::new(Arc::new(InMemoryTaskRegistry::new()), Arc::new(DefaultClock));
        let estimator =
            ProgressEstimator::new(manager.clone(), Arc::new(EstimatorSettings::default()));
        let dispatcher = TaskDispatcher::new(manager.clone(), estimator);
        let tools = TaskTools::new(manager.clone());

        Self {
            manager,
            dispatcher,
            tools,
            pending_range: None,
            planned_outcome: None,
            release: None,
            last_response: None,
            task_id: None,
        }
    }

    /// Returns the issued task identifier.
    pub fn task_id(&self) -> Result<&TaskId, eyre::Report> {
        self.task_id
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task id in scenario world"))
    }
}

impl Default for SubmissionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SubmissionWorld {
    SubmissionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
