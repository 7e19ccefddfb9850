//! Application services for task tracking and background execution.

mod dispatch;
mod estimator;
mod manager;

pub use dispatch::{
    ASYNC_THRESHOLD_DAYS, SubmitOutcome, SubmitRequest, TaskDispatcher, should_run_async,
};
pub use estimator::{
    CEILING_PERCENT, EstimatorSettings, FLOOR_PERCENT, MAX_TICK_INTERVAL, MIN_ESTIMATED_DURATION,
    MIN_TICK_INTERVAL, ProgressEstimator, ProgressTicker, estimate_percent, format_elapsed,
    progress_text, tick_interval,
};
pub use manager::{TaskManager, TaskManagerError, TaskManagerResult};
