//! Domain model for asynchronous task tracking.
//!
//! A task records the lifecycle and outcome of one long-running operation
//! that was handed off to a background worker. The domain holds no
//! locking or scheduling concerns; those live in adapters and services.

mod error;
mod ids;
mod task;
mod time_range;

pub use error::ParseTaskStatusError;
pub(crate) use ids::short_random_id;
pub use ids::{TaskId, TaskKind};
pub use task::{
    PROGRESS_COMPLETED, PROGRESS_FAILED, PROGRESS_PENDING, PROGRESS_RUNNING, Task, TaskParams,
    TaskStatus,
};
pub use time_range::TimeRange;
