//! Port contracts for task tracking.

mod registry;

pub use registry::{TaskFilter, TaskRegistry, TaskRegistryError, TaskRegistryResult};
