//! In-memory adapters for task tracking.

mod registry;

pub use registry::InMemoryTaskRegistry;
