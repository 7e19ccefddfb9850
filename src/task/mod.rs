//! Asynchronous task tracking.
//!
//! Long-running operations (multi-month backtests, bulk downloads) are run
//! in the background when their data span exceeds a fixed threshold. The
//! caller receives a task identifier and polls the registry until the task
//! completes or fails, while a progress estimator synthesises a bounded
//! completion percentage. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
