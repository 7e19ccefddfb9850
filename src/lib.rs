//! Quantbridge: task tracking for a trading-framework tool server.
//!
//! This crate sits between a tool-calling client and a trading framework
//! whose backtests and downloads can run for minutes. Short operations run
//! inline; long ones run in the background as tracked tasks that the
//! client polls.
//!
//! # Architecture
//!
//! Task tracking follows hexagonal architecture principles:
//!
//! - **Domain**: Task records, identifiers, and lifecycle rules
//! - **Ports**: The task registry contract
//! - **Adapters**: An in-memory registry
//! - **Services**: Task management, progress estimation, and dispatch
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, progress estimation, and sync/async dispatch
//! - [`tools`]: JSON tool surface for submission and polling
//! - [`live_session`]: Registry of running live trading sessions
//! - [`config`]: Settings from TOML and environment overrides
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod live_session;
pub mod task;
pub mod telemetry;
pub mod tools;
