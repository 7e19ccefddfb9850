//! Step definitions for submission scenarios.

pub mod given;
pub mod when;
pub mod world;
