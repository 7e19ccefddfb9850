//! Unit tests for task tracking.
