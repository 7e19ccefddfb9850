//! Transport-agnostic tool surface for task polling and submission.
//!
//! Each tool produces a [`ToolResponse`] carrying a JSON text body, ready
//! to be wrapped by whichever tool-invocation transport hosts it.

mod definition;
mod format;
mod input;
mod response;
mod task_tools;

pub use definition::{McpToolDefinition, task_tool_definitions};
pub use format::{TIMESTAMP_FORMAT, format_duration, format_timestamp};
pub use input::{ToolInputError, parse_time_range, parse_timestamp};
pub use response::ToolResponse;
pub use task_tools::{TaskTools, submission_response};
