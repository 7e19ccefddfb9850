//! Tool definition metadata advertised to AI assistants.

use serde::Serialize;
use serde_json::{Value, json};

/// Metadata for a tool advertised over MCP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpToolDefinition {
    name: &'static str,
    description: &'static str,
    input_schema: Value,
}

impl McpToolDefinition {
    /// Returns the tool name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Returns the JSON schema of the tool arguments.
    #[must_use]
    pub const fn input_schema(&self) -> &Value {
        &self.input_schema
    }
}

fn task_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "taskId": {
                "type": "string",
                "description": "The task ID returned by an async backtest or download call"
            }
        },
        "required": ["taskId"]
    })
}

/// Returns the definitions of the task polling tools, in the order
/// `get_task_status`, `get_task_result`, `list_tasks`.
#[must_use]
pub fn task_tool_definitions() -> Vec<McpToolDefinition> {
    vec![
        McpToolDefinition {
            name: "get_task_status",
            description: "Get the current status and progress of an async task (backtest or \
                          download). Returns task status (pending/running/completed/failed), \
                          progress description and completion percentage.",
            input_schema: task_id_schema(),
        },
        McpToolDefinition {
            name: "get_task_result",
            description: "Get the final result of a completed async task (backtest or \
                          download). Returns the full result data if the task is completed, or \
                          current status if still running.",
            input_schema: task_id_schema(),
        },
        McpToolDefinition {
            name: "list_tasks",
            description: "List async tasks, most recent first. Optionally filter by type \
                          (backtest/download) and status (pending/running/completed/failed).",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "description": "Filter by task type: 'backtest' or 'download'"
                    },
                    "status": {
                        "type": "string",
                        "description": "Filter by status: 'pending', 'running', 'completed', 'failed'"
                    }
                }
            }),
        },
    ]
}
