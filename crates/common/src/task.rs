//! Task descriptors for the crew pipeline.

use crate::template::Template;
use serde::{Deserialize, Serialize};

/// A task in a crew pipeline.
///
/// Binds a templated description and an expected-output description to the
/// agent (by role name) that will execute it. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Unique task ID
    pub id: String,

    /// Templated task description ({topic} placeholders allowed)
    pub description: Template,

    /// Description of the output this task is expected to produce
    pub expected_output: String,

    /// Role name of the agent assigned to this task
    pub agent: String,

    /// Names of tools made available for this task, in addition to the
    /// agent's own tools
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
}

impl TaskSpec {
    pub fn new(
        description: Template,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("task_{}", uuid::Uuid::new_v4()),
            description,
            expected_output: expected_output.into(),
            agent: agent.into(),
            tools: Vec::new(),
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tools.push(tool.into());
        self
    }
}

/// Output produced by a single executed task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    /// ID of the task that produced this output
    pub task_id: String,

    /// Role name of the agent that executed the task
    pub agent: String,

    /// Raw text output
    pub raw: String,
}
