//! Tools that agents can invoke while executing a task.
//!
//! A tool is an opaque async capability: given a query string it produces a
//! text block the agent can reason over. Tools are bound to agents and tasks
//! by name when the crew is assembled.

pub mod search;

pub use search::SerperSearchTool;

use async_trait::async_trait;
use postforge_common::Result;

#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable tool name, used to bind tasks to tools.
    fn name(&self) -> &str;

    /// One-line description injected alongside the tool output.
    fn description(&self) -> &str;

    /// Run the tool against a query and return its output as text.
    async fn run(&self, query: &str) -> Result<String>;
}
