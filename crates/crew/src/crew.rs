//! The sequential crew executor.

use crate::agent::{Agent, StepInput};
use postforge_common::{PostforgeError, Result, TaskOutput, TaskSpec};
use postforge_tools::Tool;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{error, info};

/// An ordered pipeline of agents and tasks.
///
/// Invariants checked at construction:
/// - at least one agent and one task
/// - every task's agent resolves to an agent in the crew
/// - every task-level tool name resolves to a registered tool
///
/// A crew is immutable after construction and carries no per-execution
/// state, so it is cheap to build fresh for every request.
pub struct Crew {
    agents: Vec<Agent>,
    tasks: Vec<TaskSpec>,
    tools: HashMap<String, Arc<dyn Tool>>,
    verbose: bool,
}

/// Result of a crew kickoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewOutput {
    /// The final task's output text
    pub raw: String,
    /// Output of every executed step, in order
    pub steps: Vec<TaskOutput>,
    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Debug for Crew {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crew")
            .field("agents", &self.agents.len())
            .field("tasks", &self.tasks)
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl Crew {
    pub fn new(
        agents: Vec<Agent>,
        tasks: Vec<TaskSpec>,
        tools: Vec<Arc<dyn Tool>>,
        verbose: bool,
    ) -> Result<Self> {
        if agents.is_empty() {
            return Err(PostforgeError::Config("Crew has no agents".to_string()));
        }
        if tasks.is_empty() {
            return Err(PostforgeError::Config("Crew has no tasks".to_string()));
        }

        let tools: HashMap<String, Arc<dyn Tool>> = tools
            .into_iter()
            .map(|t| (t.name().to_string(), t))
            .collect();

        for task in &tasks {
            if !agents.iter().any(|a| a.role() == task.agent) {
                return Err(PostforgeError::Config(format!(
                    "Task '{}' is assigned to unknown agent '{}'",
                    task.id, task.agent
                )));
            }
            for name in &task.tools {
                if !tools.contains_key(name) {
                    return Err(PostforgeError::Config(format!(
                        "Task '{}' references unknown tool '{}'",
                        task.id, name
                    )));
                }
            }
        }

        Ok(Self {
            agents,
            tasks,
            tools,
            verbose,
        })
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    fn agent_for(&self, role: &str) -> Result<&Agent> {
        self.agents
            .iter()
            .find(|a| a.role() == role)
            .ok_or_else(|| PostforgeError::Agent(format!("No agent with role '{role}'")))
    }

    /// Every placeholder used by the crew's templates.
    pub fn placeholders(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for task in &self.tasks {
            names.extend(task.description.placeholders().iter().cloned());
        }
        for agent in &self.agents {
            names.extend(agent.spec().goal.placeholders().iter().cloned());
            names.extend(agent.spec().backstory.placeholders().iter().cloned());
        }
        names
    }

    /// Execute every task in declared order.
    ///
    /// The context for task *i* is the ordered list of all prior task
    /// outputs, each labelled with the producing agent's role. The first
    /// failed step aborts the kickoff; no partial results are returned.
    pub async fn kickoff(&self, inputs: &HashMap<String, String>) -> Result<CrewOutput> {
        let start = std::time::Instant::now();

        // Fail before any provider call if an input is missing.
        let missing: Vec<String> = self
            .placeholders()
            .into_iter()
            .filter(|name| !inputs.contains_key(name))
            .collect();
        if !missing.is_empty() {
            return Err(PostforgeError::Template(format!(
                "Missing inputs for placeholders: {}",
                missing.join(", ")
            )));
        }

        if self.verbose {
            info!(
                agent_count = self.agents.len(),
                task_count = self.tasks.len(),
                "Starting crew kickoff"
            );
        }

        // Search tools get the raw topic as their query, not the full
        // multi-line task description.
        let tool_query = inputs.get("topic").cloned();

        let mut steps: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());

        for (i, task) in self.tasks.iter().enumerate() {
            let agent = self.agent_for(&task.agent)?;
            let description = task.description.render(inputs)?;
            let context = if steps.is_empty() {
                None
            } else {
                Some(format_context(&steps))
            };
            let extra_tools: Vec<Arc<dyn Tool>> = task
                .tools
                .iter()
                .filter_map(|name| self.tools.get(name).cloned())
                .collect();

            if self.verbose {
                info!(
                    step = i + 1,
                    agent = %task.agent,
                    task = %task.id,
                    "Executing crew step"
                );
            }

            let raw = agent
                .execute(StepInput {
                    description: &description,
                    expected_output: &task.expected_output,
                    context: context.as_deref(),
                    extra_tools: &extra_tools,
                    tool_query: tool_query.as_deref().unwrap_or(&description),
                    vars: inputs,
                })
                .await
                .map_err(|e| {
                    error!(
                        step = i + 1,
                        agent = %task.agent,
                        error = %e,
                        "Crew step failed"
                    );
                    e
                })?;

            steps.push(TaskOutput {
                task_id: task.id.clone(),
                agent: task.agent.clone(),
                raw,
            });
        }

        let raw = steps
            .last()
            .map(|s| s.raw.clone())
            .ok_or_else(|| PostforgeError::Agent("Crew produced no output".to_string()))?;

        let duration_ms = start.elapsed().as_millis() as u64;

        if self.verbose {
            info!(
                steps = steps.len(),
                duration_ms, "Crew kickoff completed"
            );
        }

        Ok(CrewOutput {
            raw,
            steps,
            duration_ms,
        })
    }
}

fn format_context(steps: &[TaskOutput]) -> String {
    steps
        .iter()
        .map(|s| format!("--- Output from {} ---\n{}", s.agent, s.raw))
        .collect::<Vec<_>>()
        .join("\n\n")
}
