//! Role-based agents.
//!
//! An agent is a role descriptor (role, goal, backstory) bound to an LLM
//! client and an optional set of tools. Agents carry no mutable state; a
//! step either completes with the model's text or fails.

use postforge_common::{Result, Template};
use postforge_llm::{ChatMessage, LlmClient, LlmRequest, Role};
use postforge_tools::Tool;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Static role descriptor for an agent.
///
/// `goal` and `backstory` are templates; placeholders (`{topic}`) are
/// rendered from the kickoff inputs at execution time.
#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub role: String,
    pub goal: Template,
    pub backstory: Template,
    /// Always false in this system; kept explicit because the pipeline
    /// semantics depend on it.
    pub allow_delegation: bool,
    pub verbose: bool,
}

impl AgentSpec {
    pub fn new(role: impl Into<String>, goal: Template, backstory: Template) -> Self {
        Self {
            role: role.into(),
            goal,
            backstory,
            allow_delegation: false,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Everything an agent needs to execute one crew step.
pub struct StepInput<'a> {
    /// Rendered task description
    pub description: &'a str,
    /// Description of the expected output
    pub expected_output: &'a str,
    /// Labelled outputs of the prior steps, if any
    pub context: Option<&'a str>,
    /// Task-level tools, in addition to the agent's own
    pub extra_tools: &'a [Arc<dyn Tool>],
    /// Query passed to each tool
    pub tool_query: &'a str,
    /// Kickoff inputs, for rendering goal/backstory templates
    pub vars: &'a HashMap<String, String>,
}

/// A role descriptor bound to an LLM client and tools.
pub struct Agent {
    spec: AgentSpec,
    llm: Arc<dyn LlmClient>,
    tools: Vec<Arc<dyn Tool>>,
}

impl Agent {
    pub fn new(spec: AgentSpec, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            spec,
            llm,
            tools: Vec::new(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.tools = tools;
        self
    }

    pub fn role(&self) -> &str {
        &self.spec.role
    }

    pub fn spec(&self) -> &AgentSpec {
        &self.spec
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    fn system_prompt(&self, vars: &HashMap<String, String>) -> Result<String> {
        let goal = self.spec.goal.render(vars)?;
        let backstory = self.spec.backstory.render(vars)?;
        Ok(format!(
            "You are {}. {}\n\nYour personal goal is: {}",
            self.spec.role, backstory, goal
        ))
    }

    /// Execute one step: run the step's tools, assemble the prompt, and make
    /// a single completion call.
    ///
    /// Tools bound to both the agent and the task run once each (deduplicated
    /// by name) with their output injected into the prompt as a labelled
    /// block before the model is called.
    pub async fn execute(&self, step: StepInput<'_>) -> Result<String> {
        let system = self.system_prompt(step.vars)?;

        let mut prompt = String::from(step.description);

        if let Some(context) = step.context {
            prompt.push_str("\n\nThis is the context you are working with:\n\n");
            prompt.push_str(context);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for tool in self.tools.iter().chain(step.extra_tools.iter()) {
            if !seen.insert(tool.name()) {
                continue;
            }
            if self.spec.verbose {
                debug!(
                    agent = %self.spec.role,
                    tool = %tool.name(),
                    query = %step.tool_query,
                    "Running tool"
                );
            }
            let output = tool.run(step.tool_query).await?;
            prompt.push_str(&format!(
                "\n\n--- {} ({}) ---\n{}",
                tool.name(),
                tool.description(),
                output
            ));
        }

        prompt.push_str(&format!("\n\nExpected output: {}", step.expected_output));

        let request = LlmRequest {
            system_prompt: Some(system),
            messages: vec![ChatMessage {
                role: Role::User,
                content: prompt,
            }],
            temperature: None,
            max_tokens: None,
        };

        let response = self.llm.complete(request).await?;

        if self.spec.verbose {
            info!(
                agent = %self.spec.role,
                model = %self.llm.model_name(),
                output_len = response.content.len(),
                "Agent step completed"
            );
        }

        Ok(response.content)
    }
}
