//! The blog-writing crew: planner → writer → editor.

use crate::agent::{Agent, AgentSpec};
use crate::crew::Crew;
use postforge_common::{Result, TaskSpec, Template};
use postforge_llm::LlmClient;
use postforge_tools::Tool;
use std::sync::Arc;

const PLANNER_ROLE: &str = "Content Planner";
const WRITER_ROLE: &str = "Content Writer";
const EDITOR_ROLE: &str = "Editor";

const PLANNER_GOAL: &str = "Plan engaging and factually accurate content on {topic}";
const PLANNER_BACKSTORY: &str = "You're working on planning a blog article about the topic: \
    {topic} in 'https://medium.com/'. You collect information that helps the audience learn \
    something and make informed decisions. Prepare a detailed outline and the relevant topics \
    and sub-topics for the blog post. Your work is the basis for the Content Writer.";

const WRITER_GOAL: &str =
    "Write insightful and factually accurate opinion piece about the topic: {topic}";
const WRITER_BACKSTORY: &str = "You're writing a new opinion piece about the topic: {topic} in \
    'https://medium.com/'. You base your writing on the Content Planner's outline, provide \
    objective insights, and acknowledge when statements are opinions.";

const EDITOR_GOAL: &str = "Edit a given blog post to align with the writing style of the \
    organization 'https://medium.com/'.";
const EDITOR_BACKSTORY: &str = "You review the blog post to ensure journalistic best practices, \
    balanced viewpoints, and avoidance of major controversial topics when possible.";

const PLAN_TASK: &str = "\
    1. Prioritize the latest trends, key players, and noteworthy news on {topic}.\n\
    2. Identify the target audience, considering their interests and pain points.\n\
    3. Develop a detailed content outline including an introduction, key points, and a call to action.\n\
    4. Include SEO keywords and relevant data or sources.";
const PLAN_EXPECTED: &str =
    "A comprehensive content plan with outline, audience analysis, SEO keywords, and resources.";

const WRITE_TASK: &str = "\
    1. Use the content plan to craft a compelling blog post on {topic}.\n\
    2. Incorporate SEO keywords naturally.\n\
    3. Sections/Subtitles are properly named in an engaging manner.\n\
    4. Ensure the post has an engaging introduction, insightful body, and a summarizing conclusion.\n\
    5. Proofread for grammatical errors and alignment with the brand's voice.";
const WRITE_EXPECTED: &str = "A well-written blog post in markdown format, ready for \
    publication, with 2-3 paragraphs per section.";

const EDIT_TASK: &str =
    "Proofread the given blog post for grammatical errors and alignment with the brand's voice.";
const EDIT_EXPECTED: &str = "A well-written blog post in markdown format (no leading word \
    'markdown'), ready for publication, with 2-3 paragraphs per section.";

/// Build the blog crew: three agents and three tasks in fixed order.
///
/// The search tool is bound to the planner agent and to the plan task; the
/// writer and editor work purely from prior outputs.
pub fn build_blog_crew(
    llm: Arc<dyn LlmClient>,
    search_tool: Arc<dyn Tool>,
    verbose: bool,
) -> Result<Crew> {
    let planner = Agent::new(
        AgentSpec::new(
            PLANNER_ROLE,
            Template::parse(PLANNER_GOAL)?,
            Template::parse(PLANNER_BACKSTORY)?,
        )
        .with_verbose(verbose),
        llm.clone(),
    )
    .with_tools(vec![search_tool.clone()]);

    let writer = Agent::new(
        AgentSpec::new(
            WRITER_ROLE,
            Template::parse(WRITER_GOAL)?,
            Template::parse(WRITER_BACKSTORY)?,
        )
        .with_verbose(verbose),
        llm.clone(),
    );

    let editor = Agent::new(
        AgentSpec::new(
            EDITOR_ROLE,
            Template::parse(EDITOR_GOAL)?,
            Template::parse(EDITOR_BACKSTORY)?,
        )
        .with_verbose(verbose),
        llm,
    );

    let plan_task = TaskSpec::new(Template::parse(PLAN_TASK)?, PLAN_EXPECTED, PLANNER_ROLE)
        .with_tool(search_tool.name());
    let write_task = TaskSpec::new(Template::parse(WRITE_TASK)?, WRITE_EXPECTED, WRITER_ROLE);
    let edit_task = TaskSpec::new(Template::parse(EDIT_TASK)?, EDIT_EXPECTED, EDITOR_ROLE);

    Crew::new(
        vec![planner, writer, editor],
        vec![plan_task, write_task, edit_task],
        vec![search_tool],
        verbose,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crew::tests::{MockLlm, MockTool};
    use std::collections::HashMap;

    #[test]
    fn blog_crew_has_three_agents_and_tasks() {
        let llm = Arc::new(MockLlm::with_outputs(vec![]));
        let tool = Arc::new(MockTool::new("serper_search", "results"));
        let crew = build_blog_crew(llm, tool, false).unwrap();

        assert_eq!(crew.agents().len(), 3);
        assert_eq!(crew.tasks().len(), 3);
        assert_eq!(crew.tasks()[0].agent, PLANNER_ROLE);
        assert_eq!(crew.tasks()[1].agent, WRITER_ROLE);
        assert_eq!(crew.tasks()[2].agent, EDITOR_ROLE);
    }

    #[test]
    fn only_planner_and_plan_task_carry_the_search_tool() {
        let llm = Arc::new(MockLlm::with_outputs(vec![]));
        let tool = Arc::new(MockTool::new("serper_search", "results"));
        let crew = build_blog_crew(llm, tool, false).unwrap();

        assert_eq!(crew.agents()[0].tools().len(), 1);
        assert!(crew.agents()[1].tools().is_empty());
        assert!(crew.agents()[2].tools().is_empty());

        assert_eq!(crew.tasks()[0].tools, vec!["serper_search".to_string()]);
        assert!(crew.tasks()[1].tools.is_empty());
        assert!(crew.tasks()[2].tools.is_empty());
    }

    #[test]
    fn blog_crew_only_needs_a_topic() {
        let llm = Arc::new(MockLlm::with_outputs(vec![]));
        let tool = Arc::new(MockTool::new("serper_search", "results"));
        let crew = build_blog_crew(llm, tool, false).unwrap();

        let names: Vec<String> = crew.placeholders().into_iter().collect();
        assert_eq!(names, vec!["topic".to_string()]);
    }

    #[tokio::test]
    async fn blog_crew_kickoff_produces_the_editor_output() {
        let llm = Arc::new(MockLlm::with_outputs(vec![
            "outline with SEO keywords",
            "draft blog post",
            "polished blog post",
        ]));
        let tool = Arc::new(MockTool::new("serper_search", "trend articles"));
        let crew = build_blog_crew(llm.clone(), tool.clone(), false).unwrap();

        let mut inputs = HashMap::new();
        inputs.insert("topic".to_string(), "Rust web frameworks".to_string());
        let output = crew.kickoff(&inputs).await.unwrap();

        assert_eq!(output.raw, "polished blog post");
        assert_eq!(output.steps.len(), 3);

        // The planner searched for the topic and saw the results.
        assert_eq!(tool.calls(), vec!["Rust web frameworks".to_string()]);
        let requests = llm.requests();
        assert!(requests[0].messages[0].content.contains("trend articles"));

        // The writer saw the plan; the editor saw the draft.
        assert!(requests[1].messages[0].content.contains("outline with SEO keywords"));
        assert!(requests[2].messages[0].content.contains("draft blog post"));
    }
}
