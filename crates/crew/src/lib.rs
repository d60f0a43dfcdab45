//! Role-based agents and the sequential crew executor.
//!
//! A crew is a fixed, ordered pipeline: each task is bound to one agent, and
//! each task's output becomes context for the tasks after it. There is no
//! scheduling, delegation, or recovery logic; the first failed step fails
//! the whole kickoff.
//!
//! # Example
//!
//! ```ignore
//! let crew = build_blog_crew(llm, search_tool, true)?;
//! let mut inputs = HashMap::new();
//! inputs.insert("topic".to_string(), "Rust async runtimes".to_string());
//! let output = crew.kickoff(&inputs).await?;
//! println!("{}", output.raw);
//! ```

pub mod agent;
pub mod blog;
pub mod crew;

pub use agent::{Agent, AgentSpec};
pub use blog::build_blog_crew;
pub use crew::{Crew, CrewOutput};
