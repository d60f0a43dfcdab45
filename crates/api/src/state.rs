//! Application state for the API server.
//!
//! Holds only immutable, shareable handles (settings, LLM client, search
//! tool). The crew itself is built fresh for every request, so no request
//! can observe another request's pipeline state.

use crate::config::Settings;
use postforge_crew::{build_blog_crew, Crew};
use postforge_llm::{build_llm_client, LlmClient};
use postforge_tools::{SerperSearchTool, Tool};
use std::sync::Arc;

pub struct AppState {
    pub settings: Settings,
    llm: Arc<dyn LlmClient>,
    search_tool: Arc<dyn Tool>,
    start_time: std::time::Instant,
}

impl AppState {
    /// Create application state from loaded settings.
    ///
    /// Builds a throwaway crew once so that any pipeline construction error
    /// (malformed template, unknown agent binding) prevents server startup
    /// instead of surfacing on the first request.
    pub fn new(settings: Settings) -> postforge_common::Result<Self> {
        let llm = build_llm_client(&settings.llm_model, &settings.google_api_key)?;
        let search_tool: Arc<dyn Tool> =
            Arc::new(SerperSearchTool::new(settings.serper_api_key.clone()));

        let state = Self {
            settings,
            llm,
            search_tool,
            start_time: std::time::Instant::now(),
        };
        state.blog_crew()?;
        Ok(state)
    }

    /// Create state with injected clients. Used by integration tests to
    /// substitute mock providers.
    pub fn with_clients(
        settings: Settings,
        llm: Arc<dyn LlmClient>,
        search_tool: Arc<dyn Tool>,
    ) -> Self {
        Self {
            settings,
            llm,
            search_tool,
            start_time: std::time::Instant::now(),
        }
    }

    /// Build a fresh blog crew for one request.
    pub fn blog_crew(&self) -> postforge_common::Result<Crew> {
        build_blog_crew(
            self.llm.clone(),
            self.search_tool.clone(),
            self.settings.crew_verbose,
        )
    }

    /// Get the uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
