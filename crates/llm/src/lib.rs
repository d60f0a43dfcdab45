pub mod client;
pub mod gemini;

pub use client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, Role, TokenUsage};
pub use gemini::GeminiClient;

use postforge_common::{PostforgeError, Result};
use std::sync::Arc;

/// Build an LLM client from a model identifier and API key.
///
/// Model identifiers may carry a `provider/` prefix (`gemini/gemini-2.0-flash-exp`);
/// a bare model name is assumed to be a Gemini model.
pub fn build_llm_client(model: &str, api_key: &str) -> Result<Arc<dyn LlmClient>> {
    match model.split_once('/') {
        None | Some(("gemini", _)) => Ok(Arc::new(GeminiClient::new(
            model.to_string(),
            api_key.to_string(),
        ))),
        Some((provider, _)) => Err(PostforgeError::Config(format!(
            "Unknown LLM provider: {provider}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_gemini_client_with_prefix() {
        let client = build_llm_client("gemini/gemini-2.0-flash-exp", "test-key").unwrap();
        assert_eq!(client.model_name(), "gemini/gemini-2.0-flash-exp");
    }

    #[test]
    fn build_gemini_client_bare_model() {
        let client = build_llm_client("gemini-2.0-flash-exp", "test-key").unwrap();
        assert_eq!(client.model_name(), "gemini-2.0-flash-exp");
    }

    #[test]
    fn build_unknown_provider_fails() {
        assert!(build_llm_client("openai/gpt-4o", "test-key").is_err());
    }
}
