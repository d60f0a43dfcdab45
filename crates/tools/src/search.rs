use async_trait::async_trait;
use postforge_common::PostforgeError;
use postforge_common::Result;
use serde::{Deserialize, Serialize};

use crate::Tool;

const SERPER_API_URL: &str = "https://google.serper.dev/search";
const DEFAULT_RESULT_COUNT: u32 = 10;

#[derive(Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: u32,
}

#[derive(Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
    #[serde(rename = "answerBox")]
    answer_box: Option<AnswerBox>,
}

#[derive(Deserialize)]
struct OrganicResult {
    title: String,
    link: String,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Deserialize)]
struct AnswerBox {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

/// Web search tool backed by the Serper API.
pub struct SerperSearchTool {
    api_key: String,
    result_count: u32,
    http_client: reqwest::Client,
}

impl SerperSearchTool {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            result_count: DEFAULT_RESULT_COUNT,
            http_client: reqwest::Client::new(),
        }
    }

    fn format_results(response: &SerperResponse) -> String {
        let mut out = String::new();

        if let Some(ref answer_box) = response.answer_box {
            if let Some(text) = answer_box.answer.as_deref().or(answer_box.snippet.as_deref()) {
                out.push_str("Answer: ");
                out.push_str(text);
                out.push_str("\n\n");
            }
        }

        for (i, result) in response.organic.iter().enumerate() {
            out.push_str(&format!("{}. {} ({})\n", i + 1, result.title, result.link));
            if let Some(ref snippet) = result.snippet {
                out.push_str("   ");
                out.push_str(snippet);
                out.push('\n');
            }
        }

        if out.is_empty() {
            out.push_str("No search results found.");
        }

        out
    }
}

#[async_trait]
impl Tool for SerperSearchTool {
    fn name(&self) -> &str {
        "serper_search"
    }

    fn description(&self) -> &str {
        "Searches the web and returns titles, links, and snippets of the top results"
    }

    async fn run(&self, query: &str) -> Result<String> {
        let body = SerperRequest {
            q: query,
            num: self.result_count,
        };

        let response = self
            .http_client
            .post(SERPER_API_URL)
            .header("X-API-KEY", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PostforgeError::Tool(format!("Serper request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(PostforgeError::Tool(format!(
                "Serper API error {status}: {body_text}"
            )));
        }

        let serper_response: SerperResponse = response
            .json()
            .await
            .map_err(|e| PostforgeError::Tool(format!("Failed to parse Serper response: {e}")))?;

        Ok(Self::format_results(&serper_response))
    }
}
