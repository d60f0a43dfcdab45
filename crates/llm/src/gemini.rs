use async_trait::async_trait;
use postforge_common::PostforgeError;
use postforge_common::Result;
use serde::{Deserialize, Serialize};

use crate::client::{LlmClient, LlmRequest, LlmResponse, Role, TokenUsage};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
    #[serde(rename = "modelVersion")]
    model_version: Option<String>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiUsage {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
}

/// Client for the Gemini `generateContent` REST API.
///
/// Accepts litellm-style `gemini/<model>` identifiers; the provider prefix
/// is stripped when building the request URL.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(model: String, api_key: String) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
            api_key,
            http_client: reqwest::Client::new(),
        }
    }

    /// The model name as it appears in the request path.
    fn api_model(&self) -> &str {
        self.model.strip_prefix("gemini/").unwrap_or(&self.model)
    }

    fn role_to_string(role: &Role) -> &'static str {
        match role {
            Role::System => "user", // system text goes in the top-level systemInstruction
            Role::User => "user",
            Role::Assistant => "model",
        }
    }

    fn build_contents(request: &LlmRequest) -> Vec<GeminiContent> {
        request
            .messages
            .iter()
            .filter(|msg| msg.role != Role::System)
            .map(|msg| GeminiContent {
                role: Some(Self::role_to_string(&msg.role).to_string()),
                parts: vec![GeminiPart {
                    text: msg.content.clone(),
                }],
            })
            .collect()
    }

    fn build_request_body(request: &LlmRequest) -> GeminiRequest {
        let generation_config = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            })
        } else {
            None
        };

        GeminiRequest {
            system_instruction: request.system_prompt.as_ref().map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: text.clone() }],
            }),
            contents: Self::build_contents(request),
            generation_config,
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url,
            self.api_model()
        );
        let body = Self::build_request_body(&request);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PostforgeError::Llm(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(PostforgeError::Llm(format!(
                "Gemini API error {status}: {body_text}"
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| PostforgeError::Llm(format!("Failed to parse Gemini response: {e}")))?;

        let candidate = gemini_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| PostforgeError::Llm("No candidates in Gemini response".to_string()))?;

        let content = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        Ok(LlmResponse {
            content,
            model: gemini_response
                .model_version
                .unwrap_or_else(|| self.model.clone()),
            usage: gemini_response.usage_metadata.map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
            }),
            finish_reason: candidate.finish_reason,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
