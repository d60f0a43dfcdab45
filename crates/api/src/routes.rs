//! HTTP route handlers for the API.

use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Blog generation request body.
///
/// `topic` is optional at the serde level so that a missing field gets the
/// same `{"detail": ...}` error shape as a blank one.
#[derive(Debug, Deserialize)]
pub struct TopicRequest {
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BlogBody {
    pub raw: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateBlogResponse {
    pub topic: String,
    pub blog: BlogBody,
}

/// API error carrying an HTTP status and a `detail` message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

/// Generate a blog post for a topic by running the planner → writer → editor
/// crew.
pub async fn generate_blog(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TopicRequest>,
) -> Result<Json<GenerateBlogResponse>, ApiError> {
    let topic = request.topic.unwrap_or_default();
    let trimmed = topic.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request("'topic' must be provided"));
    }

    info!(topic = %trimmed, "Generating blog post");

    let crew = state.blog_crew().map_err(|e| {
        error!(error = %e, "Crew construction failed");
        ApiError::internal(e.to_string())
    })?;

    let mut inputs = HashMap::new();
    inputs.insert("topic".to_string(), trimmed.to_string());

    let output = crew.kickoff(&inputs).await.map_err(|e| {
        error!(topic = %trimmed, error = %e, "Crew kickoff failed");
        ApiError::internal(e.to_string())
    })?;

    info!(
        topic = %trimmed,
        steps = output.steps.len(),
        duration_ms = output.duration_ms,
        "Blog post generated"
    );

    Ok(Json(GenerateBlogResponse {
        topic,
        blog: BlogBody { raw: output.raw },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_request_deserialization() {
        let request: TopicRequest = serde_json::from_str(r#"{"topic": "Rust"}"#).unwrap();
        assert_eq!(request.topic.as_deref(), Some("Rust"));
    }

    #[test]
    fn test_topic_request_missing_field() {
        let request: TopicRequest = serde_json::from_str("{}").unwrap();
        assert!(request.topic.is_none());
    }

    #[test]
    fn test_error_body_shape() {
        let response = ApiError::bad_request("'topic' must be provided");
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        let body = serde_json::to_string(&ErrorBody {
            detail: response.detail,
        })
        .unwrap();
        assert_eq!(body, r#"{"detail":"'topic' must be provided"}"#);
    }

    #[test]
    fn test_generate_blog_response_serialization() {
        let response = GenerateBlogResponse {
            topic: "Rust".to_string(),
            blog: BlogBody {
                raw: "# A post".to_string(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["topic"], "Rust");
        assert_eq!(json["blog"]["raw"], "# A post");
    }
}
