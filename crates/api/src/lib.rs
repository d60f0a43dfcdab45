//! HTTP boundary for Postforge.
//!
//! A thin axum layer over the crew executor:
//!
//! - `GET /health` - Health check
//! - `POST /generate-blog/` - Run the planner → writer → editor crew on a topic
//!
//! The handler is synchronous from the caller's perspective: one request,
//! one full pipeline run, one response. There is no streaming, queuing, or
//! cancellation.

pub mod config;
pub mod routes;
pub mod state;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use config::{Settings, DEFAULT_CONFIG_PATH, REQUIRED_ENV_VARS};
pub use state::AppState;

/// Create the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.settings.cors_origins);

    Router::new()
        .route("/health", get(routes::health))
        .route("/generate-blog/", post(routes::generate_blog))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for the configured origins: any method, any header, credentials
/// allowed. Credentialed CORS cannot use wildcards, so methods and headers
/// mirror the preflight request.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Start the API server on the given address.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> anyhow::Result<()> {
    let router = create_router(state);

    info!(%addr, "Starting Postforge API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
