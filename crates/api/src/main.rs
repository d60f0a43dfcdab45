//! Postforge API server binary.
//!
//! Usage:
//!   postforge-api
//!   postforge-api --config config/config.yaml
//!   postforge-api --port 8002 --bind 0.0.0.0
//!
//! # Environment Variables
//!
//! - `GOOGLE_API_KEY` - Gemini credential (required)
//! - `SERPER_API_KEY` - Serper web-search credential (required)
//!
//! Both may also be supplied through a `.env` file in the working directory
//! or any ancestor; already-set variables are never overwritten.

use dotenv::dotenv;
use postforge_api::{serve, AppState, Settings, DEFAULT_CONFIG_PATH};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,postforge_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path = DEFAULT_CONFIG_PATH.to_string();
    let mut port_override: Option<u16> = None;
    let mut bind_override: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port_override = Some(args[i + 1].parse()?);
                    i += 1;
                }
            }
            "--bind" | "-b" => {
                if i + 1 < args.len() {
                    bind_override = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Postforge API Server");
                println!();
                println!("Usage: postforge-api [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <FILE>  Path to config.yaml (default: {DEFAULT_CONFIG_PATH})");
                println!("  -p, --port <PORT>    Port to listen on (default: from config, 8002)");
                println!("  -b, --bind <ADDR>    Bind address (default: from config, 127.0.0.1)");
                println!("  -h, --help           Show this help message");
                println!();
                println!("Environment variables:");
                println!("  GOOGLE_API_KEY       Gemini credential (required)");
                println!("  SERPER_API_KEY       Serper web-search credential (required)");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    tracing::info!(path = %config_path, "Loading configuration");
    let mut settings = Settings::load(&config_path)?;
    if let Some(port) = port_override {
        settings.port = port;
    }
    if let Some(host) = bind_override {
        settings.host = host;
    }

    if settings.host == "0.0.0.0" {
        tracing::warn!(
            "Server binding to 0.0.0.0, exposing the API on all network interfaces."
        );
    }

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    let state = AppState::new(settings)?;

    serve(Arc::new(state), addr).await?;

    Ok(())
}
