//! Settings loader: YAML file merged with documented defaults, plus
//! required-credential validation.
//!
//! A missing config file is not an error, since every field has a default. The
//! two provider credentials are required and checked up front so the process
//! refuses to start with a partial environment.

use postforge_common::{PostforgeError, Result};
use serde::Deserialize;
use std::path::Path;

/// Default path of the YAML config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Environment variables the service cannot run without.
pub const REQUIRED_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "SERPER_API_KEY"];

/// Resolved, immutable process settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub llm_model: String,
    pub crew_verbose: bool,
    pub google_api_key: String,
    pub serper_api_key: String,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    app: AppSection,
    #[serde(default)]
    llm: LlmSection,
    #[serde(default)]
    crew: CrewSection,
}

#[derive(Debug, Default, Deserialize)]
struct AppSection {
    host: Option<String>,
    port: Option<u16>,
    cors_origins: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmSection {
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CrewSection {
    verbose: Option<bool>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8002
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

fn default_llm_model() -> String {
    "gemini/gemini-2.0-flash-exp".to_string()
}

impl Settings {
    /// Load settings from the YAML file at `path` (if it exists) and the
    /// process environment. Fails if any required credential is unset.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_env(path, |name| std::env::var(name).ok())
    }

    fn load_with_env(
        path: impl AsRef<Path>,
        get_env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file: FileConfig = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&content).map_err(|e| {
                PostforgeError::Config(format!(
                    "Failed to parse config file '{}': {e}",
                    path.display()
                ))
            })?
        } else {
            FileConfig::default()
        };

        // Empty values count as missing, matching shell `export VAR=` mishaps.
        let lookup = |name: &str| get_env(name).filter(|v| !v.is_empty());

        let missing: Vec<&str> = REQUIRED_ENV_VARS
            .iter()
            .copied()
            .filter(|name| lookup(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(PostforgeError::Config(format!(
                "Missing environment variables: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            host: file.app.host.unwrap_or_else(default_host),
            port: file.app.port.unwrap_or_else(default_port),
            cors_origins: file.app.cors_origins.unwrap_or_else(default_cors_origins),
            llm_model: file.llm.model.unwrap_or_else(default_llm_model),
            crew_verbose: file.crew.verbose.unwrap_or(true),
            google_api_key: lookup("GOOGLE_API_KEY").unwrap_or_default(),
            serper_api_key: lookup("SERPER_API_KEY").unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_with_keys(name: &str) -> Option<String> {
        match name {
            "GOOGLE_API_KEY" => Some("google-key".to_string()),
            "SERPER_API_KEY" => Some("serper-key".to_string()),
            _ => None,
        }
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings =
            Settings::load_with_env("/nonexistent/config.yaml", env_with_keys).unwrap();
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.port, 8002);
        assert_eq!(
            settings.cors_origins,
            vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string()
            ]
        );
        assert_eq!(settings.llm_model, "gemini/gemini-2.0-flash-exp");
        assert!(settings.crew_verbose);
        assert_eq!(settings.google_api_key, "google-key");
        assert_eq!(settings.serper_api_key, "serper-key");
    }

    #[test]
    fn yaml_values_override_defaults() {
        let file = write_config(
            "app:\n  port: 9000\n  host: 0.0.0.0\n  cors_origins:\n    - https://example.com\nllm:\n  model: gemini/gemini-1.5-pro\ncrew:\n  verbose: false\n",
        );
        let settings = Settings::load_with_env(file.path(), env_with_keys).unwrap();
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.cors_origins, vec!["https://example.com".to_string()]);
        assert_eq!(settings.llm_model, "gemini/gemini-1.5-pro");
        assert!(!settings.crew_verbose);
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let file = write_config("app:\n  port: 9000\n");
        let settings = Settings::load_with_env(file.path(), env_with_keys).unwrap();
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.llm_model, "gemini/gemini-2.0-flash-exp");
    }

    #[test]
    fn missing_credentials_are_all_enumerated() {
        let err = Settings::load_with_env("/nonexistent/config.yaml", |_| None).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("GOOGLE_API_KEY"));
        assert!(msg.contains("SERPER_API_KEY"));
    }

    #[test]
    fn one_missing_credential_is_named() {
        let err = Settings::load_with_env("/nonexistent/config.yaml", |name| {
            (name == "GOOGLE_API_KEY").then(|| "google-key".to_string())
        })
        .unwrap_err();
        let msg = err.to_string();
        assert!(!msg.contains("GOOGLE_API_KEY"));
        assert!(msg.contains("SERPER_API_KEY"));
    }

    #[test]
    fn empty_credential_counts_as_missing() {
        let err = Settings::load_with_env("/nonexistent/config.yaml", |name| match name {
            "GOOGLE_API_KEY" => Some(String::new()),
            "SERPER_API_KEY" => Some("serper-key".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let file = write_config("app: [not a mapping\n");
        let err = Settings::load_with_env(file.path(), env_with_keys).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
