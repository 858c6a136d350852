// src/config.rs
use crate::errors::{PipelineError, Result};
use std::path::PathBuf;

/// High-level application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub host: String,
    pub port: u16,

    /// Root directory under which per-request workspaces are created.
    pub temp_root: PathBuf,

    /// Dependency manifest the extraction tool is pinned to, so the child
    /// process resolves this service's dependency set rather than any
    /// ambient one.
    pub manifest_path: PathBuf,

    /// Command words used to invoke the extraction tool, e.g.
    /// `["bundle", "exec", "yard"]`. The `doc` subcommand and the source
    /// file path are appended per invocation.
    pub extract_command: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SIGSERVE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("SIGSERVE_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| PipelineError::Config(format!("SIGSERVE_PORT is not a port: {}", raw)))?,
            Err(_) => 8080,
        };

        let temp_root = std::env::var("SIGSERVE_TEMP_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp/sigserve"));

        let manifest_path = std::env::var("SIGSERVE_GEMFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./Gemfile"));

        let extract_raw = std::env::var("SIGSERVE_EXTRACT_COMMAND")
            .unwrap_or_else(|_| "bundle exec yard".to_string());
        let extract_command: Vec<String> = extract_raw
            .split_whitespace()
            .map(|s| s.to_string())
            .collect();

        if extract_command.is_empty() {
            return Err(PipelineError::Config(
                "SIGSERVE_EXTRACT_COMMAND must name at least one command word".to_string(),
            ));
        }

        Ok(AppConfig {
            host,
            port,
            temp_root,
            manifest_path,
            extract_command,
        })
    }
}
