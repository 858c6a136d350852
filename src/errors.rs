// src/errors.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
#[allow(dead_code)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not allocate a unique workspace directory after {attempts} attempts")]
    WorkspaceExhausted { attempts: usize },

    #[error("Failed to launch extraction tool '{command}': {source}")]
    ToolSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Documentation registry not found at {0}")]
    RegistryMissing(PathBuf),

    #[error("Documentation registry is invalid: {0}")]
    RegistryInvalid(String),

    #[error("Invalid generator options: {0}")]
    Options(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
