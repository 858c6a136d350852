// src/models.rs
use crate::generator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder logs for stages that never ran. The extraction
/// placeholder only appears if the pipeline errors before the tool runs;
/// the generation placeholder is the normal companion of an
/// extraction-stage failure.
pub const EXTRACTION_NOT_RUN: &str = "YARD did not run.";
pub const GENERATION_NOT_RUN: &str = "Sord did not run.";

#[derive(Deserialize)]
pub struct RunRequest {
    pub code: Option<String>,
    pub options: Option<Map<String, Value>>,
}

#[derive(Serialize)]
pub struct Info {
    pub version: String,
}

impl Info {
    pub fn current() -> Self {
        Info {
            version: generator::VERSION.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct RunResponse {
    pub info: Info,
    pub code: Option<String>,
    pub yard_log: String,
    pub sord_log: String,
}

#[derive(Serialize)]
pub struct ValidationError {
    pub success: bool,
    pub error: String,
}
