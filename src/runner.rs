// src/runner.rs
use crate::config::AppConfig;
use crate::errors::Result;
use crate::extract;
use crate::generator::{GenLog, Generator};
use crate::workspace::Workspace;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Outcome of one pipeline run. `Failed` means the extraction tool
/// rejected the input; anything worse surfaces as an `Err` instead.
pub enum PipelineOutcome {
    Failed {
        extraction_log: String,
    },
    Succeeded {
        generator: Generator,
        extraction_log: String,
        generation_log: String,
    },
}

/// Runs the two-stage pipeline for one request: workspace, extraction
/// subprocess, in-process generation. The workspace guard is dropped on
/// every exit path (including `?` returns and panics), so no request
/// ever leaks its directory.
pub fn run_pipeline(
    config: &AppConfig,
    code: &str,
    options: &Map<String, Value>,
) -> Result<PipelineOutcome> {
    let request_id = Uuid::new_v4();
    let workspace = Workspace::create(&config.temp_root)?;
    log::info!(
        "[{}] workspace created at {}",
        request_id,
        workspace.path().display()
    );

    let extraction = extract::run(config, workspace.path(), code)?;
    if !extraction.ok {
        log::warn!("[{}] extraction failed, skipping generation", request_id);
        return Ok(PipelineOutcome::Failed {
            extraction_log: extraction.log,
        });
    }

    let mut generator = Generator::new(options)?;
    let mut sink = GenLog::new();
    generator.run(workspace.path(), &mut sink)?;
    log::info!("[{}] generation complete", request_id);

    Ok(PipelineOutcome::Succeeded {
        generator,
        extraction_log: extraction.log,
        generation_log: sink.into_string(),
    })
}
