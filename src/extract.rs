// src/extract.rs
use crate::config::AppConfig;
use crate::errors::{PipelineError, Result};
use std::fs::{self, File};
use std::path::Path;
use std::process::{Command, Stdio};

/// Fixed name of the submitted source file inside the workspace.
pub const SOURCE_FILE: &str = "main.rb";

/// Environment variable pinning the extraction tool's dependency
/// resolution to this service's own manifest.
pub const MANIFEST_ENV: &str = "BUNDLE_GEMFILE";

/// Combined child output is spooled here before being read back. Lives
/// inside the workspace, so it is destroyed with everything else.
const CAPTURE_FILE: &str = ".extract.log";

#[derive(Debug)]
pub struct ExtractOutput {
    /// Combined stdout+stderr of the tool, interleaved in the order the
    /// bytes were produced.
    pub log: String,
    /// Whether the tool exited with a success status.
    pub ok: bool,
}

/// Writes `source` into the workspace and runs the documentation
/// extraction tool over it, with the workspace as working directory.
///
/// stdout and stderr of the child share a single file description (the
/// capture file opened once and duplicated), which is what keeps the two
/// streams interleaved in production order rather than captured
/// separately.
pub fn run(config: &AppConfig, workspace: &Path, source: &str) -> Result<ExtractOutput> {
    let source_path = workspace.join(SOURCE_FILE);
    fs::write(&source_path, source)?;

    let capture_path = workspace.join(CAPTURE_FILE);
    let capture = File::create(&capture_path)?;
    let capture_err = capture.try_clone()?;

    let (program, leading_args) = config
        .extract_command
        .split_first()
        .ok_or_else(|| PipelineError::Config("extraction command is empty".to_string()))?;

    let status = Command::new(program)
        .args(leading_args)
        .arg("doc")
        .arg(&source_path)
        .current_dir(workspace)
        .env(MANIFEST_ENV, &config.manifest_path)
        .stdin(Stdio::null())
        .stdout(Stdio::from(capture))
        .stderr(Stdio::from(capture_err))
        .status()
        .map_err(|e| PipelineError::ToolSpawn {
            command: config.extract_command.join(" "),
            source: e,
        })?;

    let log = fs::read_to_string(&capture_path)?;

    Ok(ExtractOutput {
        log,
        ok: status.success(),
    })
}
