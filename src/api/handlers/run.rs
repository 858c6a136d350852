// src/api/handlers/run.rs
use actix_web::{web, HttpResponse, Result};
use serde_json::Value;

use crate::api::AppState;
use crate::generator::Representation;
use crate::models::{Info, RunRequest, RunResponse, ValidationError, GENERATION_NOT_RUN};
use crate::runner::{self, PipelineOutcome};

pub async fn run(state: web::Data<AppState>, req: web::Json<RunRequest>) -> Result<HttpResponse> {
    let req = req.into_inner();

    // Validate before anything touches the filesystem.
    let code = match req.code {
        Some(code) => code,
        None => return Ok(validation_error("Missing 'code'")),
    };
    let options = match req.options {
        Some(options) => options,
        None => return Ok(validation_error("Missing 'options'")),
    };

    // The pipeline blocks on filesystem I/O and a subprocess wait, so it
    // runs on the blocking thread pool rather than an actix worker.
    let config = state.config.clone();
    let pipeline_options = options.clone();
    let outcome =
        web::block(move || runner::run_pipeline(&config, &code, &pipeline_options)).await;

    let outcome = match outcome {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            log::error!("pipeline error: {}", e);
            return Ok(HttpResponse::InternalServerError().body(e.to_string()));
        }
        Err(e) => {
            // The blocking call panicked or was cancelled; the workspace
            // guard has already cleaned up during unwinding.
            log::error!("pipeline worker failed: {}", e);
            return Ok(HttpResponse::InternalServerError().body("pipeline worker failed"));
        }
    };

    match outcome {
        PipelineOutcome::Failed { extraction_log } => {
            Ok(HttpResponse::BadRequest().json(RunResponse {
                info: Info::current(),
                code: None,
                yard_log: extraction_log,
                sord_log: GENERATION_NOT_RUN.to_string(),
            }))
        }
        PipelineOutcome::Succeeded {
            generator,
            extraction_log,
            generation_log,
        } => {
            let mode = options.get("mode").and_then(Value::as_str);
            match mode.and_then(Representation::parse) {
                // Only discoverable after a successful run, so this is a
                // server-side configuration error rather than a 400.
                None => Ok(HttpResponse::InternalServerError()
                    .body(format!("Unknown mode {}", mode.unwrap_or("<missing>")))),
                Some(repr) => Ok(HttpResponse::Ok().json(RunResponse {
                    info: Info::current(),
                    code: generator.representation(repr),
                    yard_log: extraction_log,
                    sord_log: generation_log,
                })),
            }
        }
    }
}

fn validation_error(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ValidationError {
        success: false,
        error: message.to_string(),
    })
}
