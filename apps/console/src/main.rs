//! # Meem Console Entry Point
//!
//! Dry-run validator for product submissions exported by the editor.
//!
//! ```text
//! meem-console submission.json      # or JSON on stdin
//!     │
//!     ▼
//! ValidationPipeline ──► {"outcome": ..., "checks": [...]} on stdout
//! ```
//!
//! Exit status is 0 when the submission is valid, 1 when it is not, and
//! 2 when the input could not be read.

use std::io::Read;
use std::process::ExitCode;

use serde_json::json;
use tracing::{error, info};

use meem_console::init_tracing;
use meem_console::state::{ConfigState, ToastQueue};
use meem_core::{ProductSubmission, ValidationOutcome, ValidationPipeline};

fn read_input() -> std::io::Result<String> {
    match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn main() -> ExitCode {
    let config = ConfigState::from_env();
    init_tracing(&config);
    info!(currency = %config.currency_code, "Starting dry run");

    let submission: ProductSubmission = match read_input()
        .map_err(|e| e.to_string())
        .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()))
    {
        Ok(submission) => submission,
        Err(reason) => {
            error!(%reason, "Could not read submission");
            return ExitCode::from(2);
        }
    };

    let pipeline = ValidationPipeline::new(config.validation_options());
    let toasts = ToastQueue::new();
    let outcome = pipeline.validate_and_report(&submission, &toasts);

    let checks: Vec<_> = pipeline
        .check_reports(&submission)
        .into_iter()
        .map(|(name, report)| json!({ "check": name, "report": report }))
        .collect();

    let (valid, summary) = match &outcome {
        ValidationOutcome::Invalid(errors) => (false, json!({ "fieldErrors": errors })),
        ValidationOutcome::Blocked(_) => (false, json!({ "toasts": toasts.drain() })),
        ValidationOutcome::Valid(resolved) => (true, json!({ "variants": resolved })),
    };

    println!(
        "{}",
        json!({ "valid": valid, "outcome": summary, "checks": checks })
    );

    if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
