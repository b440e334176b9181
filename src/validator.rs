use std::collections::BTreeMap;
use std::future::Future;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{InjectError, Result};
use crate::models::ValidationResult;

/// AMP conformance checker.
pub trait Validator: Send + Sync {
    fn validate(&self, html: &str) -> impl Future<Output = Result<ValidationResult>> + Send;
}

/// Runs the `amphtml-validator` command line tool, feeding the document on
/// stdin and reading its JSON report.
#[derive(Debug, Clone)]
pub struct CommandValidator {
    program: String,
}

impl CommandValidator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Validator for CommandValidator {
    async fn validate(&self, html: &str) -> Result<ValidationResult> {
        debug!("Running {} on {} bytes", self.program, html.len());
        let mut child = Command::new(&self.program)
            .arg("--format=json")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| InjectError::Validator(format!("could not start {}: {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| InjectError::Validator("validator stdin unavailable".to_string()))?;
        let input = html.to_string();
        let writer = tokio::spawn(async move { stdin.write_all(input.as_bytes()).await });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| InjectError::Validator(e.to_string()))?;
        writer
            .await
            .map_err(|e| InjectError::Validator(e.to_string()))?
            .map_err(|e| InjectError::Validator(format!("writing document failed: {}", e)))?;

        // A failing document exits non-zero but still prints a full report.
        parse_report(&output.stdout).map_err(|e| {
            let stderr = String::from_utf8_lossy(&output.stderr);
            InjectError::Validator(format!("{} ({})", e, stderr.trim()))
        })
    }
}

/// Parses the `{"<input>": {status, errors}}` object printed with
/// `--format=json` and returns the entry for the single input.
pub fn parse_report(stdout: &[u8]) -> std::result::Result<ValidationResult, String> {
    let report: BTreeMap<String, ValidationResult> =
        serde_json::from_slice(stdout).map_err(|e| format!("unreadable validator output: {}", e))?;
    report
        .into_values()
        .next()
        .ok_or_else(|| "validator reported no results".to_string())
}
