//! Subprocess wrapper for the local vision-model CLI.
//!
//! Each request runs the runtime (`ollama` by default) in one-shot mode and
//! captures stdout as the model output. Calls block the requesting task
//! until the process exits or the configured timeout elapses.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Model runtime timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Model runtime invocation failed: {0}")]
    Invocation(String),
}

#[derive(Clone, Debug)]
pub struct ModelRuntime {
    bin: String,
    timeout: Duration,
}

impl ModelRuntime {
    pub fn new(bin: &str, timeout_secs: u64) -> Self {
        Self {
            bin: bin.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Run the model over an uploaded file. The runtime expects the file
    /// path on the first line of the prompt.
    pub async fn generate_with_file(
        &self,
        model: &str,
        file: &Path,
        prompt: &str,
    ) -> Result<String, RuntimeError> {
        self.generate(model, &format!("{}\n{}", file.display(), prompt))
            .await
    }

    /// Run the model with a text-only prompt and return trimmed stdout.
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, RuntimeError> {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("run")
            .arg(model)
            .arg(prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Reap the child when the timeout drops the future mid-flight
            .kill_on_drop(true);

        tracing::debug!("Invoking model runtime: {} run {}", self.bin, model);

        let child = cmd.spawn().map_err(|e| {
            RuntimeError::Invocation(format!("Failed to spawn {}: {}", self.bin, e))
        })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RuntimeError::Timeout {
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| RuntimeError::Invocation(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RuntimeError::Invocation(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
