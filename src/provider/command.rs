use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::templates;
use super::{GenerationError, SummaryProvider, SummaryRequest};

const DEFAULT_PROGRAM: &str = "llm";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Summarization backed by a prompt-on-stdin CLI program.
///
/// The default configuration drives the `llm` tool with a system prompt and
/// an optional model identifier; any program that reads a prompt from stdin
/// and writes the completion to stdout can be substituted.
pub struct CommandProvider {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandProvider {
    pub fn new(model: Option<String>) -> Self {
        let mut args = vec!["-s".to_string(), templates::SYSTEM_PROMPT.to_string()];
        if let Some(model) = model {
            args.push("-m".to_string());
            args.push(model);
        }
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_program(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn invoke(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| GenerationError::new(format!("spawn {}: {err}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .map_err(|err| GenerationError::new(format!("write prompt: {err}")))?;
            // Closing stdin signals end of prompt.
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| GenerationError::new(format!("timed out after {:?}", self.timeout)))?
            .map_err(|err| GenerationError::new(format!("wait for {}: {err}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GenerationError::new(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(GenerationError::new("empty response"));
        }
        Ok(text)
    }
}

#[async_trait]
impl SummaryProvider for CommandProvider {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, GenerationError> {
        debug!(kind = request.kind().label(), name = request.name(), "generating summary");
        let prompt = templates::render(request);
        self.invoke(&prompt).await
    }
}
