pub mod command;
pub mod templates;

pub use command::CommandProvider;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::tale::NodeKind;

/// Generation failed. The core does not distinguish failure subtypes:
/// timeouts, malformed responses, and upstream rejections all collapse
/// here, and the affected node simply gets no description.
#[derive(Debug, Error)]
#[error("summary generation failed: {reason}")]
pub struct GenerationError {
    reason: String,
}

impl GenerationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Structured payload for one summary request, by node kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryRequest {
    File {
        name: String,
        content: String,
    },
    Folder {
        name: String,
        summaries: Vec<String>,
    },
    Repository {
        name: String,
        folders: Vec<FolderDigest>,
        readme: String,
    },
}

/// Name and generated summary of one folder, as context for the
/// repository-level request.
#[derive(Debug, Clone, Serialize)]
pub struct FolderDigest {
    pub name: String,
    pub summary: String,
}

impl SummaryRequest {
    pub fn kind(&self) -> NodeKind {
        match self {
            SummaryRequest::File { .. } => NodeKind::File,
            SummaryRequest::Folder { .. } => NodeKind::Folder,
            SummaryRequest::Repository { .. } => NodeKind::Repository,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SummaryRequest::File { name, .. }
            | SummaryRequest::Folder { name, .. }
            | SummaryRequest::Repository { name, .. } => name,
        }
    }
}

/// External summarization capability.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, GenerationError>;
}
