pub mod builder;
pub mod node;

pub use builder::{FileOutcome, NodeError, TaleBuilder, TaleOutcome};
pub use node::{Node, NodeKind};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::selection::SelectionOutcome;

/// Serializable wrapper around a completed run, for the JSON output mode.
#[derive(Debug, Serialize)]
pub struct TaleReport {
    pub generated_at: DateTime<Utc>, // informational only
    pub files_selected: usize,
    pub cost_used: usize,
    pub failed_nodes: usize,
    pub tree: Node,
}

impl TaleReport {
    pub fn new(outcome: &TaleOutcome, selection: &SelectionOutcome) -> Self {
        Self {
            generated_at: Utc::now(),
            files_selected: selection.files.len(),
            cost_used: selection.cost_used,
            failed_nodes: outcome.failures.len(),
            tree: outcome.root.clone(),
        }
    }
}
