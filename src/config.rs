use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::selection::Budget;

pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".rs", ".py", ".js", ".ts", ".go", ".java", ".c", ".h", ".cpp", ".hpp", ".rb", ".sh", ".toml",
];

pub const DEFAULT_IGNORES: &[&str] = &[
    ".git",
    "target",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    "dist",
    "build",
    ".idea",
    ".vscode",
];

pub const DEFAULT_README_CANDIDATES: &[&str] = &["README.md", "README.rst", "README.txt", "README"];

pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 50;

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Invalid or missing required configuration. The only error class that
/// aborts a run, and it does so before any tree work begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("root directory {} does not exist or is not a directory", .0.display())]
    InvalidRoot(PathBuf),
}

/// One run's configuration, threaded explicitly into every entry point.
#[derive(Debug, Clone)]
pub struct TaleConfig {
    root: PathBuf,
    pub allowed_extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub filter_folders: Vec<String>,
    pub global_budget: Option<usize>,
    pub per_file_budget: Option<usize>,
    pub dry_run: bool,
    pub min_content_length: usize,
    pub max_concurrency: usize,
    pub model: Option<String>,
    pub readme_candidates: Vec<String>,
}

impl TaleConfig {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ConfigError::InvalidRoot(root));
        }
        Ok(Self {
            root,
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            ignore_patterns: DEFAULT_IGNORES.iter().map(|s| s.to_string()).collect(),
            filter_folders: Vec::new(),
            global_budget: None,
            per_file_budget: None,
            dry_run: false,
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
            max_concurrency: DEFAULT_CONCURRENCY,
            model: None,
            readme_candidates: DEFAULT_README_CANDIDATES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn budget(&self) -> Budget {
        Budget {
            global: self.global_budget,
            per_file: self.per_file_budget,
        }
    }

    /// Replace the extension allow-list. An empty list keeps the defaults.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        if !extensions.is_empty() {
            self.allowed_extensions = extensions;
        }
        self
    }

    /// Add ignore patterns on top of the defaults.
    pub fn exclude(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns.extend(patterns);
        self
    }

    pub fn with_filter_folders(mut self, folders: Vec<String>) -> Self {
        self.filter_folders = folders;
        self
    }

    pub fn with_budgets(mut self, global: Option<usize>, per_file: Option<usize>) -> Self {
        self.global_budget = global;
        self.per_file_budget = per_file;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_min_content_length(mut self, min: usize) -> Self {
        self.min_content_length = min;
        self
    }

    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}
