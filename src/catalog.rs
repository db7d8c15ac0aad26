use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid ignore pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("failed to compile ignore patterns: {0}")]
    PatternSet(#[from] globset::Error),
}

/// Matches a relative path against the configured ignore patterns.
///
/// A pattern matches the path itself or any path nested under a matching
/// directory, so `tests` ignores `tests/a.rs` and `src/tests/a.rs` alike.
#[derive(Debug)]
pub struct IgnoreMatcher {
    set: GlobSet,
}

impl IgnoreMatcher {
    pub fn new(patterns: &[String]) -> Result<Self, CatalogError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.trim_end_matches('/');
            let expansions = [
                pattern.to_string(),
                format!("{pattern}/**"),
                format!("**/{pattern}"),
                format!("**/{pattern}/**"),
            ];
            for expanded in expansions {
                let glob = Glob::new(&expanded).map_err(|source| CatalogError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
                builder.add(glob);
            }
        }
        Ok(Self {
            set: builder.build()?,
        })
    }

    pub fn is_match(&self, rel: &str) -> bool {
        self.set.is_match(rel)
    }
}

/// Enumerates candidate files under a root directory.
#[derive(Debug)]
pub struct FileCatalog {
    root: PathBuf,
    allowed_extensions: Vec<String>,
    ignore: IgnoreMatcher,
}

impl FileCatalog {
    pub fn new(
        root: impl Into<PathBuf>,
        allowed_extensions: &[String],
        ignore_patterns: &[String],
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            root: root.into(),
            allowed_extensions: allowed_extensions.to_vec(),
            ignore: IgnoreMatcher::new(ignore_patterns)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate candidate files as `/`-separated paths relative to the root.
    ///
    /// The walk is sorted, so enumeration order is deterministic across runs
    /// on an unchanged tree; selection tie-breaking depends on this.
    pub fn files(&self) -> Vec<String> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let Some(rel) = rel.to_str() else {
                debug!(path = %entry.path().display(), "skipping non-UTF-8 path");
                continue;
            };
            let rel = rel.replace('\\', "/");
            if self.is_candidate(&rel) {
                files.push(rel);
            }
        }
        files
    }

    pub fn is_candidate(&self, rel: &str) -> bool {
        self.extension_allowed(rel) && !self.ignore.is_match(rel)
    }

    pub fn is_ignored(&self, rel: &str) -> bool {
        self.ignore.is_match(rel)
    }

    pub fn read(&self, rel: &str) -> std::io::Result<String> {
        std::fs::read_to_string(self.root.join(rel))
    }

    // Files without an extension are never candidates; allow-list entries
    // may be written with or without the leading dot.
    fn extension_allowed(&self, rel: &str) -> bool {
        let Some(ext) = Path::new(rel).extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.') == ext)
    }
}
