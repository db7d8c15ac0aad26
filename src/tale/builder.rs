use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use super::node::{Node, NodeKind};
use crate::catalog::FileCatalog;
use crate::config::TaleConfig;
use crate::provider::{FolderDigest, GenerationError, SummaryProvider, SummaryRequest};
use crate::runner::ConcurrentRunner;

/// A failure confined to one node of the tree. Absorbed at the node's
/// boundary: the node contributes nothing and its siblings proceed.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to list {path}: {source}")]
    List {
        path: String,
        source: std::io::Error,
    },

    #[error("could not summarize {name}: {source}")]
    Generation {
        name: String,
        source: GenerationError,
    },
}

/// What the file step produced. Skipping is not an error; the parent
/// simply treats the file as absent.
#[derive(Debug)]
pub enum FileOutcome {
    Summarized(Node),
    Skipped,
}

/// Result of a full tree build. A run always yields a tree; `failures`
/// lists every absorbed node failure, in completion order.
#[derive(Debug)]
pub struct TaleOutcome {
    pub root: Node,
    pub failures: Vec<String>,
}

/// Builds the Project → Folder → File tree bottom-up over the selected
/// file set, fanning work out through a bounded runner.
pub struct TaleBuilder<'a, P> {
    config: &'a TaleConfig,
    catalog: &'a FileCatalog,
    provider: &'a P,
    runner: ConcurrentRunner,
}

impl<'a, P> TaleBuilder<'a, P>
where
    P: SummaryProvider,
{
    pub fn new(config: &'a TaleConfig, catalog: &'a FileCatalog, provider: &'a P) -> Self {
        Self {
            config,
            catalog,
            provider,
            runner: ConcurrentRunner::new(config.max_concurrency),
        }
    }

    pub async fn build(&self, selected: &[String]) -> TaleOutcome {
        let name = repository_name(self.config.root());
        let mut root = Node::new(name.clone(), NodeKind::Repository);

        let selected_set: HashSet<&str> = selected.iter().map(String::as_str).collect();
        let folders = self.folder_set(selected);

        // Folder nodes are independent of each other; the runner may finish
        // them in any order, so the pre-sorted index restores depth order.
        let this = self;
        let set = &selected_set;
        let mut children: Vec<(usize, Node)> = self
            .runner
            .run(
                folders.into_iter().enumerate().collect(),
                move |(index, folder)| async move {
                    let node = this.build_folder(&folder, set).await?;
                    Ok::<_, NodeError>((index, node))
                },
            )
            .await
            .into_iter()
            .filter_map(|(index, node)| node.map(|node| (index, node)))
            .collect();
        children.sort_by_key(|(index, _)| *index);

        let digests: Vec<FolderDigest> = children
            .iter()
            .map(|(_, node)| FolderDigest {
                name: node.name.clone(),
                summary: node.description.clone(),
            })
            .collect();
        for (_, node) in children {
            root.push_child(node);
        }

        if !root.children.is_empty() && !self.config.dry_run {
            let readme = self.read_readme().await;
            let request = SummaryRequest::Repository {
                name,
                folders: digests,
                readme,
            };
            match self.provider.generate(&request).await {
                Ok(text) => root.description = text,
                Err(source) => {
                    let err = NodeError::Generation {
                        name: root.name.clone(),
                        source,
                    };
                    warn!(error = %err, "repository summary failed");
                    self.runner.errors().push(err.to_string());
                }
            }
        }

        TaleOutcome {
            root,
            failures: self.runner.errors().entries(),
        }
    }

    /// Distinct parent folders of the selected files, shallowest first.
    ///
    /// Folders containing no selected file are never visited. Top-level
    /// files map to the synthetic folder `"."`. Depth ties resolve
    /// lexically so output order is reproducible.
    fn folder_set(&self, selected: &[String]) -> Vec<String> {
        let distinct: BTreeSet<String> =
            selected.iter().map(|rel| parent_of(rel)).collect();
        let mut folders: Vec<String> = distinct
            .into_iter()
            .filter(|folder| self.folder_allowed(folder))
            .collect();
        folders.sort_by_key(|folder| depth_of(folder));
        folders
    }

    // The folder filter applies at the top level only: an entry matches a
    // folder when it equals the folder's first path component.
    fn folder_allowed(&self, folder: &str) -> bool {
        let filter = &self.config.filter_folders;
        if filter.is_empty() {
            return true;
        }
        let top = top_component(folder);
        filter.iter().any(|allow| allow.trim_end_matches('/') == top)
    }

    async fn build_folder(
        &self,
        folder: &str,
        selected: &HashSet<&str>,
    ) -> Result<Option<Node>, NodeError> {
        let dir = if folder == "." {
            self.config.root().to_path_buf()
        } else {
            self.config.root().join(folder)
        };

        // Physical listing: files present on disk but outside the selected
        // set (or matching an ignore rule) contribute nothing.
        let mut names: Vec<String> = Vec::new();
        let mut entries = fs::read_dir(&dir).await.map_err(|source| NodeError::List {
            path: folder.to_string(),
            source,
        })?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| NodeError::List {
                path: folder.to_string(),
                source,
            })?
        {
            let file_type = entry.file_type().await.map_err(|source| NodeError::List {
                path: folder.to_string(),
                source,
            })?;
            if !file_type.is_file() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();

        let files: Vec<(usize, String)> = names
            .into_iter()
            .map(|name| {
                if folder == "." {
                    name
                } else {
                    format!("{folder}/{name}")
                }
            })
            .filter(|rel| selected.contains(rel.as_str()) && !self.catalog.is_ignored(rel))
            .enumerate()
            .collect();

        let this = self;
        let outcomes = self
            .runner
            .run(files, move |(index, rel)| async move {
                let outcome = this.summarize_file(&rel).await?;
                Ok::<_, NodeError>((index, outcome))
            })
            .await;

        let mut children: Vec<(usize, Node)> = outcomes
            .into_iter()
            .filter_map(|(index, outcome)| match outcome {
                FileOutcome::Summarized(node) => Some((index, node)),
                FileOutcome::Skipped => None,
            })
            .collect();
        children.sort_by_key(|(index, _)| *index);

        // Folders that end up with no surviving children are never shown.
        if children.is_empty() {
            return Ok(None);
        }

        let mut node = Node::new(folder, NodeKind::Folder);
        let summaries: Vec<String> = children
            .iter()
            .map(|(_, child)| child.description.clone())
            .collect();
        for (_, child) in children {
            node.push_child(child);
        }

        if !self.config.dry_run {
            let request = SummaryRequest::Folder {
                name: folder.to_string(),
                summaries,
            };
            match self.provider.generate(&request).await {
                Ok(text) => node.description = text,
                Err(source) => {
                    // The folder keeps its children; only the description
                    // is lost.
                    let err = NodeError::Generation {
                        name: folder.to_string(),
                        source,
                    };
                    warn!(error = %err, "folder summary failed");
                    self.runner.errors().push(err.to_string());
                }
            }
        }

        Ok(Some(node))
    }

    /// The file step: read, gate on length, then summarize.
    ///
    /// Skipping is not a failure; a generation error is, but it stays local
    /// to this file.
    pub async fn summarize_file(&self, rel: &str) -> Result<FileOutcome, NodeError> {
        let content = fs::read_to_string(self.config.root().join(rel))
            .await
            .map_err(|source| NodeError::Read {
                path: rel.to_string(),
                source,
            })?;

        if content.is_empty() || content.len() < self.config.min_content_length {
            debug!(path = %rel, len = content.len(), "skipping short file");
            return Ok(FileOutcome::Skipped);
        }

        let name = file_name_of(rel).to_string();
        let mut node = Node::new(name.clone(), NodeKind::File);

        if self.config.dry_run {
            return Ok(FileOutcome::Summarized(node));
        }

        let request = SummaryRequest::File { name, content };
        let text = self
            .provider
            .generate(&request)
            .await
            .map_err(|source| NodeError::Generation {
                name: rel.to_string(),
                source,
            })?;
        node.description = text;
        Ok(FileOutcome::Summarized(node))
    }

    async fn read_readme(&self) -> String {
        for candidate in &self.config.readme_candidates {
            if let Ok(content) = fs::read_to_string(self.config.root().join(candidate)).await {
                return content;
            }
        }
        String::new()
    }
}

fn repository_name(root: &Path) -> String {
    let resolved = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "repository".to_string())
}

fn parent_of(rel: &str) -> String {
    match rel.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => ".".to_string(),
    }
}

fn depth_of(folder: &str) -> usize {
    if folder == "." {
        0
    } else {
        folder.split('/').count()
    }
}

fn top_component(folder: &str) -> &str {
    folder.split('/').next().unwrap_or(folder)
}

fn file_name_of(rel: &str) -> &str {
    rel.rsplit('/').next().unwrap_or(rel)
}
