use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EffortError {
    #[error("failed to run `git {args}`: {source}")]
    Spawn {
        args: String,
        source: std::io::Error,
    },

    #[error("`git {args}` exited with {status}: {stderr}")]
    Failed {
        args: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Per-file contribution weight. Missing entries read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffortMap {
    scores: HashMap<String, u64>,
}

impl EffortMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> u64 {
        self.scores.get(path).copied().unwrap_or(0)
    }

    pub fn insert(&mut self, path: impl Into<String>, score: u64) {
        self.scores.insert(path.into(), score);
    }

    pub fn bump(&mut self, path: impl Into<String>) {
        *self.scores.entry(path.into()).or_insert(0) += 1;
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl FromIterator<(String, u64)> for EffortMap {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Extracts contribution statistics from a repository's git history.
pub struct GitEffort {
    root: PathBuf,
}

impl GitEffort {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn commit_count(&self) -> Result<u64, EffortError> {
        let stdout = self.run(&["rev-list", "--count", "HEAD"]).await?;
        Ok(stdout.trim().parse().unwrap_or(0))
    }

    /// Per-file effort scores, preferring `git effort` (git-extras) and
    /// falling back to counting path occurrences across `git log`.
    pub async fn effort(&self) -> Result<EffortMap, EffortError> {
        match self.run(&["effort", "--"]).await {
            Ok(stdout) => {
                let map = parse_effort(&stdout);
                if map.is_empty() {
                    self.log_effort().await
                } else {
                    Ok(map)
                }
            }
            Err(err) => {
                debug!(error = %err, "git effort unavailable, counting from git log");
                self.log_effort().await
            }
        }
    }

    async fn log_effort(&self) -> Result<EffortMap, EffortError> {
        let stdout = self.run(&["log", "--name-only", "--format="]).await?;
        let mut map = EffortMap::new();
        for line in stdout.lines().map(str::trim) {
            if !line.is_empty() {
                map.bump(line);
            }
        }
        Ok(map)
    }

    async fn run(&self, args: &[&str]) -> Result<String, EffortError> {
        debug!(args = ?args, dir = %self.root.display(), "running git command");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .await
            .map_err(|source| EffortError::Spawn {
                args: args.join(" "),
                source,
            })?;

        if !output.status.success() {
            return Err(EffortError::Failed {
                args: args.join(" "),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse `git effort` output into an effort map.
///
/// Rows look like `src/file.py.............. 10   2`: a dot-padded path, a
/// commit count, and an active-days count. Rows whose first field carries no
/// dot padding (the header) are skipped; a commit count that fails to parse
/// scores 1, not 0, since the file demonstrably exists in history.
pub fn parse_effort(output: &str) -> EffortMap {
    let mut map = EffortMap::new();
    for line in output.lines() {
        let mut fields = line.split_whitespace();
        let (Some(padded), Some(commits)) = (fields.next(), fields.next()) else {
            continue;
        };
        if !padded.ends_with('.') {
            continue;
        }
        let path = padded.trim_end_matches('.');
        if path.is_empty() {
            continue;
        }
        map.insert(path, commits.parse().unwrap_or(1));
    }
    map
}
