use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::stream::{self, StreamExt};
use tracing::warn;

/// Append-only record of absorbed per-item failures.
///
/// Shared across workers; appends are serialized through the lock so no
/// entry is lost under concurrent completion.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.lock().push(entry.into());
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    // A panicking worker must not stop later appends.
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bounded fan-out over independent, fallible units of work.
///
/// A failing unit is logged and contributes no result; it never aborts its
/// siblings. Completion order is unspecified; callers that need a stable
/// output order re-sort by their own key after collection.
pub struct ConcurrentRunner {
    limit: usize,
    errors: ErrorLog,
}

impl ConcurrentRunner {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            errors: ErrorLog::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    pub async fn run<T, R, E, F, Fut>(&self, items: Vec<T>, work: F) -> Vec<R>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Display,
    {
        let errors = self.errors.clone();
        stream::iter(items)
            .map(work)
            .buffer_unordered(self.limit)
            .filter_map(move |outcome| {
                let errors = errors.clone();
                async move {
                    match outcome {
                        Ok(result) => Some(result),
                        Err(err) => {
                            warn!(error = %err, "unit of work failed");
                            errors.push(err.to_string());
                            None
                        }
                    }
                }
            })
            .collect()
            .await
    }
}
