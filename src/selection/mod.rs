pub mod cost;

pub use cost::{ApproxCostModel, CostModel};

use tracing::{debug, warn};

use crate::catalog::FileCatalog;
use crate::effort::EffortMap;

/// Cost ceilings for one selection pass.
///
/// `None` means unbounded. A `global` of `Some(0)` means "select nothing" and
/// short-circuits before any cost is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Budget {
    pub global: Option<usize>,
    pub per_file: Option<usize>,
}

/// Outcome of a selection pass.
///
/// `files` preserves the catalog's original enumeration order, not the
/// priority order the walk used internally.
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    pub files: Vec<String>,
    pub cost_used: usize,
    pub candidates_considered: usize,
    pub excluded_by_cap: usize,
}

pub struct BudgetSelector<C> {
    cost_model: C,
}

impl Default for BudgetSelector<ApproxCostModel> {
    fn default() -> Self {
        Self {
            cost_model: ApproxCostModel,
        }
    }
}

impl<C> BudgetSelector<C>
where
    C: CostModel,
{
    pub fn new(cost_model: C) -> Self {
        Self { cost_model }
    }

    /// Select the prioritized, in-budget subset of the catalog's files.
    ///
    /// Candidates are walked in effort order (descending, ties broken by
    /// enumeration order so results are reproducible on unchanged inputs).
    /// Cost is measured lazily: a candidate's content is only read once the
    /// walk reaches it, so files past the point of budget exhaustion are
    /// never read. Once a candidate would overflow the global ceiling the
    /// walk stops entirely instead of skipping ahead to cheaper, lower-
    /// priority candidates.
    pub fn select(&self, catalog: &FileCatalog, effort: &EffortMap, budget: &Budget) -> SelectionOutcome {
        let candidates = catalog.files();
        let candidates_considered = candidates.len();

        if budget.global == Some(0) {
            return SelectionOutcome {
                files: Vec::new(),
                cost_used: 0,
                candidates_considered,
                excluded_by_cap: 0,
            };
        }

        // 1. Priority Phase
        // Sort globally by (effort desc, enumeration index asc)
        let mut ordered: Vec<(usize, String)> = candidates.into_iter().enumerate().collect();
        ordered.sort_by(|a, b| {
            effort
                .get(&b.1)
                .cmp(&effort.get(&a.1))
                .then(a.0.cmp(&b.0))
        });

        debug_assert!(ordered.windows(2).all(|w| {
            let a = &w[0];
            let b = &w[1];
            effort.get(&a.1) > effort.get(&b.1)
                || (effort.get(&a.1) == effort.get(&b.1) && a.0 < b.0)
        }));

        // 2. Budgeting Phase
        let mut picked: Vec<(usize, String)> = Vec::new();
        let mut cost_used = 0usize;
        let mut excluded_by_cap = 0usize;

        for (index, path) in ordered {
            let content = match catalog.read(&path) {
                Ok(content) => content,
                Err(err) => {
                    // Unreadable candidates are excluded, never fatal.
                    warn!(path = %path, error = %err, "excluding unreadable candidate");
                    continue;
                }
            };
            let cost = self.cost_model.cost(&content);

            // A file over the per-file cap is permanently too large; skip
            // it and keep scanning.
            if budget.per_file.is_some_and(|cap| cost > cap) {
                debug!(path = %path, cost, "candidate exceeds per-file budget");
                excluded_by_cap += 1;
                continue;
            }

            // Cost 0 never breaches the ceiling, so zero-cost candidates are
            // included whenever the walk reaches them.
            if budget.global.is_some_and(|max| cost_used + cost > max) {
                debug!(path = %path, cost, cost_used, "global budget exhausted");
                break;
            }

            cost_used += cost;
            picked.push((index, path));
        }

        // 3. Restore enumeration order for the caller.
        picked.sort_by_key(|(index, _)| *index);

        SelectionOutcome {
            files: picked.into_iter().map(|(_, path)| path).collect(),
            cost_used,
            candidates_considered,
            excluded_by_cap,
        }
    }
}
