//! Budget-aware hierarchical summarization engine for source repositories.
//!
//! `repotale` walks a source tree, ranks files by historical contribution
//! effort, selects the subset worth summarizing under a hard token budget,
//! and composes a Project → Folder → File summary tree bottom-up. Selection
//! is deterministic — identical inputs always produce identical selections.
//! Any single node's failure degrades to an absent child or an empty
//! description instead of aborting the run.
//!
//! See <https://github.com/repotale/repotale> for the CLI front end.

pub mod catalog;
pub mod config;
pub mod effort;
pub mod provider;
pub mod runner;
pub mod selection;
pub mod tale;
