// src/flow/mod.rs

//! Per-template processing steps.
//!
//! One reprocessing pass over a template runs, in order:
//!
//! 1. [`exclusions::prune_exclusions`] against the fresh affected set;
//! 2. [`apply::apply_to_assets`] over the managed set, scheduling changed
//!    assets on the [`ReimportQueue`];
//! 3. [`validate::validate_managed`] over the same managed set.
//!
//! The orchestration itself lives in `engine::core`.

pub mod apply;
pub mod exclusions;
pub mod reimport;
pub mod validate;

pub use apply::{apply_to_asset, apply_to_assets, ApplyOutcome};
pub use exclusions::prune_exclusions;
pub use reimport::{FlushOutcome, ReimportQueue};
pub use validate::{validate_asset, validate_managed, Diagnostic};
