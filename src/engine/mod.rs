// src/engine/mod.rs

//! Orchestration engine for folderflow.
//!
//! This module ties together:
//! - the change router (host change batches to template folders)
//! - the per-template processing pass (prune, apply, validate)
//! - the deferred reimport queue, drained at the host's idle point
//! - the async event loop that reacts to:
//!   - filesystem change batches
//!   - pre-import / post-import hooks
//!   - inspector actions (toggle managed, create template)
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::path::AssetPath;

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// If true, exit after the first idle flush (used for `--once`).
    pub exit_when_idle: bool,
}

/// Events flowing into the runtime from the watcher, the host and signals.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A batch of tree mutations.
    Changes(ChangeBatch),
    /// The host is about to import this asset.
    PreImport(AssetPath),
    /// The host finished the current import batch.
    PostImport,
    /// Opt an asset into or out of its governing template.
    SetManaged { path: AssetPath, managed: bool },
    /// Create a template in the asset's folder, seeded from its importer.
    CreateTemplate { path: AssetPath },
    /// Reprocess every template in the tree.
    ProcessAll,
    /// The host reached an idle point; deferred work may run now.
    Idle,
    /// Graceful shutdown requested (e.g. Ctrl-C).
    Shutdown,
}

pub mod core;
pub mod router;
pub mod runtime;

pub use self::core::{BatchReport, CoreStep, FlowEngine, FlushReport, Governance, ProcessReport};
pub use router::{route, ChangeBatch, MovedAsset};
pub use runtime::Runtime;
