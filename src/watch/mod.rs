// src/watch/mod.rs

//! Filesystem watching for the directory-backed host.
//!
//! This module wires up a cross-platform watcher (`notify`) on the asset
//! root and turns raw filesystem events into [`ChangeBatch`]es of tree
//! paths, delivered to the runtime as `HostEvent::Changes`.
//!
//! It does **not** know about templates; routing happens in the engine.
//!
//! [`ChangeBatch`]: crate::engine::ChangeBatch

pub mod event_handler;
pub mod path_utils;
pub mod watcher;

pub use event_handler::batch_from_event;
pub use watcher::{spawn_watcher, WatcherHandle};
