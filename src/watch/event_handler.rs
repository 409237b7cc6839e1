// src/watch/event_handler.rs

//! Translation of raw `notify` events into change batches.

use std::path::Path;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use tracing::{debug, warn};

use crate::engine::ChangeBatch;
use crate::watch::path_utils::{is_hidden, tree_path};

/// Build the change batch for one filesystem event.
///
/// Renames reported with both ends become moves; a rename reported with
/// only one end is treated as a delete (old name) or an add (new name).
/// Access events carry no change and yield an empty batch.
pub fn batch_from_event(root: &Path, event: &Event) -> ChangeBatch {
    let paths: Vec<String> = event
        .paths
        .iter()
        .filter_map(|p| match tree_path(root, p) {
            Some(tp) if !is_hidden(&tp) => Some(tp),
            Some(_) => None,
            None => {
                warn!("could not relativize path {:?} against root {:?}", p, root);
                None
            }
        })
        .collect();

    let mut batch = ChangeBatch::new();
    match &event.kind {
        EventKind::Access(_) => {}
        EventKind::Create(_) => {
            for p in paths {
                batch = batch.with_added(p);
            }
        }
        EventKind::Remove(_) => {
            for p in paths {
                batch = batch.with_deleted(p);
            }
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if paths.len() == 2 => {
            batch = batch.with_moved(&paths[0], &paths[1]);
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            for p in paths {
                batch = batch.with_deleted(p);
            }
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            for p in paths {
                batch = batch.with_added(p);
            }
        }
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => {
            for p in paths {
                batch = batch.with_changed(p);
            }
        }
    }

    if !batch.is_empty() {
        debug!(kind = ?event.kind, paths = batch.len(), "filesystem event -> change batch");
    }
    batch
}
