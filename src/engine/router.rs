// src/engine/router.rs

//! Change batches to template folders.
//!
//! Every touched path maps to at most one template: a template file maps to
//! itself, anything else to whatever governs it. Paths that no longer exist
//! (deleted files, move sources) still resolve, since resolution only needs
//! the path and the templates above it. The result is a set, so each
//! template is reprocessed once per batch however many paths hit it.
//!
//! A folder path (a renamed, moved or deleted directory) schedules every
//! template above it and, when it still exists, every template inside it.

use std::collections::BTreeSet;

use tracing::debug;

use crate::path::{AssetPath, FolderPath};
use crate::template::TemplateStore;
use crate::tree::{resolve, walk_up, Step};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedAsset {
    pub from: AssetPath,
    pub to: AssetPath,
}

/// One host notification's worth of tree mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    pub changed: Vec<AssetPath>,
    pub added: Vec<AssetPath>,
    pub deleted: Vec<AssetPath>,
    pub moved: Vec<MovedAsset>,
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    // The builders below drop blank or malformed paths.

    pub fn with_changed(mut self, raw: impl AsRef<str>) -> Self {
        self.changed.extend(AssetPath::new(raw));
        self
    }

    pub fn with_added(mut self, raw: impl AsRef<str>) -> Self {
        self.added.extend(AssetPath::new(raw));
        self
    }

    pub fn with_deleted(mut self, raw: impl AsRef<str>) -> Self {
        self.deleted.extend(AssetPath::new(raw));
        self
    }

    pub fn with_moved(mut self, from: impl AsRef<str>, to: impl AsRef<str>) -> Self {
        if let (Some(from), Some(to)) = (AssetPath::new(from), AssetPath::new(to)) {
            self.moved.push(MovedAsset { from, to });
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
            && self.added.is_empty()
            && self.deleted.is_empty()
            && self.moved.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changed.len() + self.added.len() + self.deleted.len() + self.moved.len() * 2
    }

    /// Merge another batch into this one.
    pub fn extend(&mut self, other: ChangeBatch) {
        self.changed.extend(other.changed);
        self.added.extend(other.added);
        self.deleted.extend(other.deleted);
        self.moved.extend(other.moved);
    }

    /// Every touched path, paired with whether it is gone from the tree.
    fn touched(&self) -> impl Iterator<Item = (&AssetPath, bool)> {
        self.changed
            .iter()
            .chain(&self.added)
            .map(|p| (p, false))
            .chain(self.deleted.iter().map(|p| (p, true)))
            .chain(
                self.moved
                    .iter()
                    .flat_map(|m| [(&m.from, true), (&m.to, false)]),
            )
    }
}

/// Folders of the templates that need reprocessing for `batch`.
///
/// A touched template file also schedules the templates above it: a nested
/// template appearing, disappearing or changing kind moves the boundary of
/// every enclosing template's affected set.
pub fn route(store: &TemplateStore<'_>, batch: &ChangeBatch) -> BTreeSet<FolderPath> {
    let storage = store.storage();
    let mut scheduled = BTreeSet::new();

    for (path, gone) in batch.touched() {
        if storage.is_sidecar(path) {
            continue;
        }

        if store.is_template_slot(path) {
            let Some(folder) = path.folder() else {
                continue;
            };
            if !gone && store.has_template(&folder) {
                scheduled.insert(folder.clone());
            }
            if let Some(parent) = folder.parent() {
                enclosing_templates(store, &parent, &mut scheduled);
            }
            continue;
        }

        if storage.classify(path).is_none() {
            if let Some(folder) = moved_or_removed_folder(store, path, gone) {
                debug!(folder = %folder, gone, "folder-level change");
                enclosing_templates(store, &folder, &mut scheduled);
                if !gone {
                    scheduled.extend(
                        store
                            .templates_within(&folder)
                            .into_iter()
                            .map(|t| t.folder().clone()),
                    );
                }
                continue;
            }
        }

        match resolve(store, path) {
            Some(template) => {
                debug!(path = %path, template = %template.folder(), "change routed to template");
                scheduled.insert(template.folder().clone());
            }
            None => debug!(path = %path, "change has no governing template"),
        }
    }

    scheduled
}

/// A non-asset path that names a folder. Gone paths cannot be checked
/// against the tree any more, so they count as folders when they do not
/// classify.
fn moved_or_removed_folder(store: &TemplateStore<'_>, path: &AssetPath, gone: bool) -> Option<FolderPath> {
    let folder = FolderPath::new(path.as_str())?;
    (gone || store.storage().is_folder(&folder)).then_some(folder)
}

fn enclosing_templates(store: &TemplateStore<'_>, from: &FolderPath, out: &mut BTreeSet<FolderPath>) {
    walk_up::<()>(from, |folder| {
        if store.has_template(folder) {
            out.insert(folder.clone());
        }
        Step::Continue
    });
}
