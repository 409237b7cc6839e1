// src/template/store.rs

use tracing::{debug, info};

use crate::errors::{FlowError, Result};
use crate::path::{AssetPath, FolderPath};
use crate::storage::AssetStorage;
use crate::template::{ImportSettings, Template};
use crate::types::AssetKind;

/// Per-folder template lookup over a storage backend.
///
/// Each folder holds at most one template, in a file with a reserved name.
/// The store does no resolution of its own; it only answers "what lives in
/// this folder".
#[derive(Clone, Copy)]
pub struct TemplateStore<'a> {
    storage: &'a dyn AssetStorage,
}

impl std::fmt::Debug for TemplateStore<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateStore")
            .field("file_name", &self.storage.template_file_name())
            .finish_non_exhaustive()
    }
}

impl<'a> TemplateStore<'a> {
    pub fn new(storage: &'a dyn AssetStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &'a dyn AssetStorage {
        self.storage
    }

    /// Path of the reserved template file for `folder`.
    pub fn slot_for(&self, folder: &FolderPath) -> Option<AssetPath> {
        folder.child(self.storage.template_file_name())
    }

    /// True iff `path` names a template file. The file name comparison is
    /// case-insensitive.
    pub fn is_template_slot(&self, path: &AssetPath) -> bool {
        path.file_name()
            .eq_ignore_ascii_case(self.storage.template_file_name())
    }

    pub fn template_in_folder(&self, folder: &FolderPath) -> Option<Template> {
        let slot = self.slot_for(folder)?;
        self.storage.load_template(&slot)
    }

    pub fn template_at_slot(&self, slot: &AssetPath) -> Option<Template> {
        if !self.is_template_slot(slot) {
            return None;
        }
        self.storage.load_template(slot)
    }

    pub fn has_template(&self, folder: &FolderPath) -> bool {
        self.slot_for(folder)
            .is_some_and(|slot| self.storage.slot_exists(&slot))
    }

    pub fn has_template_of_kind(&self, folder: &FolderPath, kind: AssetKind) -> bool {
        self.template_in_folder(folder)
            .is_some_and(|t| t.kind() == kind)
    }

    /// Every template in the tree, in folder order.
    pub fn all_templates(&self) -> Vec<Template> {
        self.collect_from(self.storage.roots())
    }

    /// Templates in `folder` or any folder below it, in folder order.
    pub fn templates_within(&self, folder: &FolderPath) -> Vec<Template> {
        self.collect_from(vec![folder.clone()])
    }

    fn collect_from(&self, mut stack: Vec<FolderPath>) -> Vec<Template> {
        let mut found = Vec::new();

        while let Some(folder) = stack.pop() {
            if let Some(template) = self.template_in_folder(&folder) {
                found.push(template);
            }
            stack.extend(self.storage.list_folder(&folder).folders);
        }

        found.sort_by(|a, b| a.folder().cmp(b.folder()));
        debug!(count = found.len(), "enumerated folder templates");
        found
    }
}

/// Create a new template in `folder` with the given payload.
///
/// Fails with [`FlowError::AlreadyExists`] when the folder already holds a
/// template of any kind; the existing template is left untouched.
pub fn create_template(
    storage: &mut dyn AssetStorage,
    folder: &FolderPath,
    payload: ImportSettings,
) -> Result<Template> {
    if TemplateStore::new(storage).has_template(folder) {
        return Err(FlowError::AlreadyExists {
            folder: folder.clone(),
        });
    }

    let mut template = Template::new(folder.clone(), payload);
    storage.save_template(&template)?;
    template.mark_clean();

    info!(folder = %folder, kind = %template.kind(), "created folder template");
    Ok(template)
}
