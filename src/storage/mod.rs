// src/storage/mod.rs

//! The storage collaborator the engine runs against.
//!
//! [`AssetStorage`] is the whole contract the core needs from its host:
//! path classification, folder enumeration, template persistence, asset
//! facts for validators, and the importer-state primitives (copy and
//! reimport).
//!
//! - [`memory`] is an in-memory tree used by tests and embedders.
//! - [`fs_host`] backs the contract with a real directory tree.
//! - [`kinds`] compiles the glob patterns that classify paths.

use std::fmt::Debug;

use anyhow::Result;

use crate::path::{AssetPath, FolderPath};
use crate::template::{ImportSettings, Template};
use crate::types::{AssetInfo, AssetKind};

pub mod fs_host;
pub mod kinds;
pub mod memory;

pub use fs_host::FsStorage;
pub use kinds::KindMatcher;
pub use memory::MemoryStorage;

/// Direct children of a folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderListing {
    pub files: Vec<AssetPath>,
    pub folders: Vec<FolderPath>,
}

/// Abstract asset storage and importer interface.
pub trait AssetStorage: Debug {
    /// Reserved file name marking a folder's template.
    fn template_file_name(&self) -> &str;

    /// Path-based kind lookup. `None` for anything that is not a texture,
    /// model or audio asset.
    fn classify(&self, path: &AssetPath) -> Option<AssetKind>;

    /// Top-level folders of the tree.
    fn roots(&self) -> Vec<FolderPath>;

    /// Files and subfolders directly inside `folder`. Unreadable or missing
    /// folders list as empty.
    fn list_folder(&self, folder: &FolderPath) -> FolderListing;

    fn load_template(&self, slot: &AssetPath) -> Option<Template>;

    /// Whether something occupies the template slot, even if it fails to
    /// load as a template.
    fn slot_exists(&self, slot: &AssetPath) -> bool {
        self.load_template(slot).is_some()
    }

    fn save_template(&mut self, template: &Template) -> Result<()>;

    fn asset_info(&self, path: &AssetPath) -> Option<AssetInfo>;

    /// Current importer state of an asset.
    fn importer_settings(&self, path: &AssetPath) -> Option<ImportSettings>;

    /// Copy `settings` onto the asset's importer. Returns `Ok(true)` when the
    /// importer state changed and `Ok(false)` when it already conformed.
    fn copy_state(&mut self, settings: &ImportSettings, to: &AssetPath) -> Result<bool>;

    /// Persist the asset's importer state and re-run its import.
    fn reimport(&mut self, path: &AssetPath) -> Result<()>;

    /// The host finished an import of `path` that it started itself, after
    /// settings were copied without a queued reimport. Hosts that stage
    /// importer state commit it here.
    fn finish_import(&mut self, _path: &AssetPath) -> Result<()> {
        Ok(())
    }

    /// Whether `folder` exists as a folder of the tree.
    fn is_folder(&self, folder: &FolderPath) -> bool {
        let listing = self.list_folder(folder);
        !listing.files.is_empty() || !listing.folders.is_empty()
    }

    /// Host bookkeeping files that never take part in routing.
    fn is_sidecar(&self, _path: &AssetPath) -> bool {
        false
    }
}
