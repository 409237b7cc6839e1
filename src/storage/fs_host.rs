// src/storage/fs_host.rs

//! [`AssetStorage`] over a real directory tree.
//!
//! Tree paths are rooted at `/`, which maps onto the configured root
//! directory. Importer state for `Art/a.png` lives next to it in
//! `Art/a.png.import.toml` (suffix configurable). `copy_state` only stages
//! new state in memory; `reimport` writes it out, the same save-and-reimport
//! split an editor importer has. State copied ahead of a host-driven import
//! is written by `finish_import` instead.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, warn};

use super::{AssetStorage, FolderListing, KindMatcher};
use crate::config::ConfigFile;
use crate::fs::FileSystem;
use crate::path::{AssetPath, FolderPath};
use crate::template::{ImportSettings, Template};
use crate::types::{AssetInfo, AssetKind};

#[derive(Debug)]
pub struct FsStorage<F: FileSystem> {
    fs: F,
    root: PathBuf,
    template_file_name: String,
    sidecar_suffix: String,
    kinds: KindMatcher,
    staged: HashMap<AssetPath, ImportSettings>,
}

impl<F: FileSystem> FsStorage<F> {
    pub fn new(fs: F, root: impl Into<PathBuf>, cfg: &ConfigFile) -> Result<Self> {
        let kinds = KindMatcher::new(cfg.kinds())?;
        Ok(Self {
            fs,
            root: root.into(),
            template_file_name: cfg.config().template_file_name.clone(),
            sidecar_suffix: cfg.config().import_sidecar_suffix.clone(),
            kinds,
            staged: HashMap::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Host location of a tree path.
    pub fn host_path(&self, tree_path: &str) -> PathBuf {
        let rel = tree_path.trim_start_matches('/');
        if rel.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rel)
        }
    }

    fn sidecar_path(&self, asset: &AssetPath) -> PathBuf {
        self.host_path(&format!("{}{}", asset.as_str(), self.sidecar_suffix))
    }

    fn read_sidecar(&self, asset: &AssetPath) -> Result<Option<ImportSettings>> {
        let path = self.sidecar_path(asset);
        if !self.fs.is_file(&path) {
            return Ok(None);
        }
        let text = self.fs.read_to_string(&path)?;
        let settings: ImportSettings = toml::from_str(&text)
            .with_context(|| format!("parsing importer state {:?}", path))?;
        Ok(Some(settings))
    }

    /// Write staged importer state out to the sidecar.
    fn commit_staged(&mut self, asset: &AssetPath) -> Result<()> {
        if !self.fs.is_file(&self.host_path(asset.as_str())) {
            self.staged.remove(asset);
            bail!("asset {asset} no longer exists");
        }
        let Some(settings) = self.staged.remove(asset) else {
            return Ok(());
        };
        let text = toml::to_string(&settings)?;
        self.fs.write(&self.sidecar_path(asset), text.as_bytes())?;
        debug!(asset = %asset, "wrote importer state");
        Ok(())
    }

    fn pixel_dimensions(&self, asset: &AssetPath) -> Option<(u32, u32)> {
        let bytes = self.fs.read_bytes(&self.host_path(asset.as_str())).ok()?;
        match imagesize::blob_size(&bytes) {
            Ok(size) => Some((
                u32::try_from(size.width).ok()?,
                u32::try_from(size.height).ok()?,
            )),
            Err(err) => {
                debug!(asset = %asset, "could not read pixel dimensions: {err}");
                None
            }
        }
    }
}

impl<F: FileSystem> AssetStorage for FsStorage<F> {
    fn template_file_name(&self) -> &str {
        &self.template_file_name
    }

    fn classify(&self, path: &AssetPath) -> Option<AssetKind> {
        if self.is_sidecar(path) || path.file_name().eq_ignore_ascii_case(&self.template_file_name) {
            return None;
        }
        self.kinds.classify(path)
    }

    fn roots(&self) -> Vec<FolderPath> {
        FolderPath::new("/").into_iter().collect()
    }

    fn list_folder(&self, folder: &FolderPath) -> FolderListing {
        let dir = self.host_path(folder.as_str());
        let entries = match self.fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(folder = %folder, "folder not listable: {err:#}");
                return FolderListing::default();
            }
        };

        let mut listing = FolderListing::default();
        for entry in entries {
            let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            // Hidden entries (.git, editor state) are not part of the tree.
            if name.starts_with('.') {
                continue;
            }
            if self.fs.is_dir(&entry) {
                listing.folders.extend(folder.join(name));
            } else if self.fs.is_file(&entry) {
                listing.files.extend(folder.child(name));
            }
        }
        listing
    }

    fn load_template(&self, slot: &AssetPath) -> Option<Template> {
        let folder = slot.folder()?;
        let path = self.host_path(slot.as_str());
        if !self.fs.is_file(&path) {
            return None;
        }

        let loaded = self
            .fs
            .read_to_string(&path)
            .and_then(|text| Template::from_toml_str(folder, &text).map_err(anyhow::Error::from));
        match loaded {
            Ok(template) => Some(template),
            Err(err) => {
                warn!(slot = %slot, "ignoring unreadable folder template: {err:#}");
                None
            }
        }
    }

    fn slot_exists(&self, slot: &AssetPath) -> bool {
        self.fs.exists(&self.host_path(slot.as_str()))
    }

    fn save_template(&mut self, template: &Template) -> Result<()> {
        let slot = template
            .folder()
            .child(&self.template_file_name)
            .ok_or_else(|| anyhow!("no template slot for {}", template.folder()))?;
        let text = template.to_toml_string()?;
        self.fs.write(&self.host_path(slot.as_str()), text.as_bytes())?;
        debug!(slot = %slot, "saved folder template");
        Ok(())
    }

    fn asset_info(&self, path: &AssetPath) -> Option<AssetInfo> {
        let kind = self.classify(path)?;
        if !self.fs.is_file(&self.host_path(path.as_str())) {
            return None;
        }
        let mut info = AssetInfo::new(path.clone(), kind);
        if kind == AssetKind::Texture {
            info.dimensions = self.pixel_dimensions(path);
        }
        Some(info)
    }

    fn importer_settings(&self, path: &AssetPath) -> Option<ImportSettings> {
        if let Some(staged) = self.staged.get(path) {
            return Some(staged.clone());
        }
        let kind = self.classify(path)?;
        match self.read_sidecar(path) {
            Ok(Some(settings)) => Some(settings),
            Ok(None) => Some(ImportSettings::new(kind)),
            Err(err) => {
                warn!(asset = %path, "unreadable importer state: {err:#}");
                None
            }
        }
    }

    fn copy_state(&mut self, settings: &ImportSettings, to: &AssetPath) -> Result<bool> {
        if !self.fs.is_file(&self.host_path(to.as_str())) {
            bail!("no asset at {to}");
        }
        let current = self
            .importer_settings(to)
            .ok_or_else(|| anyhow!("{to} has no readable importer state"))?;
        if current.kind != settings.kind {
            bail!(
                "cannot copy {} settings onto a {} importer",
                settings.kind,
                current.kind
            );
        }
        if current == *settings {
            return Ok(false);
        }
        self.staged.insert(to.clone(), settings.clone());
        Ok(true)
    }

    fn reimport(&mut self, path: &AssetPath) -> Result<()> {
        self.commit_staged(path)
    }

    fn finish_import(&mut self, path: &AssetPath) -> Result<()> {
        self.commit_staged(path)
    }

    fn is_folder(&self, folder: &FolderPath) -> bool {
        self.fs.is_dir(&self.host_path(folder.as_str()))
    }

    fn is_sidecar(&self, path: &AssetPath) -> bool {
        path.file_name().ends_with(&self.sidecar_suffix)
    }
}
