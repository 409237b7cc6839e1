// src/storage/memory.rs

use std::collections::{BTreeMap, BTreeSet, HashSet};

use anyhow::{anyhow, bail, Result};

use super::{AssetStorage, FolderListing, KindMatcher};
use crate::config::model::DEFAULT_TEMPLATE_FILE_NAME;
use crate::path::{AssetPath, FolderPath};
use crate::template::{ImportSettings, Template};
use crate::types::{AssetInfo, AssetKind};

#[derive(Debug, Clone)]
struct MemoryAsset {
    dimensions: Option<(u32, u32)>,
    importer: Option<ImportSettings>,
}

/// In-memory asset tree.
///
/// Folders are created implicitly for every asset and template added.
/// Failures can be injected per path for copy and reimport, and every
/// reimport and template save is recorded so tests can assert on them.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    template_file_name: String,
    kinds: KindMatcher,
    folders: BTreeSet<FolderPath>,
    assets: BTreeMap<AssetPath, MemoryAsset>,
    templates: BTreeMap<AssetPath, Template>,
    failing_copy: HashSet<AssetPath>,
    failing_reimport: HashSet<AssetPath>,
    reimported: Vec<AssetPath>,
    saves: usize,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_kinds(KindMatcher::default())
    }

    pub fn with_kinds(kinds: KindMatcher) -> Self {
        Self {
            template_file_name: DEFAULT_TEMPLATE_FILE_NAME.to_string(),
            kinds,
            folders: BTreeSet::new(),
            assets: BTreeMap::new(),
            templates: BTreeMap::new(),
            failing_copy: HashSet::new(),
            failing_reimport: HashSet::new(),
            reimported: Vec::new(),
            saves: 0,
        }
    }

    pub fn add_folder(&mut self, folder: &FolderPath) {
        let mut current = Some(folder.clone());
        while let Some(f) = current {
            if !self.folders.insert(f.clone()) {
                break;
            }
            current = f.parent();
        }
    }

    /// Add a file. Its importer starts with the kind's empty settings when
    /// the path classifies as an asset.
    pub fn add_asset(&mut self, path: &AssetPath) {
        self.insert_asset(path, None);
    }

    pub fn add_texture(&mut self, path: &AssetPath, width: u32, height: u32) {
        self.insert_asset(path, Some((width, height)));
    }

    fn insert_asset(&mut self, path: &AssetPath, dimensions: Option<(u32, u32)>) {
        if let Some(folder) = path.folder() {
            self.add_folder(&folder);
        }
        let importer = self.kinds.classify(path).map(ImportSettings::new);
        self.assets.insert(
            path.clone(),
            MemoryAsset {
                dimensions,
                importer,
            },
        );
    }

    pub fn remove_asset(&mut self, path: &AssetPath) -> bool {
        self.assets.remove(path).is_some()
    }

    /// Move an asset, keeping its importer state.
    pub fn move_asset(&mut self, from: &AssetPath, to: &AssetPath) -> bool {
        let Some(asset) = self.assets.remove(from) else {
            return false;
        };
        if let Some(folder) = to.folder() {
            self.add_folder(&folder);
        }
        self.assets.insert(to.clone(), asset);
        true
    }

    /// Move a folder with everything below it: assets, templates and
    /// subfolders.
    pub fn move_folder(&mut self, from: &FolderPath, to: &FolderPath) -> bool {
        if !self.folders.contains(from) {
            return false;
        }
        let rebase = |path: &str| -> Option<String> {
            path.get(from.as_str().len()..)
                .map(|rest| format!("{}{rest}", to.as_str()))
        };

        let folders: Vec<FolderPath> = self
            .folders
            .iter()
            .filter(|f| from.is_ancestor_of(f))
            .cloned()
            .collect();
        for folder in folders {
            self.folders.remove(&folder);
            if let Some(moved) = rebase(folder.as_str()).and_then(FolderPath::new) {
                self.add_folder(&moved);
            }
        }

        let assets: Vec<AssetPath> = self.assets.keys().filter(|p| from.contains(p)).cloned().collect();
        for path in assets {
            let moved = rebase(path.as_str()).and_then(AssetPath::new);
            if let (Some(asset), Some(moved)) = (self.assets.remove(&path), moved) {
                self.assets.insert(moved, asset);
            }
        }

        let slots: Vec<AssetPath> = self.templates.keys().filter(|p| from.contains(p)).cloned().collect();
        for slot in slots {
            let Some(template) = self.templates.remove(&slot) else {
                continue;
            };
            let Some(folder) = rebase(template.folder().as_str()).and_then(FolderPath::new) else {
                continue;
            };
            let mut moved = Template::from_file(folder, template.to_file());
            moved.mark_clean();
            self.put_template(moved);
        }
        true
    }

    /// Store a template directly, replacing whatever occupies the slot.
    pub fn put_template(&mut self, template: Template) {
        self.add_folder(template.folder());
        if let Some(slot) = template.folder().child(&self.template_file_name) {
            let mut stored = template;
            stored.mark_clean();
            self.templates.insert(slot, stored);
        }
    }

    pub fn remove_template(&mut self, folder: &FolderPath) -> Option<Template> {
        let slot = folder.child(&self.template_file_name)?;
        self.templates.remove(&slot)
    }

    pub fn set_importer(&mut self, path: &AssetPath, settings: ImportSettings) {
        if let Some(asset) = self.assets.get_mut(path) {
            asset.importer = Some(settings);
        }
    }

    pub fn fail_copy_for(&mut self, path: &AssetPath) {
        self.failing_copy.insert(path.clone());
    }

    pub fn fail_reimport_for(&mut self, path: &AssetPath) {
        self.failing_reimport.insert(path.clone());
    }

    /// Every successful reimport, in call order.
    pub fn reimported(&self) -> &[AssetPath] {
        &self.reimported
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn contains(&self, path: &AssetPath) -> bool {
        self.assets.contains_key(path)
    }
}

impl AssetStorage for MemoryStorage {
    fn template_file_name(&self) -> &str {
        &self.template_file_name
    }

    fn classify(&self, path: &AssetPath) -> Option<AssetKind> {
        if path.file_name().eq_ignore_ascii_case(&self.template_file_name) {
            return None;
        }
        self.kinds.classify(path)
    }

    fn roots(&self) -> Vec<FolderPath> {
        self.folders
            .iter()
            .filter(|f| f.parent().is_none_or(|p| !self.folders.contains(&p)))
            .cloned()
            .collect()
    }

    fn list_folder(&self, folder: &FolderPath) -> FolderListing {
        let in_folder = |p: &&AssetPath| p.folder().as_ref() == Some(folder);

        let mut files: Vec<AssetPath> = self.assets.keys().filter(in_folder).cloned().collect();
        files.extend(self.templates.keys().filter(in_folder).cloned());
        files.sort();

        let folders = self
            .folders
            .iter()
            .filter(|f| f.parent().as_ref() == Some(folder))
            .cloned()
            .collect();

        FolderListing { files, folders }
    }

    fn load_template(&self, slot: &AssetPath) -> Option<Template> {
        self.templates.get(slot).cloned()
    }

    fn save_template(&mut self, template: &Template) -> Result<()> {
        let slot = template
            .folder()
            .child(&self.template_file_name)
            .ok_or_else(|| anyhow!("no template slot for {}", template.folder()))?;
        self.add_folder(template.folder());

        let mut stored = template.clone();
        stored.mark_clean();
        self.templates.insert(slot, stored);
        self.saves += 1;
        Ok(())
    }

    fn asset_info(&self, path: &AssetPath) -> Option<AssetInfo> {
        let asset = self.assets.get(path)?;
        let kind = self.classify(path)?;
        let mut info = AssetInfo::new(path.clone(), kind);
        info.dimensions = asset.dimensions;
        Some(info)
    }

    fn importer_settings(&self, path: &AssetPath) -> Option<ImportSettings> {
        self.assets.get(path)?.importer.clone()
    }

    fn copy_state(&mut self, settings: &ImportSettings, to: &AssetPath) -> Result<bool> {
        if self.failing_copy.contains(to) {
            bail!("importer rejected settings for {to}");
        }
        let asset = self
            .assets
            .get_mut(to)
            .ok_or_else(|| anyhow!("no asset at {to}"))?;
        let importer = asset
            .importer
            .as_mut()
            .ok_or_else(|| anyhow!("{to} has no importer"))?;

        if importer.kind != settings.kind {
            bail!(
                "cannot copy {} settings onto a {} importer",
                settings.kind,
                importer.kind
            );
        }
        if *importer == *settings {
            return Ok(false);
        }
        *importer = settings.clone();
        Ok(true)
    }

    fn reimport(&mut self, path: &AssetPath) -> Result<()> {
        if self.failing_reimport.contains(path) {
            bail!("import pipeline crashed on {path}");
        }
        if !self.assets.contains_key(path) {
            bail!("asset {path} no longer exists");
        }
        self.reimported.push(path.clone());
        Ok(())
    }

    fn is_folder(&self, folder: &FolderPath) -> bool {
        self.folders.contains(folder)
    }
}
