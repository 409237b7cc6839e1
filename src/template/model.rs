// src/template/model.rs

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Result;
use crate::path::{AssetPath, FolderPath};
use crate::types::AssetKind;
use crate::validators::{AssetValidator, ValidatorSpec};

/// Opaque importer settings blob, tagged with the asset kind it belongs to.
///
/// The engine never looks inside `values`; it only compares whole blobs and
/// copies them onto importers of the same kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    pub kind: AssetKind,
    #[serde(default)]
    pub values: toml::Table,
}

impl ImportSettings {
    pub fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            values: toml::Table::new(),
        }
    }

    pub fn with_value(mut self, key: &str, value: impl Into<toml::Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.values.get(key)
    }
}

/// On-disk shape of a template, stored in the folder's reserved file.
///
/// ```toml
/// include_subfolders = true
/// exclude = ["Assets/Art/old.png"]
///
/// [payload]
/// kind = "texture"
///
/// [[validators]]
/// rule = "power_of_two"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateFile {
    #[serde(default)]
    pub include_subfolders: bool,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub payload: ImportSettings,
    #[serde(default)]
    pub validators: Vec<ValidatorSpec>,
}

/// A folder's import configuration template.
///
/// The owning folder is not persisted; it is implied by where the template
/// file lives. The kind is fixed by the payload at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    folder: FolderPath,
    include_subfolders: bool,
    exclude: Vec<AssetPath>,
    payload: ImportSettings,
    validators: Vec<ValidatorSpec>,
    dirty: bool,
}

impl Template {
    pub fn new(folder: FolderPath, payload: ImportSettings) -> Self {
        Self {
            folder,
            include_subfolders: false,
            exclude: Vec::new(),
            payload,
            validators: Vec::new(),
            dirty: true,
        }
    }

    /// Rebuild a template from its persisted form.
    ///
    /// Blank or malformed exclude entries are dropped and leave the template
    /// dirty so the cleaned list gets written back.
    pub fn from_file(folder: FolderPath, file: TemplateFile) -> Self {
        let raw_len = file.exclude.len();
        let mut template = Self {
            folder,
            include_subfolders: file.include_subfolders,
            exclude: Vec::with_capacity(raw_len),
            payload: file.payload,
            validators: file.validators,
            dirty: false,
        };

        for entry in file.exclude {
            match AssetPath::new(&entry) {
                Some(path) if !template.exclude.contains(&path) => template.exclude.push(path),
                _ => {}
            }
        }

        if template.exclude.len() != raw_len {
            debug!(
                folder = %template.folder,
                dropped = raw_len - template.exclude.len(),
                "dropped blank or duplicate exclude entries on load"
            );
            template.dirty = true;
        }

        template
    }

    pub fn to_file(&self) -> TemplateFile {
        TemplateFile {
            include_subfolders: self.include_subfolders,
            exclude: self.exclude.iter().map(|p| p.as_str().to_string()).collect(),
            payload: self.payload.clone(),
            validators: self.validators.clone(),
        }
    }

    pub fn from_toml_str(folder: FolderPath, text: &str) -> Result<Self> {
        let file: TemplateFile = toml::from_str(text)?;
        Ok(Self::from_file(folder, file))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(&self.to_file())?)
    }

    pub fn folder(&self) -> &FolderPath {
        &self.folder
    }

    pub fn kind(&self) -> AssetKind {
        self.payload.kind
    }

    pub fn include_subfolders(&self) -> bool {
        self.include_subfolders
    }

    pub fn set_include_subfolders(&mut self, include: bool) {
        if self.include_subfolders != include {
            self.include_subfolders = include;
            self.dirty = true;
        }
    }

    pub fn payload(&self) -> &ImportSettings {
        &self.payload
    }

    /// Replace the payload. A payload of another kind is refused, since the
    /// kind a template governs never changes after creation.
    pub fn set_payload(&mut self, payload: ImportSettings) -> bool {
        if payload.kind != self.payload.kind {
            return false;
        }
        if payload != self.payload {
            self.payload = payload;
            self.dirty = true;
        }
        true
    }

    pub fn validators(&self) -> &[ValidatorSpec] {
        &self.validators
    }

    pub fn push_validator(&mut self, spec: ValidatorSpec) {
        self.validators.push(spec);
        self.dirty = true;
    }

    pub fn set_validators(&mut self, specs: Vec<ValidatorSpec>) {
        if specs != self.validators {
            self.validators = specs;
            self.dirty = true;
        }
    }

    /// Instantiate the validator chain in declaration order.
    pub fn validator_chain(&self) -> Vec<Box<dyn AssetValidator>> {
        self.validators.iter().map(ValidatorSpec::build).collect()
    }

    pub fn excluded(&self) -> &[AssetPath] {
        &self.exclude
    }

    pub fn is_excluded(&self, path: &AssetPath) -> bool {
        self.exclude.contains(path)
    }

    /// Opt an asset out. Returns `false` if it was already excluded.
    pub fn exclude(&mut self, path: AssetPath) -> bool {
        if self.exclude.contains(&path) {
            return false;
        }
        self.exclude.push(path);
        self.dirty = true;
        true
    }

    /// Opt an asset back in. Returns `false` if it was not excluded.
    pub fn include(&mut self, path: &AssetPath) -> bool {
        let before = self.exclude.len();
        self.exclude.retain(|p| p != path);
        let removed = self.exclude.len() != before;
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Keep only the exclude entries accepted by `keep`, collapsing
    /// duplicates. Returns how many entries were removed; the template is
    /// marked dirty only when that count is non-zero.
    pub fn retain_excluded(&mut self, mut keep: impl FnMut(&AssetPath) -> bool) -> usize {
        let before = self.exclude.len();
        let mut kept: Vec<AssetPath> = Vec::with_capacity(before);
        for path in self.exclude.drain(..) {
            if keep(&path) && !kept.contains(&path) {
                kept.push(path);
            }
        }
        self.exclude = kept;

        let removed = before - self.exclude.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
