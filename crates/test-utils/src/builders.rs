#![allow(dead_code)]

use folderflow::path::{AssetPath, FolderPath};
use folderflow::storage::MemoryStorage;
use folderflow::template::{ImportSettings, Template};
use folderflow::types::AssetKind;
use folderflow::validators::ValidatorSpec;

/// Builder for an in-memory asset tree.
///
/// ```ignore
/// let storage = TreeBuilder::new()
///     .texture("Assets/Art/a.png", 64, 64)
///     .template(TemplateBuilder::texture("Assets/Art").subfolders())
///     .build();
/// ```
pub struct TreeBuilder {
    storage: MemoryStorage,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            storage: MemoryStorage::new(),
        }
    }

    pub fn folder(mut self, path: &str) -> Self {
        self.storage.add_folder(&folder(path));
        self
    }

    /// Any file; its kind comes from the default glob patterns.
    pub fn asset(mut self, path: &str) -> Self {
        self.storage.add_asset(&asset(path));
        self
    }

    pub fn assets(mut self, paths: &[&str]) -> Self {
        for p in paths {
            self.storage.add_asset(&asset(p));
        }
        self
    }

    pub fn texture(mut self, path: &str, width: u32, height: u32) -> Self {
        self.storage.add_texture(&asset(path), width, height);
        self
    }

    pub fn importer(mut self, path: &str, settings: ImportSettings) -> Self {
        self.storage.set_importer(&asset(path), settings);
        self
    }

    pub fn template(mut self, template: TemplateBuilder) -> Self {
        self.storage.put_template(template.build());
        self
    }

    pub fn build(self) -> MemoryStorage {
        self.storage
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Template`.
pub struct TemplateBuilder {
    template: Template,
}

impl TemplateBuilder {
    pub fn new(folder_path: &str, kind: AssetKind) -> Self {
        Self {
            template: Template::new(folder(folder_path), ImportSettings::new(kind)),
        }
    }

    pub fn texture(folder_path: &str) -> Self {
        Self::new(folder_path, AssetKind::Texture)
    }

    pub fn model(folder_path: &str) -> Self {
        Self::new(folder_path, AssetKind::Model)
    }

    pub fn audio(folder_path: &str) -> Self {
        Self::new(folder_path, AssetKind::Audio)
    }

    pub fn subfolders(mut self) -> Self {
        self.template.set_include_subfolders(true);
        self
    }

    pub fn setting(mut self, key: &str, value: impl Into<toml::Value>) -> Self {
        let payload = self.template.payload().clone().with_value(key, value);
        self.template.set_payload(payload);
        self
    }

    pub fn exclude(mut self, path: &str) -> Self {
        self.template.exclude(asset(path));
        self
    }

    pub fn validator(mut self, spec: ValidatorSpec) -> Self {
        self.template.push_validator(spec);
        self
    }

    pub fn name_pattern(self, pattern: &str) -> Self {
        self.validator(ValidatorSpec::NamePattern {
            pattern: pattern.to_string(),
        })
    }

    pub fn power_of_two(self) -> Self {
        self.validator(ValidatorSpec::PowerOfTwo)
    }

    pub fn build(self) -> Template {
        self.template
    }
}

pub fn folder(path: &str) -> FolderPath {
    FolderPath::new(path).unwrap_or_else(|| panic!("invalid folder path in test: {path:?}"))
}

pub fn asset(path: &str) -> AssetPath {
    AssetPath::new(path).unwrap_or_else(|| panic!("invalid asset path in test: {path:?}"))
}
