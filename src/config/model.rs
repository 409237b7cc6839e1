// src/config/model.rs

use serde::Deserialize;

use crate::types::AssetKind;

/// Default reserved file name holding a folder's template.
pub const DEFAULT_TEMPLATE_FILE_NAME: &str = "__folder_setting__.toml";

/// Default suffix of the per-asset importer state file.
pub const DEFAULT_IMPORT_SIDECAR_SUFFIX: &str = ".import.toml";

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// template_file_name = "__folder_setting__.toml"
/// import_sidecar_suffix = ".import.toml"
///
/// [kinds]
/// texture = ["*.png", "*.jpg"]
/// model = ["*.fbx"]
/// audio = ["*.wav"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub kinds: KindsSection,
}

/// Validated configuration. Construct via `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    config: ConfigSection,
    kinds: KindsSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, kinds: KindsSection) -> Self {
        Self { config, kinds }
    }

    pub fn config(&self) -> &ConfigSection {
        &self.config
    }

    pub fn kinds(&self) -> &KindsSection {
        &self.kinds
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(ConfigSection::default(), KindsSection::default())
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Reserved file name that marks a folder's template.
    #[serde(default = "default_template_file_name")]
    pub template_file_name: String,

    /// Suffix appended to an asset's file name for its importer state file.
    #[serde(default = "default_import_sidecar_suffix")]
    pub import_sidecar_suffix: String,
}

fn default_template_file_name() -> String {
    DEFAULT_TEMPLATE_FILE_NAME.to_string()
}

fn default_import_sidecar_suffix() -> String {
    DEFAULT_IMPORT_SIDECAR_SUFFIX.to_string()
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            template_file_name: default_template_file_name(),
            import_sidecar_suffix: default_import_sidecar_suffix(),
        }
    }
}

/// `[kinds]` section: glob patterns that classify files into asset kinds.
///
/// Patterns are matched case-insensitively against the normalized asset
/// path; `*` crosses folder boundaries.
#[derive(Debug, Clone, Deserialize)]
pub struct KindsSection {
    #[serde(default = "default_texture_patterns")]
    pub texture: Vec<String>,

    #[serde(default = "default_model_patterns")]
    pub model: Vec<String>,

    #[serde(default = "default_audio_patterns")]
    pub audio: Vec<String>,
}

impl KindsSection {
    pub fn patterns(&self, kind: AssetKind) -> &[String] {
        match kind {
            AssetKind::Texture => &self.texture,
            AssetKind::Model => &self.model,
            AssetKind::Audio => &self.audio,
        }
    }
}

fn owned(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.to_string()).collect()
}

fn default_texture_patterns() -> Vec<String> {
    owned(&["*.png", "*.jpg", "*.jpeg", "*.tga", "*.psd", "*.bmp"])
}

fn default_model_patterns() -> Vec<String> {
    owned(&["*.fbx", "*.obj", "*.gltf", "*.glb", "*.blend"])
}

fn default_audio_patterns() -> Vec<String> {
    owned(&["*.wav", "*.mp3", "*.ogg", "*.aiff"])
}

impl Default for KindsSection {
    fn default() -> Self {
        Self {
            texture: default_texture_patterns(),
            model: default_model_patterns(),
            audio: default_audio_patterns(),
        }
    }
}
