use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::path::AssetPath;

/// Kind of content item that can be governed by a folder template.
///
/// Only these three kinds participate; every other file in the tree is
/// invisible to resolution, propagation and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Texture,
    Model,
    Audio,
}

impl AssetKind {
    pub const ALL: [AssetKind; 3] = [AssetKind::Texture, AssetKind::Model, AssetKind::Audio];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Texture => "texture",
            AssetKind::Model => "model",
            AssetKind::Audio => "audio",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "texture" => Ok(AssetKind::Texture),
            "model" => Ok(AssetKind::Model),
            "audio" => Ok(AssetKind::Audio),
            other => Err(format!(
                "invalid asset kind: {other} (expected \"texture\", \"model\" or \"audio\")"
            )),
        }
    }
}

/// A content item as seen by the engine: where it lives and what it is.
///
/// Ordered by path first so sets of refs iterate in tree order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetRef {
    pub path: AssetPath,
    pub kind: AssetKind,
}

impl AssetRef {
    pub fn new(path: AssetPath, kind: AssetKind) -> Self {
        Self { path, kind }
    }
}

/// Observable facts about an asset that validators can inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetInfo {
    pub path: AssetPath,
    pub kind: AssetKind,
    /// File name without extension.
    pub name: String,
    /// Pixel dimensions (width, height), when the asset has any.
    pub dimensions: Option<(u32, u32)>,
}

impl AssetInfo {
    pub fn new(path: AssetPath, kind: AssetKind) -> Self {
        let name = path.stem().to_string();
        Self {
            path,
            kind,
            name,
            dimensions: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }
}
