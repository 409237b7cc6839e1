// src/path.rs

//! Normalized hierarchical paths.
//!
//! Every path that enters the engine goes through [`normalize`] first:
//! backslashes become forward slashes, repeated separators and `.` segments
//! are dropped and trailing slashes are removed. All prefix comparisons work
//! on that normalized form, so `Assets\Art\` and `Assets//Art` are the same
//! folder.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalize a raw path string.
///
/// Returns `None` for empty or blank input. An absolute path keeps its leading
/// slash, and the bare root normalizes to `/`.
pub fn normalize(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    let unified = raw.replace('\\', "/");
    let absolute = unified.starts_with('/');
    let segments: Vec<&str> = unified
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    match (segments.is_empty(), absolute) {
        (true, true) => Some("/".to_string()),
        (true, false) => None,
        (false, true) => Some(format!("/{}", segments.join("/"))),
        (false, false) => Some(segments.join("/")),
    }
}

/// True iff `path` equals `folder` or lies somewhere beneath it.
///
/// Both sides are normalized first; malformed input is simply "no match".
pub fn is_under(path: &str, folder: &str) -> bool {
    let (Some(path), Some(folder)) = (normalize(path), normalize(folder)) else {
        return false;
    };
    is_under_normalized(&path, &folder)
}

fn is_under_normalized(path: &str, folder: &str) -> bool {
    if folder == "/" {
        return path.starts_with('/');
    }
    path == folder
        || (path.len() > folder.len()
            && path.starts_with(folder)
            && path.as_bytes()[folder.len()] == b'/')
}

fn parent_str(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/"),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

/// A normalized folder path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FolderPath(String);

impl FolderPath {
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        normalize(raw.as_ref()).map(FolderPath)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parent folder, or `None` at the root of the tree.
    pub fn parent(&self) -> Option<FolderPath> {
        parent_str(&self.0).map(|p| FolderPath(p.to_string()))
    }

    /// Inclusive ancestor test: a folder is an ancestor of itself.
    pub fn is_ancestor_of(&self, other: &FolderPath) -> bool {
        is_under_normalized(&other.0, &self.0)
    }

    /// True iff the asset lives in this folder or any folder below it.
    pub fn contains(&self, asset: &AssetPath) -> bool {
        is_under_normalized(&asset.0, &self.0)
    }

    /// Last segment of the folder path (empty for `/`).
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    pub fn join(&self, name: &str) -> Option<FolderPath> {
        FolderPath::new(self.joined(name))
    }

    pub fn child(&self, file_name: &str) -> Option<AssetPath> {
        AssetPath::new(self.joined(file_name))
    }

    fn joined(&self, name: &str) -> String {
        if self.0 == "/" {
            format!("/{name}")
        } else {
            format!("{}/{name}", self.0)
        }
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FolderPath {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        FolderPath::new(&raw).ok_or_else(|| format!("invalid folder path: {raw:?}"))
    }
}

impl From<FolderPath> for String {
    fn from(p: FolderPath) -> Self {
        p.0
    }
}

/// A normalized path to a leaf item (an asset or a template slot).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetPath(String);

impl AssetPath {
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        normalize(raw.as_ref())
            .filter(|p| p != "/")
            .map(AssetPath)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Containing folder, or `None` for a bare file name.
    pub fn folder(&self) -> Option<FolderPath> {
        parent_str(&self.0).map(|p| FolderPath(p.to_string()))
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// File name without its final extension.
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }

    pub fn is_under(&self, folder: &FolderPath) -> bool {
        folder.contains(self)
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AssetPath {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        AssetPath::new(&raw).ok_or_else(|| format!("invalid asset path: {raw:?}"))
    }
}

impl From<AssetPath> for String {
    fn from(p: AssetPath) -> Self {
        p.0
    }
}
