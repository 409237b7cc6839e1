// src/storage/kinds.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::warn;

use crate::config::KindsSection;
use crate::path::AssetPath;
use crate::types::AssetKind;

/// Compiled glob patterns that map asset paths to their [`AssetKind`].
///
/// Classification is purely path-based, so it also works for paths that no
/// longer exist (deleted assets, move sources).
#[derive(Clone)]
pub struct KindMatcher {
    sets: Vec<(AssetKind, GlobSet)>,
}

impl fmt::Debug for KindMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<AssetKind> = self.sets.iter().map(|(k, _)| *k).collect();
        f.debug_struct("KindMatcher")
            .field("kinds", &kinds)
            .finish_non_exhaustive()
    }
}

impl KindMatcher {
    pub fn new(section: &KindsSection) -> Result<Self> {
        let mut sets = Vec::with_capacity(AssetKind::ALL.len());
        for kind in AssetKind::ALL {
            let set = build_globset(section.patterns(kind))
                .with_context(|| format!("building globset for kind {kind}"))?;
            sets.push((kind, set));
        }
        Ok(Self { sets })
    }

    /// First kind whose patterns match the path. Kinds are tried in the
    /// order texture, model, audio.
    pub fn classify(&self, path: &AssetPath) -> Option<AssetKind> {
        self.sets
            .iter()
            .find(|(_, set)| set.is_match(path.as_str()))
            .map(|(kind, _)| *kind)
    }
}

impl Default for KindMatcher {
    fn default() -> Self {
        Self::new(&KindsSection::default()).unwrap_or_else(|err| {
            warn!("default kind patterns failed to compile: {err:#}");
            Self { sets: Vec::new() }
        })
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(path: &str) -> Option<AssetKind> {
        KindMatcher::default().classify(&AssetPath::new(path).unwrap())
    }

    #[test]
    fn default_patterns_cover_three_kinds() {
        assert_eq!(classify("Assets/Art/Ui/box.PNG"), Some(AssetKind::Texture));
        assert_eq!(classify("/Models/hero.fbx"), Some(AssetKind::Model));
        assert_eq!(classify("Assets/Sfx/hit.wav"), Some(AssetKind::Audio));
        assert_eq!(classify("Assets/readme.txt"), None);
        assert_eq!(classify("Assets/box.png.import.toml"), None);
    }

    #[test]
    fn custom_patterns_replace_defaults() {
        let section = KindsSection {
            texture: vec!["**/textures/*.dds".to_string()],
            model: vec![],
            audio: vec![],
        };
        let m = KindMatcher::new(&section).unwrap();
        assert_eq!(
            m.classify(&AssetPath::new("Assets/textures/a.dds").unwrap()),
            Some(AssetKind::Texture)
        );
        assert_eq!(m.classify(&AssetPath::new("Assets/a.png").unwrap()), None);
    }
}
