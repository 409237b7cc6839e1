// src/tree/resolver.rs

//! Nearest-ancestor template resolution.
//!
//! Starting in the asset's own folder, walk upward one folder at a time:
//!
//! - no template here: keep going;
//! - a template of another kind: stop, the asset is ungoverned;
//! - a template of the asset's kind that applies: that is the answer;
//! - a template of the asset's kind that does not apply (it does not
//!   include subfolders, or a nearer same-kind template claims the
//!   subtree): keep going.

use tracing::debug;

use super::traverse::{walk_up, Step};
use crate::path::{AssetPath, FolderPath};
use crate::template::{Template, TemplateStore};
use crate::types::AssetKind;

/// Find the template governing `asset`, using the storage's path-based kind
/// lookup. Unrecognized files resolve to `None`.
pub fn resolve(store: &TemplateStore<'_>, asset: &AssetPath) -> Option<Template> {
    let kind = store.storage().classify(asset)?;
    resolve_kind(store, asset, kind)
}

/// Like [`resolve`] with the kind supplied by the caller.
pub fn resolve_kind(store: &TemplateStore<'_>, asset: &AssetPath, kind: AssetKind) -> Option<Template> {
    let start = asset.folder()?;

    walk_up(&start, |folder| {
        let Some(template) = store.template_in_folder(folder) else {
            return Step::Continue;
        };
        if template.kind() != kind {
            debug!(
                asset = %asset,
                folder = %folder,
                template_kind = %template.kind(),
                "nearer template of another kind blocks resolution"
            );
            return Step::Stop;
        }
        if governs_folder(store, &template, &start) {
            Step::Found(template)
        } else {
            debug!(asset = %asset, folder = %folder, "same-kind template does not reach asset");
            Step::Continue
        }
    })
}

/// Whether `template` reaches assets of its kind that live directly in
/// `folder`.
///
/// True for the template's own folder. For a descendant folder, the template
/// must include subfolders and no folder from `folder` up to (but not
/// including) the template's folder may hold another template of the same
/// kind.
pub fn governs_folder(store: &TemplateStore<'_>, template: &Template, folder: &FolderPath) -> bool {
    let home = template.folder();
    if !home.is_ancestor_of(folder) {
        return false;
    }
    if folder == home {
        return true;
    }
    if !template.include_subfolders() {
        return false;
    }

    let mut current = Some(folder.clone());
    while let Some(f) = current {
        if &f == home {
            break;
        }
        if store.has_template_of_kind(&f, template.kind()) {
            return false;
        }
        current = f.parent();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::template::ImportSettings;

    fn f(s: &str) -> FolderPath {
        FolderPath::new(s).unwrap()
    }

    fn p(s: &str) -> AssetPath {
        AssetPath::new(s).unwrap()
    }

    fn template(folder: &str, kind: AssetKind, include_subfolders: bool) -> Template {
        let mut t = Template::new(f(folder), ImportSettings::new(kind));
        t.set_include_subfolders(include_subfolders);
        t
    }

    #[test]
    fn own_folder_template_applies_without_subfolders() {
        let mut s = MemoryStorage::new();
        s.add_asset(&p("Assets/Art/a.png"));
        s.put_template(template("Assets/Art", AssetKind::Texture, false));

        let store = TemplateStore::new(&s);
        let found = resolve(&store, &p("Assets/Art/a.png")).unwrap();
        assert_eq!(found.folder(), &f("Assets/Art"));
    }

    #[test]
    fn parent_without_subfolders_does_not_reach() {
        let mut s = MemoryStorage::new();
        s.add_asset(&p("Assets/Art/Ui/a.png"));
        s.put_template(template("Assets/Art", AssetKind::Texture, false));

        let store = TemplateStore::new(&s);
        assert!(resolve(&store, &p("Assets/Art/Ui/a.png")).is_none());
    }

    #[test]
    fn unrecognized_files_never_resolve() {
        let mut s = MemoryStorage::new();
        s.add_asset(&p("Assets/readme.txt"));
        s.put_template(template("Assets", AssetKind::Texture, true));

        let store = TemplateStore::new(&s);
        assert!(resolve(&store, &p("Assets/readme.txt")).is_none());
    }

    #[test]
    fn wrong_kind_template_in_own_folder_blocks() {
        let mut s = MemoryStorage::new();
        s.put_template(template("Assets", AssetKind::Texture, true));
        s.put_template(template("Assets/Sfx", AssetKind::Audio, false));

        let store = TemplateStore::new(&s);
        assert!(resolve_kind(&store, &p("Assets/Sfx/a.png"), AssetKind::Texture).is_none());
    }

    #[test]
    fn governs_folder_respects_nested_claim() {
        let mut s = MemoryStorage::new();
        let outer = template("Assets", AssetKind::Texture, true);
        s.put_template(outer.clone());
        s.put_template(template("Assets/Art", AssetKind::Texture, false));

        let store = TemplateStore::new(&s);
        assert!(governs_folder(&store, &outer, &f("Assets")));
        assert!(governs_folder(&store, &outer, &f("Assets/Audio")));
        assert!(!governs_folder(&store, &outer, &f("Assets/Art")));
        assert!(!governs_folder(&store, &outer, &f("Assets/Art/Ui")));
        assert!(!governs_folder(&store, &outer, &f("Other")));
    }
}
