// src/tree/affected.rs

use std::collections::BTreeSet;

use tracing::debug;

use crate::template::{Template, TemplateStore};
use crate::types::AssetRef;

/// Every asset of the template's kind it could govern, before exclusions.
///
/// Assets directly in the template's folder are always members. With
/// `include_subfolders`, subfolders are searched too, except a subfolder
/// holding its own template of the same kind: that subtree belongs to the
/// nested template, even when the nested template does not include its own
/// subfolders. Templates of other kinds do not block the search.
pub fn affected_set(store: &TemplateStore<'_>, template: &Template) -> BTreeSet<AssetRef> {
    let storage = store.storage();
    let kind = template.kind();
    let mut members = BTreeSet::new();
    let mut stack = vec![template.folder().clone()];

    while let Some(folder) = stack.pop() {
        let listing = storage.list_folder(&folder);

        for file in listing.files {
            if store.is_template_slot(&file) {
                continue;
            }
            if storage.classify(&file) == Some(kind) {
                members.insert(AssetRef::new(file, kind));
            }
        }

        if !template.include_subfolders() {
            continue;
        }
        for sub in listing.folders {
            if store.has_template_of_kind(&sub, kind) {
                debug!(
                    template = %template.folder(),
                    claimed_by = %sub,
                    "subtree claimed by nested template"
                );
                continue;
            }
            stack.push(sub);
        }
    }

    members
}

/// The affected set minus the template's exclusions.
pub fn managed_set(template: &Template, affected: &BTreeSet<AssetRef>) -> BTreeSet<AssetRef> {
    affected
        .iter()
        .filter(|asset| !template.is_excluded(&asset.path))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{AssetPath, FolderPath};
    use crate::storage::MemoryStorage;
    use crate::template::ImportSettings;
    use crate::types::AssetKind;

    fn p(s: &str) -> AssetPath {
        AssetPath::new(s).unwrap()
    }

    fn template(folder: &str, kind: AssetKind, include_subfolders: bool) -> Template {
        let mut t = Template::new(FolderPath::new(folder).unwrap(), ImportSettings::new(kind));
        t.set_include_subfolders(include_subfolders);
        t
    }

    fn paths(set: &BTreeSet<AssetRef>) -> Vec<&str> {
        set.iter().map(|a| a.path.as_str()).collect()
    }

    #[test]
    fn only_same_kind_assets_in_own_folder() {
        let mut s = MemoryStorage::new();
        s.add_asset(&p("Assets/a.png"));
        s.add_asset(&p("Assets/b.wav"));
        s.add_asset(&p("Assets/Sub/c.png"));
        let t = template("Assets", AssetKind::Texture, false);
        s.put_template(t.clone());

        let store = TemplateStore::new(&s);
        assert_eq!(paths(&affected_set(&store, &t)), vec!["Assets/a.png"]);
    }

    #[test]
    fn nested_same_kind_template_claims_subtree() {
        let mut s = MemoryStorage::new();
        s.add_asset(&p("Assets/a.png"));
        s.add_asset(&p("Assets/Art/b.png"));
        s.add_asset(&p("Assets/Art/Deep/c.png"));
        s.add_asset(&p("Assets/Other/d.png"));
        let outer = template("Assets", AssetKind::Texture, true);
        s.put_template(outer.clone());
        s.put_template(template("Assets/Art", AssetKind::Texture, false));

        let store = TemplateStore::new(&s);
        assert_eq!(
            paths(&affected_set(&store, &outer)),
            vec!["Assets/Other/d.png", "Assets/a.png"]
        );
    }

    #[test]
    fn other_kind_template_does_not_block() {
        let mut s = MemoryStorage::new();
        s.add_asset(&p("Assets/Sfx/a.png"));
        let outer = template("Assets", AssetKind::Texture, true);
        s.put_template(outer.clone());
        s.put_template(template("Assets/Sfx", AssetKind::Audio, true));

        let store = TemplateStore::new(&s);
        assert_eq!(paths(&affected_set(&store, &outer)), vec!["Assets/Sfx/a.png"]);
    }

    #[test]
    fn managed_set_drops_excluded() {
        let mut s = MemoryStorage::new();
        s.add_asset(&p("Assets/a.png"));
        s.add_asset(&p("Assets/b.png"));
        let mut t = template("Assets", AssetKind::Texture, false);
        t.exclude(p("Assets/b.png"));
        s.put_template(t.clone());

        let store = TemplateStore::new(&s);
        let affected = affected_set(&store, &t);
        assert_eq!(affected.len(), 2);
        assert_eq!(paths(&managed_set(&t, &affected)), vec!["Assets/a.png"]);
    }
}
