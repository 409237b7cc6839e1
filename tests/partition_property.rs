// tests/partition_property.rs

use std::collections::BTreeSet;

use proptest::prelude::*;

use folderflow::path::{AssetPath, FolderPath};
use folderflow::storage::{AssetStorage, MemoryStorage};
use folderflow::template::{ImportSettings, Template, TemplateStore};
use folderflow::tree::{affected_set, resolve};
use folderflow::types::AssetKind;

const FOLDERS: [&str; 7] = ["A", "A/B", "A/B/C", "A/B/C/D", "A/E", "A/E/F", "G"];
const EXTENSIONS: [&str; 4] = ["png", "fbx", "wav", "txt"];

// Strategy for a random tree: (folder, kind, include_subfolders) templates
// and (folder, extension, name) assets, all as indices into the pools above.
fn tree_strategy() -> impl Strategy<Value = MemoryStorage> {
    let templates = proptest::collection::vec(
        (0..FOLDERS.len(), 0..AssetKind::ALL.len(), any::<bool>()),
        0..6,
    );
    let assets = proptest::collection::vec(
        (0..FOLDERS.len(), 0..EXTENSIONS.len(), 0..3usize),
        0..20,
    );

    (templates, assets).prop_map(|(templates, assets)| {
        let mut storage = MemoryStorage::new();
        for (folder_idx, ext_idx, name_idx) in assets {
            let path = format!("{}/asset{}.{}", FOLDERS[folder_idx], name_idx, EXTENSIONS[ext_idx]);
            storage.add_asset(&AssetPath::new(path).unwrap());
        }
        // A later template in the same folder replaces the earlier one.
        for (folder_idx, kind_idx, subfolders) in templates {
            let mut t = Template::new(
                FolderPath::new(FOLDERS[folder_idx]).unwrap(),
                ImportSettings::new(AssetKind::ALL[kind_idx]),
            );
            t.set_include_subfolders(subfolders);
            storage.put_template(t);
        }
        storage
    })
}

proptest! {
    #[test]
    fn same_kind_affected_sets_never_overlap(storage in tree_strategy()) {
        let store = TemplateStore::new(&storage);
        let templates = store.all_templates();

        for (i, outer) in templates.iter().enumerate() {
            for inner in templates.iter().skip(i + 1) {
                if outer.kind() != inner.kind() {
                    continue;
                }
                let a = affected_set(&store, outer);
                let b = affected_set(&store, inner);
                prop_assert!(
                    a.is_disjoint(&b),
                    "{} and {} overlap",
                    outer.folder(),
                    inner.folder()
                );
            }
        }
    }

    #[test]
    fn resolved_template_contains_the_asset(storage in tree_strategy()) {
        let store = TemplateStore::new(&storage);
        let mut folders: BTreeSet<FolderPath> = BTreeSet::new();
        for f in FOLDERS {
            folders.insert(FolderPath::new(f).unwrap());
        }

        for folder in &folders {
            for file in storage_files(&store, folder) {
                if let Some(template) = resolve(&store, &file) {
                    let members = affected_set(&store, &template);
                    prop_assert!(
                        members.iter().any(|m| m.path == file),
                        "{} resolves to {} but is not in its affected set",
                        file,
                        template.folder()
                    );
                }
            }
        }
    }
}

fn storage_files(store: &TemplateStore<'_>, folder: &FolderPath) -> Vec<AssetPath> {
    store
        .storage()
        .list_folder(folder)
        .files
        .into_iter()
        .filter(|f| !store.is_template_slot(f))
        .collect()
}
