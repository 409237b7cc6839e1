// tests/resolution.rs

mod common;
use crate::common::{asset, folder, init_tracing, TemplateBuilder, TreeBuilder};

use folderflow::engine::{FlowEngine, Governance, RuntimeOptions};
use folderflow::template::TemplateStore;
use folderflow::tree::{affected_set, resolve};

#[test]
fn nearest_same_kind_template_wins() {
    init_tracing();
    let storage = TreeBuilder::new()
        .asset("Assets/F/G/a.png")
        .template(TemplateBuilder::texture("Assets/F").subfolders())
        .template(TemplateBuilder::texture("Assets/F/G"))
        .build();
    let store = TemplateStore::new(&storage);

    let governing = resolve(&store, &asset("Assets/F/G/a.png")).unwrap();
    assert_eq!(governing.folder(), &folder("Assets/F/G"));
}

#[test]
fn nearer_wrong_kind_template_blocks_ascent() {
    init_tracing();
    let storage = TreeBuilder::new()
        .asset("Assets/F/G/H/a.png")
        .template(TemplateBuilder::texture("Assets/F").subfolders())
        .template(TemplateBuilder::audio("Assets/F/G").subfolders())
        .build();
    let store = TemplateStore::new(&storage);

    assert!(resolve(&store, &asset("Assets/F/G/H/a.png")).is_none());
}

#[test]
fn outer_template_reaches_through_empty_folders() {
    init_tracing();
    let storage = TreeBuilder::new()
        .asset("Assets/F/x/y/z/a.png")
        .template(TemplateBuilder::texture("Assets/F").subfolders())
        .build();
    let store = TemplateStore::new(&storage);

    let governing = resolve(&store, &asset("Assets/F/x/y/z/a.png")).unwrap();
    assert_eq!(governing.folder(), &folder("Assets/F"));
}

#[test]
fn nested_template_without_subfolders_leaves_a_gap() {
    init_tracing();
    // The nested template claims its subtree but only governs its own
    // folder, so Deep/ is governed by neither.
    let storage = TreeBuilder::new()
        .assets(&["Assets/a.png", "Assets/Art/b.png", "Assets/Art/Deep/c.png"])
        .template(TemplateBuilder::texture("Assets").subfolders())
        .template(TemplateBuilder::texture("Assets/Art"))
        .build();
    let store = TemplateStore::new(&storage);

    assert_eq!(
        resolve(&store, &asset("Assets/Art/b.png")).map(|t| t.folder().clone()),
        Some(folder("Assets/Art"))
    );
    assert!(resolve(&store, &asset("Assets/Art/Deep/c.png")).is_none());

    let outer = store.template_in_folder(&folder("Assets")).unwrap();
    let members: Vec<_> = affected_set(&store, &outer)
        .into_iter()
        .map(|a| a.path)
        .collect();
    assert_eq!(members, vec![asset("Assets/a.png")]);
}

#[test]
fn resolver_and_affected_set_agree() {
    init_tracing();
    let storage = TreeBuilder::new()
        .assets(&[
            "Assets/a.png",
            "Assets/m.fbx",
            "Assets/Art/b.png",
            "Assets/Art/Ui/c.png",
            "Props/d.fbx",
            "Props/Sub/e.fbx",
        ])
        .template(TemplateBuilder::texture("Assets").subfolders())
        .template(TemplateBuilder::texture("Assets/Art").subfolders())
        .template(TemplateBuilder::model("Props").subfolders())
        .build();
    let store = TemplateStore::new(&storage);

    let mut seen = 0;
    for template in store.all_templates() {
        for member in affected_set(&store, &template) {
            let governing = resolve(&store, &member.path).unwrap();
            assert_eq!(governing.folder(), template.folder(), "for {}", member.path);
            seen += 1;
        }
    }
    assert_eq!(seen, 5);
    assert!(resolve(&store, &asset("Assets/m.fbx")).is_none());
}

#[test]
fn other_kind_nested_template_only_blocks_the_upward_walk() {
    init_tracing();
    let storage = TreeBuilder::new()
        .asset("Assets/Sfx/a.png")
        .template(TemplateBuilder::texture("Assets").subfolders())
        .template(TemplateBuilder::audio("Assets/Sfx"))
        .build();
    let store = TemplateStore::new(&storage);

    let outer = store.template_in_folder(&folder("Assets")).unwrap();
    assert_eq!(affected_set(&store, &outer).len(), 1);
    assert!(resolve(&store, &asset("Assets/Sfx/a.png")).is_none());
}

#[test]
fn governance_reports_all_three_states() {
    init_tracing();
    let storage = TreeBuilder::new()
        .assets(&["Assets/Art/a.png", "Assets/Art/b.png", "Loose/c.png", "Loose/notes.txt"])
        .template(TemplateBuilder::texture("Assets/Art").exclude("Assets/Art/b.png"))
        .template(TemplateBuilder::audio("Loose"))
        .build();
    let engine = FlowEngine::new(storage, RuntimeOptions::default());

    assert_eq!(
        engine.governance(&asset("Assets/Art/a.png")),
        Some(Governance::Managed {
            template: folder("Assets/Art")
        })
    );
    assert_eq!(
        engine.governance(&asset("Assets/Art/b.png")),
        Some(Governance::Excluded {
            template: folder("Assets/Art")
        })
    );
    // Loose/ already holds an audio template, so no texture template can be
    // created there.
    assert_eq!(
        engine.governance(&asset("Loose/c.png")),
        Some(Governance::Ungoverned {
            can_create_template: false
        })
    );
    assert_eq!(engine.governance(&asset("Loose/notes.txt")), None);
}
