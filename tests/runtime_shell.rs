// tests/runtime_shell.rs

mod common;
use crate::common::{asset, folder, init_tracing, with_timeout, TemplateBuilder, TreeBuilder};

use tokio::sync::mpsc;

use folderflow::engine::{ChangeBatch, FlowEngine, HostEvent, Runtime, RuntimeOptions};
use folderflow::storage::{AssetStorage, MemoryStorage};
use folderflow::template::TemplateStore;

fn tree() -> MemoryStorage {
    TreeBuilder::new()
        .assets(&["Assets/Art/a.png", "Assets/Art/b.png"])
        .template(TemplateBuilder::texture("Assets/Art").setting("max_size", 128))
        .build()
}

#[tokio::test]
async fn once_mode_processes_flushes_and_exits() {
    init_tracing();
    let (tx, rx) = mpsc::channel(16);
    let core = FlowEngine::new(
        tree(),
        RuntimeOptions {
            exit_when_idle: true,
        },
    );

    tx.send(HostEvent::ProcessAll).await.unwrap();
    let engine = with_timeout(Runtime::new(core, rx).run()).await;

    assert_eq!(
        engine.storage().reimported(),
        &[asset("Assets/Art/a.png"), asset("Assets/Art/b.png")]
    );
    assert!(!engine.has_deferred_work());
}

#[tokio::test]
async fn queued_events_share_one_idle_flush() {
    init_tracing();
    let (tx, rx) = mpsc::channel(16);
    let core = FlowEngine::new(tree(), RuntimeOptions::default());

    // All sent before the runtime starts, so the first idle point comes
    // after the last of them.
    tx.send(HostEvent::ProcessAll).await.unwrap();
    tx.send(HostEvent::Changes(
        ChangeBatch::new().with_changed("Assets/Art/a.png"),
    ))
    .await
    .unwrap();
    tx.send(HostEvent::SetManaged {
        path: asset("Assets/Art/b.png"),
        managed: false,
    })
    .await
    .unwrap();
    drop(tx);

    let engine = with_timeout(Runtime::new(core, rx).run()).await;

    assert_eq!(
        engine.storage().reimported(),
        &[asset("Assets/Art/a.png"), asset("Assets/Art/b.png")]
    );
    let template = TemplateStore::new(engine.storage())
        .template_in_folder(&folder("Assets/Art"))
        .unwrap();
    assert!(template.is_excluded(&asset("Assets/Art/b.png")));
}

#[tokio::test]
async fn shutdown_still_flushes_pending_work() {
    init_tracing();
    let (tx, rx) = mpsc::channel(16);
    let core = FlowEngine::new(tree(), RuntimeOptions::default());

    tx.send(HostEvent::ProcessAll).await.unwrap();
    tx.send(HostEvent::Shutdown).await.unwrap();

    let engine = with_timeout(Runtime::new(core, rx).run()).await;
    assert_eq!(engine.storage().reimported().len(), 2);
    assert!(
        engine
            .storage()
            .importer_settings(&asset("Assets/Art/a.png"))
            .is_some_and(|s| s.get("max_size").is_some())
    );
}
