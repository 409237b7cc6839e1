// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod flow;
pub mod fs;
pub mod logging;
pub mod path;
pub mod storage;
pub mod template;
pub mod tree;
pub mod types;
pub mod validators;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_and_validate, load_or_default, ConfigFile};
use crate::engine::{FlowEngine, HostEvent, Runtime, RuntimeOptions};
use crate::fs::RealFileSystem;
use crate::storage::{AssetStorage, FsStorage};
use crate::template::TemplateStore;
use crate::tree::{affected_set, managed_set};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the directory-backed storage host
/// - the engine core and its async runtime
/// - (optional) file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let root = PathBuf::from(&args.root)
        .canonicalize()
        .with_context(|| format!("asset root {:?} is not accessible", args.root))?;
    let cfg = load_config(&root, args.config.as_deref())?;

    let storage = FsStorage::new(RealFileSystem, &root, &cfg)?;

    if args.dry_run {
        print_dry_run(&storage);
        return Ok(());
    }

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<HostEvent>(64);

    // Optional file watcher (disabled in --once mode).
    let _watcher_handle = if !args.once {
        Some(crate::watch::spawn_watcher(&root, rt_tx.clone())?)
    } else {
        None
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(HostEvent::Shutdown).await;
        });
    }

    // Bring every template up to date before reacting to changes.
    rt_tx.send(HostEvent::ProcessAll).await?;

    let options = RuntimeOptions {
        exit_when_idle: args.once,
    };
    let core = FlowEngine::new(storage, options);
    let runtime = Runtime::new(core, rt_rx);
    runtime.run().await;
    Ok(())
}

/// An explicit `--config` must exist; the default `Folderflow.toml` in the
/// asset root is optional.
fn load_config(root: &Path, explicit: Option<&str>) -> Result<ConfigFile> {
    let cfg = match explicit {
        Some(path) => load_and_validate(path)
            .with_context(|| format!("loading config {path:?}"))?,
        None => {
            let path = root.join(default_config_path());
            load_or_default(&path).with_context(|| format!("loading config {path:?}"))?
        }
    };
    info!(
        template_file_name = %cfg.config().template_file_name,
        sidecar_suffix = %cfg.config().import_sidecar_suffix,
        "configuration loaded"
    );
    Ok(cfg)
}

/// Print every template with its managed and excluded assets.
fn print_dry_run(storage: &dyn AssetStorage) {
    let store = TemplateStore::new(storage);
    let templates = store.all_templates();

    println!("folderflow dry-run");
    println!("  template file: {}", storage.template_file_name());
    println!();
    println!("templates ({}):", templates.len());

    for template in &templates {
        let affected = affected_set(&store, template);
        let managed = managed_set(template, &affected);

        println!("  - {} ({})", template.folder(), template.kind());
        println!("      include_subfolders: {}", template.include_subfolders());
        if !template.validators().is_empty() {
            println!("      validators: {}", template.validators().len());
        }
        for asset in &managed {
            println!("      managed: {}", asset.path);
        }
        for path in template.excluded() {
            let marker = if affected.iter().any(|a| &a.path == path) { "" } else { " (stale)" };
            println!("      excluded: {path}{marker}");
        }
    }

    debug!("dry-run complete (nothing written)");
}
