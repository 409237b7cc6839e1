// tests/fs_host.rs

mod common;
use crate::common::{asset, folder, init_tracing};

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use folderflow::config::{load_and_validate, load_or_default, ConfigFile};
use folderflow::engine::{ChangeBatch, FlowEngine, RuntimeOptions};
use folderflow::errors::FlowError;
use folderflow::fs::RealFileSystem;
use folderflow::storage::{AssetStorage, FsStorage};
use folderflow::types::AssetKind;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const ART_TEMPLATE: &str = r#"
include_subfolders = true
exclude = ["/Art/gone.png"]

[payload]
kind = "texture"

[payload.values]
max_size = 256

[[validators]]
rule = "name_pattern"
pattern = "^tex_"
"#;

fn write(root: &Path, rel: &str, contents: &[u8]) -> std::io::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

fn project() -> Result<TempDir, Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "Art/__folder_setting__.toml", ART_TEMPLATE.as_bytes())?;
    write(dir.path(), "Art/tex_a.png", b"not really a png")?;
    write(dir.path(), "Art/Ui/b.png", b"not really a png")?;
    write(dir.path(), "Art/notes.txt", b"hello")?;
    Ok(dir)
}

#[test]
fn once_pass_writes_sidecars_and_prunes() -> TestResult {
    init_tracing();
    let dir = project()?;
    let storage = FsStorage::new(RealFileSystem, dir.path(), &ConfigFile::default())?;
    let mut engine = FlowEngine::new(storage, RuntimeOptions::default());

    let report = engine.process_all();
    assert_eq!(report.templates(), vec![&folder("/Art")]);
    let processed = &report.reports[0];
    assert_eq!(processed.managed, 2);
    assert_eq!(processed.pruned, 1);
    // b.png does not match ^tex_
    assert_eq!(processed.diagnostics.len(), 1);
    assert_eq!(processed.diagnostics[0].asset, asset("/Art/Ui/b.png"));

    // Nothing is persisted before the idle flush.
    assert!(!dir.path().join("Art/tex_a.png.import.toml").exists());
    let flushed = engine.flush();
    assert_eq!(flushed.reimport.reimported.len(), 2);

    let sidecar = fs::read_to_string(dir.path().join("Art/tex_a.png.import.toml"))?;
    assert!(sidecar.contains("max_size = 256"));
    let template = fs::read_to_string(dir.path().join("Art/__folder_setting__.toml"))?;
    assert!(!template.contains("gone.png"));

    // Sidecar and template writes come back as changes; they settle.
    let echo = ChangeBatch::new()
        .with_added("/Art/tex_a.png.import.toml")
        .with_changed("/Art/__folder_setting__.toml");
    let report = engine.handle_changes(&echo);
    assert!(report.reports.iter().all(|r| r.applied.changed.is_empty()));
    assert!(engine.flush().reimport.is_empty());
    Ok(())
}

#[test]
fn sidecars_are_not_assets() -> TestResult {
    init_tracing();
    let dir = project()?;
    write(dir.path(), "Art/tex_a.png.import.toml", b"kind = \"texture\"\n")?;
    let storage = FsStorage::new(RealFileSystem, dir.path(), &ConfigFile::default())?;

    assert_eq!(storage.classify(&asset("/Art/tex_a.png.import.toml")), None);
    assert_eq!(storage.classify(&asset("/Art/tex_a.png")), Some(AssetKind::Texture));
    let settings = storage.importer_settings(&asset("/Art/tex_a.png")).unwrap();
    assert!(settings.values.is_empty());
    Ok(())
}

#[test]
fn unreadable_template_is_ignored() -> TestResult {
    init_tracing();
    let dir = project()?;
    write(dir.path(), "Art/__folder_setting__.toml", b"this is = = not toml")?;
    let storage = FsStorage::new(RealFileSystem, dir.path(), &ConfigFile::default())?;
    let mut engine = FlowEngine::new(storage, RuntimeOptions::default());

    assert!(engine.process_all().reports.is_empty());
    // The slot is still occupied, so creation is refused.
    let err = engine.create_template_for(&asset("/Art/tex_a.png")).unwrap_err();
    assert!(matches!(err, FlowError::AlreadyExists { .. }));
    Ok(())
}

#[test]
fn pre_import_settings_reach_disk() -> TestResult {
    init_tracing();
    let dir = project()?;
    let storage = FsStorage::new(RealFileSystem, dir.path(), &ConfigFile::default())?;
    let mut engine = FlowEngine::new(storage, RuntimeOptions::default());
    let a = asset("/Art/tex_a.png");

    assert!(engine.pre_import(&a));
    assert!(engine.post_import().is_empty());
    let sidecar = fs::read_to_string(dir.path().join("Art/tex_a.png.import.toml"))?;
    assert!(sidecar.contains("max_size = 256"));

    // A later full pass finds the asset already conforming.
    let report = engine.process_template(&folder("/Art")).unwrap();
    assert!(!report.applied.changed.contains(&a));
    engine.flush();
    assert!(dir.path().join("Art/tex_a.png.import.toml").exists());
    Ok(())
}

#[test]
fn folder_moved_into_governed_tree_is_applied() -> TestResult {
    init_tracing();
    let dir = project()?;
    write(dir.path(), "Loose/tex_c.png", b"not really a png")?;
    let storage = FsStorage::new(RealFileSystem, dir.path(), &ConfigFile::default())?;
    let mut engine = FlowEngine::new(storage, RuntimeOptions::default());
    engine.process_all();
    engine.flush();
    assert!(!dir.path().join("Loose/tex_c.png.import.toml").exists());

    fs::rename(dir.path().join("Loose"), dir.path().join("Art/Loose"))?;
    let batch = ChangeBatch::new().with_moved("/Loose", "/Art/Loose");
    let report = engine.handle_changes(&batch);
    assert_eq!(report.templates(), vec![&folder("/Art")]);
    assert!(report.reports[0]
        .applied
        .changed
        .contains(&asset("/Art/Loose/tex_c.png")));

    engine.flush();
    let sidecar = fs::read_to_string(dir.path().join("Art/Loose/tex_c.png.import.toml"))?;
    assert!(sidecar.contains("max_size = 256"));
    Ok(())
}

#[test]
fn missing_config_falls_back_to_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cfg = load_or_default(dir.path().join("Folderflow.toml"))?;
    assert_eq!(cfg.config().template_file_name, "__folder_setting__.toml");
    assert!(load_and_validate(dir.path().join("Folderflow.toml")).is_err());
    Ok(())
}

#[test]
fn custom_config_is_honoured() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    write(
        dir.path(),
        "Folderflow.toml",
        br#"
[config]
template_file_name = "folder.flow"
import_sidecar_suffix = ".meta"

[kinds]
texture = ["*.dds"]
"#,
    )?;
    write(
        dir.path(),
        "Tex/folder.flow",
        b"[payload]\nkind = \"texture\"\n[payload.values]\nmips = true\n",
    )?;
    write(dir.path(), "Tex/a.dds", b"dds")?;
    write(dir.path(), "Tex/b.png", b"png")?;

    let cfg = load_and_validate(dir.path().join("Folderflow.toml"))?;
    let storage = FsStorage::new(RealFileSystem, dir.path(), &cfg)?;
    let mut engine = FlowEngine::new(storage, RuntimeOptions::default());

    let report = engine.process_all();
    assert_eq!(report.reports.len(), 1);
    assert_eq!(report.reports[0].managed, 1);
    engine.flush();
    assert!(dir.path().join("Tex/a.dds.meta").exists());
    assert!(!dir.path().join("Tex/b.png.meta").exists());
    Ok(())
}

#[test]
fn invalid_configs_are_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cases: [&[u8]; 4] = [
        b"[config]\ntemplate_file_name = \"\"\n",
        b"[config]\ntemplate_file_name = \"a/b.toml\"\n",
        b"[config]\ntemplate_file_name = \"settings.png\"\n",
        b"[kinds]\ntexture = [\"[unclosed\"]\n",
    ];
    for (i, contents) in cases.iter().enumerate() {
        let name = format!("case{i}.toml");
        write(dir.path(), &name, contents)?;
        let result = load_and_validate(dir.path().join(&name));
        assert!(
            matches!(result, Err(FlowError::ConfigError(_))),
            "case {i} should fail validation, got {result:?}"
        );
    }
    Ok(())
}
