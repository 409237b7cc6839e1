// src/engine/core.rs

//! Pure core state machine.
//!
//! [`FlowEngine`] owns the storage collaborator, the reimport queue and the
//! bookkeeping that spans host callbacks. It consumes [`HostEvent`]s and
//! returns a [`CoreStep`]; it has no channels and no Tokio types, so it is
//! unit tested directly against `MemoryStorage`.
//!
//! The async shell (`engine::runtime::Runtime`) decides when the host is
//! idle and sends [`HostEvent::Idle`], which is the only point where
//! deferred work (template reprocessing requested from inspector actions,
//! and reimports) actually runs.

use std::collections::BTreeSet;

use tracing::{debug, error, info, warn};

use super::router::{route, ChangeBatch};
use super::{HostEvent, RuntimeOptions};
use crate::errors::{FlowError, Result};
use crate::flow::{
    apply_to_asset, apply_to_assets, prune_exclusions, validate_asset, validate_managed,
    ApplyOutcome, Diagnostic, FlushOutcome, ReimportQueue,
};
use crate::path::{AssetPath, FolderPath};
use crate::storage::AssetStorage;
use crate::template::{create_template, ImportSettings, Template, TemplateStore};
use crate::tree::{affected_set, managed_set, resolve};

/// How a single asset relates to the templates above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Governance {
    /// Governed and receiving the template's settings.
    Managed { template: FolderPath },
    /// Governed, but opted out.
    Excluded { template: FolderPath },
    /// No template governs the asset. A template can only be created when
    /// the asset's own folder holds none yet.
    Ungoverned { can_create_template: bool },
}

/// Result of reprocessing one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    pub template: FolderPath,
    pub affected: usize,
    pub managed: usize,
    pub pruned: usize,
    pub applied: ApplyOutcome,
    pub diagnostics: Vec<Diagnostic>,
}

/// Reports for every template reprocessed by one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub reports: Vec<ProcessReport>,
}

impl BatchReport {
    pub fn templates(&self) -> Vec<&FolderPath> {
        self.reports.iter().map(|r| &r.template).collect()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reports.iter().flat_map(|r| r.diagnostics.iter())
    }
}

/// What an idle flush did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub reprocessed: BatchReport,
    pub reimport: FlushOutcome,
}

/// Decision returned by the core after handling a single [`HostEvent`].
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Diagnostics produced while handling the event.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn running(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            keep_running: true,
        }
    }
}

#[derive(Debug)]
pub struct FlowEngine<S: AssetStorage> {
    storage: S,
    queue: ReimportQueue,
    options: RuntimeOptions,
    /// Assets that went through `pre_import` since the last `post_import`.
    pending_validation: BTreeSet<AssetPath>,
    /// Templates to reprocess at the next idle flush.
    deferred: BTreeSet<FolderPath>,
}

impl<S: AssetStorage> FlowEngine<S> {
    pub fn new(storage: S, options: RuntimeOptions) -> Self {
        Self {
            storage,
            queue: ReimportQueue::new(),
            options,
            pending_validation: BTreeSet::new(),
            deferred: BTreeSet::new(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn queue(&self) -> &ReimportQueue {
        &self.queue
    }

    pub fn has_deferred_work(&self) -> bool {
        !self.deferred.is_empty() || !self.queue.is_empty()
    }

    pub fn store(&self) -> TemplateStore<'_> {
        TemplateStore::new(&self.storage)
    }

    /// Run the full pass over the template in `folder`: recompute its
    /// affected set, prune stale exclusions (saving if anything changed),
    /// apply the payload to the managed set and validate it.
    ///
    /// Returns `None` when the folder holds no template.
    pub fn process_template(&mut self, folder: &FolderPath) -> Option<ProcessReport> {
        let store = TemplateStore::new(&self.storage);
        let mut template = store.template_in_folder(folder)?;
        let affected = affected_set(&store, &template);

        let pruned = prune_exclusions(&mut template, &affected);
        self.save_if_dirty(&mut template);

        let managed = managed_set(&template, &affected);
        let applied = apply_to_assets(&mut self.storage, &template, &managed, &mut self.queue);
        let diagnostics = validate_managed(&self.storage, &template, &managed);

        info!(
            template = %folder,
            kind = %template.kind(),
            affected = affected.len(),
            managed = managed.len(),
            changed = applied.changed.len(),
            failed = applied.failed.len(),
            diagnostics = diagnostics.len(),
            "processed folder template"
        );

        Some(ProcessReport {
            template: folder.clone(),
            affected: affected.len(),
            managed: managed.len(),
            pruned,
            applied,
            diagnostics,
        })
    }

    fn process_folders(&mut self, folders: impl IntoIterator<Item = FolderPath>) -> BatchReport {
        let reports = folders
            .into_iter()
            .filter_map(|folder| self.process_template(&folder))
            .collect();
        BatchReport { reports }
    }

    /// Route a host change batch and reprocess each scheduled template once.
    pub fn handle_changes(&mut self, batch: &ChangeBatch) -> BatchReport {
        if batch.is_empty() {
            return BatchReport::default();
        }
        let folders = route(&self.store(), batch);
        debug!(paths = batch.len(), templates = folders.len(), "routed change batch");
        self.process_folders(folders)
    }

    /// Reprocess every template in the tree.
    pub fn process_all(&mut self) -> BatchReport {
        let folders: Vec<FolderPath> = self
            .store()
            .all_templates()
            .into_iter()
            .map(|t| t.folder().clone())
            .collect();
        self.process_folders(folders)
    }

    /// Single-asset hook run before the host imports `path`.
    ///
    /// Applies the governing template's settings directly, without
    /// scheduling a reimport (the host is importing it already), and
    /// remembers the asset for [`post_import`](Self::post_import).
    /// Returns whether the asset is managed.
    pub fn pre_import(&mut self, path: &AssetPath) -> bool {
        let Some(template) = resolve(&self.store(), path) else {
            return false;
        };
        if template.is_excluded(path) {
            return false;
        }

        match apply_to_asset(&mut self.storage, &template, path) {
            Ok(changed) => debug!(asset = %path, changed, "pre-import apply"),
            Err(err) => error!(asset = %path, template = %template.folder(), "{err}"),
        }
        self.pending_validation.insert(path.clone());
        true
    }

    /// Validate exactly the assets seen by `pre_import` since the last call.
    ///
    /// The host's import has run by now, so the storage is told to commit
    /// whatever `pre_import` copied onto each asset.
    pub fn post_import(&mut self) -> Vec<Diagnostic> {
        let touched = std::mem::take(&mut self.pending_validation);
        for path in &touched {
            if let Err(err) = self.storage.finish_import(path) {
                warn!(asset = %path, "{err:#}");
            }
        }

        let store = TemplateStore::new(&self.storage);
        let mut diagnostics = Vec::new();

        for path in touched {
            let Some(template) = resolve(&store, &path) else {
                continue;
            };
            let Some(info) = self.storage.asset_info(&path) else {
                continue;
            };
            diagnostics.extend(validate_asset(&template, &info));
        }
        diagnostics
    }

    /// Governance of one asset. `None` for files that are not assets.
    pub fn governance(&self, path: &AssetPath) -> Option<Governance> {
        self.storage.classify(path)?;
        let store = self.store();

        let governance = match resolve(&store, path) {
            Some(t) if t.is_excluded(path) => Governance::Excluded {
                template: t.folder().clone(),
            },
            Some(t) => Governance::Managed {
                template: t.folder().clone(),
            },
            None => Governance::Ungoverned {
                can_create_template: path.folder().is_some_and(|f| !store.has_template(&f)),
            },
        };
        Some(governance)
    }

    /// Opt an asset into (`managed = true`) or out of its governing
    /// template. The template is saved right away; reprocessing waits for
    /// the next idle flush. Returns whether anything changed.
    pub fn set_managed(&mut self, path: &AssetPath, managed: bool) -> Result<bool> {
        let mut template = resolve(&self.store(), path)
            .ok_or_else(|| FlowError::NotGoverned(path.to_string()))?;

        let changed = if managed {
            template.include(path)
        } else {
            template.exclude(path.clone())
        };
        if !changed {
            return Ok(false);
        }

        self.storage.save_template(&template)?;
        template.mark_clean();
        info!(asset = %path, template = %template.folder(), managed, "toggled asset governance");
        self.deferred.insert(template.folder().clone());
        Ok(true)
    }

    /// Create a template in the asset's folder, seeded from the asset's
    /// current importer settings. It is applied at the next idle flush.
    pub fn create_template_for(&mut self, path: &AssetPath) -> Result<Template> {
        let kind = self
            .storage
            .classify(path)
            .ok_or_else(|| FlowError::UnrecognizedAsset(path.to_string()))?;
        let folder = path
            .folder()
            .ok_or_else(|| FlowError::UnrecognizedAsset(path.to_string()))?;
        let payload = self
            .storage
            .importer_settings(path)
            .filter(|s| s.kind == kind)
            .unwrap_or_else(|| ImportSettings::new(kind));

        let template = create_template(&mut self.storage, &folder, payload)?;
        self.deferred.insert(folder);
        Ok(template)
    }

    /// Idle point: reprocess deferred templates, then drain the reimport
    /// queue in one batch.
    pub fn flush(&mut self) -> FlushReport {
        let deferred = std::mem::take(&mut self.deferred);
        let reprocessed = self.process_folders(deferred);
        let reimport = self.queue.flush(&mut self.storage);
        if !reimport.is_empty() {
            info!(
                reimported = reimport.reimported.len(),
                failed = reimport.failed.len(),
                "flushed deferred reimports"
            );
        }
        FlushReport {
            reprocessed,
            reimport,
        }
    }

    /// Handle a single host event.
    pub fn step(&mut self, event: HostEvent) -> CoreStep {
        match event {
            HostEvent::Changes(batch) => {
                let report = self.handle_changes(&batch);
                CoreStep::running(report.diagnostics().cloned().collect())
            }
            HostEvent::PreImport(path) => {
                self.pre_import(&path);
                CoreStep::running(Vec::new())
            }
            HostEvent::PostImport => CoreStep::running(self.post_import()),
            HostEvent::SetManaged { path, managed } => {
                if let Err(err) = self.set_managed(&path, managed) {
                    warn!(asset = %path, "{err}");
                }
                CoreStep::running(Vec::new())
            }
            HostEvent::CreateTemplate { path } => {
                if let Err(err) = self.create_template_for(&path) {
                    warn!(asset = %path, "{err}");
                }
                CoreStep::running(Vec::new())
            }
            HostEvent::ProcessAll => {
                let report = self.process_all();
                CoreStep::running(report.diagnostics().cloned().collect())
            }
            HostEvent::Idle => {
                let report = self.flush();
                CoreStep {
                    diagnostics: report.reprocessed.diagnostics().cloned().collect(),
                    keep_running: !self.options.exit_when_idle,
                }
            }
            HostEvent::Shutdown => CoreStep {
                diagnostics: Vec::new(),
                keep_running: false,
            },
        }
    }

    fn save_if_dirty(&mut self, template: &mut Template) {
        if !template.is_dirty() {
            return;
        }
        match self.storage.save_template(template) {
            Ok(()) => template.mark_clean(),
            Err(err) => warn!(template = %template.folder(), "failed to save folder template: {err:#}"),
        }
    }
}
