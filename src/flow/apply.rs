// src/flow/apply.rs

use tracing::{debug, error};

use super::reimport::ReimportQueue;
use crate::errors::{FlowError, Result};
use crate::path::AssetPath;
use crate::storage::AssetStorage;
use crate::template::Template;
use crate::types::AssetRef;

/// What one apply pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Assets whose importer state changed.
    pub changed: Vec<AssetPath>,
    /// Assets that already conformed.
    pub unchanged: usize,
    /// Assets whose copy failed.
    pub failed: Vec<AssetPath>,
}

/// Copy the template payload onto one asset's importer state.
///
/// Returns whether the importer state changed.
pub fn apply_to_asset(
    storage: &mut dyn AssetStorage,
    template: &Template,
    asset: &AssetPath,
) -> Result<bool> {
    storage
        .copy_state(template.payload(), asset)
        .map_err(|err| FlowError::ApplyFailed {
            path: asset.clone(),
            reason: format!("{err:#}"),
        })
}

/// Apply the template to every asset given and schedule the changed ones
/// for reimport. Failures are logged per asset and never stop the batch.
pub fn apply_to_assets<'a>(
    storage: &mut dyn AssetStorage,
    template: &Template,
    assets: impl IntoIterator<Item = &'a AssetRef>,
    queue: &mut ReimportQueue,
) -> ApplyOutcome {
    let mut outcome = ApplyOutcome::default();

    for asset in assets {
        match apply_to_asset(storage, template, &asset.path) {
            Ok(true) => {
                debug!(asset = %asset.path, template = %template.folder(), "importer settings updated");
                queue.schedule(asset.path.clone());
                outcome.changed.push(asset.path.clone());
            }
            Ok(false) => outcome.unchanged += 1,
            Err(err) => {
                error!(asset = %asset.path, template = %template.folder(), "{err}");
                outcome.failed.push(asset.path.clone());
            }
        }
    }

    outcome
}
