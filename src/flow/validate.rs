// src/flow/validate.rs

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, error};

use crate::errors::FlowError;
use crate::path::{AssetPath, FolderPath};
use crate::storage::AssetStorage;
use crate::template::Template;
use crate::types::{AssetInfo, AssetRef};
use crate::validators::{AssetValidator, Verdict};

/// One failed rule for one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub asset: AssetPath,
    /// Folder of the template whose chain produced this.
    pub template: FolderPath,
    pub validator: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.asset, self.validator, self.message)
    }
}

/// Run `chain` in order against `asset`, returning `(validator, message)`
/// for every rule that did not pass. Faults become messages too.
pub fn run_chain(chain: &[Box<dyn AssetValidator>], asset: &AssetInfo) -> Vec<(String, String)> {
    let mut failures = Vec::new();
    for validator in chain {
        let message = match validator.check(asset) {
            Ok(Verdict::Valid) => continue,
            Ok(Verdict::Invalid(msg)) if msg.trim().is_empty() => {
                format!("asset failed validation: {}", asset.path)
            }
            Ok(Verdict::Invalid(msg)) => msg,
            Err(fault) => FlowError::ValidatorFault(format!("{fault:#}")).to_string(),
        };
        failures.push((validator.name().to_string(), message));
    }
    failures
}

/// Validate one asset against the template's chain. Excluded assets and
/// templates without validators produce nothing.
pub fn validate_asset(template: &Template, asset: &AssetInfo) -> Vec<Diagnostic> {
    if template.validators().is_empty() || template.is_excluded(&asset.path) {
        return Vec::new();
    }

    diagnostics_with(template, &template.validator_chain(), asset)
}

fn diagnostics_with(
    template: &Template,
    chain: &[Box<dyn AssetValidator>],
    asset: &AssetInfo,
) -> Vec<Diagnostic> {
    run_chain(chain, asset)
        .into_iter()
        .map(|(validator, message)| {
            let diagnostic = Diagnostic {
                asset: asset.path.clone(),
                template: template.folder().clone(),
                validator,
                message,
            };
            error!(
                asset = %diagnostic.asset,
                template = %diagnostic.template,
                validator = %diagnostic.validator,
                "{}",
                diagnostic.message
            );
            diagnostic
        })
        .collect()
}

/// Validate every managed asset, collecting all diagnostics in asset order.
pub fn validate_managed(
    storage: &dyn AssetStorage,
    template: &Template,
    managed: &BTreeSet<AssetRef>,
) -> Vec<Diagnostic> {
    if template.validators().is_empty() {
        return Vec::new();
    }

    let chain = template.validator_chain();
    let mut diagnostics = Vec::new();
    for asset in managed {
        if template.is_excluded(&asset.path) {
            continue;
        }
        let Some(info) = storage.asset_info(&asset.path) else {
            debug!(asset = %asset.path, "asset vanished before validation");
            continue;
        };
        diagnostics.extend(diagnostics_with(template, &chain, &info));
    }
    diagnostics
}
