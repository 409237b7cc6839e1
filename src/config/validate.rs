// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{FlowError, Result};
use crate::path::AssetPath;
use crate::storage::KindMatcher;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = FlowError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.kinds))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_template_file_name(cfg)?;
    validate_sidecar_suffix(cfg)?;
    validate_kind_patterns(cfg)?;
    Ok(())
}

fn validate_template_file_name(cfg: &RawConfigFile) -> Result<()> {
    let name = cfg.config.template_file_name.as_str();
    if name.trim().is_empty() {
        return Err(FlowError::ConfigError(
            "[config].template_file_name must not be empty".to_string(),
        ));
    }
    if name.trim() != name {
        return Err(FlowError::ConfigError(format!(
            "[config].template_file_name must not start or end with whitespace (got {name:?})"
        )));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(FlowError::ConfigError(format!(
            "[config].template_file_name must be a bare file name (got {name:?})"
        )));
    }
    Ok(())
}

fn validate_sidecar_suffix(cfg: &RawConfigFile) -> Result<()> {
    let suffix = cfg.config.import_sidecar_suffix.as_str();
    if suffix.trim().is_empty() {
        return Err(FlowError::ConfigError(
            "[config].import_sidecar_suffix must not be empty".to_string(),
        ));
    }
    if suffix.trim() != suffix {
        return Err(FlowError::ConfigError(format!(
            "[config].import_sidecar_suffix must not start or end with whitespace (got {suffix:?})"
        )));
    }
    Ok(())
}

fn validate_kind_patterns(cfg: &RawConfigFile) -> Result<()> {
    let matcher = KindMatcher::new(&cfg.kinds)
        .map_err(|e| FlowError::ConfigError(format!("[kinds]: {e:#}")))?;

    // A template file classified as an asset would govern itself.
    if let Some(probe) = AssetPath::new(format!("probe/{}", cfg.config.template_file_name)) {
        if let Some(kind) = matcher.classify(&probe) {
            return Err(FlowError::ConfigError(format!(
                "[config].template_file_name {:?} is matched by the [kinds].{kind} patterns",
                cfg.config.template_file_name
            )));
        }
    }
    Ok(())
}
