// src/validators/name.rs

use anyhow::{Context, Result};
use regex::Regex;

use crate::types::AssetInfo;
use crate::validators::{AssetValidator, Verdict};

/// Checks the asset's file stem against a regular expression.
///
/// An unset pattern is a configuration mistake reported against every
/// asset; a pattern that does not compile is a validator fault.
#[derive(Debug, Clone)]
pub struct NamePatternValidator {
    pattern: String,
    // Compiled once; a compile error is kept and surfaced on every check.
    compiled: Option<Result<Regex, regex::Error>>,
}

impl NamePatternValidator {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let compiled = (!pattern.is_empty()).then(|| Regex::new(&pattern));
        Self { pattern, compiled }
    }
}

impl AssetValidator for NamePatternValidator {
    fn name(&self) -> &str {
        "name_pattern"
    }

    fn check(&self, asset: &AssetInfo) -> Result<Verdict> {
        let Some(compiled) = &self.compiled else {
            return Ok(Verdict::invalid("name pattern is not set"));
        };
        let re = compiled
            .as_ref()
            .map_err(Clone::clone)
            .with_context(|| format!("invalid name pattern {:?}", self.pattern))?;

        if re.is_match(&asset.name) {
            Ok(Verdict::Valid)
        } else {
            Ok(Verdict::invalid(format!(
                "asset name \"{}\" does not match pattern: {}",
                asset.name, self.pattern
            )))
        }
    }
}
