// src/validators/mod.rs

//! Asset validation rules.
//!
//! A validator is an opaque predicate over an [`AssetInfo`]. It either
//! accepts the asset, rejects it with a message, or faults (returns `Err`).
//! Faults are never fatal; the validation engine turns them into
//! diagnostics.
//!
//! Templates persist their chain as [`ValidatorSpec`] entries, a closed set
//! of built-in rules tagged by `rule = "..."` in TOML.

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::types::AssetInfo;

pub mod dimensions;
pub mod name;

pub use dimensions::{ExactSizeValidator, PowerOfTwoValidator, SquareValidator};
pub use name::NamePatternValidator;

/// Outcome of a single validator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(String),
}

impl Verdict {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Verdict::Invalid(msg.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

/// Capability every validation rule implements.
pub trait AssetValidator: fmt::Debug {
    /// Short rule name used in diagnostics.
    fn name(&self) -> &str;

    fn check(&self, asset: &AssetInfo) -> Result<Verdict>;
}

/// Persisted description of a built-in validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidatorSpec {
    /// Regex the asset's file stem must match.
    NamePattern {
        #[serde(default)]
        pattern: String,
    },
    /// Width and height must both be powers of two.
    PowerOfTwo,
    /// Width must equal height.
    Square,
    /// Dimensions must match exactly.
    ExactSize { width: u32, height: u32 },
}

impl ValidatorSpec {
    pub fn build(&self) -> Box<dyn AssetValidator> {
        match self {
            ValidatorSpec::NamePattern { pattern } => {
                Box::new(NamePatternValidator::new(pattern.clone()))
            }
            ValidatorSpec::PowerOfTwo => Box::new(PowerOfTwoValidator),
            ValidatorSpec::Square => Box::new(SquareValidator),
            ValidatorSpec::ExactSize { width, height } => {
                Box::new(ExactSizeValidator::new(*width, *height))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Chain {
        validators: Vec<ValidatorSpec>,
    }

    #[test]
    fn specs_parse_from_tagged_tables() {
        let chain: Chain = toml::from_str(
            r#"
[[validators]]
rule = "name_pattern"
pattern = "^fx_"

[[validators]]
rule = "square"

[[validators]]
rule = "exact_size"
width = 256
height = 128
"#,
        )
        .unwrap();

        assert_eq!(
            chain.validators,
            vec![
                ValidatorSpec::NamePattern {
                    pattern: "^fx_".to_string()
                },
                ValidatorSpec::Square,
                ValidatorSpec::ExactSize {
                    width: 256,
                    height: 128
                },
            ]
        );
    }

    #[test]
    fn built_validators_keep_rule_names() {
        let names: Vec<String> = [
            ValidatorSpec::PowerOfTwo,
            ValidatorSpec::Square,
            ValidatorSpec::ExactSize { width: 1, height: 1 },
            ValidatorSpec::NamePattern { pattern: "x".into() },
        ]
        .iter()
        .map(|s| s.build().name().to_string())
        .collect();
        assert_eq!(names, vec!["power_of_two", "square", "exact_size", "name_pattern"]);
    }
}
