// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::path::{AssetPath, FolderPath};

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("a folder template already exists in {folder}")]
    AlreadyExists { folder: FolderPath },

    #[error("applying template settings to {path} failed: {reason}")]
    ApplyFailed { path: AssetPath, reason: String },

    #[error("reimport of {path} failed: {reason}")]
    ReimportFailed { path: AssetPath, reason: String },

    #[error("validator execution failure: {0}")]
    ValidatorFault(String),

    #[error("asset is not governed by any folder template: {0}")]
    NotGoverned(String),

    #[error("not a texture, model or audio asset: {0}")]
    UnrecognizedAsset(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FlowError>;
