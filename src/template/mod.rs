// src/template/mod.rs

//! Folder templates and their per-folder store.
//!
//! - [`model`] holds the template itself, its opaque settings payload and
//!   the persisted TOML shape.
//! - [`store`] looks templates up by folder through an [`AssetStorage`]
//!   and creates new ones.
//!
//! [`AssetStorage`]: crate::storage::AssetStorage

pub mod model;
pub mod store;

pub use model::{ImportSettings, Template, TemplateFile};
pub use store::{create_template, TemplateStore};
