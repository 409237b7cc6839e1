// src/tree/mod.rs

//! Tree-level governance queries.
//!
//! - [`resolver`] answers "which template governs this asset".
//! - [`affected`] answers "which assets does this template govern".
//!
//! Both views must agree: an asset is in `affected_set(t)` exactly when
//! `resolve` for that asset returns `t`, apart from the wrong-kind blocking
//! rule that only the upward walk applies.

pub mod affected;
pub mod resolver;
pub mod traverse;

pub use affected::{affected_set, managed_set};
pub use resolver::{governs_folder, resolve, resolve_kind};
pub use traverse::{walk_up, Step};
