#![allow(dead_code, unused_imports)]

pub use folderflow_test_utils::builders;
pub use folderflow_test_utils::{asset, folder, init_tracing, with_timeout, TemplateBuilder, TreeBuilder};
