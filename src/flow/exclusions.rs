// src/flow/exclusions.rs

use std::collections::BTreeSet;

use tracing::info;

use crate::path::AssetPath;
use crate::template::Template;
use crate::types::AssetRef;

/// Drop exclude entries that are no longer reachable from the template.
///
/// Returns the number of entries removed. The template is only marked dirty
/// when something was removed, so running this twice on an unchanged tree
/// leaves it clean the second time.
pub fn prune_exclusions(template: &mut Template, reachable: &BTreeSet<AssetRef>) -> usize {
    let reachable: BTreeSet<&AssetPath> = reachable.iter().map(|a| &a.path).collect();
    let removed = template.retain_excluded(|path| reachable.contains(path));
    if removed > 0 {
        info!(
            template = %template.folder(),
            removed,
            "pruned stale exclude entries"
        );
    }
    removed
}
