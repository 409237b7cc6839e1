// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again.
///
/// Returns `None` if the path cannot be related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_string_lossy().replace('\\', "/"));
    }

    // macOS reports /private/var/... for /var/...; deleted paths cannot be
    // canonicalized, so their parent is tried instead.
    let root_canon = root.canonicalize().ok()?;
    let path_canon = match path.canonicalize() {
        Ok(p) => p,
        Err(_) => {
            let parent = path.parent()?.canonicalize().ok()?;
            parent.join(path.file_name()?)
        }
    };
    path_canon
        .strip_prefix(&root_canon)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}

/// Tree path for a host path under `root`: the root itself is `/`, and
/// everything below it is `/<relative path>`.
pub fn tree_path(root: &Path, path: &Path) -> Option<String> {
    let rel = relative_str(root, path)?;
    Some(format!("/{}", rel.trim_start_matches('/')))
}

/// True for paths inside hidden directories (`.git`, editor state) or
/// hidden files, which are never part of the asset tree.
pub fn is_hidden(tree_path: &str) -> bool {
    tree_path.split('/').any(|segment| segment.starts_with('.'))
}
