// src/tree/traverse.rs

use crate::path::FolderPath;

/// Outcome of visiting one folder during an upward walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    /// Keep ascending to the parent folder.
    Continue,
    /// Stop with a result.
    Found(T),
    /// Stop with no result.
    Stop,
}

/// Visit `start` and then each ancestor in turn until `visit` returns
/// [`Step::Found`] or [`Step::Stop`], or the tree root is passed.
pub fn walk_up<T>(start: &FolderPath, mut visit: impl FnMut(&FolderPath) -> Step<T>) -> Option<T> {
    let mut current = Some(start.clone());
    while let Some(folder) = current {
        match visit(&folder) {
            Step::Continue => current = folder.parent(),
            Step::Found(value) => return Some(value),
            Step::Stop => return None,
        }
    }
    None
}
