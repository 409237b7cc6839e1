// src/flow/reimport.rs

//! Deferred, deduplicated reimport scheduling.
//!
//! Applying settings can happen while the host is inside an import
//! callback, so reimports are never run on the spot. They are queued here
//! and drained in one batch at the host's idle point via
//! [`ReimportQueue::flush`].

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::errors::FlowError;
use crate::path::AssetPath;
use crate::storage::AssetStorage;

/// Result of draining the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushOutcome {
    pub reimported: Vec<AssetPath>,
    pub failed: Vec<AssetPath>,
}

impl FlushOutcome {
    pub fn is_empty(&self) -> bool {
        self.reimported.is_empty() && self.failed.is_empty()
    }
}

/// Reimport scheduler owned by the engine.
///
/// A path is in flight from the moment it is scheduled until its reimport
/// has been attempted. Scheduling an in-flight path again is refused.
#[derive(Debug, Default)]
pub struct ReimportQueue {
    pending: Vec<AssetPath>,
    in_flight: HashSet<AssetPath>,
}

/// Releases an in-flight marker when dropped, whichever way the reimport
/// attempt ends.
struct InFlightGuard<'a> {
    in_flight: &'a mut HashSet<AssetPath>,
    path: &'a AssetPath,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(self.path);
    }
}

impl ReimportQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `path` for the next flush. Returns `false` if it is already
    /// queued or mid-reimport.
    pub fn schedule(&mut self, path: AssetPath) -> bool {
        if !self.in_flight.insert(path.clone()) {
            debug!(asset = %path, "reimport already scheduled");
            return false;
        }
        self.pending.push(path);
        true
    }

    pub fn is_in_flight(&self, path: &AssetPath) -> bool {
        self.in_flight.contains(path)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Reimport every queued asset, in scheduling order.
    ///
    /// A failing reimport is logged and does not stop the rest of the
    /// batch. Every attempted path leaves the in-flight set.
    pub fn flush(&mut self, storage: &mut dyn AssetStorage) -> FlushOutcome {
        let batch = std::mem::take(&mut self.pending);
        let mut outcome = FlushOutcome::default();
        if batch.is_empty() {
            return outcome;
        }
        debug!(count = batch.len(), "flushing deferred reimports");

        for path in &batch {
            let _guard = InFlightGuard {
                in_flight: &mut self.in_flight,
                path,
            };
            match storage.reimport(path) {
                Ok(()) => outcome.reimported.push(path.clone()),
                Err(err) => {
                    let err = FlowError::ReimportFailed {
                        path: path.clone(),
                        reason: format!("{err:#}"),
                    };
                    warn!(asset = %path, "{err}");
                    outcome.failed.push(path.clone());
                }
            }
        }
        outcome
    }
}
