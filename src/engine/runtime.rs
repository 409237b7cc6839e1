// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::storage::AssetStorage;

use super::core::FlowEngine;
use super::HostEvent;

/// Drives the [`FlowEngine`] in response to [`HostEvent`]s.
///
/// This is a pure IO shell around the core. Whenever the channel has no
/// further event ready, the host is considered idle and the shell steps the
/// core with [`HostEvent::Idle`] so deferred work runs outside any event
/// handling.
pub struct Runtime<S: AssetStorage> {
    core: FlowEngine<S>,
    event_rx: mpsc::Receiver<HostEvent>,
}

impl<S: AssetStorage> fmt::Debug for Runtime<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<S: AssetStorage> Runtime<S> {
    pub fn new(core: FlowEngine<S>, event_rx: mpsc::Receiver<HostEvent>) -> Self {
        Self { core, event_rx }
    }

    /// Main event loop. Returns the engine once the channel closes, a
    /// shutdown is requested, or the core asks to stop at an idle point.
    pub async fn run(mut self) -> FlowEngine<S> {
        info!("folderflow runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event);
            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }

            if self.event_rx.is_empty() {
                let step = self.core.step(HostEvent::Idle);
                if !step.keep_running {
                    info!("idle with nothing left to do; stopping runtime");
                    break;
                }
            }
        }

        // Anything deferred by the last events still runs before exit.
        if self.core.has_deferred_work() {
            self.core.flush();
        }

        info!("runtime exiting");
        self.core
    }
}
