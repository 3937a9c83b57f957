//! One in-flight request per panel
//!
//! Starting a request for a panel cancels the one it still has running.
//! Cancelled requests send nothing back, and the reducer separately drops
//! results whose sequence number is stale, so a late reply never lands.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::Action;
use crate::state::PanelId;

struct InFlight {
    seq: u64,
    cancel: CancellationToken,
}

pub struct PanelTasks<A> {
    running: HashMap<PanelId, InFlight>,
    results: mpsc::UnboundedSender<A>,
    shutdown: CancellationToken,
}

impl<A: Action> PanelTasks<A> {
    pub fn new(results: mpsc::UnboundedSender<A>) -> Self {
        Self {
            running: HashMap::new(),
            results,
            shutdown: CancellationToken::new(),
        }
    }

    /// Run request `seq` for `panel`; its action is queued when it resolves.
    pub fn spawn<F>(&mut self, panel: PanelId, seq: u64, request: F)
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.cancel(panel);

        let cancel = self.shutdown.child_token();
        let results = self.results.clone();
        let guard = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = guard.cancelled() => {}
                action = request => {
                    if !guard.is_cancelled() {
                        let _ = results.send(action);
                    }
                }
            }
        });

        tracing::debug!(?panel, seq, "request started");
        self.running.insert(panel, InFlight { seq, cancel });
    }

    /// Cancel whatever `panel` has in flight. Nothing happens when it is idle.
    pub fn cancel(&mut self, panel: PanelId) {
        if let Some(InFlight { seq, cancel }) = self.running.remove(&panel) {
            tracing::debug!(?panel, seq, "request cancelled");
            cancel.cancel();
        }
    }

    /// Sequence number of the last request started for `panel` and not
    /// cancelled since.
    pub fn in_flight(&self, panel: PanelId) -> Option<u64> {
        self.running.get(&panel).map(|task| task.seq)
    }

    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        self.running.clear();
    }
}

impl<A> Drop for PanelTasks<A> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
