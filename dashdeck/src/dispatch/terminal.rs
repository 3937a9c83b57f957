//! Terminal input on a blocking reader thread

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// How long one `poll` blocks before the reader re-checks its stop token
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Input as components see it
#[derive(Debug, Clone)]
pub enum EventKind {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

impl EventKind {
    /// Key releases and focus or paste events have no meaning here.
    pub fn from_crossterm(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Release => None,
            Event::Key(key) => Some(Self::Key(key)),
            Event::Mouse(mouse) => Some(Self::Mouse(mouse)),
            Event::Resize(w, h) => Some(Self::Resize(w, h)),
            _ => None,
        }
    }
}

/// Forward terminal input to `tx` until `stop` fires or `tx` closes.
pub(super) fn spawn_reader(
    tx: mpsc::UnboundedSender<EventKind>,
    stop: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !stop.is_cancelled() {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal poll failed, input stopped");
                    return;
                }
            }
            let Some(kind) = event::read().ok().and_then(EventKind::from_crossterm) else {
                continue;
            };
            if tx.send(kind).is_err() {
                return;
            }
        }
    })
}
