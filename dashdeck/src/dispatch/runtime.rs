//! The dashboard loop
//!
//! Terminal input and finished requests meet in one `select!`. Input is
//! mapped to actions by the UI; actions go through the store; effects go
//! to the handler, which starts panel requests through [`EffectContext`].
//! Nothing but this loop touches the state.

use std::future::Future;
use std::io;
use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::store::Store;
use super::tasks::PanelTasks;
use super::terminal::{EventKind, spawn_reader};
use super::{Action, timer};
use crate::state::PanelId;

/// What the UI made of one input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome<A> {
    pub actions: Vec<A>,
    /// Redraw even if no action changes the state (cursor moves, resizes)
    pub needs_render: bool,
}

impl<A> EventOutcome<A> {
    pub fn ignored() -> Self {
        Self::from_actions(None)
    }

    pub fn action(action: A) -> Self {
        Self::from_actions(Some(action))
    }

    pub fn from_actions(actions: impl IntoIterator<Item = A>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            needs_render: false,
        }
    }

    pub fn with_render(self) -> Self {
        Self {
            needs_render: true,
            ..self
        }
    }
}

/// What an effect handler may do: queue an action now, or start or cancel
/// a panel's request.
pub struct EffectContext<'a, A> {
    queue: &'a mpsc::UnboundedSender<A>,
    tasks: &'a mut PanelTasks<A>,
}

impl<'a, A: Action> EffectContext<'a, A> {
    pub fn new(queue: &'a mpsc::UnboundedSender<A>, tasks: &'a mut PanelTasks<A>) -> Self {
        Self { queue, tasks }
    }

    /// Handled after the action that produced this effect.
    pub fn emit(&self, action: A) {
        let _ = self.queue.send(action);
    }

    pub fn spawn<F>(&mut self, panel: PanelId, seq: u64, request: F)
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.tasks.spawn(panel, seq, request);
    }

    pub fn cancel(&mut self, panel: PanelId) {
        self.tasks.cancel(panel);
    }
}

pub struct Runtime<S, A, E> {
    store: Store<S, A, E>,
    queue_tx: mpsc::UnboundedSender<A>,
    queue_rx: mpsc::UnboundedReceiver<A>,
    tasks: PanelTasks<A>,
    stop: CancellationToken,
    dirty: bool,
}

impl<S, A: Action, E> Runtime<S, A, E> {
    pub fn new(store: Store<S, A, E>) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        Self {
            store,
            tasks: PanelTasks::new(queue_tx.clone()),
            queue_tx,
            queue_rx,
            stop: CancellationToken::new(),
            dirty: true,
        }
    }

    pub fn state(&self) -> &S {
        self.store.state()
    }

    pub fn enqueue(&self, action: A) {
        let _ = self.queue_tx.send(action);
    }

    /// Queue `make()` every `period` while the runtime lives.
    pub fn tick_every<F>(&mut self, period: Duration, make: F)
    where
        F: Fn() -> A + Send + 'static,
    {
        timer::every(period, make, self.queue_tx.clone(), self.stop.child_token());
    }

    /// Dispatch `action` and run its effects. Returns whether the state
    /// changed.
    pub fn process<H>(&mut self, action: A, handle_effect: &mut H) -> bool
    where
        H: FnMut(E, &mut EffectContext<'_, A>),
    {
        let result = self.store.dispatch(action);
        if result.has_effects() {
            let mut ctx = EffectContext::new(&self.queue_tx, &mut self.tasks);
            for effect in result.effects {
                handle_effect(effect, &mut ctx);
            }
        }
        result.changed
    }

    /// Process everything queued right now, without a terminal. Returns
    /// how many actions ran.
    pub fn drain_queued<H>(&mut self, handle_effect: &mut H) -> usize
    where
        H: FnMut(E, &mut EffectContext<'_, A>),
    {
        let mut ran = 0;
        while let Ok(action) = self.queue_rx.try_recv() {
            self.dirty |= self.process(action, handle_effect);
            ran += 1;
        }
        ran
    }

    /// Draw, read input and process actions until `is_quit` accepts one.
    pub async fn run<B, R, M, Q, H>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut render: R,
        mut map_event: M,
        is_quit: Q,
        mut handle_effect: H,
    ) -> io::Result<()>
    where
        B: Backend,
        R: FnMut(&mut Frame, Rect, &S),
        M: FnMut(&EventKind, &S) -> EventOutcome<A>,
        Q: Fn(&A) -> bool,
        H: FnMut(E, &mut EffectContext<'_, A>),
    {
        let (input_tx, mut input_rx) = mpsc::unbounded_channel();
        let reader = spawn_reader(input_tx, self.stop.child_token());

        let result = loop {
            if self.dirty {
                let state = self.store.state();
                if let Err(e) = terminal.draw(|frame| render(frame, frame.area(), state)) {
                    break Err(e);
                }
                self.dirty = false;
            }

            tokio::select! {
                Some(event) = input_rx.recv() => {
                    let outcome = map_event(&event, self.store.state());
                    self.dirty |= outcome.needs_render;
                    for action in outcome.actions {
                        let _ = self.queue_tx.send(action);
                    }
                }
                Some(action) = self.queue_rx.recv() => {
                    if is_quit(&action) {
                        break Ok(());
                    }
                    self.dirty |= self.process(action, &mut handle_effect);
                }
                else => break Ok(()),
            }
        };

        self.stop.cancel();
        self.tasks.shutdown();
        // The reader must be gone before the caller restores the terminal
        let _ = reader.await;
        tracing::info!("runtime stopped");
        result
    }
}
