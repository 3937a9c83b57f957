//! Action loop the dashboard runs on
//!
//! Key presses and finished requests both arrive as [`Action`]s on one
//! queue. The [`Store`] reduces each action into state changes and
//! effects; effects start panel requests through [`PanelTasks`], and each
//! finished request comes back as another action carrying its sequence
//! number.

pub mod runtime;
pub mod store;
pub mod tasks;
pub mod terminal;
pub mod testing;
mod timer;

use std::fmt::Debug;

pub use runtime::{EffectContext, EventOutcome, Runtime};
pub use store::Store;
pub use tasks::PanelTasks;
pub use terminal::EventKind;

/// Anything that can be dispatched to a store.
pub trait Action: Clone + Debug + Send + 'static {
    /// Variant name, used for logging.
    fn name(&self) -> &'static str;

    /// One-line description for the action log. Override to keep large
    /// payloads out of the log.
    fn summary(&self) -> String {
        format!("{self:?}")
    }

    /// Frequent no-payload actions that only the trace level should log.
    fn is_noise(&self) -> bool {
        false
    }
}

/// What one dispatch did: whether to redraw, and the work to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    pub changed: bool,
    pub effects: Vec<E>,
}

impl<E> DispatchResult<E> {
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: Vec::new(),
        }
    }

    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: Vec::new(),
        }
    }

    pub fn changed_with(effect: E) -> Self {
        Self::changed_with_many(vec![effect])
    }

    pub fn changed_with_many(effects: Vec<E>) -> Self {
        Self {
            changed: true,
            effects,
        }
    }

    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}
