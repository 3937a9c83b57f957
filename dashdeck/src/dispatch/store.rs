//! State plus the reducer that owns every mutation of it

use std::marker::PhantomData;

use super::{Action, DispatchResult};

pub type Reducer<S, A, E> = fn(&mut S, A) -> DispatchResult<E>;

/// Holds the dashboard state. Only [`Store::dispatch`] changes it, and
/// each call is logged at debug level (trace for [`Action::is_noise`]).
pub struct Store<S, A, E> {
    state: S,
    reducer: Reducer<S, A, E>,
    _types: PhantomData<fn(A) -> E>,
}

impl<S, A: Action, E> Store<S, A, E> {
    pub fn new(state: S, reducer: Reducer<S, A, E>) -> Self {
        Self {
            state,
            reducer,
            _types: PhantomData,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        let name = action.name();
        let summary = action.summary();
        let noise = action.is_noise();
        let result = (self.reducer)(&mut self.state, action);
        if noise {
            tracing::trace!(action = name, changed = result.changed, "dispatched");
        } else {
            tracing::debug!(
                action = name,
                %summary,
                changed = result.changed,
                effects = result.effects.len(),
                "dispatched"
            );
        }
        result
    }
}
