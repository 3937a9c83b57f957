//! Effects - side effects declared by the reducer
//!
//! The reducer stays pure: anything touching the network or the key store
//! is returned as an effect and run by [`crate::handler::EffectHandler`].

use dashdeck_core::{ChatMessage, KeySlot};

use crate::state::PanelId;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Read the remembered key for a form
    LoadKey(KeySlot),
    /// Write (`Some`) or remove (`None`) a remembered key
    PersistKey { slot: KeySlot, value: Option<String> },
    /// Send the whole conversation, ending with the new user message
    SendChat {
        seq: u64,
        api_key: String,
        model: String,
        history: Vec<ChatMessage>,
    },
    SearchPlaces { seq: u64, api_key: String, query: String },
    FetchWeather { seq: u64, city: String },
    FetchStock { seq: u64, code: String },
    FetchCat { seq: u64 },
    /// Abort the panel's in-flight request
    CancelPanel(PanelId),
}
