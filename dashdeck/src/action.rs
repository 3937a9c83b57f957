//! Actions: user intents and async results
//!
//! Naming follows one convention: the prefix names the panel
//! (`Chat*`, `Places*`, `Weather*`, `Stock*`, `Cat*`), and the `Did` prefix
//! after it marks the result of an async task. Every `Did*` result carries the
//! sequence number of the request that produced it.

use dashdeck_core::{CatRecord, CityForecast, KeySlot, StockHistory};

use crate::state::PanelId;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    // ===== Panel switching =====
    /// Mount a panel, discarding the current one
    PanelSelect(PanelId),
    PanelNext,
    PanelPrev,
    FocusNext,
    FocusPrev,

    // ===== API key form =====
    /// Result: stored key read on mount
    KeyDidLoad(KeySlot, Option<String>),
    KeyChange(KeySlot, String),
    KeyRememberToggle(KeySlot),

    // ===== Chat =====
    ChatModelChange(String),
    ChatInputChange(String),
    /// Send the input field
    ChatSend,
    /// Send one of the quick suggestions
    ChatSuggest(usize),
    ChatDidReply { seq: u64, text: String },
    ChatDidError { seq: u64, message: String },

    // ===== Places =====
    PlacesQueryChange(String),
    PlacesSearch,
    PlacesDidLoad { seq: u64, text: String },
    PlacesDidError { seq: u64, message: String },

    // ===== Weather =====
    WeatherCityChange(String),
    WeatherFetch,
    WeatherDidLoad { seq: u64, forecast: CityForecast },
    WeatherDidError { seq: u64, message: String },

    // ===== Stock =====
    StockCodeChange(String),
    StockFetch,
    StockDidLoad { seq: u64, history: StockHistory },
    StockDidError { seq: u64, message: String },

    // ===== Cats =====
    CatFetch,
    CatDidLoad { seq: u64, cat: CatRecord },
    CatDidError { seq: u64, message: String },

    // ===== Global =====
    /// Periodic tick for loading animation
    Tick,
    Quit,
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max.saturating_sub(3)).collect::<String>())
    } else {
        text.to_string()
    }
}

impl crate::dispatch::Action for Action {
    fn name(&self) -> &'static str {
        match self {
            Action::PanelSelect(_) => "PanelSelect",
            Action::PanelNext => "PanelNext",
            Action::PanelPrev => "PanelPrev",
            Action::FocusNext => "FocusNext",
            Action::FocusPrev => "FocusPrev",
            Action::KeyDidLoad(..) => "KeyDidLoad",
            Action::KeyChange(..) => "KeyChange",
            Action::KeyRememberToggle(_) => "KeyRememberToggle",
            Action::ChatModelChange(_) => "ChatModelChange",
            Action::ChatInputChange(_) => "ChatInputChange",
            Action::ChatSend => "ChatSend",
            Action::ChatSuggest(_) => "ChatSuggest",
            Action::ChatDidReply { .. } => "ChatDidReply",
            Action::ChatDidError { .. } => "ChatDidError",
            Action::PlacesQueryChange(_) => "PlacesQueryChange",
            Action::PlacesSearch => "PlacesSearch",
            Action::PlacesDidLoad { .. } => "PlacesDidLoad",
            Action::PlacesDidError { .. } => "PlacesDidError",
            Action::WeatherCityChange(_) => "WeatherCityChange",
            Action::WeatherFetch => "WeatherFetch",
            Action::WeatherDidLoad { .. } => "WeatherDidLoad",
            Action::WeatherDidError { .. } => "WeatherDidError",
            Action::StockCodeChange(_) => "StockCodeChange",
            Action::StockFetch => "StockFetch",
            Action::StockDidLoad { .. } => "StockDidLoad",
            Action::StockDidError { .. } => "StockDidError",
            Action::CatFetch => "CatFetch",
            Action::CatDidLoad { .. } => "CatDidLoad",
            Action::CatDidError { .. } => "CatDidError",
            Action::Tick => "Tick",
            Action::Quit => "Quit",
        }
    }

    /// Keeps keys and large payloads out of the log.
    fn summary(&self) -> String {
        match self {
            Action::KeyDidLoad(slot, value) => {
                format!("KeyDidLoad({slot:?}, present: {})", value.is_some())
            }
            Action::KeyChange(slot, value) => {
                format!("KeyChange({slot:?}, len: {})", value.chars().count())
            }
            Action::ChatDidReply { seq, text } | Action::PlacesDidLoad { seq, text } => {
                format!("{} {{ seq: {seq}, chars: {} }}", self.name(), text.chars().count())
            }
            Action::WeatherDidLoad { seq, forecast } => format!(
                "WeatherDidLoad {{ seq: {seq}, city: {}, periods: {} }}",
                forecast.city,
                forecast.periods.len()
            ),
            Action::StockDidLoad { seq, history } => format!(
                "StockDidLoad {{ seq: {seq}, rows: {} }}",
                history.rows.len()
            ),
            Action::CatDidLoad { seq, cat } => {
                format!("CatDidLoad {{ seq: {seq}, id: {} }}", cat.id)
            }
            Action::ChatDidError { seq, message }
            | Action::PlacesDidError { seq, message }
            | Action::WeatherDidError { seq, message }
            | Action::StockDidError { seq, message }
            | Action::CatDidError { seq, message } => {
                format!("{} {{ seq: {seq}, {:?} }}", self.name(), truncate(message, 40))
            }
            _ => format!("{self:?}"),
        }
    }

    fn is_noise(&self) -> bool {
        matches!(self, Action::Tick)
    }
}
