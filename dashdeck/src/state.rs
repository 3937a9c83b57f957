//! Application state - one slice per mounted panel

use dashdeck_core::{CatRecord, ChatMessage, CityForecast, KeySlot, RequestSequence, StockHistory};

use crate::config::PanelDefaults;

/// Spinner frames for loading states
pub const SPINNERS: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Tick interval while anything animates
pub const LOADING_ANIM_TICK_MS: u64 = 120;

pub const CHAT_GREETING: &str = "👋 I'm Gemini, Feel free to ask everthing";
pub const CHAT_SUGGESTIONS: [&str; 2] = [
    "How's the weather in Tokyo Today",
    "How many budget sould I prepare for one week trip in Tokyo ",
];
pub const CHAT_MISSING_KEY: &str = "Please enter the available Gemini API Key";
pub const PLACES_MISSING_KEY: &str = "Please enter your Gemini API Key.";
pub const STOCK_MISSING_CODE: &str = "Please enter a stock code.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    Chat,
    Places,
    Weather,
    Stock,
    Cats,
}

impl PanelId {
    pub const ALL: [PanelId; 5] = [
        PanelId::Chat,
        PanelId::Places,
        PanelId::Weather,
        PanelId::Stock,
        PanelId::Cats,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PanelId::Chat => "Gemini Chat",
            PanelId::Places => "Places",
            PanelId::Weather => "Weather",
            PanelId::Stock => "Stock",
            PanelId::Cats => "Cats",
        }
    }

    pub fn index(self) -> usize {
        match self {
            PanelId::Chat => 0,
            PanelId::Places => 1,
            PanelId::Weather => 2,
            PanelId::Stock => 3,
            PanelId::Cats => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Key slot of panels that carry an API key form
    pub fn key_slot(self) -> Option<KeySlot> {
        match self {
            PanelId::Chat => Some(KeySlot::Chat),
            PanelId::Places => Some(KeySlot::Places),
            _ => None,
        }
    }
}

/// Lifecycle of one fetched value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Load<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Load<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Load::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Load::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Load::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// API key input plus its "remember" toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyForm {
    pub slot: KeySlot,
    pub value: String,
    pub remember: bool,
}

impl KeyForm {
    pub fn new(slot: KeySlot) -> Self {
        Self {
            slot,
            value: String::new(),
            remember: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatField {
    ApiKey,
    Model,
    #[default]
    Message,
}

impl ChatField {
    const ORDER: [ChatField; 3] = [ChatField::ApiKey, ChatField::Model, ChatField::Message];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacesField {
    ApiKey,
    #[default]
    Query,
}

impl PlacesField {
    pub fn toggle(self) -> Self {
        match self {
            PlacesField::ApiKey => PlacesField::Query,
            PlacesField::Query => PlacesField::ApiKey,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    pub key: KeyForm,
    pub model: String,
    pub input: String,
    pub history: Vec<ChatMessage>,
    /// Sequence of the request awaiting a reply
    pub pending: Option<u64>,
    pub error: Option<String>,
    pub focus: ChatField,
}

impl ChatState {
    pub fn new(defaults: &PanelDefaults) -> Self {
        Self {
            key: KeyForm::new(KeySlot::Chat),
            model: defaults.chat_model.clone(),
            input: defaults.chat_starter.clone(),
            history: vec![ChatMessage::assistant(CHAT_GREETING)],
            pending: None,
            error: None,
            focus: ChatField::Message,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacesState {
    pub key: KeyForm,
    pub query: String,
    pub result: Load<String>,
    pub focus: PlacesField,
}

impl PlacesState {
    pub fn new(defaults: &PanelDefaults) -> Self {
        Self {
            key: KeyForm::new(KeySlot::Places),
            query: defaults.places_query.clone(),
            result: Load::Idle,
            focus: PlacesField::Query,
        }
    }

    pub fn key_focused(&self) -> bool {
        self.focus == PlacesField::ApiKey
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherState {
    /// City typed into the form
    pub city: String,
    pub forecast: Load<CityForecast>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockState {
    pub code: String,
    pub history: Load<StockHistory>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatState {
    pub cat: Load<CatRecord>,
}

/// The mounted panel and its state. Switching panels drops the old state.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Chat(ChatState),
    Places(PlacesState),
    Weather(WeatherState),
    Stock(StockState),
    Cats(CatState),
}

impl Panel {
    pub fn id(&self) -> PanelId {
        match self {
            Panel::Chat(_) => PanelId::Chat,
            Panel::Places(_) => PanelId::Places,
            Panel::Weather(_) => PanelId::Weather,
            Panel::Stock(_) => PanelId::Stock,
            Panel::Cats(_) => PanelId::Cats,
        }
    }

    pub fn is_loading(&self) -> bool {
        match self {
            Panel::Chat(chat) => chat.is_loading(),
            Panel::Places(places) => places.result.is_loading(),
            Panel::Weather(weather) => weather.forecast.is_loading(),
            Panel::Stock(stock) => stock.history.is_loading(),
            Panel::Cats(cats) => cats.cat.is_loading(),
        }
    }
}

/// Request counters, one per panel. Kept across remounts so a reply to a
/// request from an earlier mount is never current.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sequences {
    pub chat: RequestSequence,
    pub places: RequestSequence,
    pub weather: RequestSequence,
    pub stock: RequestSequence,
    pub cats: RequestSequence,
}

impl Sequences {
    pub fn get(&self, id: PanelId) -> &RequestSequence {
        match id {
            PanelId::Chat => &self.chat,
            PanelId::Places => &self.places,
            PanelId::Weather => &self.weather,
            PanelId::Stock => &self.stock,
            PanelId::Cats => &self.cats,
        }
    }

    pub fn get_mut(&mut self, id: PanelId) -> &mut RequestSequence {
        match id {
            PanelId::Chat => &mut self.chat,
            PanelId::Places => &mut self.places,
            PanelId::Weather => &mut self.weather,
            PanelId::Stock => &mut self.stock,
            PanelId::Cats => &mut self.cats,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub panel: Panel,
    pub sequences: Sequences,
    pub defaults: PanelDefaults,
    /// False until the first `PanelSelect`
    pub mounted: bool,
    /// Drives spinner frames
    pub tick_count: u64,
}

impl AppState {
    /// State before the first mount. The initial panel gets mounted by a
    /// `PanelSelect` action so its mount effects run.
    pub fn new(defaults: PanelDefaults) -> Self {
        Self {
            panel: Panel::Chat(ChatState::new(&defaults)),
            sequences: Sequences::default(),
            defaults,
            mounted: false,
            tick_count: 0,
        }
    }

    pub fn active(&self) -> PanelId {
        self.panel.id()
    }

    pub fn spinner(&self) -> &'static str {
        SPINNERS[(self.tick_count as usize) % SPINNERS.len()]
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PanelDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_cycle_wraps() {
        assert_eq!(PanelId::Cats.next(), PanelId::Chat);
        assert_eq!(PanelId::Chat.prev(), PanelId::Cats);
        assert_eq!(PanelId::from_index(2), Some(PanelId::Weather));
        assert_eq!(PanelId::from_index(5), None);
        for id in PanelId::ALL {
            assert_eq!(PanelId::from_index(id.index()), Some(id));
        }
    }

    #[test]
    fn test_chat_state_is_seeded() {
        let chat = ChatState::new(&PanelDefaults::default());
        assert_eq!(chat.history, vec![ChatMessage::assistant(CHAT_GREETING)]);
        assert_eq!(chat.model, "gemini-2.5-flash");
        assert!(chat.key.remember);
        assert!(!chat.is_loading());
    }

    #[test]
    fn test_chat_focus_cycle() {
        assert_eq!(ChatField::Message.next(), ChatField::ApiKey);
        assert_eq!(ChatField::ApiKey.prev(), ChatField::Message);
        assert_eq!(ChatField::ApiKey.next(), ChatField::Model);
    }

    #[test]
    fn test_spinner_cycles() {
        let mut state = AppState::default();
        let first = state.spinner();
        state.tick_count = 4;
        assert_eq!(state.spinner(), first);
        state.tick_count = 1;
        assert_ne!(state.spinner(), first);
    }
}
