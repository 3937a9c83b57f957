//! Reducer - pure function: (state, action) -> DispatchResult<Effect>
//!
//! All state mutation happens here. Network and storage work is returned as
//! [`Effect`]s. Async results are applied only when their sequence number is
//! the panel's latest and the panel that asked is still mounted.

use dashdeck_core::{ChatMessage, KeySlot};

use crate::action::Action;
use crate::dispatch::DispatchResult;
use crate::effect::Effect;
use crate::state::{
    AppState, CHAT_MISSING_KEY, CHAT_SUGGESTIONS, CatState, ChatState, KeyForm, Load,
    PLACES_MISSING_KEY, Panel, PanelId, PlacesState, STOCK_MISSING_CODE, StockState,
    WeatherState,
};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Panel switching =====
        Action::PanelSelect(id) => {
            if state.mounted && state.active() == id {
                return DispatchResult::unchanged();
            }
            mount(state, id)
        }
        Action::PanelNext => {
            let next = state.active().next();
            mount(state, next)
        }
        Action::PanelPrev => {
            let prev = state.active().prev();
            mount(state, prev)
        }
        Action::FocusNext | Action::FocusPrev => {
            let forward = matches!(action, Action::FocusNext);
            match &mut state.panel {
                Panel::Chat(chat) => {
                    chat.focus = if forward { chat.focus.next() } else { chat.focus.prev() };
                    DispatchResult::changed()
                }
                Panel::Places(places) => {
                    places.focus = places.focus.toggle();
                    DispatchResult::changed()
                }
                _ => DispatchResult::unchanged(),
            }
        }

        // ===== API key form =====
        Action::KeyDidLoad(slot, value) => {
            let Some(form) = key_form(&mut state.panel, slot) else {
                return DispatchResult::unchanged();
            };
            match value {
                Some(saved) if !saved.is_empty() => {
                    form.value = saved;
                    DispatchResult::changed()
                }
                _ => DispatchResult::unchanged(),
            }
        }
        Action::KeyChange(slot, value) => {
            let Some(form) = key_form(&mut state.panel, slot) else {
                return DispatchResult::unchanged();
            };
            form.value = value;
            if form.remember {
                DispatchResult::changed_with(Effect::PersistKey {
                    slot,
                    value: Some(form.value.clone()),
                })
            } else {
                DispatchResult::changed()
            }
        }
        Action::KeyRememberToggle(slot) => {
            let Some(form) = key_form(&mut state.panel, slot) else {
                return DispatchResult::unchanged();
            };
            form.remember = !form.remember;
            if !form.remember {
                DispatchResult::changed_with(Effect::PersistKey { slot, value: None })
            } else if !form.value.is_empty() {
                DispatchResult::changed_with(Effect::PersistKey {
                    slot,
                    value: Some(form.value.clone()),
                })
            } else {
                DispatchResult::changed()
            }
        }

        // ===== Chat =====
        Action::ChatModelChange(model) => {
            let Panel::Chat(chat) = &mut state.panel else {
                return DispatchResult::unchanged();
            };
            chat.model = model;
            DispatchResult::changed()
        }
        Action::ChatInputChange(input) => {
            let Panel::Chat(chat) = &mut state.panel else {
                return DispatchResult::unchanged();
            };
            chat.input = input;
            DispatchResult::changed()
        }
        Action::ChatSend => {
            let content = match &state.panel {
                Panel::Chat(chat) => chat.input.clone(),
                _ => return DispatchResult::unchanged(),
            };
            chat_send(state, content)
        }
        Action::ChatSuggest(index) => match CHAT_SUGGESTIONS.get(index) {
            Some(text) => chat_send(state, (*text).to_string()),
            None => DispatchResult::unchanged(),
        },
        Action::ChatDidReply { seq, text } => {
            let Some(chat) = pending_chat(state, seq) else {
                return DispatchResult::unchanged();
            };
            chat.pending = None;
            chat.history.push(ChatMessage::assistant(text));
            DispatchResult::changed()
        }
        Action::ChatDidError { seq, message } => {
            let Some(chat) = pending_chat(state, seq) else {
                return DispatchResult::unchanged();
            };
            chat.pending = None;
            chat.error = Some(message);
            DispatchResult::changed()
        }

        // ===== Places =====
        Action::PlacesQueryChange(query) => {
            let Panel::Places(places) = &mut state.panel else {
                return DispatchResult::unchanged();
            };
            places.query = query;
            DispatchResult::changed()
        }
        Action::PlacesSearch => {
            let Panel::Places(places) = &mut state.panel else {
                return DispatchResult::unchanged();
            };
            let query = places.query.trim().to_string();
            if query.is_empty() || places.result.is_loading() {
                return DispatchResult::unchanged();
            }
            if places.key.is_empty() {
                places.result = Load::Failed(PLACES_MISSING_KEY.into());
                return DispatchResult::changed();
            }
            let seq = state.sequences.places.begin();
            places.result = Load::Loading;
            DispatchResult::changed_with(Effect::SearchPlaces {
                seq,
                api_key: places.key.value.trim().to_string(),
                query,
            })
        }
        Action::PlacesDidLoad { seq, text } => {
            settle(state, PanelId::Places, seq, |panel| {
                if let Panel::Places(places) = panel {
                    places.result = Load::Ready(text);
                }
            })
        }
        Action::PlacesDidError { seq, message } => {
            settle(state, PanelId::Places, seq, |panel| {
                if let Panel::Places(places) = panel {
                    places.result = Load::Failed(message);
                }
            })
        }

        // ===== Weather =====
        Action::WeatherCityChange(city) => {
            let Panel::Weather(weather) = &mut state.panel else {
                return DispatchResult::unchanged();
            };
            weather.city = city;
            DispatchResult::changed()
        }
        Action::WeatherFetch => {
            let Panel::Weather(weather) = &mut state.panel else {
                return DispatchResult::unchanged();
            };
            let city = weather.city.trim().to_string();
            if city.is_empty() {
                return DispatchResult::unchanged();
            }
            let seq = state.sequences.weather.begin();
            weather.forecast = Load::Loading;
            DispatchResult::changed_with(Effect::FetchWeather { seq, city })
        }
        Action::WeatherDidLoad { seq, forecast } => {
            settle(state, PanelId::Weather, seq, |panel| {
                if let Panel::Weather(weather) = panel {
                    weather.forecast = Load::Ready(forecast);
                }
            })
        }
        Action::WeatherDidError { seq, message } => {
            settle(state, PanelId::Weather, seq, |panel| {
                if let Panel::Weather(weather) = panel {
                    weather.forecast = Load::Failed(message);
                }
            })
        }

        // ===== Stock =====
        Action::StockCodeChange(code) => {
            let Panel::Stock(stock) = &mut state.panel else {
                return DispatchResult::unchanged();
            };
            stock.code = code;
            DispatchResult::changed()
        }
        Action::StockFetch => {
            let Panel::Stock(stock) = &mut state.panel else {
                return DispatchResult::unchanged();
            };
            match start_stock_fetch(stock, state.sequences.stock.begin()) {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::changed(),
            }
        }
        Action::StockDidLoad { seq, history } => {
            settle(state, PanelId::Stock, seq, |panel| {
                if let Panel::Stock(stock) = panel {
                    stock.history = Load::Ready(history);
                }
            })
        }
        Action::StockDidError { seq, message } => {
            settle(state, PanelId::Stock, seq, |panel| {
                if let Panel::Stock(stock) = panel {
                    stock.history = Load::Failed(message);
                }
            })
        }

        // ===== Cats =====
        Action::CatFetch => {
            let Panel::Cats(cats) = &mut state.panel else {
                return DispatchResult::unchanged();
            };
            let seq = state.sequences.cats.begin();
            cats.cat = Load::Loading;
            DispatchResult::changed_with(Effect::FetchCat { seq })
        }
        Action::CatDidLoad { seq, cat } => {
            settle(state, PanelId::Cats, seq, |panel| {
                if let Panel::Cats(cats) = panel {
                    cats.cat = Load::Ready(cat);
                }
            })
        }
        Action::CatDidError { seq, message } => {
            settle(state, PanelId::Cats, seq, |panel| {
                if let Panel::Cats(cats) = panel {
                    cats.cat = Load::Failed(message);
                }
            })
        }

        // ===== Global =====
        Action::Tick => {
            state.tick_count = state.tick_count.wrapping_add(1);
            if state.panel.is_loading() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // Quit is handled by the runtime loop
        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Replace the mounted panel with fresh state and run its mount effects.
fn mount(state: &mut AppState, id: PanelId) -> DispatchResult<Effect> {
    let mut effects = Vec::new();
    if state.mounted {
        effects.push(Effect::CancelPanel(state.active()));
    }
    state.mounted = true;

    let defaults = &state.defaults;
    match id {
        PanelId::Chat => {
            state.panel = Panel::Chat(ChatState::new(defaults));
            effects.push(Effect::LoadKey(KeySlot::Chat));
        }
        PanelId::Places => {
            state.panel = Panel::Places(PlacesState::new(defaults));
            effects.push(Effect::LoadKey(KeySlot::Places));
        }
        PanelId::Weather => {
            let city = defaults.city.trim().to_string();
            let seq = state.sequences.weather.begin();
            state.panel = Panel::Weather(WeatherState {
                city: city.clone(),
                forecast: Load::Loading,
            });
            effects.push(Effect::FetchWeather { seq, city });
        }
        PanelId::Stock => {
            let mut stock = StockState {
                code: defaults.stock_code.clone(),
                history: Load::Idle,
            };
            if let Some(effect) = start_stock_fetch(&mut stock, state.sequences.stock.begin()) {
                effects.push(effect);
            }
            state.panel = Panel::Stock(stock);
        }
        PanelId::Cats => {
            let seq = state.sequences.cats.begin();
            state.panel = Panel::Cats(CatState { cat: Load::Loading });
            effects.push(Effect::FetchCat { seq });
        }
    }

    DispatchResult::changed_with_many(effects)
}

/// Empty code fails without a request.
fn start_stock_fetch(stock: &mut StockState, seq: u64) -> Option<Effect> {
    let code = stock.code.trim().to_string();
    if code.is_empty() {
        stock.history = Load::Failed(STOCK_MISSING_CODE.into());
        return None;
    }
    stock.history = Load::Loading;
    Some(Effect::FetchStock { seq, code })
}

fn chat_send(state: &mut AppState, content: String) -> DispatchResult<Effect> {
    let Panel::Chat(chat) = &mut state.panel else {
        return DispatchResult::unchanged();
    };
    let content = content.trim().to_string();
    if content.is_empty() || chat.is_loading() {
        return DispatchResult::unchanged();
    }
    if chat.key.is_empty() {
        chat.error = Some(CHAT_MISSING_KEY.into());
        return DispatchResult::changed();
    }

    let seq = state.sequences.chat.begin();
    chat.error = None;
    chat.history.push(ChatMessage::user(content));
    chat.input.clear();
    chat.pending = Some(seq);

    let model = match chat.model.trim() {
        "" => state.defaults.chat_model.clone(),
        model => model.to_string(),
    };
    DispatchResult::changed_with(Effect::SendChat {
        seq,
        api_key: chat.key.value.trim().to_string(),
        model,
        history: chat.history.clone(),
    })
}

fn pending_chat(state: &mut AppState, seq: u64) -> Option<&mut ChatState> {
    if !state.sequences.chat.is_current(seq) {
        return None;
    }
    match &mut state.panel {
        Panel::Chat(chat) if chat.pending == Some(seq) => Some(chat),
        _ => None,
    }
}

/// Apply a result for `id` if it answers the latest request and `id` is
/// still mounted.
fn settle<F>(state: &mut AppState, id: PanelId, seq: u64, apply: F) -> DispatchResult<Effect>
where
    F: FnOnce(&mut Panel),
{
    if state.active() != id || !state.sequences.get(id).is_current(seq) {
        tracing::debug!(panel = ?id, seq, "dropping stale result");
        return DispatchResult::unchanged();
    }
    apply(&mut state.panel);
    DispatchResult::changed()
}

fn key_form(panel: &mut Panel, slot: KeySlot) -> Option<&mut KeyForm> {
    match panel {
        Panel::Chat(chat) if chat.key.slot == slot => Some(&mut chat.key),
        Panel::Places(places) if places.key.slot == slot => Some(&mut places.key),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelDefaults;
    use dashdeck_core::{CityForecast, Role, StockHistory};

    fn mounted(id: PanelId) -> AppState {
        let mut state = AppState::new(PanelDefaults::default());
        reducer(&mut state, Action::PanelSelect(id));
        state
    }

    fn chat(state: &AppState) -> &ChatState {
        match &state.panel {
            Panel::Chat(chat) => chat,
            other => panic!("expected chat panel, got {other:?}"),
        }
    }

    fn forecast(city: &str) -> CityForecast {
        CityForecast {
            city: city.into(),
            periods: vec![],
        }
    }

    #[test]
    fn test_initial_mount_has_no_cancel() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::PanelSelect(PanelId::Chat));
        assert!(result.changed);
        assert_eq!(result.effects, vec![Effect::LoadKey(KeySlot::Chat)]);

        // Selecting the mounted panel again does nothing
        let result = reducer(&mut state, Action::PanelSelect(PanelId::Chat));
        assert_eq!(result, DispatchResult::unchanged());
    }

    #[test]
    fn test_weather_mount_fetches_immediately() {
        let mut state = mounted(PanelId::Chat);
        let result = reducer(&mut state, Action::PanelSelect(PanelId::Weather));

        assert_eq!(
            result.effects,
            vec![
                Effect::CancelPanel(PanelId::Chat),
                Effect::FetchWeather {
                    seq: 1,
                    city: "臺北市".into()
                },
            ]
        );
        match &state.panel {
            Panel::Weather(weather) => assert!(weather.forecast.is_loading()),
            other => panic!("expected weather panel, got {other:?}"),
        }
    }

    #[test]
    fn test_remount_resets_state_and_drops_old_results() {
        let mut state = mounted(PanelId::Weather);
        reducer(&mut state, Action::PanelSelect(PanelId::Cats));
        let result = reducer(&mut state, Action::PanelSelect(PanelId::Weather));
        assert!(result.effects.contains(&Effect::CancelPanel(PanelId::Cats)));

        // Reply to the first mount's request arrives late
        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                seq: 1,
                forecast: forecast("臺北市"),
            },
        );
        assert!(!result.changed);

        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                seq: 2,
                forecast: forecast("臺北市"),
            },
        );
        assert!(result.changed);
        match &state.panel {
            Panel::Weather(weather) => assert_eq!(weather.forecast.ready(), Some(&forecast("臺北市"))),
            other => panic!("expected weather panel, got {other:?}"),
        }
    }

    #[test]
    fn test_stale_stock_result_is_discarded() {
        let mut state = mounted(PanelId::Stock);
        reducer(&mut state, Action::StockCodeChange("0050".into()));
        let result = reducer(&mut state, Action::StockFetch);
        assert_eq!(
            result.effects,
            vec![Effect::FetchStock {
                seq: 2,
                code: "0050".into()
            }]
        );

        let old = StockHistory {
            title: "2330".into(),
            rows: vec![],
        };
        reducer(&mut state, Action::StockDidLoad { seq: 1, history: old });
        let Panel::Stock(stock) = &state.panel else {
            panic!("expected stock panel");
        };
        assert!(stock.history.is_loading());

        reducer(
            &mut state,
            Action::StockDidError {
                seq: 2,
                message: "boom".into(),
            },
        );
        let Panel::Stock(stock) = &state.panel else {
            panic!("expected stock panel");
        };
        assert_eq!(stock.history.error(), Some("boom"));
    }

    #[test]
    fn test_empty_stock_code_fails_without_request() {
        let mut state = mounted(PanelId::Stock);
        reducer(&mut state, Action::StockCodeChange("  ".into()));
        let result = reducer(&mut state, Action::StockFetch);
        assert!(result.changed);
        assert!(!result.has_effects());
        let Panel::Stock(stock) = &state.panel else {
            panic!("expected stock panel");
        };
        assert_eq!(stock.history.error(), Some(STOCK_MISSING_CODE));
    }

    #[test]
    fn test_empty_city_is_ignored() {
        let mut state = mounted(PanelId::Weather);
        reducer(&mut state, Action::WeatherCityChange(" ".into()));
        let result = reducer(&mut state, Action::WeatherFetch);
        assert!(!result.changed);
        assert!(!result.has_effects());
    }

    #[test]
    fn test_chat_send_without_key_sets_error() {
        let mut state = mounted(PanelId::Chat);
        let result = reducer(&mut state, Action::ChatSend);
        assert!(result.changed);
        assert!(!result.has_effects());
        assert_eq!(chat(&state).error.as_deref(), Some(CHAT_MISSING_KEY));
        assert_eq!(chat(&state).history.len(), 1);
    }

    #[test]
    fn test_chat_send_round_trip() {
        let mut state = mounted(PanelId::Chat);
        reducer(&mut state, Action::KeyDidLoad(KeySlot::Chat, Some("k".into())));
        reducer(&mut state, Action::ChatModelChange(" ".into()));
        reducer(&mut state, Action::ChatInputChange(" hello ".into()));

        let result = reducer(&mut state, Action::ChatSend);
        let [Effect::SendChat { seq, api_key, model, history }] = result.effects.as_slice() else {
            panic!("expected one SendChat, got {:?}", result.effects);
        };
        assert_eq!(api_key, "k");
        assert_eq!(model, "gemini-2.5-flash");
        assert_eq!(history.len(), 2);
        assert_eq!(history[1], ChatMessage::user("hello"));
        assert!(chat(&state).input.is_empty());
        assert!(chat(&state).is_loading());

        // Sending while loading is ignored
        reducer(&mut state, Action::ChatInputChange("again".into()));
        assert_eq!(reducer(&mut state, Action::ChatSend), DispatchResult::unchanged());

        reducer(
            &mut state,
            Action::ChatDidReply {
                seq: *seq,
                text: "Tokyo Tower".into(),
            },
        );
        let chat = chat(&state);
        assert!(!chat.is_loading());
        assert_eq!(chat.history.last().map(|m| m.role), Some(Role::Assistant));
    }

    #[test]
    fn test_chat_error_keeps_user_message() {
        let mut state = mounted(PanelId::Chat);
        reducer(&mut state, Action::KeyChange(KeySlot::Chat, "k".into()));
        let result = reducer(&mut state, Action::ChatSuggest(0));
        assert!(matches!(result.effects.as_slice(), [Effect::SendChat { .. }]));

        reducer(
            &mut state,
            Action::ChatDidError {
                seq: 1,
                message: "API key not valid".into(),
            },
        );
        let chat = chat(&state);
        assert_eq!(chat.error.as_deref(), Some("API key not valid"));
        assert_eq!(chat.history.last(), Some(&ChatMessage::user(CHAT_SUGGESTIONS[0])));
    }

    #[test]
    fn test_remember_toggle_persists_and_removes() {
        let mut state = mounted(PanelId::Places);

        let result = reducer(&mut state, Action::KeyChange(KeySlot::Places, "abc".into()));
        assert_eq!(
            result.effects,
            vec![Effect::PersistKey {
                slot: KeySlot::Places,
                value: Some("abc".into())
            }]
        );

        let result = reducer(&mut state, Action::KeyRememberToggle(KeySlot::Places));
        assert_eq!(
            result.effects,
            vec![Effect::PersistKey {
                slot: KeySlot::Places,
                value: None
            }]
        );

        // Remember off: typing stores nothing
        let result = reducer(&mut state, Action::KeyChange(KeySlot::Places, "abcd".into()));
        assert!(!result.has_effects());

        let result = reducer(&mut state, Action::KeyRememberToggle(KeySlot::Places));
        assert_eq!(
            result.effects,
            vec![Effect::PersistKey {
                slot: KeySlot::Places,
                value: Some("abcd".into())
            }]
        );
    }

    #[test]
    fn test_key_actions_for_other_slot_are_ignored() {
        let mut state = mounted(PanelId::Chat);
        let result = reducer(&mut state, Action::KeyChange(KeySlot::Places, "x".into()));
        assert_eq!(result, DispatchResult::unchanged());
        assert!(chat(&state).key.value.is_empty());
    }

    #[test]
    fn test_places_search_requires_key() {
        let mut state = mounted(PanelId::Places);
        let result = reducer(&mut state, Action::PlacesSearch);
        assert!(!result.has_effects());
        let Panel::Places(places) = &state.panel else {
            panic!("expected places panel");
        };
        assert_eq!(places.result.error(), Some(PLACES_MISSING_KEY));

        reducer(&mut state, Action::KeyChange(KeySlot::Places, "k".into()));
        let result = reducer(&mut state, Action::PlacesSearch);
        assert!(result.effects.contains(&Effect::SearchPlaces {
            seq: 1,
            api_key: "k".into(),
            query: "Taipei Xinyi District cafe".into(),
        }));
    }

    #[test]
    fn test_result_for_unmounted_panel_is_dropped() {
        let mut state = mounted(PanelId::Cats);
        reducer(&mut state, Action::PanelSelect(PanelId::Stock));
        let result = reducer(
            &mut state,
            Action::CatDidError {
                seq: 1,
                message: "late".into(),
            },
        );
        assert!(!result.changed);
    }

    #[test]
    fn test_focus_cycles_within_panel() {
        let mut state = mounted(PanelId::Chat);
        reducer(&mut state, Action::FocusNext);
        assert_eq!(chat(&state).focus, crate::state::ChatField::ApiKey);
        reducer(&mut state, Action::FocusPrev);
        assert_eq!(chat(&state).focus, crate::state::ChatField::Message);

        let mut state = mounted(PanelId::Cats);
        assert!(!reducer(&mut state, Action::FocusNext).changed);
    }

    #[test]
    fn test_tick_only_rerenders_when_loading() {
        let mut state = mounted(PanelId::Chat);
        assert!(!reducer(&mut state, Action::Tick).changed);

        let mut state = mounted(PanelId::Cats);
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.tick_count, 1);
    }

    #[test]
    fn test_panel_next_wraps() {
        let mut state = mounted(PanelId::Cats);
        reducer(&mut state, Action::PanelNext);
        assert_eq!(state.active(), PanelId::Chat);
        reducer(&mut state, Action::PanelPrev);
        assert_eq!(state.active(), PanelId::Cats);
    }
}
