//! End-to-end flows through the runtime: reducer, effect handler, tasks,
//! with a transport that answers by upstream.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dashdeck::action::Action;
use dashdeck::config::PanelDefaults;
use dashdeck::dispatch::{EffectContext, Runtime, Store};
use dashdeck::effect::Effect;
use dashdeck::handler::EffectHandler;
use dashdeck::reducer::reducer;
use dashdeck::state::{AppState, ChatField, Load, Panel, PanelId};
use dashdeck_core::{
    Clients, Endpoints, HttpRequest, HttpResponse, KeySlot, KeyValueStore, MemoryStore, Transport,
};

const FORECAST: &str = r#"{
    "records": {
        "location": [{
            "locationName": "Taipei",
            "weatherElement": [
                {"elementName": "Wx", "time": [{"startTime": "2025-06-01 06:00:00", "endTime": "2025-06-01 18:00:00", "parameter": {"parameterName": "Cloudy"}}]},
                {"elementName": "PoP", "time": [{"startTime": "2025-06-01 06:00:00", "endTime": "2025-06-01 18:00:00", "parameter": {"parameterName": "20"}}]},
                {"elementName": "MinT", "time": [{"startTime": "2025-06-01 06:00:00", "endTime": "2025-06-01 18:00:00", "parameter": {"parameterName": "26"}}]},
                {"elementName": "CI", "time": [{"startTime": "2025-06-01 06:00:00", "endTime": "2025-06-01 18:00:00", "parameter": {"parameterName": "Hot"}}]},
                {"elementName": "MaxT", "time": [{"startTime": "2025-06-01 06:00:00", "endTime": "2025-06-01 18:00:00", "parameter": {"parameterName": "33"}}]}
            ]
        }]
    }
}"#;
const NO_LOCATION: &str = r#"{"records": {"location": []}}"#;
const CAT: &str = r#"[{"id": "abc", "url": "https://cdn2.thecatapi.com/images/abc.jpg"}]"#;
const REPLY: &str = r#"{"candidates": [{"content": {"parts": [{"text": "Pack an umbrella."}]}}]}"#;

/// Routes by upstream host and records every URL.
#[derive(Default)]
struct RoutingTransport {
    urls: Mutex<Vec<String>>,
}

impl RoutingTransport {
    fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RoutingTransport {
    async fn send(&self, request: HttpRequest) -> dashdeck_core::Result<HttpResponse> {
        self.urls.lock().unwrap().push(request.url.clone());
        let url = &request.url;
        let body = if url.contains("thecatapi") {
            CAT
        } else if url.contains("opendata.cwa") {
            if url.contains("Nowhere") { NO_LOCATION } else { FORECAST }
        } else if url.contains("generativelanguage") {
            REPLY
        } else {
            return Ok(HttpResponse::new(404, "not found"));
        };
        Ok(HttpResponse::new(200, body))
    }
}

struct Harness {
    runtime: Runtime<AppState, Action, Effect>,
    handler: EffectHandler,
    transport: Arc<RoutingTransport>,
    store: Arc<MemoryStore>,
}

impl Harness {
    fn new() -> Self {
        let transport = Arc::new(RoutingTransport::default());
        let endpoints = Endpoints {
            weather_key: Some("CWA-TEST".into()),
            relay: None,
            ..Endpoints::default()
        };
        let clients = Arc::new(Clients::new(&endpoints, transport.clone()));
        let store = Arc::new(MemoryStore::new());
        let handler = EffectHandler::new(clients, store.clone(), "no such city");
        let app = Store::new(AppState::new(PanelDefaults::default()), reducer);
        Self {
            runtime: Runtime::new(app),
            handler,
            transport,
            store,
        }
    }

    fn state(&self) -> &AppState {
        self.runtime.state()
    }

    /// Dispatch and run effects for everything queued right now.
    fn drain(&mut self) -> usize {
        let handler = &self.handler;
        let mut handle = |effect: Effect, ctx: &mut EffectContext<'_, Action>| handler.handle(effect, ctx);
        self.runtime.drain_queued(&mut handle)
    }

    fn send(&mut self, action: Action) {
        self.runtime.enqueue(action);
        self.drain();
    }

    /// Keep draining until `done` holds or a second passes.
    async fn settle(&mut self, done: impl Fn(&AppState) -> bool) {
        let wait = async {
            while !done(self.state()) {
                tokio::task::yield_now().await;
                self.drain();
            }
        };
        tokio::time::timeout(Duration::from_secs(1), wait)
            .await
            .expect("state never settled");
    }
}

#[tokio::test]
async fn test_cats_fetch_on_mount() {
    let mut h = Harness::new();
    h.send(Action::PanelSelect(PanelId::Cats));
    assert!(h.state().panel.is_loading());

    h.settle(|s| matches!(&s.panel, Panel::Cats(c) if c.cat.ready().is_some()))
        .await;
    let Panel::Cats(cats) = &h.state().panel else {
        panic!("cats panel not mounted");
    };
    assert_eq!(cats.cat.ready().map(|c| c.breed_name()), Some("Mystery Cat"));
}

#[tokio::test]
async fn test_weather_mount_fetch_and_empty_location() {
    let mut h = Harness::new();
    h.send(Action::PanelSelect(PanelId::Weather));
    h.settle(|s| matches!(&s.panel, Panel::Weather(w) if !w.forecast.is_loading()))
        .await;
    let Panel::Weather(weather) = &h.state().panel else {
        panic!("weather panel not mounted");
    };
    let forecast = weather.forecast.ready().expect("forecast loaded");
    assert_eq!(forecast.city, "Taipei");
    assert_eq!(forecast.periods.len(), 1);
    assert_eq!(forecast.periods[0].max_temp, "33");

    h.send(Action::WeatherCityChange("Nowhere".into()));
    h.send(Action::WeatherFetch);
    h.settle(|s| matches!(&s.panel, Panel::Weather(w) if !w.forecast.is_loading()))
        .await;
    let Panel::Weather(weather) = &h.state().panel else {
        panic!("weather panel not mounted");
    };
    assert_eq!(weather.forecast, Load::Failed("no such city".into()));
}

#[tokio::test]
async fn test_switching_panels_cancels_in_flight_fetch() {
    let mut h = Harness::new();
    // Both mounts run before any spawned task gets polled
    h.runtime.enqueue(Action::PanelSelect(PanelId::Cats));
    h.runtime.enqueue(Action::PanelSelect(PanelId::Weather));
    h.drain();

    h.settle(|s| matches!(&s.panel, Panel::Weather(w) if !w.forecast.is_loading()))
        .await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
        h.drain();
    }

    assert_eq!(h.state().active(), PanelId::Weather);
    assert!(
        h.transport.urls().iter().all(|u| !u.contains("thecatapi")),
        "cancelled cat task must not reach the network: {:?}",
        h.transport.urls()
    );
}

#[tokio::test]
async fn test_stale_result_is_ignored() {
    let mut h = Harness::new();
    h.send(Action::PanelSelect(PanelId::Cats));
    h.settle(|s| matches!(&s.panel, Panel::Cats(c) if !c.cat.is_loading()))
        .await;
    h.send(Action::CatFetch);
    h.settle(|s| matches!(&s.panel, Panel::Cats(c) if !c.cat.is_loading()))
        .await;
    let first_seq = h.state().sequences.cats.latest() - 1;
    let before = h.state().clone();

    h.send(Action::CatDidError {
        seq: first_seq,
        message: "late".into(),
    });
    assert_eq!(h.state(), &before);
}

#[tokio::test]
async fn test_chat_uses_remembered_key_and_appends_reply() {
    let mut h = Harness::new();
    h.store
        .set(KeySlot::Chat.key_name(), "AIza-remembered")
        .unwrap();

    h.send(Action::PanelSelect(PanelId::Chat));
    // LoadKey answers synchronously through the queue
    h.drain();
    let Panel::Chat(chat) = &h.state().panel else {
        panic!("chat panel not mounted");
    };
    assert_eq!(chat.key.value, "AIza-remembered");
    assert_eq!(chat.focus, ChatField::Message);

    h.send(Action::ChatInputChange("Weather in Tokyo?".into()));
    h.send(Action::ChatSend);
    assert!(h.state().panel.is_loading());

    h.settle(|s| !s.panel.is_loading()).await;
    let Panel::Chat(chat) = &h.state().panel else {
        panic!("chat panel not mounted");
    };
    let texts: Vec<&str> = chat.history.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts[1..], ["Weather in Tokyo?", "Pack an umbrella."]);
    assert!(chat.input.is_empty());
    assert!(
        h.transport
            .urls()
            .iter()
            .any(|u| u.contains("gemini-2.5-flash:generateContent"))
    );
}

#[tokio::test]
async fn test_remember_toggle_round_trips_through_store() {
    let mut h = Harness::new();
    h.send(Action::PanelSelect(PanelId::Places));
    h.drain();

    h.send(Action::KeyChange(KeySlot::Places, "AIza-typed".into()));
    assert_eq!(
        h.store.get(KeySlot::Places.key_name()).as_deref(),
        Some("AIza-typed")
    );

    h.send(Action::KeyRememberToggle(KeySlot::Places));
    assert_eq!(h.store.get(KeySlot::Places.key_name()), None);

    h.send(Action::KeyRememberToggle(KeySlot::Places));
    assert_eq!(
        h.store.get(KeySlot::Places.key_name()).as_deref(),
        Some("AIza-typed")
    );
}
