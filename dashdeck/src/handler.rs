//! Effect handler - runs the reducer's effects
//!
//! Network effects become tasks keyed by panel, so a new request replaces the
//! panel's previous one and unmounting cancels it. Key store effects are
//! synchronous and small.

use std::sync::Arc;

use dashdeck_core::{Clients, Error, KeyValueStore};

use crate::action::Action;
use crate::dispatch::EffectContext;
use crate::effect::Effect;
use crate::state::PanelId;

pub struct EffectHandler {
    clients: Arc<Clients>,
    store: Arc<dyn KeyValueStore>,
    no_such_city: String,
}

impl EffectHandler {
    pub fn new(clients: Arc<Clients>, store: Arc<dyn KeyValueStore>, no_such_city: impl Into<String>) -> Self {
        Self {
            clients,
            store,
            no_such_city: no_such_city.into(),
        }
    }

    pub fn handle(&self, effect: Effect, ctx: &mut EffectContext<'_, Action>) {
        match effect {
            Effect::LoadKey(slot) => {
                let saved = self.store.get(slot.key_name());
                ctx.emit(Action::KeyDidLoad(slot, saved));
            }
            Effect::PersistKey { slot, value } => {
                let result = match value {
                    Some(value) => self.store.set(slot.key_name(), &value),
                    None => self.store.remove(slot.key_name()),
                };
                if let Err(e) = result {
                    tracing::warn!(key = slot.key_name(), error = %e, "could not persist api key");
                }
            }
            Effect::SendChat {
                seq,
                api_key,
                model,
                history,
            } => {
                let clients = self.clients.clone();
                let no_such_city = self.no_such_city.clone();
                ctx.spawn(PanelId::Chat, seq, async move {
                    match clients.gemini.chat(&api_key, &model, &history).await {
                        Ok(text) => Action::ChatDidReply { seq, text },
                        Err(e) => Action::ChatDidError {
                            seq,
                            message: message_for(&e, &no_such_city),
                        },
                    }
                });
            }
            Effect::SearchPlaces { seq, api_key, query } => {
                let clients = self.clients.clone();
                let no_such_city = self.no_such_city.clone();
                ctx.spawn(PanelId::Places, seq, async move {
                    match clients.gemini.search_places(&api_key, &query).await {
                        Ok(text) => Action::PlacesDidLoad { seq, text },
                        Err(e) => Action::PlacesDidError {
                            seq,
                            message: message_for(&e, &no_such_city),
                        },
                    }
                });
            }
            Effect::FetchWeather { seq, city } => {
                let clients = self.clients.clone();
                let no_such_city = self.no_such_city.clone();
                ctx.spawn(PanelId::Weather, seq, async move {
                    match clients.weather.forecast(&city).await {
                        Ok(forecast) => Action::WeatherDidLoad { seq, forecast },
                        Err(e) => Action::WeatherDidError {
                            seq,
                            message: message_for(&e, &no_such_city),
                        },
                    }
                });
            }
            Effect::FetchStock { seq, code } => {
                let clients = self.clients.clone();
                let no_such_city = self.no_such_city.clone();
                let month = chrono::Local::now().date_naive();
                ctx.spawn(PanelId::Stock, seq, async move {
                    match clients.stock.daily_history(&code, month).await {
                        Ok(history) => Action::StockDidLoad { seq, history },
                        Err(e) => Action::StockDidError {
                            seq,
                            message: message_for(&e, &no_such_city),
                        },
                    }
                });
            }
            Effect::FetchCat { seq } => {
                let clients = self.clients.clone();
                let no_such_city = self.no_such_city.clone();
                ctx.spawn(PanelId::Cats, seq, async move {
                    match clients.cats.random().await {
                        Ok(cat) => Action::CatDidLoad { seq, cat },
                        Err(e) => Action::CatDidError {
                            seq,
                            message: message_for(&e, &no_such_city),
                        },
                    }
                });
            }
            Effect::CancelPanel(id) => ctx.cancel(id),
        }
    }
}

fn message_for(err: &Error, no_such_city: &str) -> String {
    tracing::warn!(error = %err, "request failed");
    error_message(err, no_such_city)
}

/// The one place an [`Error`] becomes the text a panel shows.
pub fn error_message(err: &Error, no_such_city: &str) -> String {
    match err {
        Error::EmptyLocation => no_such_city.to_string(),
        other => other.to_string(),
    }
}
