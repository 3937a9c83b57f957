//! Upstream clients, response mappers and persistence for dashdeck
//!
//! This crate has no terminal dependencies. Each panel of the dashboard is
//! backed by one client here:
//!
//! - [`GeminiClient`]: conversational chat and search-grounded places lookup
//! - [`WeatherClient`]: CWA 36-hour forecast, reshaped by [`weather::map_forecast`]
//! - [`StockClient`]: TWSE monthly daily history through a CORS relay
//! - [`CatClient`]: one random cat image with optional breed info
//!
//! Every client speaks through a [`FetchClient`], which owns the [`Transport`]
//! seam and turns statuses and bodies into [`Error`] variants.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use dashdeck_core::{Clients, Endpoints, ReqwestTransport};
//!
//! let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(60))?);
//! let clients = Clients::new(&Endpoints::default(), transport);
//! let forecast = clients.weather.forecast("臺北市").await?;
//! ```

pub mod cats;
pub mod chat;
pub mod config;
pub mod error;
pub mod gemini;
pub mod http;
pub mod keystore;
pub mod retry;
pub mod sequence;
pub mod stock;
pub mod weather;

use std::sync::Arc;

pub use cats::{Breed, CatClient, CatRecord};
pub use chat::{ChatMessage, Role};
pub use config::Endpoints;
pub use error::{Error, Result};
pub use gemini::GeminiClient;
pub use http::{FetchClient, HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use keystore::{JsonFileStore, KeySlot, KeyValueStore, MemoryStore};
pub use retry::RetryPolicy;
pub use sequence::RequestSequence;
pub use stock::{ChangeDirection, StockClient, StockHistory, StockRow};
pub use weather::{CityForecast, ForecastPeriod, WeatherClient};

/// One client per panel, sharing a transport.
pub struct Clients {
    pub gemini: GeminiClient,
    pub weather: WeatherClient,
    pub stock: StockClient,
    pub cats: CatClient,
}

impl Clients {
    pub fn new(endpoints: &Endpoints, transport: Arc<dyn Transport>) -> Self {
        let fetch = FetchClient::new(transport);
        Self {
            gemini: GeminiClient::new(
                fetch.clone(),
                endpoints.gemini_base.clone(),
                endpoints.places_model.clone(),
            ),
            weather: WeatherClient::new(
                fetch.clone(),
                endpoints.weather_url.clone(),
                endpoints.weather_key.clone(),
            ),
            stock: StockClient::new(
                fetch.clone(),
                endpoints.stock_url.clone(),
                endpoints.relay.clone(),
            ),
            cats: CatClient::new(fetch, endpoints.cat_url.clone(), endpoints.cat_key.clone()),
        }
    }
}
