//! Command-line arguments and the resolved application config

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use dashdeck_core::Endpoints;
use dashdeck_core::config::{DEFAULT_CHAT_MODEL, RELAY_PROXY_URL};

use crate::state::PanelId;

pub const DEFAULT_CITY: &str = "臺北市";
pub const DEFAULT_STOCK_CODE: &str = "2330";
pub const DEFAULT_PLACES_QUERY: &str = "Taipei Xinyi District cafe";
pub const CHAT_STARTER: &str = "Hi! Could you pealse suggest me some tourist spots in Tokyo";
pub const NO_SUCH_CITY_MESSAGE: &str =
    "查無此縣市資料，請輸入完整的縣市名稱（如：臺北市、新竹縣）";

/// Terminal dashboard: Gemini chat, places search, CWA weather, TWSE stocks, cats
#[derive(Parser, Debug, Clone)]
#[command(name = "dashdeck", version)]
#[command(about = "A terminal dashboard of API-backed panels")]
pub struct Args {
    /// Panel shown on start
    #[arg(long, short, value_enum, default_value_t = PanelArg::Chat)]
    pub panel: PanelArg,

    /// City for the weather panel
    #[arg(long, default_value = DEFAULT_CITY)]
    pub city: String,

    /// Stock code for the stock panel
    #[arg(long, default_value = DEFAULT_STOCK_CODE)]
    pub stock_code: String,

    /// CWA open-data authorization key
    #[arg(long, env = "CWA_API_KEY")]
    pub cwa_key: Option<String>,

    /// TheCatAPI key (optional)
    #[arg(long, env = "CAT_API_KEY")]
    pub cat_key: Option<String>,

    /// CORS relay the stock request goes through
    #[arg(long, env = "DASHDECK_RELAY", default_value = RELAY_PROXY_URL)]
    pub relay: String,

    /// Call TWSE directly instead of through the relay
    #[arg(long)]
    pub no_relay: bool,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Directory holding remembered API keys
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelArg {
    Chat,
    Places,
    Weather,
    Stock,
    Cats,
}

impl From<PanelArg> for PanelId {
    fn from(arg: PanelArg) -> Self {
        match arg {
            PanelArg::Chat => PanelId::Chat,
            PanelArg::Places => PanelId::Places,
            PanelArg::Weather => PanelId::Weather,
            PanelArg::Stock => PanelId::Stock,
            PanelArg::Cats => PanelId::Cats,
        }
    }
}

/// What a freshly mounted panel starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelDefaults {
    pub initial_panel: PanelId,
    pub chat_model: String,
    pub chat_starter: String,
    pub places_query: String,
    pub city: String,
    pub stock_code: String,
    /// Shown verbatim when the weather service knows no such city
    pub no_such_city: String,
}

impl Default for PanelDefaults {
    fn default() -> Self {
        Self {
            initial_panel: PanelId::Chat,
            chat_model: DEFAULT_CHAT_MODEL.into(),
            chat_starter: CHAT_STARTER.into(),
            places_query: DEFAULT_PLACES_QUERY.into(),
            city: DEFAULT_CITY.into(),
            stock_code: DEFAULT_STOCK_CODE.into(),
            no_such_city: NO_SUCH_CITY_MESSAGE.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoints: Endpoints,
    pub defaults: PanelDefaults,
    /// `None` keeps remembered keys in memory only
    pub key_store_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_args(args: Args) -> Self {
        let blank_to_none = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let endpoints = Endpoints {
            weather_key: blank_to_none(args.cwa_key),
            cat_key: blank_to_none(args.cat_key),
            relay: if args.no_relay || args.relay.trim().is_empty() {
                None
            } else {
                Some(args.relay)
            },
            ..Endpoints::default()
        };

        let defaults = PanelDefaults {
            initial_panel: args.panel.into(),
            city: args.city,
            stock_code: args.stock_code,
            ..PanelDefaults::default()
        };

        let key_store_path = match args.config_dir {
            Some(dir) => Some(dir.join("keys.json")),
            None => dashdeck_core::JsonFileStore::default_path(),
        };

        Self {
            endpoints,
            defaults,
            key_store_path,
            log_file: args.log_file,
            timeout: Duration::from_secs(args.timeout.max(1)),
        }
    }
}
