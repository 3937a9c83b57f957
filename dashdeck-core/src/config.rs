//! Upstream endpoints and credentials

pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/";
pub const CWA_FORECAST_URL: &str =
    "https://opendata.cwa.gov.tw/api/v1/rest/datastore/F-C0032-001";
pub const TWSE_STOCK_DAY_URL: &str = "https://www.twse.com.tw/exchangeReport/STOCK_DAY";
pub const CAT_SEARCH_URL: &str = "https://api.thecatapi.com/v1/images/search";
pub const RELAY_PROXY_URL: &str = "https://api.allorigins.win/raw";

pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PLACES_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Where each panel's upstream lives, plus the server-side credentials that
/// are configured rather than typed into a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub gemini_base: String,
    pub places_model: String,
    pub weather_url: String,
    /// CWA `Authorization` value; the weather panel refuses to fetch without it.
    pub weather_key: Option<String>,
    pub stock_url: String,
    /// CORS relay the stock request is wrapped through. `None` calls TWSE directly.
    pub relay: Option<String>,
    pub cat_url: String,
    pub cat_key: Option<String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            gemini_base: GEMINI_API_BASE_URL.into(),
            places_model: DEFAULT_PLACES_MODEL.into(),
            weather_url: CWA_FORECAST_URL.into(),
            weather_key: None,
            stock_url: TWSE_STOCK_DAY_URL.into(),
            relay: Some(RELAY_PROXY_URL.into()),
            cat_url: CAT_SEARCH_URL.into(),
            cat_key: None,
        }
    }
}
