//! CWA 36-hour forecast: wire types, client, and the columnar-to-row mapper
//!
//! The upstream returns one series per weather element, each a list of time
//! buckets. The panel wants one record per bucket, so the mapper zips the
//! series by index, matching every series by its element name.

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::{FetchClient, HttpRequest, parse_value, with_query};

pub const CONDITION: &str = "Wx";
pub const RAIN_CHANCE: &str = "PoP";
pub const MIN_TEMP: &str = "MinT";
pub const MAX_TEMP: &str = "MaxT";
pub const COMFORT: &str = "CI";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    records: Option<Records>,
}

#[derive(Debug, Deserialize)]
struct Records {
    #[serde(default)]
    location: Vec<LocationRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationRecord {
    location_name: String,
    #[serde(default)]
    weather_element: Vec<Series>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Series {
    element_name: String,
    #[serde(default)]
    time: Vec<TimeBucket>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeBucket {
    start_time: String,
    end_time: String,
    parameter: Parameter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Parameter {
    parameter_name: String,
}

// ============================================================================
// Mapped types
// ============================================================================

/// One forecast window for a city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastPeriod {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Sky condition text (`Wx`)
    pub condition: String,
    /// Probability of precipitation, 0-100 (`PoP`)
    pub rain_chance: String,
    /// °C (`MinT`)
    pub min_temp: String,
    /// °C (`MaxT`)
    pub max_temp: String,
    /// Comfort index descriptor (`CI`)
    pub comfort: String,
}

impl ForecastPeriod {
    pub fn date_label(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// `HH:MM - HH:MM`
    pub fn time_range(&self) -> String {
        format!("{} - {}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityForecast {
    pub city: String,
    pub periods: Vec<ForecastPeriod>,
}

// ============================================================================
// Mapper
// ============================================================================

fn parse_time(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|e| Error::Decode(format!("bad timestamp {raw:?}: {e}")))
}

fn find_series<'a>(series: &'a [Series], name: &str) -> Result<&'a Series> {
    series
        .iter()
        .find(|s| s.element_name == name)
        .ok_or_else(|| Error::MissingSeries(name.to_string()))
}

fn value_at(series: &Series, index: usize) -> Result<String> {
    series
        .time
        .get(index)
        .map(|bucket| bucket.parameter.parameter_name.clone())
        .ok_or_else(|| {
            Error::Decode(format!(
                "series `{}` has no bucket {}",
                series.element_name, index
            ))
        })
}

/// Reshape a raw forecast document into rows. Pure.
pub fn map_forecast(raw: &Value) -> Result<CityForecast> {
    let response: ForecastResponse = parse_value(raw.clone())?;
    let location = response
        .records
        .and_then(|r| r.location.into_iter().next())
        .ok_or(Error::EmptyLocation)?;

    let elements = &location.weather_element;
    let condition = find_series(elements, CONDITION)?;
    let rain = find_series(elements, RAIN_CHANCE)?;
    let min_t = find_series(elements, MIN_TEMP)?;
    let max_t = find_series(elements, MAX_TEMP)?;
    let comfort = find_series(elements, COMFORT)?;

    let index = &elements
        .first()
        .ok_or_else(|| Error::MissingSeries(CONDITION.to_string()))?
        .time;

    let periods = index
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            Ok(ForecastPeriod {
                start: parse_time(&bucket.start_time)?,
                end: parse_time(&bucket.end_time)?,
                condition: value_at(condition, i)?,
                rain_chance: value_at(rain, i)?,
                min_temp: value_at(min_t, i)?,
                max_temp: value_at(max_t, i)?,
                comfort: value_at(comfort, i)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CityForecast {
        city: location.location_name,
        periods,
    })
}

// ============================================================================
// Client
// ============================================================================

pub struct WeatherClient {
    fetch: FetchClient,
    url: String,
    authorization: Option<String>,
}

impl WeatherClient {
    pub fn new(fetch: FetchClient, url: impl Into<String>, authorization: Option<String>) -> Self {
        Self {
            fetch,
            url: url.into(),
            authorization,
        }
    }

    pub async fn forecast(&self, city: &str) -> Result<CityForecast> {
        let city = city.trim();
        if city.is_empty() {
            return Err(Error::missing_input("Please enter a city name."));
        }
        let Some(key) = self.authorization.as_deref().filter(|k| !k.is_empty()) else {
            return Err(Error::missing_input(
                "CWA authorization key is not configured (set CWA_API_KEY).",
            ));
        };

        let url = with_query(
            &self.url,
            &[("Authorization", key), ("locationName", city), ("format", "JSON")],
        );
        tracing::info!(city, "fetching forecast");
        let raw = self.fetch.fetch_json(HttpRequest::get(url)).await?;
        map_forecast(&raw)
    }
}
