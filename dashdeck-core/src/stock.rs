//! TWSE monthly daily-history: wire types, client, and row mapper

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::{FetchClient, HttpRequest, decode_success, parse_value, relay_url, with_query};

/// `stat` value of a successful response.
pub const STAT_OK: &str = "OK";

/// Shown when a failed response carries no `stat` of its own.
pub const NO_DATA: &str = "查無資料，請確認股票代號";

const ROW_FIELDS: usize = 9;

#[derive(Debug, Deserialize)]
struct StockDayResponse {
    #[serde(default)]
    stat: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

/// Direction of a day's price change, inferred from the sign character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
    Flat,
}

impl ChangeDirection {
    /// Substring test on `+`/`-`. Values without an explicit sign (e.g.
    /// `"0.00"`) are `Flat`.
    pub fn classify(change: &str) -> Self {
        if change.contains('+') {
            ChangeDirection::Up
        } else if change.contains('-') {
            ChangeDirection::Down
        } else {
            ChangeDirection::Flat
        }
    }
}

/// One trading day: `[date, volume, turnover, open, high, low, close, change, trades]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRow {
    pub date: String,
    /// Shares, with thousands separators as sent
    pub volume: String,
    pub turnover: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub change: String,
    pub trades: String,
}

impl StockRow {
    /// Volume in thousands of shares, rounded to nearest.
    pub fn volume_thousands(&self) -> Option<u64> {
        volume_thousands(&self.volume)
    }

    pub fn direction(&self) -> ChangeDirection {
        ChangeDirection::classify(&self.change)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockHistory {
    pub title: String,
    pub rows: Vec<StockRow>,
}

/// `"12,345"` → `12`; `"12,500"` → `13`.
pub fn volume_thousands(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    let shares: u64 = digits.trim().parse().ok()?;
    Some(shares.saturating_add(500) / 1000)
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn map_row(index: usize, row: &[Value]) -> Result<StockRow> {
    if row.len() < ROW_FIELDS {
        return Err(Error::Decode(format!(
            "row {index} has {} fields, expected {ROW_FIELDS}",
            row.len()
        )));
    }
    Ok(StockRow {
        date: cell(&row[0]),
        volume: cell(&row[1]),
        turnover: cell(&row[2]),
        open: cell(&row[3]),
        high: cell(&row[4]),
        low: cell(&row[5]),
        close: cell(&row[6]),
        change: cell(&row[7]),
        trades: cell(&row[8]),
    })
}

/// Validate `stat` and map rows. Pure.
pub fn map_history(raw: &Value) -> Result<StockHistory> {
    let response: StockDayResponse = parse_value(raw.clone())?;
    if response.stat != STAT_OK {
        let message = match response.stat.trim() {
            "" => NO_DATA.to_string(),
            _ => response.stat,
        };
        return Err(Error::Upstream { message });
    }

    let rows = response
        .data
        .iter()
        .enumerate()
        .map(|(i, row)| map_row(i, row))
        .collect::<Result<Vec<_>>>()?;

    Ok(StockHistory {
        title: response.title.unwrap_or_default(),
        rows,
    })
}

/// `YYYYMM01` for the month containing `day`. TWSE returns the whole month
/// for any date inside it.
pub fn month_param(day: NaiveDate) -> String {
    format!("{:04}{:02}01", day.year(), day.month())
}

pub struct StockClient {
    fetch: FetchClient,
    url: String,
    relay: Option<String>,
}

impl StockClient {
    pub fn new(fetch: FetchClient, url: impl Into<String>, relay: Option<String>) -> Self {
        Self {
            fetch,
            url: url.into(),
            relay,
        }
    }

    pub fn request_url(&self, code: &str, month: NaiveDate) -> String {
        let target = with_query(
            &self.url,
            &[
                ("response", "json"),
                ("date", &month_param(month)),
                ("stockNo", code),
            ],
        );
        match self.relay.as_deref() {
            Some(proxy) => relay_url(proxy, &target),
            None => target,
        }
    }

    pub async fn daily_history(&self, code: &str, month: NaiveDate) -> Result<StockHistory> {
        let code = code.trim();
        if code.is_empty() {
            return Err(Error::missing_input("Please enter a stock code."));
        }
        tracing::info!(code, month = %month_param(month), relayed = self.relay.is_some(), "fetching stock history");
        let response = self
            .fetch
            .send_raw(HttpRequest::get(self.request_url(code, month)))
            .await?;
        if self.relay.is_some() && !response.is_success() {
            // the relay does not forward upstream statuses faithfully
            return Err(Error::Network(format!(
                "relay returned status {}",
                response.status
            )));
        }
        map_history(&decode_success(&response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::fake::ScriptedTransport;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "stat": "OK",
            "date": "20240501",
            "title": "113年05月 2330 台積電 各日成交資訊",
            "fields": ["日期","成交股數","成交金額","開盤價","最高價","最低價","收盤價","漲跌價差","成交筆數"],
            "data": [
                ["113/05/02","25,532,117","19,690,212,880","771.00","775.00","768.00","772.00","+1.50","27,567"],
                ["113/05/03","12,345","9,000,000","772.00","780.00","770.00","771.80","-0.20","9,100"],
                ["113/05/06","12,500","9,000,000","771.80","771.80","771.80","771.80"," 0.00","18"]
            ]
        })
    }

    #[test]
    fn test_volume_thousands() {
        assert_eq!(volume_thousands("12,345"), Some(12));
        assert_eq!(volume_thousands("12,500"), Some(13));
        assert_eq!(volume_thousands("25,532,117"), Some(25532));
        assert_eq!(volume_thousands("n/a"), None);
        assert_eq!(volume_thousands(&u64::MAX.to_string()), Some(u64::MAX / 1000));
    }

    #[test]
    fn test_change_classification() {
        assert_eq!(ChangeDirection::classify("+1.50"), ChangeDirection::Up);
        assert_eq!(ChangeDirection::classify("-0.20"), ChangeDirection::Down);
        assert_eq!(ChangeDirection::classify("0.00"), ChangeDirection::Flat);
        assert_eq!(ChangeDirection::classify("X0.00"), ChangeDirection::Flat);
    }

    #[test]
    fn test_map_history_rows() {
        let history = map_history(&document()).unwrap();
        assert_eq!(history.title, "113年05月 2330 台積電 各日成交資訊");
        assert_eq!(history.rows.len(), 3);

        let row = &history.rows[1];
        assert_eq!(row.date, "113/05/03");
        assert_eq!(row.volume_thousands(), Some(12));
        assert_eq!(row.close, "771.80");
        assert_eq!(row.direction(), ChangeDirection::Down);
        assert_eq!(history.rows[2].direction(), ChangeDirection::Flat);
    }

    #[test]
    fn test_non_ok_stat_is_upstream_error() {
        let raw = json!({ "stat": "很抱歉，沒有符合條件的資料!" });
        assert_eq!(
            map_history(&raw).unwrap_err(),
            Error::Upstream {
                message: "很抱歉，沒有符合條件的資料!".into()
            }
        );
    }

    #[test]
    fn test_blank_or_missing_stat_falls_back_to_no_data() {
        let no_data = Error::Upstream {
            message: NO_DATA.into(),
        };
        assert_eq!(map_history(&json!({ "stat": "" })).unwrap_err(), no_data);
        assert_eq!(map_history(&json!({ "total": 0 })).unwrap_err(), no_data);
    }

    #[test]
    fn test_short_row_is_decode_error() {
        let raw = json!({ "stat": "OK", "data": [["113/05/02", "1,000"]] });
        assert!(matches!(map_history(&raw).unwrap_err(), Error::Decode(_)));
    }

    #[test]
    fn test_mapping_is_pure() {
        let raw = document();
        assert_eq!(map_history(&raw).unwrap(), map_history(&raw).unwrap());
    }

    #[test]
    fn test_month_param() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(month_param(day), "20240501");
    }

    #[test]
    fn test_request_url_through_relay() {
        let transport = ScriptedTransport::ok(200, "{}");
        let client = StockClient::new(
            FetchClient::new(transport),
            "https://twse.test/STOCK_DAY",
            Some("https://relay.test/raw".into()),
        );
        let day = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(
            client.request_url("2330", day),
            "https://relay.test/raw?url=https%3A%2F%2Ftwse.test%2FSTOCK_DAY%3Fresponse%3Djson%26date%3D20240501%26stockNo%3D2330"
        );
    }

    #[tokio::test]
    async fn test_daily_history_direct() {
        let transport = ScriptedTransport::ok(200, &document().to_string());
        let client = StockClient::new(
            FetchClient::new(transport.clone()),
            "https://twse.test/STOCK_DAY",
            None,
        );
        let day = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();

        let history = client.daily_history("2330", day).await.unwrap();
        assert_eq!(history.rows.len(), 3);
        assert_eq!(
            transport.last_request().url,
            "https://twse.test/STOCK_DAY?response=json&date=20240501&stockNo=2330"
        );
    }

    #[tokio::test]
    async fn test_relay_failure_surfaces_as_network_error() {
        let transport = ScriptedTransport::ok(522, "origin timeout");
        let client = StockClient::new(
            FetchClient::new(transport),
            "https://twse.test/STOCK_DAY",
            Some("https://relay.test/raw".into()),
        );
        let day = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();

        let err = client.daily_history("2330", day).await.unwrap_err();
        assert_eq!(err, Error::Network("relay returned status 522".into()));
    }
}
