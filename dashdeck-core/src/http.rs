//! Fetch client: transport seam, JSON decoding and error classification
//!
//! `Transport` moves bytes; `FetchClient` turns a response into JSON or an
//! [`Error`]. Production uses [`ReqwestTransport`]; tests script a fake.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// HTTP method used by the panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request ready to be sent by a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Raw status and body as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Status 429 or any 5xx.
    pub fn is_retryable(&self) -> bool {
        self.status == 429 || self.status >= 500
    }

    /// Human-readable failure detail: `error.message` from the JSON body when
    /// present, otherwise the status code.
    pub fn error_detail(&self) -> String {
        serde_json::from_str::<Value>(&self.body)
            .ok()
            .and_then(|v| {
                v.pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| format!("HTTP Error! Status code: {}", self.status))
    }
}

/// Sends one request. Only transport failures are errors here; any status
/// code comes back as a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// `reqwest`-backed transport.
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Network(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Post => self.http.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse { status, body })
    }
}

/// Wrap `target` through a CORS relay: `proxy?url=<encoded target>`.
pub fn relay_url(proxy_base: &str, target: &str) -> String {
    format!("{}?url={}", proxy_base, urlencoding::encode(target))
}

/// Build `base?k=v&...` with every value percent-encoded.
pub fn with_query(base: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return base.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}?{query}")
}

/// Classifies responses and decodes JSON bodies.
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn Transport>,
}

impl FetchClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send without classifying the status. Used by the retry policy.
    pub async fn send_raw(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.transport.send(request).await
    }

    /// Send and decode a 2xx JSON body.
    pub async fn fetch_json(&self, request: HttpRequest) -> Result<Value> {
        let response = self.send_raw(request).await?;
        decode_success(&response)
    }

    /// Send and decode a 2xx body into a typed response.
    pub async fn fetch<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        let value = self.fetch_json(request).await?;
        parse_value(value)
    }
}

/// Turn a response into JSON, or `Http`/`Decode` errors.
pub fn decode_success(response: &HttpResponse) -> Result<Value> {
    if !response.is_success() {
        return Err(Error::Http {
            status: response.status,
            message: response.error_detail(),
        });
    }
    Ok(serde_json::from_str(&response.body)?)
}

/// Validate a JSON value against a typed response shape.
pub fn parse_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}


#[cfg(test)]
mod tests {
    use super::fake::ScriptedTransport;
    use super::*;

    #[test]
    fn test_relay_url_encodes_target() {
        let url = relay_url(
            "https://api.allorigins.win/raw",
            "https://www.twse.com.tw/exchangeReport/STOCK_DAY?response=json&date=20240101&stockNo=2330",
        );
        assert_eq!(
            url,
            "https://api.allorigins.win/raw?url=https%3A%2F%2Fwww.twse.com.tw%2FexchangeReport%2FSTOCK_DAY%3Fresponse%3Djson%26date%3D20240101%26stockNo%3D2330"
        );
    }

    #[test]
    fn test_with_query_encodes_values() {
        let url = with_query("https://x.test/a", &[("locationName", "臺北市"), ("format", "JSON")]);
        assert_eq!(
            url,
            "https://x.test/a?locationName=%E8%87%BA%E5%8C%97%E5%B8%82&format=JSON"
        );
        assert_eq!(with_query("https://x.test/a", &[]), "https://x.test/a");
    }

    #[test]
    fn test_error_detail_prefers_body_message() {
        let resp = HttpResponse::new(400, r#"{"error":{"code":400,"message":"API key not valid"}}"#);
        assert_eq!(resp.error_detail(), "API key not valid");

        let resp = HttpResponse::new(502, "<html>bad gateway</html>");
        assert_eq!(resp.error_detail(), "HTTP Error! Status code: 502");
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(HttpResponse::new(429, "").is_retryable());
        assert!(HttpResponse::new(500, "").is_retryable());
        assert!(HttpResponse::new(503, "").is_retryable());
        assert!(!HttpResponse::new(404, "").is_retryable());
        assert!(!HttpResponse::new(200, "").is_retryable());
    }

    #[tokio::test]
    async fn test_fetch_json_success() {
        let transport = ScriptedTransport::ok(200, r#"{"stat":"OK"}"#);
        let client = FetchClient::new(transport.clone());

        let value = client.fetch_json(HttpRequest::get("https://x.test")).await.unwrap();
        assert_eq!(value["stat"], "OK");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_json_http_error() {
        let transport = ScriptedTransport::ok(404, "not found");
        let client = FetchClient::new(transport);

        let err = client.fetch_json(HttpRequest::get("https://x.test")).await.unwrap_err();
        assert_eq!(
            err,
            Error::Http {
                status: 404,
                message: "HTTP Error! Status code: 404".into()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_json_decode_error() {
        let transport = ScriptedTransport::ok(200, "<html>");
        let client = FetchClient::new(transport);

        let err = client.fetch_json(HttpRequest::get("https://x.test")).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_network_error_passes_through() {
        let transport = ScriptedTransport::new([Err(Error::Network("dns".into()))]);
        let client = FetchClient::new(transport);

        let err = client.fetch_json(HttpRequest::get("https://x.test")).await.unwrap_err();
        assert_eq!(err, Error::Network("dns".into()));
    }

    #[tokio::test]
    async fn test_fetch_typed_shape_mismatch_is_decode() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Shape {
            stat: String,
        }

        let transport = ScriptedTransport::ok(200, r#"{"stat": 5}"#);
        let client = FetchClient::new(transport);

        let err = client
            .fetch::<Shape>(HttpRequest::get("https://x.test"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
