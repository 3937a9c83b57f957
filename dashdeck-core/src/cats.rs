//! TheCatAPI random image with breed info

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::http::{FetchClient, HttpRequest, with_query};

pub const MYSTERY_BREED_NAME: &str = "Mystery Cat";
pub const MYSTERY_BREED_DESCRIPTION: &str =
    "A beautiful cat of unknown origin. Just enjoy the cuteness!";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Breed {
    pub name: String,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub life_span: Option<String>,
    #[serde(default)]
    pub temperament: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatRecord {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default, rename = "breeds")]
    breeds: Vec<Breed>,
}

impl CatRecord {
    /// First listed breed, if the image carries any.
    pub fn breed(&self) -> Option<&Breed> {
        self.breeds.first()
    }

    pub fn breed_name(&self) -> &str {
        self.breed().map_or(MYSTERY_BREED_NAME, |b| b.name.as_str())
    }

    pub fn description(&self) -> &str {
        self.breed()
            .and_then(|b| b.description.as_deref())
            .unwrap_or(MYSTERY_BREED_DESCRIPTION)
    }
}

pub struct CatClient {
    fetch: FetchClient,
    url: String,
    api_key: Option<String>,
}

impl CatClient {
    pub fn new(fetch: FetchClient, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            fetch,
            url: url.into(),
            api_key,
        }
    }

    fn request(&self) -> HttpRequest {
        let url = with_query(
            &self.url,
            &[
                ("size", "med"),
                ("mime_types", "jpg"),
                ("format", "json"),
                ("has_breeds", "true"),
                ("order", "RANDOM"),
                ("page", "0"),
                ("limit", "1"),
            ],
        );
        let request = HttpRequest::get(url);
        match self.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => request.header("x-api-key", key),
            None => request,
        }
    }

    /// One random cat. An empty result list is an upstream failure.
    pub async fn random(&self) -> Result<CatRecord> {
        tracing::info!(keyed = self.api_key.is_some(), "fetching random cat");
        let cats: Vec<CatRecord> = self.fetch.fetch(self.request()).await?;
        cats.into_iter().next().ok_or_else(|| Error::Upstream {
            message: "No cat found".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::fake::ScriptedTransport;

    const BENGAL: &str = r#"[{
        "id": "O3btzLlsO",
        "url": "https://cdn2.thecatapi.com/images/O3btzLlsO.png",
        "width": 1100,
        "height": 739,
        "breeds": [{
            "id": "beng",
            "name": "Bengal",
            "origin": "United States",
            "life_span": "12 - 15",
            "temperament": "Alert, Agile, Energetic",
            "description": "Bengals are a lot of fun to live with."
        }]
    }]"#;

    #[tokio::test]
    async fn test_random_with_breed_and_key_header() {
        let transport = ScriptedTransport::ok(200, BENGAL);
        let client = CatClient::new(
            FetchClient::new(transport.clone()),
            "https://cats.test/v1/images/search",
            Some("live_key".into()),
        );

        let cat = client.random().await.unwrap();
        assert_eq!(cat.id, "O3btzLlsO");
        assert_eq!(cat.width, Some(1100));
        assert_eq!(cat.breed_name(), "Bengal");
        assert_eq!(
            cat.breed().and_then(|b| b.life_span.as_deref()),
            Some("12 - 15")
        );

        let request = transport.last_request();
        assert!(request.url.contains("has_breeds=true"));
        assert!(request.url.ends_with("limit=1"));
        assert!(
            request
                .headers
                .contains(&("x-api-key".to_string(), "live_key".to_string()))
        );
    }

    #[tokio::test]
    async fn test_missing_breed_falls_back() {
        let transport = ScriptedTransport::ok(200, r#"[{"id":"a1","url":"https://c.test/a1.jpg"}]"#);
        let client = CatClient::new(FetchClient::new(transport.clone()), "https://cats.test", None);

        let cat = client.random().await.unwrap();
        assert_eq!(cat.breed_name(), MYSTERY_BREED_NAME);
        assert_eq!(cat.description(), MYSTERY_BREED_DESCRIPTION);
        assert!(transport.last_request().headers.is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_is_upstream_error() {
        let transport = ScriptedTransport::ok(200, "[]");
        let client = CatClient::new(FetchClient::new(transport), "https://cats.test", None);
        assert!(matches!(
            client.random().await.unwrap_err(),
            Error::Upstream { .. }
        ));
    }
}
