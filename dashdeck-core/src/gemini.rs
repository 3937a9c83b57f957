//! Gemini `generateContent` client for the chat and places panels

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::chat::{ChatMessage, Role};
use crate::error::{Error, Result};
use crate::http::{FetchClient, HttpRequest, decode_success, parse_value};
use crate::retry::RetryPolicy;

pub const NO_CHAT_CONTENT: &str = "[No content]";
pub const NO_PLACES_CONTENT: &str = "The model returned no content.";

pub const PLACES_SYSTEM_PROMPT: &str = "You are a professional location search assistant. \
Please use the Google search tool to find a list of relevant Google Maps locations, addresses, \
ratings, and a brief description based on the user's query, and return the results in a clear \
Markdown list format.";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.is_empty())
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

/// Extract the first candidate's first text part from a raw response value.
pub fn reply_text(value: Value) -> Result<Option<String>> {
    let response: GenerateResponse = parse_value(value)?;
    Ok(response.first_text())
}

// ============================================================================
// Client
// ============================================================================

pub struct GeminiClient {
    fetch: FetchClient,
    base_url: String,
    places_model: String,
    retry: RetryPolicy,
}

impl GeminiClient {
    pub fn new(fetch: FetchClient, base_url: impl Into<String>, places_model: impl Into<String>) -> Self {
        Self {
            fetch,
            base_url: base_url.into(),
            places_model: places_model.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self, model: &str, api_key: &str) -> String {
        format!(
            "{}{}:generateContent?key={}",
            self.base_url,
            model,
            urlencoding::encode(api_key)
        )
    }

    /// Send the whole conversation and return the model's reply.
    pub async fn chat(&self, api_key: &str, model: &str, history: &[ChatMessage]) -> Result<String> {
        if api_key.trim().is_empty() {
            return Err(Error::missing_input("Please enter the available Gemini API Key"));
        }

        let payload = GenerateRequest {
            contents: history
                .iter()
                .map(|m| Content {
                    role: Some(wire_role(m.role)),
                    parts: vec![Part { text: &m.text }],
                })
                .collect(),
            tools: Vec::new(),
            system_instruction: None,
        };

        tracing::info!(model, turns = history.len(), "sending chat request");
        let value = self
            .fetch
            .fetch_json(HttpRequest::post(
                self.endpoint(model, api_key),
                serde_json::to_value(&payload)?,
            ))
            .await?;
        Ok(reply_text(value)?.unwrap_or_else(|| NO_CHAT_CONTENT.to_string()))
    }

    /// Search-grounded location lookup. Retries 429/5xx with backoff.
    pub async fn search_places(&self, api_key: &str, query: &str) -> Result<String> {
        if api_key.trim().is_empty() {
            return Err(Error::missing_input("Please enter your Gemini API Key."));
        }
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::missing_input("Please enter a place to search for."));
        }

        let payload = GenerateRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part { text: query }],
            }],
            tools: vec![json!({ "google_search": {} })],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: PLACES_SYSTEM_PROMPT,
                }],
            }),
        };
        let request = HttpRequest::post(
            self.endpoint(&self.places_model, api_key),
            serde_json::to_value(&payload)?,
        );

        tracing::info!(model = %self.places_model, "sending places search");
        let response = self
            .retry
            .run(|| self.fetch.send_raw(request.clone()))
            .await?;
        let value = decode_success(&response)?;
        Ok(reply_text(value)?.unwrap_or_else(|| NO_PLACES_CONTENT.to_string()))
    }
}
