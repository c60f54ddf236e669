use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("api key is required")]
    MissingKey,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("empty response from service")]
    EmptyResponse,
}

/// External language-judgment service. Callers treat the reply as opaque
/// text and are responsible for their own parsing and fallbacks; no error
/// from this boundary may reach a `recommend` caller.
#[async_trait]
pub trait Judge: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, JudgeError>;
}

/// Gemini-backed judgment service over the generateContent endpoint.
pub struct GeminiJudge {
    api_key: String,
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiJudge {
    pub fn new(api_key: String) -> Result<Self, JudgeError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Base URL override, used to point at a stub server in tests.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, JudgeError> {
        if api_key.is_empty() {
            return Err(JudgeError::MissingKey);
        }
        Ok(Self {
            api_key,
            client: Client::new(),
            base_url,
            model: DEFAULT_MODEL.to_string(),
        })
    }
}

#[async_trait]
impl Judge for GeminiJudge {
    async fn generate(&self, prompt: &str) -> Result<String, JudgeError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        debug!("sending judgment request to {}", self.model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("judgment request failed: {e}");
                JudgeError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("judgment service error ({status}): {body}");
            return Err(JudgeError::Status(status));
        }

        let reply: GenerateResponse = response.json().await?;
        reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(JudgeError::EmptyResponse)
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

/// Strips a markdown code fence (and an optional `json` tag) wrapped around
/// a service reply before it is parsed as JSON.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
