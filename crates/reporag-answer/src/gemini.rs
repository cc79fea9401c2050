use serde::{Deserialize, Serialize};
use thiserror::Error;

use reporag_core::config::LlmSettings;
use reporag_core::traits::Generator;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Blocking client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { http: reqwest::blocking::Client::new(), base_url: base_url.into(), model: model.into(), api_key: api_key.into() }
    }

    /// Read the API key from the environment variable named in `llm.api_key_env`.
    pub fn from_settings(llm: &LlmSettings) -> reporag_core::Result<Self> {
        let api_key = std::env::var(&llm.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| reporag_core::Error::InvalidConfiguration(format!("{} environment variable is not set", llm.api_key_env)))?;
        Ok(Self::new(&llm.base_url, &llm.model, api_key))
    }

    pub fn model(&self) -> &str { &self.model }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
    }

    pub fn generate_content(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = GenerateRequest { contents: vec![Content { parts: vec![Part { text: prompt }] }] };
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "generateContent");
        let response = self.http.post(self.endpoint()).header("x-goog-api-key", &self.api_key).json(&request).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerateError::Status { status: status.as_u16(), body });
        }
        let body: GenerateResponse = serde_json::from_str(&response.text()?)?;
        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        Ok(text.trim().to_string())
    }
}

impl Generator for GeminiClient {
    fn generate(&self, prompt: &str) -> anyhow::Result<String> { Ok(self.generate_content(prompt)?) }
}
