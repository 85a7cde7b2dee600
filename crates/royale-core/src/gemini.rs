//! Google Gemini chat backend.
//!
//! https://ai.google.dev/api/generate-content
//!
//! Every call builds its own HTTP client and request body from the
//! `ChatRequest` it is given; nothing is cached between turns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::transcript::{HistoryEntry, HistoryPart, Role};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Everything one turn needs: model, persona, prior turns and the new message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub system_instruction: String,
    pub history: Vec<HistoryEntry>,
    pub message: String,
}

/// Sends one chat turn to a hosted model.
///
/// `Ok(None)` means the service answered but produced no text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_message(
        &self,
        credential: &str,
        request: &ChatRequest,
    ) -> Result<Option<String>, ChatError>;
}

#[derive(Debug, Clone)]
pub struct GeminiBackend {
    base_url: String,
}

impl GeminiBackend {
    pub fn new() -> Self {
        Self {
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

impl Default for GeminiBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatBackend for GeminiBackend {
    async fn send_message(
        &self,
        credential: &str,
        request: &ChatRequest,
    ) -> Result<Option<String>, ChatError> {
        let url = self.endpoint(&request.model);
        let payload = build_request(request);
        tracing::debug!(
            "gemini: POST {} (history={} turns)",
            url,
            request.history.len()
        );

        let client = reqwest::Client::new();
        let resp = client
            .post(&url)
            .header("x-goog-api-key", credential)
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ChatError::Api { status, message });
        }

        let body = resp.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        Ok(parsed.text())
    }
}

fn build_request(request: &ChatRequest) -> GenerateContentRequest {
    let mut contents = request.history.clone();
    contents.push(HistoryEntry::new(Role::User, request.message.clone()));
    GenerateContentRequest {
        contents,
        system_instruction: SystemInstruction {
            parts: vec![HistoryPart {
                text: request.system_instruction.clone(),
            }],
        },
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<HistoryEntry>,
    system_instruction: SystemInstruction,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<HistoryPart>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate; `None` when blank.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
