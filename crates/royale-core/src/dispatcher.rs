//! Turns a user message into exactly one transcript reply.
//!
//! Every failure mode collapses into a fixed in-character line; callers never
//! see an error.

use std::sync::Arc;

use crate::catalog::PodcastChannel;
use crate::chat::{ChatSession, OutboundTurn};
use crate::config::ChatConfig;
use crate::gemini::{ChatBackend, ChatRequest, GeminiBackend};
use crate::persona;

pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "System Failure: API Key missing. The transmission is broken.";
pub const PROTOCOL_ERROR_MESSAGE: &str =
    "Protocol Error. The cosmic energies are interfering. Try again.";
pub const EMPTY_RESPONSE_FALLBACK: &str = "Static... The signal is lost.";

/// Where the API key comes from. Environment lookups happen on every send.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    Env(String),
    Fixed(Option<String>),
}

impl CredentialSource {
    /// The key, or `None` when unset or empty.
    pub fn resolve(&self) -> Option<String> {
        let key = match self {
            Self::Env(var) => std::env::var(var).ok(),
            Self::Fixed(key) => key.clone(),
        };
        key.filter(|k| !k.trim().is_empty())
    }
}

#[derive(Clone)]
pub struct ChatDispatcher {
    backend: Arc<dyn ChatBackend>,
    credential: CredentialSource,
    model: String,
    system_instruction: String,
}

impl ChatDispatcher {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        credential: CredentialSource,
        model: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            credential,
            model: model.into(),
            system_instruction: system_instruction.into(),
        }
    }

    /// Gemini backend, key from `config.api_key_env`, persona from `channel`.
    pub fn from_config(config: &ChatConfig, channel: &PodcastChannel) -> Self {
        let backend = GeminiBackend::new().with_base_url(config.base_url.clone());
        Self::new(
            Arc::new(backend),
            CredentialSource::Env(config.api_key_env.clone()),
            config.model.clone(),
            persona::system_instruction(channel),
        )
    }

    pub fn has_credential(&self) -> bool {
        self.credential.resolve().is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Reply text for one turn. Makes at most one backend call.
    pub async fn resolve(&self, turn: &OutboundTurn) -> String {
        let Some(credential) = self.credential.resolve() else {
            tracing::warn!("chat: no API key configured, skipping request");
            return MISSING_CREDENTIAL_MESSAGE.to_string();
        };

        let request = ChatRequest {
            model: self.model.clone(),
            system_instruction: self.system_instruction.clone(),
            history: turn.history.clone(),
            message: turn.message.clone(),
        };

        match self.backend.send_message(&credential, &request).await {
            Ok(Some(text)) if !text.trim().is_empty() => {
                tracing::debug!("chat: reply received ({} chars)", text.len());
                text
            }
            Ok(_) => {
                tracing::warn!("chat: empty reply from model");
                EMPTY_RESPONSE_FALLBACK.to_string()
            }
            Err(e) => {
                tracing::error!("chat: request failed: {}", e);
                PROTOCOL_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// Run a whole turn against `session`. Returns `false` if nothing was sent.
    pub async fn send(&self, session: &mut ChatSession, input: &str) -> bool {
        let Some(turn) = session.begin_send(input) else {
            return false;
        };
        let reply = self.resolve(&turn).await;
        session.complete(reply);
        true
    }
}
