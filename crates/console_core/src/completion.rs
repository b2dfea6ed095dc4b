//! Completion service seam and the Anthropic messages API adapter.

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::ChatRole,
    error::ApiError,
    protocol::{ErrorEnvelope, MessagesRequest, MessagesResponse, WireMessage},
};
use tracing::debug;
use url::Url;

use crate::{
    config::AnthropicSettings,
    error::{CompletionFailed, FailureCause},
};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<String, CompletionFailed>;
}

/// Stands in when no API key is configured; every call fails as an auth error.
pub struct MissingCompletionService {
    reason: String,
}

impl MissingCompletionService {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl CompletionService for MissingCompletionService {
    async fn complete(
        &self,
        _system_instruction: &str,
        _user_message: &str,
    ) -> Result<String, CompletionFailed> {
        Err(CompletionFailed::new(FailureCause::Auth, self.reason.clone()))
    }
}

pub struct AnthropicCompletionService {
    http: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl AnthropicCompletionService {
    pub fn from_settings(settings: &AnthropicSettings) -> Result<Self, CompletionFailed> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|err| CompletionFailed::transport(format!("failed to build http client: {err}")))?;
        let endpoint = messages_endpoint(&settings.base_url)?;
        Ok(Self {
            http,
            endpoint,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn messages_endpoint(base_url: &str) -> Result<Url, CompletionFailed> {
    let mut base = Url::parse(base_url.trim()).map_err(|err| {
        CompletionFailed::transport(format!("invalid completion base url '{base_url}': {err}"))
    })?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("v1/messages").map_err(|err| {
        CompletionFailed::transport(format!("invalid completion base url '{base_url}': {err}"))
    })
}

#[async_trait]
impl CompletionService for AnthropicCompletionService {
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<String, CompletionFailed> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: system_instruction.to_string(),
            messages: vec![WireMessage {
                role: ChatRole::User,
                content: user_message.to_string(),
            }],
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                CompletionFailed::transport(format!("failed to reach completion endpoint: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| format!("completion endpoint returned {status}"));
            return Err(ApiError::from_status(status.as_u16(), message).into());
        }

        let body: MessagesResponse = response.json().await.map_err(|err| {
            CompletionFailed::malformed(format!("invalid completion response payload: {err}"))
        })?;
        debug!(
            model = %self.model,
            response_id = ?body.id,
            stop_reason = ?body.stop_reason,
            "completion received"
        );

        body.first_text()
            .map(str::to_string)
            .ok_or_else(|| CompletionFailed::malformed("completion response contained no text block"))
    }
}

#[cfg(test)]
#[path = "tests/completion_tests.rs"]
mod tests;
