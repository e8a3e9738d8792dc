// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic classifier provider for the Switchyard intent router.
//!
//! This crate implements [`ClassifierProvider`] over the Anthropic Messages
//! API: one non-streaming, single-turn request per classification, with the
//! label instruction sent as the system prompt.

pub mod client;
pub mod types;

use async_trait::async_trait;
use switchyard_config::model::AnthropicConfig;
use switchyard_core::error::SwitchyardError;
use switchyard_core::traits::{ClassifierProvider, PluginAdapter};
use switchyard_core::types::{ClassifierPrompt, HealthStatus};
use tracing::info;

use crate::client::AnthropicClient;
use crate::types::{ApiMessage, MessageRequest};

/// Remote classifier backed by Claude.
///
/// API key resolution order: config -> `ANTHROPIC_API_KEY` env var -> error.
pub struct AnthropicClassifier {
    client: AnthropicClient,
    max_tokens: u32,
}

impl AnthropicClassifier {
    /// Creates a classifier from the `[anthropic]` configuration section.
    ///
    /// # API Key Resolution
    /// 1. `config.api_key` if set and non-empty
    /// 2. `ANTHROPIC_API_KEY` environment variable
    /// 3. Returns [`SwitchyardError::Config`] if neither is available
    pub fn new(config: &AnthropicConfig) -> Result<Self, SwitchyardError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = AnthropicClient::new(
            api_key,
            config.api_version.clone(),
            config.model.clone(),
        )?;

        info!(model = config.model, "Anthropic classifier initialized");

        Ok(Self::with_client(client, config.max_tokens))
    }

    /// Creates a classifier around an existing client.
    pub fn with_client(client: AnthropicClient, max_tokens: u32) -> Self {
        Self { client, max_tokens }
    }

    fn to_message_request(&self, prompt: &ClassifierPrompt) -> MessageRequest {
        let content = format!(
            "{}\n\n(prior conversation turns: {})",
            prompt.message, prompt.history_length
        );
        MessageRequest {
            model: self.client.default_model().to_string(),
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content,
            }],
            system: Some(prompt.instruction.clone()),
            max_tokens: self.max_tokens,
            temperature: Some(0.0),
        }
    }
}

#[async_trait]
impl PluginAdapter for AnthropicClassifier {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, SwitchyardError> {
        // No API call here; a test request would spend tokens.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ClassifierProvider for AnthropicClassifier {
    async fn classify(&self, prompt: &ClassifierPrompt) -> Result<String, SwitchyardError> {
        let request = self.to_message_request(prompt);
        let response = self.client.complete_message(&request).await?;
        let text = response.text();
        if text.trim().is_empty() {
            return Err(SwitchyardError::MalformedResponse(format!(
                "empty reply (stop_reason: {})",
                response.stop_reason.as_deref().unwrap_or("none")
            )));
        }
        Ok(text)
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, SwitchyardError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("ANTHROPIC_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            SwitchyardError::Config(
                "Anthropic API key not found. Set anthropic.api_key in config or ANTHROPIC_API_KEY environment variable.".into(),
            )
        })
}
