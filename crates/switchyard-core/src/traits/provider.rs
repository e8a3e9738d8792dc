// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote classifier provider trait.

use async_trait::async_trait;

use crate::error::SwitchyardError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ClassifierPrompt;

/// A remote AI service that can label a message.
///
/// Implementations return the provider's raw reply text. Interpreting it as
/// `module|confidence` is the router's job, so a provider never has to know
/// the label set beyond what the prompt tells it.
#[async_trait]
pub trait ClassifierProvider: PluginAdapter {
    /// Send one classification prompt and return the raw reply text.
    async fn classify(&self, prompt: &ClassifierPrompt) -> Result<String, SwitchyardError>;
}
