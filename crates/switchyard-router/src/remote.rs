// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote classification tier.
//!
//! Sends a single-turn prompt to a [`ClassifierProvider`] and parses its
//! `module|confidence` reply. The call is raced against a hard deadline;
//! when the deadline wins, the in-flight future is dropped and the tier
//! declines. Short, non-question messages never reach the provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use switchyard_config::model::{RemoteConfig, RoutingConfig};
use switchyard_core::{
    ClassificationRequest, ClassificationResult, ClassifierPrompt, ClassifierProvider, Method,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::tier::Tier;

/// Longest reply excerpt kept in a [`RemoteFailure::Malformed`].
const REPLY_EXCERPT_CHARS: usize = 80;

/// Why the remote tier produced no result.
#[derive(Debug, Error)]
pub enum RemoteFailure {
    /// The provider returned an error (transport, HTTP status, auth).
    #[error("classifier provider failed: {0}")]
    Provider(String),

    /// The provider did not answer before the deadline.
    #[error("classifier did not answer within {0:?}")]
    Timeout(Duration),

    /// The reply did not contain a known `module|confidence` pair.
    #[error("unparseable classifier reply: {0:?}")]
    Malformed(String),
}

/// Decides whether a message is worth a remote call.
///
/// Statements pass when they are long in both characters and words.
/// Questions pass from a lower character count. Everything else stays
/// with the pattern tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexityGate {
    pub min_chars: usize,
    pub min_words: usize,
    pub question_min_chars: usize,
}

impl ComplexityGate {
    pub fn new(min_chars: usize, min_words: usize, question_min_chars: usize) -> Self {
        Self {
            min_chars,
            min_words,
            question_min_chars,
        }
    }

    pub fn from_config(config: &RemoteConfig) -> Self {
        Self::new(config.min_chars, config.min_words, config.question_min_chars)
    }

    /// Whether `text` should go to the remote tier. Lengths are in characters.
    pub fn admits(&self, text: &str) -> bool {
        let text = text.trim();
        let chars = text.chars().count();
        if text.contains('?') {
            return chars >= self.question_min_chars;
        }
        chars >= self.min_chars && text.split_whitespace().count() >= self.min_words
    }
}

impl Default for ComplexityGate {
    fn default() -> Self {
        Self::from_config(&RemoteConfig::default())
    }
}

/// The instruction sent with every remote classification.
pub fn build_instruction(labels: &[String]) -> String {
    format!(
        "You route messages from students on an education platform. \
         Classify the student's message into exactly one of these modules: {}. \
         Answer with a single line in the form module|confidence, where confidence \
         is a number between 0 and 1. Do not add any other text.",
        labels.join(", ")
    )
}

/// Parse a `module|confidence` reply.
///
/// Tolerates surrounding whitespace, quotes, backticks, and leading chatter
/// lines. The module must be one of `labels` (compared case-insensitively)
/// and the confidence a finite number in `[0, 1]`. Returns the canonical
/// label spelling.
pub fn parse_module_reply(reply: &str, labels: &[String]) -> Option<(String, f32)> {
    let strip = |s: &str| -> String {
        s.trim_matches(|c: char| c.is_whitespace() || matches!(c, '`' | '"' | '\'' | '*'))
            .to_string()
    };

    reply
        .lines()
        .filter(|line| line.contains('|'))
        .find_map(|line| {
            let (module, confidence) = line.split_once('|')?;
            let module = strip(module);
            let confidence: f32 = strip(confidence).parse().ok()?;
            if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
                return None;
            }
            let label = labels.iter().find(|l| l.eq_ignore_ascii_case(&module))?;
            Some((label.clone(), confidence))
        })
}

fn excerpt(reply: &str) -> String {
    reply.chars().take(REPLY_EXCERPT_CHARS).collect()
}

/// Tier backed by an external classifier.
pub struct RemoteTier {
    provider: Arc<dyn ClassifierProvider>,
    gate: ComplexityGate,
    deadline: Duration,
    labels: Vec<String>,
    instruction: String,
}

impl RemoteTier {
    pub fn new(
        provider: Arc<dyn ClassifierProvider>,
        gate: ComplexityGate,
        deadline: Duration,
        labels: Vec<String>,
    ) -> Self {
        let instruction = build_instruction(&labels);
        Self {
            provider,
            gate,
            deadline,
            labels,
            instruction,
        }
    }

    /// Build from the `[remote]` and `[routing]` sections.
    pub fn from_config(
        provider: Arc<dyn ClassifierProvider>,
        remote: &RemoteConfig,
        routing: &RoutingConfig,
    ) -> Self {
        Self::new(
            provider,
            ComplexityGate::from_config(remote),
            Duration::from_millis(remote.deadline_ms),
            routing.modules.clone(),
        )
    }

    pub fn gate(&self) -> ComplexityGate {
        self.gate
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Ask the provider, bounded by the deadline. Ignores the complexity gate.
    pub async fn classify_remote(
        &self,
        text: &str,
        history_length: usize,
    ) -> Result<ClassificationResult, RemoteFailure> {
        let prompt = ClassifierPrompt {
            instruction: self.instruction.clone(),
            message: text.to_string(),
            history_length,
        };

        let reply = match tokio::time::timeout(self.deadline, self.provider.classify(&prompt)).await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => return Err(RemoteFailure::Provider(e.to_string())),
            Err(_elapsed) => return Err(RemoteFailure::Timeout(self.deadline)),
        };

        let (module, confidence) = parse_module_reply(&reply, &self.labels)
            .ok_or_else(|| RemoteFailure::Malformed(excerpt(&reply)))?;

        Ok(ClassificationResult::new(
            module.clone(),
            confidence,
            format!("{} classified as {module}", self.provider.name()),
            Method::Remote,
        ))
    }
}

#[async_trait]
impl Tier for RemoteTier {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn classify(&self, request: &ClassificationRequest) -> Option<ClassificationResult> {
        if !self.gate.admits(&request.text) {
            debug!("message below complexity gate, skipping remote classifier");
            return None;
        }

        match self
            .classify_remote(&request.text, request.history_length)
            .await
        {
            Ok(result) => Some(result),
            Err(failure) => {
                warn!(
                    provider = self.provider.name(),
                    error = %failure,
                    "remote classification failed, falling back to patterns"
                );
                None
            }
        }
    }
}
