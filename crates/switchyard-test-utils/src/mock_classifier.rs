// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock classifier provider for deterministic testing.
//!
//! `MockClassifier` implements `ClassifierProvider` with scripted replies,
//! so routing can be tested without external API calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use switchyard_core::traits::adapter::PluginAdapter;
use switchyard_core::traits::provider::ClassifierProvider;
use switchyard_core::types::{ClassifierPrompt, HealthStatus};
use switchyard_core::SwitchyardError;

/// One scripted provider behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Return this text immediately.
    Text(String),
    /// Return this text after a delay.
    Delayed(Duration, String),
    /// Fail with a provider error carrying this message.
    Fail(String),
    /// Never answer.
    Hang,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// A mock classifier provider.
///
/// Replies are popped from a FIFO queue. When the queue is empty, the
/// fallback reply is used (`tutor|0.9` unless configured otherwise).
pub struct MockClassifier {
    replies: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<ClassifierPrompt>>,
}

impl MockClassifier {
    /// Create a mock with an empty queue.
    pub fn new() -> Self {
        Self::with_replies(Vec::new())
    }

    /// Create a mock pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            fallback: MockReply::text("tutor|0.9"),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A mock that always answers with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new().with_fallback(MockReply::text(text))
    }

    /// A mock that never answers.
    pub fn hanging() -> Self {
        Self::new().with_fallback(MockReply::Hang)
    }

    /// A mock that always fails.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new().with_fallback(MockReply::Fail(message.into()))
    }

    /// Replace the reply used once the queue is empty.
    pub fn with_fallback(mut self, reply: MockReply) -> Self {
        self.fallback = reply;
        self
    }

    /// Add a reply to the end of the queue.
    pub async fn push_reply(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Number of `classify` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every prompt received so far, in order.
    pub async fn prompts(&self) -> Vec<ClassifierPrompt> {
        self.prompts.lock().await.clone()
    }

    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockClassifier {
    fn name(&self) -> &str {
        "mock-classifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, SwitchyardError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ClassifierProvider for MockClassifier {
    async fn classify(&self, prompt: &ClassifierPrompt) -> Result<String, SwitchyardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(prompt.clone());

        match self.next_reply().await {
            MockReply::Text(text) => Ok(text),
            MockReply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            MockReply::Fail(message) => Err(SwitchyardError::Provider {
                message,
                source: None,
            }),
            MockReply::Hang => std::future::pending().await,
        }
    }
}
