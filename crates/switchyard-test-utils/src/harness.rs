// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end routing tests.
//!
//! `TestHarness` assembles the standard routing pipeline from a
//! configuration with a [`MockClassifier`] standing in for the remote
//! provider.

use std::sync::Arc;

use switchyard_config::model::SwitchyardConfig;
use switchyard_core::{ClassificationRequest, ClassifierProvider, RoutingDecision, SwitchyardError};
use switchyard_router::IntentRouter;

use crate::mock_classifier::{MockClassifier, MockReply};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: SwitchyardConfig,
    mock: MockClassifier,
    attach_provider: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: SwitchyardConfig::default(),
            mock: MockClassifier::new(),
            attach_provider: true,
        }
    }

    /// Start from this configuration instead of the defaults.
    pub fn with_config(mut self, config: SwitchyardConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this mock as the remote provider.
    pub fn with_mock(mut self, mock: MockClassifier) -> Self {
        self.mock = mock;
        self
    }

    /// Queue scripted replies on the default mock.
    pub fn with_replies(mut self, replies: Vec<MockReply>) -> Self {
        self.mock = MockClassifier::with_replies(replies);
        self
    }

    /// Set the remote deadline in milliseconds.
    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.config.remote.deadline_ms = deadline_ms;
        self
    }

    /// Set cache TTL and capacity.
    pub fn with_cache(mut self, ttl_secs: u64, max_entries: usize) -> Self {
        self.config.cache.ttl_secs = ttl_secs;
        self.config.cache.max_entries = max_entries;
        self
    }

    /// Route without any remote provider attached.
    pub fn without_provider(mut self) -> Self {
        self.attach_provider = false;
        self
    }

    /// Build the harness.
    pub fn build(self) -> Result<TestHarness, SwitchyardError> {
        let mock = Arc::new(self.mock);
        let provider = self
            .attach_provider
            .then(|| mock.clone() as Arc<dyn ClassifierProvider>);
        let router = IntentRouter::from_config(&self.config, provider)?;
        Ok(TestHarness { router, mock })
    }
}

/// A wired router plus a handle on its mock provider.
pub struct TestHarness {
    pub router: IntentRouter,
    pub mock: Arc<MockClassifier>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Route `text` at conversation depth `history_length`.
    pub async fn route(&self, text: &str, history_length: usize) -> RoutingDecision {
        self.router
            .route(&ClassificationRequest::new(text, history_length))
            .await
    }

    /// Number of remote calls made so far.
    pub fn remote_calls(&self) -> usize {
        self.mock.call_count()
    }
}
