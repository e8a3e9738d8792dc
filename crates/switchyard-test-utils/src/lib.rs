// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Switchyard integration tests.
//!
//! Provides a scriptable classifier provider and a router harness for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockClassifier`] - Classifier provider with scripted replies, failures, and hangs
//! - [`TestHarness`] - A fully wired [`IntentRouter`](switchyard_router::IntentRouter) over a mock

pub mod harness;
pub mod mock_classifier;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_classifier::{MockClassifier, MockReply};
