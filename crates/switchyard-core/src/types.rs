// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the router, the gateway, and provider adapters.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Override value that means "no override, classify normally".
pub const AUTO_MODULE: &str = "auto";

/// How a classification result was originally produced.
///
/// A cached result keeps the method of the tier that produced it; `Cache` is
/// only reported by callers that explicitly relabel hits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// A pattern rule matched.
    Pattern,
    /// Served from the result cache.
    Cache,
    /// The remote classifier answered within its deadline.
    Remote,
    /// No rule matched; the generic default module was used.
    Fallback,
    /// The caller forced a module.
    Override,
}

/// A single routing request. Created per call and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    /// Raw user message.
    pub text: String,
    /// Number of prior turns in the conversation.
    #[serde(default)]
    pub history_length: usize,
    /// Caller-supplied module that bypasses classification.
    #[serde(default)]
    pub module_override: Option<String>,
}

impl ClassificationRequest {
    /// Create a request with no override.
    pub fn new(text: impl Into<String>, history_length: usize) -> Self {
        Self {
            text: text.into(),
            history_length,
            module_override: None,
        }
    }

    /// Attach a module override.
    pub fn with_override(mut self, module: impl Into<String>) -> Self {
        self.module_override = Some(module.into());
        self
    }

    /// The forced module, if the override is set, non-empty, and not `auto`.
    pub fn forced_module(&self) -> Option<&str> {
        self.module_override
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty() && !m.eq_ignore_ascii_case(AUTO_MODULE))
    }
}

/// The answer to "which module handles this message".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Downstream handler label.
    pub module: String,
    /// Certainty in `[0, 1]`.
    pub confidence: f32,
    /// Human-readable justification. Never parsed.
    pub rationale: String,
    /// Tier that produced the result.
    pub method: Method,
}

impl ClassificationResult {
    /// Build a result, clamping `confidence` into `[0, 1]`.
    pub fn new(
        module: impl Into<String>,
        confidence: f32,
        rationale: impl Into<String>,
        method: Method,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            module: module.into(),
            confidence,
            rationale: rationale.into(),
            method,
        }
    }
}

/// Per-request diagnostic record. Produced on every routing path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingTrace {
    pub module: String,
    pub confidence: f32,
    /// Lowercased module name.
    pub intent: String,
    /// Reserved for structured-argument extraction; always empty.
    pub slots: BTreeMap<String, serde_json::Value>,
    /// Wall-clock time from entry to return, in milliseconds.
    pub latency_ms: f64,
    /// Method of the tier that originally produced the result.
    pub method: Method,
    /// Whether this call was answered from the result cache.
    pub cached: bool,
}

impl RoutingTrace {
    /// Build the trace for a finished routing call.
    pub fn for_result(result: &ClassificationResult, elapsed: Duration, cached: bool) -> Self {
        Self {
            module: result.module.clone(),
            confidence: result.confidence,
            intent: result.module.to_lowercase(),
            slots: BTreeMap::new(),
            latency_ms: elapsed.as_secs_f64() * 1000.0,
            method: result.method,
            cached,
        }
    }
}

/// What `route` hands back: the decision plus its trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub result: ClassificationResult,
    pub trace: RoutingTrace,
}

/// A single-turn classification request sent to a remote provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierPrompt {
    /// Fixed instruction enumerating module labels and the reply shape.
    pub instruction: String,
    /// The user message to classify.
    pub message: String,
    /// Conversation depth. No history content is ever forwarded.
    pub history_length: usize,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}
