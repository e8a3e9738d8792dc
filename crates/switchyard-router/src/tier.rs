// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The seam every classification strategy plugs into.

use async_trait::async_trait;
use switchyard_core::{ClassificationRequest, ClassificationResult};

/// One classification strategy in the routing pipeline.
///
/// A tier either answers or declines with `None`. Declining covers every
/// failure mode (no match, timeout, bad reply); the orchestrator then asks
/// the next tier.
#[async_trait]
pub trait Tier: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Try to classify the request.
    async fn classify(&self, request: &ClassificationRequest) -> Option<ClassificationResult>;
}
