// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /v1/route and GET /health.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use switchyard_core::{ClassificationRequest, ClassificationResult, RoutingTrace};
use tracing::info;

use crate::server::GatewayState;

/// Request body for POST /v1/route.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// Message text to classify.
    pub text: String,
    /// Number of prior turns in the conversation.
    #[serde(default)]
    pub history_length: usize,
    /// Optional forced module. `"auto"` means classify normally.
    #[serde(default)]
    pub module_override: Option<String>,
}

impl From<RouteRequest> for ClassificationRequest {
    fn from(body: RouteRequest) -> Self {
        Self {
            text: body.text,
            history_length: body.history_length,
            module_override: body.module_override,
        }
    }
}

/// Response body for POST /v1/route.
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Identifier for correlating this decision in logs.
    pub request_id: String,
    /// The routing decision.
    pub result: ClassificationResult,
    /// Diagnostic trace of the decision.
    pub trace: RoutingTrace,
}

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Service name from configuration.
    pub service: String,
    /// Binary version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
    /// Entries currently held by the result cache.
    pub cache_entries: usize,
    /// Classification tiers in consultation order.
    pub tiers: Vec<String>,
}

/// POST /v1/route
///
/// Classifies a message and returns the decision with its trace. Never
/// fails once the body has been parsed.
pub async fn post_route(
    State(state): State<GatewayState>,
    Json(body): Json<RouteRequest>,
) -> Json<RouteResponse> {
    let request_id = uuid::Uuid::new_v4().to_string();
    let request = ClassificationRequest::from(body);

    let decision = state.router.route(&request).await;

    info!(
        request_id = %request_id,
        module = %decision.result.module,
        confidence = decision.result.confidence,
        method = %decision.result.method,
        cached = decision.trace.cached,
        latency_ms = decision.trace.latency_ms,
        "routing decision"
    );

    Json(RouteResponse {
        request_id,
        result: decision.result,
        trace: decision.trace,
    })
}

/// GET /health
///
/// Returns health status of the gateway. Unauthenticated, for liveness checks.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.health.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        cache_entries: state.router.cache().len(),
        tiers: state
            .router
            .tier_names()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}
