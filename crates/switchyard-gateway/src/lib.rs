// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Switchyard intent router.
//!
//! Exposes `POST /v1/route` for classification and `GET /health` for
//! liveness checks. A client that disconnects mid-request drops the
//! handler future, which abandons any in-flight remote classification.

pub mod handlers;
pub mod server;

pub use server::{build_app, start_server, GatewayState, HealthState, ServerConfig};
