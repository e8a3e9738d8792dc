// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Switchyard intent router.
//!
//! `route` itself never fails. These errors surface only at the edges that
//! can: loading configuration, talking to a remote provider, binding the
//! gateway socket.

use thiserror::Error;

/// The primary error type used across Switchyard crates.
#[derive(Debug, Error)]
pub enum SwitchyardError {
    /// Configuration errors (invalid TOML, bad rule patterns, missing keys).
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote classifier errors (network failure, non-2xx status, body read failure).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation did not complete within its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// The provider answered, but not in the `module|confidence` shape.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
