// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchyard config`: print the effective configuration.

use switchyard_config::SwitchyardConfig;
use switchyard_core::SwitchyardError;

const REDACTED: &str = "[REDACTED]";

pub fn run_show_config(config: &SwitchyardConfig) -> Result<(), SwitchyardError> {
    print!("{}", render_config(config)?);
    Ok(())
}

/// Renders `config` as TOML with the API key masked.
fn render_config(config: &SwitchyardConfig) -> Result<String, SwitchyardError> {
    let mut shown = config.clone();
    if shown.anthropic.api_key.is_some() {
        shown.anthropic.api_key = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| SwitchyardError::Internal(format!("failed to render config: {e}")))
}
