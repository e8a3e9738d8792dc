// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchyard route`: classify one message from the command line.

use switchyard_config::SwitchyardConfig;
use switchyard_core::{ClassificationRequest, SwitchyardError};

use crate::serve::{build_router, init_tracing};

/// Routes `text` once and prints the decision as pretty JSON on stdout.
pub async fn run_route(
    config: SwitchyardConfig,
    text: String,
    history_length: usize,
    module_override: Option<String>,
    pattern_only: bool,
) -> Result<(), SwitchyardError> {
    init_tracing(&config.service.log_level);

    let router = build_router(&config, !pattern_only)?;
    let request = ClassificationRequest {
        text,
        history_length,
        module_override,
    };
    let decision = router.route(&request).await;

    let json = serde_json::to_string_pretty(&decision)
        .map_err(|e| SwitchyardError::Internal(format!("failed to encode decision: {e}")))?;
    println!("{json}");
    Ok(())
}
