// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchyard serve`: wires the router, cache sweeper, and HTTP gateway.

use std::sync::Arc;
use std::time::Duration;

use switchyard_anthropic::AnthropicClassifier;
use switchyard_config::SwitchyardConfig;
use switchyard_core::{ClassifierProvider, SwitchyardError};
use switchyard_gateway::{GatewayState, ServerConfig, start_server};
use switchyard_router::{IntentRouter, spawn_sweeper};
use tracing::{info, warn};

use crate::shutdown;

/// Runs the gateway until SIGINT or SIGTERM.
pub async fn run_serve(config: SwitchyardConfig) -> Result<(), SwitchyardError> {
    init_tracing(&config.service.log_level);

    info!(
        service = config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        "starting switchyard"
    );

    let router = Arc::new(build_router(&config, true)?);
    info!(tiers = ?router.tier_names(), "router ready");

    let cancel = shutdown::install_signal_handler();

    let sweeper = if config.cache.sweep_interval_secs > 0 {
        Some(spawn_sweeper(
            Arc::clone(router.cache()),
            Duration::from_secs(config.cache.sweep_interval_secs),
            cancel.clone(),
        ))
    } else {
        None
    };

    let server_config = ServerConfig::from(&config.gateway);
    let state = GatewayState::new(router, config.service.name.clone());
    let served = start_server(&server_config, state, cancel.clone()).await;

    // Stop the sweeper even when the server failed to bind.
    cancel.cancel();
    if let Some(handle) = sweeper {
        let _ = handle.await;
    }

    served?;
    info!("switchyard stopped");
    Ok(())
}

/// Builds the router, attaching the Anthropic classifier when remote
/// classification is enabled and `allow_remote` is set.
///
/// A missing API key downgrades to pattern-only routing with a warning.
pub fn build_router(
    config: &SwitchyardConfig,
    allow_remote: bool,
) -> Result<IntentRouter, SwitchyardError> {
    let provider = if allow_remote && config.remote.enabled {
        build_provider(config)
    } else {
        None
    };
    IntentRouter::from_config(config, provider)
}

fn build_provider(config: &SwitchyardConfig) -> Option<Arc<dyn ClassifierProvider>> {
    match AnthropicClassifier::new(&config.anthropic) {
        Ok(classifier) => Some(Arc::new(classifier)),
        Err(e) => {
            warn!(error = %e, "remote classifier unavailable, routing with patterns only");
            None
        }
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set. Output goes to stderr so `switchyard route`
/// keeps stdout for its JSON.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("switchyard={log_level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
