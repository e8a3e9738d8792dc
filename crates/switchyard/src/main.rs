// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Switchyard - tiered intent router for student chat messages.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod route;
mod serve;
mod show_config;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use switchyard_config::validation::validate_config;
use switchyard_config::{ConfigError, SwitchyardConfig};

/// Switchyard - tiered intent router for student chat messages.
#[derive(Parser, Debug)]
#[command(name = "switchyard", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve {
        /// Override the configured bind host.
        #[arg(long)]
        host: Option<String>,
        /// Override the configured bind port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Classify one message and print the decision as JSON.
    Route {
        /// Message text.
        text: String,
        /// Number of prior conversation turns.
        #[arg(long, default_value_t = 0)]
        history: usize,
        /// Force a module (`auto` classifies normally).
        #[arg(long)]
        module: Option<String>,
        /// Skip the remote classifier.
        #[arg(long)]
        pattern_only: bool,
    },
    /// Print the effective configuration with secrets redacted.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> SwitchyardConfig {
    let loaded = match path {
        Some(path) => switchyard_config::load_and_validate_path(path),
        None => switchyard_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            switchyard_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Applies `serve` bind overrides and validates the result again.
fn apply_gateway_overrides(
    mut config: SwitchyardConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<SwitchyardConfig, Vec<ConfigError>> {
    if let Some(host) = host {
        config.gateway.host = host;
    }
    if let Some(port) = port {
        config.gateway.port = port;
    }
    validate_config(&config)?;
    Ok(config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let outcome = match cli.command {
        Some(Commands::Serve { host, port }) => {
            let config = match apply_gateway_overrides(config, host, port) {
                Ok(config) => config,
                Err(errors) => {
                    switchyard_config::render_errors(&errors);
                    std::process::exit(1);
                }
            };
            serve::run_serve(config).await
        }
        Some(Commands::Route {
            text,
            history,
            module,
            pattern_only,
        }) => route::run_route(config, text, history, module, pattern_only).await,
        Some(Commands::Config) => show_config::run_show_config(&config),
        None => {
            println!("switchyard: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = outcome {
        eprintln!("switchyard: {e}");
        std::process::exit(1);
    }
}
