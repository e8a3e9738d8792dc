// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Switchyard intent router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Switchyard configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchyardConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Result cache sizing and expiry.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Remote classifier deadline and complexity gate.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Module labels, default module, and pattern rule table.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Anthropic API settings for the remote classifier.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// HTTP gateway bind settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name used in logs and health output.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "switchyard".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Result cache configuration.
///
/// One cache per process. Entries expire lazily on read once older than
/// `ttl_secs`; the oldest-inserted entry is evicted when `max_entries` is exceeded.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum number of cached classifications.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Seconds between background sweeps of expired entries. 0 disables the sweeper.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    1800 // 30 minutes
}

fn default_max_entries() -> usize {
    150
}

fn default_sweep_interval_secs() -> u64 {
    60
}

/// Remote classifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    /// Enable the remote tier. When false, routing is pattern-only.
    #[serde(default = "default_remote_enabled")]
    pub enabled: bool,

    /// Hard deadline for one remote classification, in milliseconds.
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,

    /// Messages at least this many characters long go to the remote tier.
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Statements (no `?`) also need at least this many words.
    #[serde(default = "default_min_words")]
    pub min_words: usize,

    /// Messages containing `?` go to the remote tier from this length on.
    #[serde(default = "default_question_min_chars")]
    pub question_min_chars: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: default_remote_enabled(),
            deadline_ms: default_deadline_ms(),
            min_chars: default_min_chars(),
            min_words: default_min_words(),
            question_min_chars: default_question_min_chars(),
        }
    }
}

fn default_remote_enabled() -> bool {
    true
}

fn default_deadline_ms() -> u64 {
    2000
}

fn default_min_chars() -> usize {
    30
}

fn default_min_words() -> usize {
    3
}

fn default_question_min_chars() -> usize {
    12
}

/// Routing table configuration.
///
/// `modules` is the closed label set advertised to the remote classifier.
/// `rules` replaces the built-in pattern groups when non-empty.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Module labels the remote classifier may answer with.
    #[serde(default = "default_modules")]
    pub modules: Vec<String>,

    /// Module returned when no rule matches.
    #[serde(default = "default_module")]
    pub default_module: String,

    /// Confidence attached to the default module.
    #[serde(default = "default_confidence")]
    pub default_confidence: f32,

    /// Ordered pattern rules. Empty means "use the built-in table".
    #[serde(default)]
    pub rules: Vec<PatternRuleConfig>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            modules: default_modules(),
            default_module: default_module(),
            default_confidence: default_confidence(),
            rules: Vec::new(),
        }
    }
}

fn default_modules() -> Vec<String> {
    [
        "tutor",
        "exam_prep",
        "it_support",
        "billing",
        "wellbeing",
        "lesson",
        "certificates",
        "images",
    ]
    .iter()
    .map(|m| m.to_string())
    .collect()
}

fn default_module() -> String {
    "tutor".to_string()
}

fn default_confidence() -> f32 {
    0.55
}

/// One entry of the `[[routing.rules]]` table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PatternRuleConfig {
    /// Module this rule routes to.
    pub module: String,

    /// Regular expression matched against the lowercased message.
    pub pattern: String,

    /// Fixed confidence reported when the rule fires.
    #[serde(default = "default_rule_confidence")]
    pub confidence: f32,
}

fn default_rule_confidence() -> f32 {
    0.9
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` falls back to `ANTHROPIC_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for classification.
    #[serde(default = "default_model")]
    pub model: String,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Maximum tokens in the `module|confidence` reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            api_version: default_api_version(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_model() -> String {
    "claude-haiku-4-5-20250901".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_max_tokens() -> u32 {
    16
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3080
}
