// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the constraints serde cannot express: non-zero durations and
//! capacities, confidences inside `[0, 1]`, unique module labels, and
//! pattern rules that compile.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::SwitchyardConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound on the remote deadline. Anything longer defeats the point of the gate.
const MAX_DEADLINE_MS: u64 = 30_000;

/// Two-word statements must never reach the remote classifier.
const MIN_STATEMENT_WORDS: usize = 3;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure rather than stopping at the first.
pub fn validate_config(config: &SwitchyardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::validation(
            "service.log_level",
            format!(
                "`{}` is not one of {}",
                config.service.log_level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    if config.cache.ttl_secs == 0 {
        errors.push(ConfigError::validation(
            "cache.ttl_secs",
            "must be greater than zero",
        ));
    }

    if config.cache.max_entries == 0 {
        errors.push(ConfigError::validation(
            "cache.max_entries",
            "must be at least 1",
        ));
    }

    if config.remote.deadline_ms == 0 || config.remote.deadline_ms > MAX_DEADLINE_MS {
        errors.push(ConfigError::validation(
            "remote.deadline_ms",
            format!(
                "must be between 1 and {MAX_DEADLINE_MS}, got {}",
                config.remote.deadline_ms
            ),
        ));
    }

    if config.remote.min_words < MIN_STATEMENT_WORDS {
        errors.push(ConfigError::validation(
            "remote.min_words",
            format!(
                "must be at least {MIN_STATEMENT_WORDS}, got {}",
                config.remote.min_words
            ),
        ));
    }

    validate_routing(config, &mut errors);

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("gateway.host", "must not be empty"));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::validation(
                "gateway.host",
                format!("`{host}` is not a valid IP address or hostname"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routing(config: &SwitchyardConfig, errors: &mut Vec<ConfigError>) {
    let routing = &config.routing;

    if routing.modules.is_empty() {
        errors.push(ConfigError::validation(
            "routing.modules",
            "must list at least one module",
        ));
    }

    let mut seen = HashSet::new();
    for (i, module) in routing.modules.iter().enumerate() {
        if module.trim().is_empty() || module.contains('|') {
            errors.push(ConfigError::validation(
                format!("routing.modules[{i}]"),
                "must be non-empty and must not contain `|`",
            ));
        }
        if !seen.insert(module.to_lowercase()) {
            errors.push(ConfigError::validation(
                "routing.modules",
                format!("duplicate module `{module}`"),
            ));
        }
    }

    if routing.default_module.trim().is_empty() {
        errors.push(ConfigError::validation(
            "routing.default_module",
            "must not be empty",
        ));
    }

    if !(0.0..=1.0).contains(&routing.default_confidence) {
        errors.push(ConfigError::validation(
            "routing.default_confidence",
            format!("must be within [0, 1], got {}", routing.default_confidence),
        ));
    }

    for (i, rule) in routing.rules.iter().enumerate() {
        if rule.module.trim().is_empty() {
            errors.push(ConfigError::validation(
                format!("routing.rules[{i}].module"),
                "must not be empty",
            ));
        }
        if !(0.0..=1.0).contains(&rule.confidence) {
            errors.push(ConfigError::validation(
                format!("routing.rules[{i}].confidence"),
                format!("must be within [0, 1], got {}", rule.confidence),
            ));
        }
        if let Err(e) = regex::Regex::new(&rule.pattern) {
            errors.push(ConfigError::validation(
                format!("routing.rules[{i}].pattern"),
                format!("does not compile: {e}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PatternRuleConfig;

    fn has_error_for(errors: &[ConfigError], wanted: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { key, .. } if key == wanted))
    }

    #[test]
    fn default_config_validates() {
        let config = SwitchyardConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_ttl_fails_validation() {
        let mut config = SwitchyardConfig::default();
        config.cache.ttl_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error_for(&errors, "cache.ttl_secs"));
    }

    #[test]
    fn zero_capacity_fails_validation() {
        let mut config = SwitchyardConfig::default();
        config.cache.max_entries = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error_for(&errors, "cache.max_entries"));
    }

    #[test]
    fn deadline_out_of_range_fails_validation() {
        let mut config = SwitchyardConfig::default();
        config.remote.deadline_ms = 0;
        assert!(has_error_for(
            &validate_config(&config).unwrap_err(),
            "remote.deadline_ms"
        ));

        config.remote.deadline_ms = 120_000;
        assert!(has_error_for(
            &validate_config(&config).unwrap_err(),
            "remote.deadline_ms"
        ));
    }

    #[test]
    fn min_words_below_three_fails_validation() {
        let mut config = SwitchyardConfig::default();
        config.remote.min_words = 2;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error_for(&errors, "remote.min_words"));

        config.remote.min_words = 3;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn duplicate_modules_fail_validation() {
        let mut config = SwitchyardConfig::default();
        config.routing.modules = vec!["tutor".into(), "Tutor".into()];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message, .. } if message.contains("duplicate module"))
        ));
    }

    #[test]
    fn module_with_pipe_fails_validation() {
        let mut config = SwitchyardConfig::default();
        config.routing.modules = vec!["tu|tor".into()];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error_for(&errors, "routing.modules[0]"));
    }

    #[test]
    fn bad_rule_pattern_fails_validation() {
        let mut config = SwitchyardConfig::default();
        config.routing.rules = vec![PatternRuleConfig {
            module: "billing".into(),
            pattern: "(unclosed".into(),
            confidence: 0.9,
        }];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error_for(&errors, "routing.rules[0].pattern"));
    }

    #[test]
    fn rule_confidence_out_of_range_fails_validation() {
        let mut config = SwitchyardConfig::default();
        config.routing.rules = vec![PatternRuleConfig {
            module: "billing".into(),
            pattern: "boleto".into(),
            confidence: 1.5,
        }];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error_for(&errors, "routing.rules[0].confidence"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = SwitchyardConfig::default();
        config.service.log_level = "verbose".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error_for(&errors, "service.log_level"));
    }

    #[test]
    fn collects_every_error() {
        let mut config = SwitchyardConfig::default();
        config.cache.ttl_secs = 0;
        config.cache.max_entries = 0;
        config.gateway.host = "".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn rules_array_deserializes_correctly() {
        let toml_str = r#"
[[routing.rules]]
module = "billing"
pattern = "boleto|fatura"
confidence = 0.92

[[routing.rules]]
module = "it_support"
pattern = "senha"
"#;
        let config: SwitchyardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.routing.rules.len(), 2);
        assert_eq!(config.routing.rules[0].module, "billing");
        assert!((config.routing.rules[0].confidence - 0.92).abs() < f32::EPSILON);
        // confidence defaults to 0.9
        assert!((config.routing.rules[1].confidence - 0.9).abs() < f32::EPSILON);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rules_deny_unknown_fields() {
        let toml_str = r#"
[[routing.rules]]
module = "billing"
pattern = "boleto"
weight = 3
"#;
        assert!(toml::from_str::<SwitchyardConfig>(toml_str).is_err());
    }
}
