// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Switchyard intent router.
//!
//! This crate provides the request/result types, the routing trace, the error
//! taxonomy, and the provider trait that remote classifier integrations
//! implement. The router, gateway, and provider crates all build on it.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SwitchyardError;
pub use types::{
    ClassificationRequest, ClassificationResult, ClassifierPrompt, HealthStatus, Method,
    RoutingDecision, RoutingTrace, AUTO_MODULE,
};

pub use traits::{ClassifierProvider, PluginAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switchyard_error_has_all_variants() {
        let _config = SwitchyardError::Config("test".into());
        let _provider = SwitchyardError::Provider {
            message: "test".into(),
            source: None,
        };
        let _timeout = SwitchyardError::Timeout {
            duration: std::time::Duration::from_secs(2),
        };
        let _malformed = SwitchyardError::MalformedResponse("garbage".into());
        let _internal = SwitchyardError::Internal("test".into());
    }

    #[test]
    fn method_has_five_variants() {
        use std::str::FromStr;

        let variants = [
            Method::Pattern,
            Method::Cache,
            Method::Remote,
            Method::Fallback,
            Method::Override,
        ];

        for variant in &variants {
            let s = variant.to_string();
            assert_eq!(s, s.to_lowercase());
            let parsed = Method::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn provider_trait_is_object_safe() {
        fn _assert_provider(_p: &dyn ClassifierProvider) {}
        fn _assert_adapter<T: PluginAdapter>() {}
    }
}
