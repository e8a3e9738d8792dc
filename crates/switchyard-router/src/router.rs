// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The routing orchestrator.
//!
//! Resolution order:
//! 1. A non-`auto` module override short-circuits with confidence 1.0.
//! 2. A fresh cache entry is returned as stored, keeping its original method.
//! 3. Each configured tier is asked in turn; the first answer wins.
//! 4. The pattern tier answers unconditionally.
//!
//! Results from steps 3 and 4 are cached. Overrides never touch the cache,
//! and neither do calls whose cancellation token fired.

use std::sync::Arc;

use switchyard_config::model::SwitchyardConfig;
use switchyard_core::{
    ClassificationRequest, ClassificationResult, ClassifierProvider, Method, RoutingDecision,
    RoutingTrace, SwitchyardError,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::{cache_key, ResultCache};
use crate::pattern::PatternTier;
use crate::remote::RemoteTier;
use crate::tier::Tier;

/// Rationale reported for overridden requests.
pub const OVERRIDE_RATIONALE: &str = "module override";

/// Combines override handling, the result cache, and the classification tiers.
pub struct IntentRouter {
    cache: Arc<ResultCache>,
    tiers: Vec<Arc<dyn Tier>>,
    patterns: PatternTier,
}

impl IntentRouter {
    /// Assemble a router from its parts. `tiers` are consulted in order
    /// before the pattern tier.
    pub fn new(cache: Arc<ResultCache>, tiers: Vec<Arc<dyn Tier>>, patterns: PatternTier) -> Self {
        Self {
            cache,
            tiers,
            patterns,
        }
    }

    /// Build the standard pipeline from configuration.
    ///
    /// The remote tier is included only when `remote.enabled` is set and a
    /// provider is supplied.
    pub fn from_config(
        config: &SwitchyardConfig,
        provider: Option<Arc<dyn ClassifierProvider>>,
    ) -> Result<Self, SwitchyardError> {
        let cache = Arc::new(ResultCache::from_config(&config.cache));
        let patterns = PatternTier::from_config(&config.routing)?;

        let mut tiers: Vec<Arc<dyn Tier>> = Vec::new();
        match provider {
            Some(provider) if config.remote.enabled => {
                tiers.push(Arc::new(RemoteTier::from_config(
                    provider,
                    &config.remote,
                    &config.routing,
                )));
            }
            Some(_) => debug!("remote tier disabled by configuration"),
            None if config.remote.enabled => {
                warn!("remote tier enabled but no classifier provider is available; routing with patterns only");
            }
            None => {}
        }

        Ok(Self::new(cache, tiers, patterns))
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Names of the configured tiers, in consultation order, ending with `pattern`.
    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers
            .iter()
            .map(|t| t.name())
            .chain(std::iter::once(Tier::name(&self.patterns)))
            .collect()
    }

    /// Route a request. Never fails.
    pub async fn route(&self, request: &ClassificationRequest) -> RoutingDecision {
        self.route_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Route a request, abandoning slow tiers once `cancel` fires.
    ///
    /// A cancelled call still returns a decision: remaining tiers are
    /// skipped and the pattern tier answers.
    pub async fn route_with_cancel(
        &self,
        request: &ClassificationRequest,
        cancel: &CancellationToken,
    ) -> RoutingDecision {
        let started = Instant::now();
        let (result, cached) = self.resolve(request, cancel).await;
        let trace = RoutingTrace::for_result(&result, started.elapsed(), cached);

        debug!(
            module = %result.module,
            confidence = result.confidence,
            method = %result.method,
            cached,
            latency_ms = trace.latency_ms,
            "message routed"
        );

        RoutingDecision { result, trace }
    }

    async fn resolve(
        &self,
        request: &ClassificationRequest,
        cancel: &CancellationToken,
    ) -> (ClassificationResult, bool) {
        if let Some(module) = request.forced_module() {
            let result =
                ClassificationResult::new(module, 1.0, OVERRIDE_RATIONALE, Method::Override);
            return (result, false);
        }

        let key = cache_key(&request.text, request.history_length);
        if let Some(hit) = self.cache.get(&key) {
            return (hit, true);
        }

        for tier in &self.tiers {
            if cancel.is_cancelled() {
                break;
            }
            let answer = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(tier = tier.name(), "routing cancelled, abandoning tier");
                    None
                }
                answer = tier.classify(request) => answer,
            };
            if let Some(result) = answer {
                self.cache.put(key, result.clone());
                return (result, false);
            }
        }

        let result = self.patterns.classify_text(&request.text);
        // A cancelled call never consulted every tier; its answer is not reusable.
        if !cancel.is_cancelled() {
            self.cache.put(key, result.clone());
        }
        (result, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn pattern_only() -> IntentRouter {
        IntentRouter::new(
            Arc::new(ResultCache::new(Duration::from_secs(60), 16)),
            Vec::new(),
            PatternTier::builtin(),
        )
    }

    #[tokio::test]
    async fn override_short_circuits_with_full_confidence() {
        let router = pattern_only();
        let request = ClassificationRequest::new("meu boleto venceu", 0).with_override("wellbeing");
        let decision = router.route(&request).await;

        assert_eq!(decision.result.module, "wellbeing");
        assert_eq!(decision.result.confidence, 1.0);
        assert_eq!(decision.result.method, Method::Override);
        assert_eq!(decision.result.rationale, OVERRIDE_RATIONALE);
        assert!(router.cache().is_empty());
    }

    #[tokio::test]
    async fn auto_override_classifies_normally() {
        let router = pattern_only();
        let request = ClassificationRequest::new("meu boleto venceu", 0).with_override("auto");
        let decision = router.route(&request).await;
        assert_eq!(decision.result.module, "billing");
        assert_eq!(decision.result.method, Method::Pattern);
    }

    #[tokio::test]
    async fn second_call_is_a_cache_hit_with_original_method() {
        let router = pattern_only();
        let request = ClassificationRequest::new("meu boleto venceu", 1);

        let first = router.route(&request).await;
        assert!(!first.trace.cached);
        let second = router.route(&request).await;
        assert!(second.trace.cached);
        assert_eq!(second.result, first.result);
        assert_eq!(second.result.method, Method::Pattern);
    }

    #[tokio::test]
    async fn fallback_results_are_cached() {
        let router = pattern_only();
        let request = ClassificationRequest::new("oi", 0);
        router.route(&request).await;
        assert_eq!(router.cache().len(), 1);
        let again = router.route(&request).await;
        assert_eq!(again.result.method, Method::Fallback);
        assert!(again.trace.cached);
    }

    #[tokio::test]
    async fn trace_mirrors_result() {
        let router = pattern_only();
        let decision = router
            .route(&ClassificationRequest::new("estou ansioso", 0))
            .await;
        assert_eq!(decision.trace.module, decision.result.module);
        assert_eq!(decision.trace.intent, "wellbeing");
        assert_eq!(decision.trace.confidence, decision.result.confidence);
        assert!(decision.trace.slots.is_empty());
        assert!(decision.trace.latency_ms >= 0.0);
    }

    #[tokio::test]
    async fn cancelled_call_leaves_the_cache_empty() {
        let router = pattern_only();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let decision = router
            .route_with_cancel(&ClassificationRequest::new("meu boleto venceu", 0), &cancel)
            .await;
        assert_eq!(decision.result.module, "billing");
        assert!(router.cache().is_empty());
    }

    #[test]
    fn from_config_without_provider_is_pattern_only() {
        let router = IntentRouter::from_config(&SwitchyardConfig::default(), None).unwrap();
        assert_eq!(router.tier_names(), vec!["pattern"]);
        assert_eq!(router.cache().capacity(), 150);
        assert_eq!(router.cache().ttl(), Duration::from_secs(1800));
    }
}
