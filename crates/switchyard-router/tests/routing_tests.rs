// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end routing behavior through the full pipeline with a mock provider.

use std::sync::Arc;
use std::time::Duration;

use switchyard_core::{ClassificationRequest, Method};
use switchyard_router::{IntentRouter, PatternTier, ResultCache, Tier};
use switchyard_test_utils::{MockClassifier, MockReply, TestHarness};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const MATH_DOUBT: &str = "me ajude com uma dúvida de matemática";
const LONG_QUESTION: &str = "Como faço para resolver equações do segundo grau?";

#[tokio::test]
async fn override_short_circuits_every_tier() {
    let harness = TestHarness::builder().build().unwrap();
    let request = ClassificationRequest::new(LONG_QUESTION, 4).with_override("it_support");

    let decision = harness.router.route(&request).await;

    assert_eq!(decision.result.module, "it_support");
    assert_eq!(decision.result.confidence, 1.0);
    assert_eq!(decision.result.method, Method::Override);
    assert_eq!(decision.trace.method, Method::Override);
    assert_eq!(harness.remote_calls(), 0);
    assert!(harness.router.cache().is_empty());
}

#[tokio::test]
async fn override_wins_over_an_existing_cache_entry() {
    let harness = TestHarness::builder().build().unwrap();
    harness.route(LONG_QUESTION, 0).await;
    assert_eq!(harness.router.cache().len(), 1);

    let request = ClassificationRequest::new(LONG_QUESTION, 0).with_override("billing");
    let decision = harness.router.route(&request).await;
    assert_eq!(decision.result.module, "billing");
    assert_eq!(decision.result.method, Method::Override);
    assert!(!decision.trace.cached);
}

#[tokio::test]
async fn repeated_route_is_identical_and_keeps_original_method() {
    let harness = TestHarness::builder()
        .with_replies(vec![MockReply::text("exam_prep|0.77")])
        .build()
        .unwrap();

    let first = harness.route(LONG_QUESTION, 2).await;
    let second = harness.route(LONG_QUESTION, 2).await;

    assert_eq!(first.result.method, Method::Remote);
    assert_eq!(second.result, first.result);
    assert_eq!(second.result.method, Method::Remote);
    assert!(second.trace.cached);
    assert_eq!(harness.remote_calls(), 1);
}

#[tokio::test]
async fn history_length_is_part_of_the_cache_key() {
    let harness = TestHarness::builder().build().unwrap();
    harness.route(LONG_QUESTION, 1).await;
    let other_depth = harness.route(LONG_QUESTION, 2).await;

    assert!(!other_depth.trace.cached);
    assert_eq!(harness.remote_calls(), 2);
    assert_eq!(harness.router.cache().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn cache_entry_expires_exactly_at_ttl() {
    let harness = TestHarness::builder()
        .without_provider()
        .with_cache(10, 16)
        .build()
        .unwrap();

    harness.route("meu boleto venceu", 0).await;

    tokio::time::advance(Duration::from_millis(9_999)).await;
    assert!(harness.route("meu boleto venceu", 0).await.trace.cached);

    tokio::time::advance(Duration::from_millis(2)).await;
    assert!(!harness.route("meu boleto venceu", 0).await.trace.cached);
}

#[tokio::test]
async fn capacity_overflow_evicts_the_oldest_entry() {
    let harness = TestHarness::builder()
        .without_provider()
        .with_cache(60, 3)
        .build()
        .unwrap();

    for text in ["boleto", "senha", "enem", "ansiedade"] {
        harness.route(text, 0).await;
    }

    let cache = harness.router.cache();
    assert_eq!(cache.len(), 3);
    assert!(cache.get("boleto:0").is_none());
    for key in ["senha:0", "enem:0", "ansiedade:0"] {
        assert!(cache.get(key).is_some(), "{key} should still be cached");
    }
}

#[tokio::test(start_paused = true)]
async fn hanging_provider_is_bounded_by_the_deadline() {
    let harness = TestHarness::builder()
        .with_mock(MockClassifier::hanging())
        .with_deadline_ms(2_000)
        .build()
        .unwrap();

    let started = Instant::now();
    let decision = harness.route(LONG_QUESTION, 0).await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(2_000));
    assert!(elapsed < Duration::from_millis(2_100), "took {elapsed:?}");
    assert_ne!(decision.result.method, Method::Remote);
    assert_eq!(harness.remote_calls(), 1);
}

#[tokio::test]
async fn hanging_provider_is_bounded_in_real_time() {
    let harness = TestHarness::builder()
        .with_mock(MockClassifier::hanging())
        .with_deadline_ms(50)
        .build()
        .unwrap();

    let started = std::time::Instant::now();
    harness.route(LONG_QUESTION, 0).await;
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn slow_reply_past_deadline_is_discarded() {
    let harness = TestHarness::builder()
        .with_replies(vec![MockReply::Delayed(
            Duration::from_millis(500),
            "billing|0.99".into(),
        )])
        .with_deadline_ms(200)
        .build()
        .unwrap();

    let decision = harness.route(MATH_DOUBT, 0).await;
    assert_eq!(decision.result.module, "tutor");
    assert_eq!(decision.result.method, Method::Pattern);
}

#[tokio::test]
async fn failing_provider_falls_back_to_the_tutoring_rule() {
    let harness = TestHarness::builder()
        .with_mock(MockClassifier::failing("connection refused"))
        .build()
        .unwrap();

    let decision = harness.route(MATH_DOUBT, 0).await;

    assert_eq!(harness.remote_calls(), 1);
    assert_eq!(decision.result.module, "tutor");
    assert!(decision.result.confidence >= 0.85);
    assert_eq!(decision.result.method, Method::Pattern);
}

#[tokio::test(start_paused = true)]
async fn timing_out_provider_falls_back_to_the_tutoring_rule() {
    let harness = TestHarness::builder()
        .with_mock(MockClassifier::hanging())
        .build()
        .unwrap();

    let decision = harness.route(MATH_DOUBT, 0).await;
    assert_eq!(decision.result.module, "tutor");
    assert!(decision.result.confidence >= 0.85);
    assert_eq!(decision.result.method, Method::Pattern);
}

#[tokio::test]
async fn malformed_reply_is_treated_as_a_failure() {
    let harness = TestHarness::builder()
        .with_mock(MockClassifier::replying("I think this is about maths."))
        .build()
        .unwrap();

    let decision = harness.route(MATH_DOUBT, 0).await;
    assert_eq!(decision.result.method, Method::Pattern);
    assert_eq!(decision.result.module, "tutor");
}

#[tokio::test]
async fn reply_with_unknown_module_is_treated_as_a_failure() {
    let harness = TestHarness::builder()
        .with_mock(MockClassifier::replying("astrology|0.99"))
        .build()
        .unwrap();

    let decision = harness.route(MATH_DOUBT, 0).await;
    assert_eq!(decision.result.method, Method::Pattern);
}

#[tokio::test]
async fn short_statement_never_reaches_the_provider() {
    let harness = TestHarness::builder().build().unwrap();

    let decision = harness.route("oi professor", 0).await;

    assert_eq!(harness.remote_calls(), 0);
    assert_ne!(decision.result.method, Method::Remote);
}

#[tokio::test]
async fn long_two_word_statement_never_reaches_the_provider() {
    let harness = TestHarness::builder().build().unwrap();

    let decision = harness
        .route("paralelepipedo inconstitucionalissimamente", 0)
        .await;

    assert_eq!(harness.remote_calls(), 0);
    assert_ne!(decision.result.method, Method::Remote);
}

#[tokio::test]
async fn long_question_reaches_the_provider() {
    let harness = TestHarness::builder()
        .with_replies(vec![MockReply::text("tutor|0.88")])
        .build()
        .unwrap();

    let decision = harness.route(LONG_QUESTION, 0).await;

    assert_eq!(harness.remote_calls(), 1);
    assert_eq!(decision.result.method, Method::Remote);
    assert!((decision.result.confidence - 0.88).abs() < f32::EPSILON);
}

#[tokio::test]
async fn provider_sees_message_labels_and_depth_only() {
    let harness = TestHarness::builder().build().unwrap();
    harness.route(LONG_QUESTION, 7).await;

    let prompts = harness.mock.prompts().await;
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].message, LONG_QUESTION);
    assert_eq!(prompts[0].history_length, 7);
    for label in ["tutor", "exam_prep", "it_support", "billing", "wellbeing"] {
        assert!(prompts[0].instruction.contains(label), "missing {label}");
    }
}

#[tokio::test]
async fn remote_disabled_in_config_skips_the_provider() {
    let mut config = switchyard_config::model::SwitchyardConfig::default();
    config.remote.enabled = false;
    let harness = TestHarness::builder().with_config(config).build().unwrap();

    harness.route(LONG_QUESTION, 0).await;
    assert_eq!(harness.remote_calls(), 0);
    assert_eq!(harness.router.tier_names(), vec!["pattern"]);
}

#[tokio::test(start_paused = true)]
async fn cancellation_abandons_the_remote_call() {
    let harness = TestHarness::builder()
        .with_mock(MockClassifier::hanging())
        .with_deadline_ms(2_000)
        .build()
        .unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let decision = harness
        .router
        .route_with_cancel(&ClassificationRequest::new(MATH_DOUBT, 0), &cancel)
        .await;

    assert!(started.elapsed() < Duration::from_millis(2_000));
    assert_eq!(decision.result.module, "tutor");
    assert_eq!(decision.result.method, Method::Pattern);
}

#[tokio::test(start_paused = true)]
async fn cancelled_call_does_not_poison_the_cache() {
    let harness = TestHarness::builder()
        .with_replies(vec![
            MockReply::Delayed(Duration::from_millis(500), "exam_prep|0.77".into()),
            MockReply::text("exam_prep|0.77"),
        ])
        .build()
        .unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let request = ClassificationRequest::new(LONG_QUESTION, 0);
    let abandoned = harness.router.route_with_cancel(&request, &cancel).await;
    assert_eq!(abandoned.result.method, Method::Pattern);
    assert!(harness.router.cache().is_empty());

    let fresh = harness.router.route(&request).await;
    assert_eq!(fresh.result.method, Method::Remote);
    assert_eq!(fresh.result.module, "exam_prep");
    assert!(!fresh.trace.cached);
    assert_eq!(harness.remote_calls(), 2);

    let again = harness.router.route(&request).await;
    assert!(again.trace.cached);
    assert_eq!(again.result.method, Method::Remote);
}

#[tokio::test]
async fn already_cancelled_call_still_returns_a_decision() {
    let harness = TestHarness::builder().build().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let decision = harness
        .router
        .route_with_cancel(&ClassificationRequest::new(LONG_QUESTION, 0), &cancel)
        .await;

    assert_eq!(harness.remote_calls(), 0);
    assert_ne!(decision.result.method, Method::Remote);
}

#[tokio::test]
async fn custom_tier_list_is_consulted_in_order() {
    struct Fixed(&'static str);

    #[async_trait::async_trait]
    impl Tier for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn classify(
            &self,
            _request: &ClassificationRequest,
        ) -> Option<switchyard_core::ClassificationResult> {
            Some(switchyard_core::ClassificationResult::new(
                self.0,
                0.6,
                "fixed tier",
                Method::Remote,
            ))
        }
    }

    let router = IntentRouter::new(
        Arc::new(ResultCache::new(Duration::from_secs(60), 8)),
        vec![Arc::new(Fixed("lesson")), Arc::new(Fixed("images"))],
        PatternTier::builtin(),
    );

    let decision = router.route(&ClassificationRequest::new("oi", 0)).await;
    assert_eq!(decision.result.module, "lesson");
    assert_eq!(router.tier_names(), vec!["fixed", "fixed", "pattern"]);
}

#[tokio::test]
async fn concurrent_routes_share_one_cache() {
    let harness = Arc::new(TestHarness::builder().without_provider().build().unwrap());

    let mut handles = Vec::new();
    for i in 0..32 {
        let harness = harness.clone();
        handles.push(tokio::spawn(async move {
            harness.route(&format!("boleto numero {}", i % 4), 0).await
        }));
    }
    for handle in handles {
        let decision = handle.await.unwrap();
        assert_eq!(decision.result.module, "billing");
    }

    assert_eq!(harness.router.cache().len(), 4);
}
