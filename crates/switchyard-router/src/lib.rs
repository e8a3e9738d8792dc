// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiered intent classification for the Switchyard router.
//!
//! This crate provides:
//! - [`PatternTier`]: ordered regex rules plus keyword fallback (zero-cost, always answers)
//! - [`ResultCache`]: bounded, time-limited memoization of past classifications
//! - [`RemoteTier`]: deadline-bounded call to an external classifier, behind a complexity gate
//! - [`IntentRouter`]: the orchestrator combining them into one `route` call
//!
//! Resolution order is override, cache, remote tiers, then the pattern tier.
//! Every failure below the orchestrator degrades to the next tier, so
//! `route` always returns a decision.

pub mod cache;
pub mod pattern;
pub mod remote;
pub mod router;
pub mod tier;

pub use cache::{cache_key, spawn_sweeper, ResultCache};
pub use pattern::{KeywordRule, PatternRule, PatternTier};
pub use remote::{build_instruction, parse_module_reply, ComplexityGate, RemoteFailure, RemoteTier};
pub use router::IntentRouter;
pub use tier::Tier;
