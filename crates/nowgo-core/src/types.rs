// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the decision engine, its collaborators, and the gateway.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use strum::{Display, EnumString};

/// Identifier of an authenticated caller (resolved from an API key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerId(pub String);

impl std::fmt::Display for CallerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier attached to every decision for client-side correlation.
///
/// Not an authorization token and not usable for replay detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionId(pub String);

impl DecisionId {
    /// Hex length of generated identifiers (64 bits of digest).
    pub const LEN: usize = 16;

    /// Generate a new identifier from a random UUID mixed with the query text.
    pub fn generate(query: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(uuid::Uuid::new_v4().as_bytes());
        hasher.update(query.as_bytes());
        let digest = hasher.finalize();
        Self(hex::encode(&digest[..Self::LEN / 2]))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DecisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse difficulty of a query. Ordered `Low < Medium < High`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    Low,
    Medium,
    High,
}

/// Caller-selected optimization objective for model selection.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PriorityMode {
    /// Cheapest candidate.
    Cost,
    /// Fastest candidate.
    Speed,
    /// Highest-quality candidate.
    Quality,
    /// Tier-dependent trade-off between cost and quality.
    #[default]
    Balanced,
}

/// A validated request for a routing decision.
///
/// Query emptiness is checked at the transport boundary; the engine assumes
/// a non-empty query.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRequest {
    /// Natural-language query text.
    pub query: String,
    /// Optimization objective.
    pub priority: PriorityMode,
    /// Optional cost ceiling per 1K tokens. `None` means unconstrained.
    pub max_cost: Option<f64>,
}

impl DecisionRequest {
    /// Create a balanced, unconstrained request.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            priority: PriorityMode::default(),
            max_cost: None,
        }
    }

    /// Set the priority mode.
    pub fn with_priority(mut self, priority: PriorityMode) -> Self {
        self.priority = priority;
        self
    }

    /// Set the cost ceiling.
    pub fn with_max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost = Some(max_cost);
        self
    }
}

/// The immutable result of one decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    /// Correlation identifier, unique per decision.
    pub decision_id: DecisionId,
    /// Chosen model identifier.
    pub model: String,
    /// Classified complexity of the query.
    pub complexity: ComplexityTier,
    /// Cost per 1K tokens of the chosen model.
    pub cost: f64,
    /// Cost of the baseline model the savings were computed against.
    pub baseline_cost: f64,
    /// Savings versus the baseline model, 0-100.
    pub savings_percentage: u8,
    /// Wall time spent computing the decision. The gateway widens this to the
    /// whole request before reporting it to the usage sink.
    pub elapsed: Duration,
}

impl DecisionRecord {
    /// Absolute savings per 1K tokens versus the baseline, floored at zero.
    pub fn savings_amount(&self) -> f64 {
        (self.baseline_cost - self.cost).max(0.0)
    }
}

/// Why an admission check refused a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// The caller is not known to the admission collaborator.
    UnknownCaller,
    /// The caller has used all requests allowed by its plan.
    QuotaExceeded { limit: u64 },
}

impl DenialReason {
    /// Short label used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            DenialReason::UnknownCaller => "unknown_caller",
            DenialReason::QuotaExceeded { .. } => "quota_exceeded",
        }
    }
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenialReason::UnknownCaller => write!(f, "unknown caller"),
            DenialReason::QuotaExceeded { limit } => {
                write!(f, "rate limit exceeded ({limit} requests)")
            }
        }
    }
}

/// Outcome of reserving one request against a caller's quota.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Denied(DenialReason),
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed)
    }
}

/// Point-in-time view of a caller's quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaSnapshot {
    pub used: u64,
    pub limit: u64,
}

/// Aggregated usage for one caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageSummary {
    pub total_queries: u64,
    pub total_cost: f64,
    pub total_savings: f64,
    /// Mean request handling time in seconds.
    pub avg_response_time: f64,
    pub queries_by_model: BTreeMap<String, u64>,
    pub period: String,
}
