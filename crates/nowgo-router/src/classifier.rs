// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic query complexity classification.
//!
//! Classifies query text into low/medium/high tiers from its word count and
//! the presence of configured vocabulary terms. Pure, deterministic, no I/O.
//! The vocabularies are configuration data; the rule shape is fixed:
//!
//! - **high**: more than `high_word_count` words, or any technical term
//! - **medium**: more than `medium_word_count` words, or any creative or
//!   reasoning term
//! - **low**: everything else

use nowgo_config::model::ClassifierConfig;
use nowgo_core::ComplexityTier;

/// Result of classifying a query's complexity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    /// The classified complexity tier.
    pub tier: ComplexityTier,
    /// Whitespace-separated token count.
    pub word_count: usize,
    /// Human-readable reason for the classification.
    pub reason: &'static str,
}

/// Word-count and vocabulary classifier.
#[derive(Debug, Clone)]
pub struct ComplexityClassifier {
    technical: Vec<String>,
    creative: Vec<String>,
    reasoning: Vec<String>,
    high_word_count: usize,
    medium_word_count: usize,
}

impl Default for ComplexityClassifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

impl ComplexityClassifier {
    /// Build a classifier from the `[classifier]` config section.
    ///
    /// Terms are matched case-insensitively as substrings.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let lowered = |terms: &[String]| terms.iter().map(|t| t.to_lowercase()).collect();
        Self {
            technical: lowered(&config.technical_terms),
            creative: lowered(&config.creative_terms),
            reasoning: lowered(&config.reasoning_terms),
            high_word_count: config.high_word_count,
            medium_word_count: config.medium_word_count,
        }
    }

    /// Classify `text` into a complexity tier.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let word_count = text.split_whitespace().count();
        let lower = text.to_lowercase();
        let mentions = |terms: &[String]| terms.iter().any(|t| lower.contains(t.as_str()));

        let (tier, reason) = if word_count > self.high_word_count {
            (ComplexityTier::High, "long query")
        } else if mentions(&self.technical) {
            (ComplexityTier::High, "technical vocabulary")
        } else if word_count > self.medium_word_count {
            (ComplexityTier::Medium, "moderate length")
        } else if mentions(&self.creative) {
            (ComplexityTier::Medium, "creative vocabulary")
        } else if mentions(&self.reasoning) {
            (ComplexityTier::Medium, "reasoning vocabulary")
        } else {
            (ComplexityTier::Low, "short query without indicators")
        };

        ClassificationResult {
            tier,
            word_count,
            reason,
        }
    }
}
