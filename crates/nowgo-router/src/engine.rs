// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision engine: classify, select, price, and record one request.
//!
//! Pure CPU work over a shared read-only catalog. No locks, no I/O, no
//! retries. Safe to call from any number of tasks at once.

use std::sync::Arc;
use std::time::Instant;

use nowgo_config::model::NowgoConfig;
use nowgo_core::{DecisionId, DecisionRecord, DecisionRequest, NowgoError};
use nowgo_cost::Catalog;
use tracing::{debug, error};

use crate::classifier::ComplexityClassifier;
use crate::selector::{ModelSelector, SelectionPolicy, SelectionReason};

/// A decision together with the selection rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub record: DecisionRecord,
    pub reason: SelectionReason,
}

/// Orchestrates classification, selection, and savings for each request.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    catalog: Arc<Catalog>,
    classifier: ComplexityClassifier,
    selector: ModelSelector,
}

impl DecisionEngine {
    pub fn new(
        catalog: Arc<Catalog>,
        classifier: ComplexityClassifier,
        selector: ModelSelector,
    ) -> Self {
        Self {
            catalog,
            classifier,
            selector,
        }
    }

    /// Build the engine and its catalog from configuration.
    pub fn from_config(config: &NowgoConfig) -> Result<Self, NowgoError> {
        let catalog = Catalog::from_config(&config.catalog)?;
        Ok(Self::new(
            Arc::new(catalog),
            ComplexityClassifier::from_config(&config.classifier),
            ModelSelector::new(SelectionPolicy::from_config(&config.selection)),
        ))
    }

    /// The catalog decisions are made over.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Decide which model serves `request`.
    ///
    /// Fails only with [`NowgoError::ModelNotFound`] when the selector
    /// produces an id the catalog cannot price, which is a programming error.
    pub fn decide(&self, request: &DecisionRequest) -> Result<DecisionRecord, NowgoError> {
        self.evaluate(request).map(|decision| decision.record)
    }

    /// Like [`decide`](Self::decide), also reporting which selection rule fired.
    pub fn evaluate(&self, request: &DecisionRequest) -> Result<Decision, NowgoError> {
        let started = Instant::now();

        let classification = self.classifier.classify(&request.query);
        let selection = self.selector.select(
            classification.tier,
            request.priority,
            request.max_cost,
            &self.catalog,
        );

        let model_id = selection.model.id.as_str();
        let priced = self
            .catalog
            .lookup(model_id)
            .and_then(|chosen| Ok((chosen, self.catalog.savings(model_id, None)?)));
        let (chosen, savings_percentage) = match priced {
            Ok(priced) => priced,
            Err(e) => {
                error!(model = model_id, error = %e, "catalog inconsistency while pricing decision");
                return Err(e);
            }
        };

        let record = DecisionRecord {
            decision_id: DecisionId::generate(&request.query),
            model: chosen.id.clone(),
            complexity: classification.tier,
            cost: chosen.cost_per_1k_tokens,
            baseline_cost: self.catalog.baseline().cost_per_1k_tokens,
            savings_percentage,
            elapsed: started.elapsed(),
        };

        debug!(
            decision_id = %record.decision_id,
            model = %record.model,
            tier = %record.complexity,
            priority = %request.priority,
            reason = %selection.reason,
            classified_by = classification.reason,
            savings = record.savings_percentage,
            "decision completed"
        );

        Ok(Decision {
            record,
            reason: selection.reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use nowgo_core::{ComplexityTier, PriorityMode};
    use proptest::prelude::*;
    use tracing_test::traced_test;

    use super::*;

    fn engine() -> DecisionEngine {
        DecisionEngine::from_config(&NowgoConfig::default()).unwrap()
    }

    #[test]
    fn simple_question_routes_to_cheapest() {
        let record = engine()
            .decide(&DecisionRequest::new("What is artificial intelligence?"))
            .unwrap();
        assert_eq!(record.complexity, ComplexityTier::Low);
        assert_eq!(record.model, "gpt-j");
        assert!((record.cost - 0.0002).abs() < f64::EPSILON);
        assert_eq!(record.savings_percentage, 99);
        assert_eq!(record.decision_id.as_str().len(), DecisionId::LEN);
    }

    #[test]
    fn cost_priority_with_ceiling() {
        let request = DecisionRequest::new("Summarize this document briefly")
            .with_priority(PriorityMode::Cost)
            .with_max_cost(0.001);
        let record = engine().decide(&request).unwrap();
        assert_eq!(record.model, "gpt-j");
        assert!(record.cost <= 0.001);
    }

    #[test]
    fn technical_query_is_high_tier() {
        let record = engine()
            .decide(&DecisionRequest::new(
                "Give me a detailed technical analysis of B-trees",
            ))
            .unwrap();
        assert_eq!(record.complexity, ComplexityTier::High);
        assert_eq!(record.model, "claude-2");
        assert_eq!(record.savings_percentage, 58);
    }

    #[test]
    fn quality_priority_picks_flagship_with_no_savings() {
        let request = DecisionRequest::new("hello").with_priority(PriorityMode::Quality);
        let record = engine().decide(&request).unwrap();
        assert_eq!(record.model, "gpt-4");
        assert_eq!(record.savings_percentage, 0);
        assert_eq!(record.savings_amount(), 0.0);
    }

    #[test]
    fn medium_balanced_uses_mid_tier() {
        let decision = engine()
            .evaluate(&DecisionRequest::new("write a short poem about rust"))
            .unwrap();
        assert_eq!(decision.record.model, "gpt-3.5");
        assert_eq!(decision.reason, SelectionReason::MidTier);
    }

    #[traced_test]
    #[test]
    fn impossible_ceiling_falls_back_and_warns() {
        let request = DecisionRequest::new("anything").with_max_cost(0.00001);
        let decision = engine().evaluate(&request).unwrap();
        assert_eq!(decision.record.model, "gpt-j");
        assert_eq!(decision.reason, SelectionReason::CeilingFallback);
        assert!(logs_contain("cost ceiling excludes every model"));
    }

    #[traced_test]
    #[test]
    fn flagship_override_is_logged() {
        let request = DecisionRequest::new("explain this algorithm").with_max_cost(0.01);
        let decision = engine().evaluate(&request).unwrap();
        assert_eq!(decision.record.model, "gpt-4");
        assert_eq!(decision.reason, SelectionReason::QualityFloorOverride);
        assert!(logs_contain("overriding with flagship"));
    }

    #[test]
    fn decision_ids_are_unique_per_call() {
        let engine = engine();
        let request = DecisionRequest::new("same query");
        let a = engine.decide(&request).unwrap();
        let b = engine.decide(&request).unwrap();
        assert_ne!(a.decision_id, b.decision_id);
    }

    #[test]
    fn concurrent_decisions_share_one_catalog() {
        let engine = Arc::new(engine());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    engine
                        .decide(&DecisionRequest::new(format!("question number {i}")))
                        .map(|r| r.model)
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), "gpt-j");
        }
    }

    proptest! {
        #[test]
        fn identical_requests_decide_identically(
            query in "[a-z ]{1,80}",
            ceiling in proptest::option::of(0.0f64..0.1),
        ) {
            let engine = engine();
            let mut request = DecisionRequest::new(query);
            request.max_cost = ceiling;
            let a = engine.decide(&request).unwrap();
            let b = engine.decide(&request).unwrap();
            prop_assert_eq!(a.model, b.model);
            prop_assert_eq!(a.complexity, b.complexity);
            prop_assert_eq!(a.cost, b.cost);
            prop_assert_eq!(a.savings_percentage, b.savings_percentage);
        }
    }
}
