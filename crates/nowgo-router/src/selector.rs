// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model selection policy.
//!
//! Two steps. First the candidate set: the whole catalog, narrowed to models
//! at or under the cost ceiling when one is given. A ceiling that excludes
//! every model degrades to the globally cheapest model. Then the objective,
//! dispatched on [`PriorityMode`]:
//!
//! | priority | tier   | rule                                                        |
//! |----------|--------|-------------------------------------------------------------|
//! | cost     | any    | cheapest candidate                                          |
//! | speed    | any    | fastest candidate                                           |
//! | quality  | any    | highest-quality candidate                                   |
//! | balanced | high   | cheapest candidate at or above the high floor, else flagship |
//! | balanced | medium | mid-tier if a candidate, else cheapest above the mid floor  |
//! | balanced | low    | cheapest candidate                                          |
//!
//! Ties always go to the earlier catalog entry. The balanced/high flagship
//! fallback ignores the cost ceiling.

use nowgo_config::model::SelectionConfig;
use nowgo_core::{ComplexityTier, PriorityMode};
use nowgo_cost::{first_max, first_min, Catalog, ModelProfile};
use tracing::warn;

/// Which rule produced a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SelectionReason {
    /// The ceiling excluded every model; the global cheapest was returned.
    CeilingFallback,
    /// The priority's objective picked the best candidate.
    Objective,
    /// No candidate met the high-tier quality floor; the flagship was returned.
    QualityFloorOverride,
    /// The designated mid-tier model was a candidate.
    MidTier,
    /// The mid-tier model was not a candidate; the cheapest qualifying one was used.
    MidTierFallback,
}

/// A chosen model and the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a> {
    pub model: &'a ModelProfile,
    pub reason: SelectionReason,
}

/// Quality floors for the balanced policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPolicy {
    pub high_quality_floor: f64,
    pub mid_tier_quality_floor: f64,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::from_config(&SelectionConfig::default())
    }
}

impl SelectionPolicy {
    pub fn from_config(config: &SelectionConfig) -> Self {
        Self {
            high_quality_floor: config.high_quality_floor,
            mid_tier_quality_floor: config.mid_tier_quality_floor,
        }
    }
}

/// Stateless tier x priority selector.
#[derive(Debug, Clone, Default)]
pub struct ModelSelector {
    policy: SelectionPolicy,
}

impl ModelSelector {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Choose a model for a query of `tier` under `priority` and an optional
    /// cost `ceiling`. Always returns a model.
    pub fn select<'a>(
        &self,
        tier: ComplexityTier,
        priority: PriorityMode,
        ceiling: Option<f64>,
        catalog: &'a Catalog,
    ) -> Selection<'a> {
        let candidates: Vec<&ModelProfile> = match ceiling {
            Some(max_cost) => catalog.filter_by_max_cost(max_cost),
            None => catalog.all().iter().collect(),
        };

        if candidates.is_empty() {
            let cheapest = catalog.cheapest();
            warn!(
                ceiling = ?ceiling,
                fallback = %cheapest.id,
                "cost ceiling excludes every model, using cheapest"
            );
            return Selection {
                model: cheapest,
                reason: SelectionReason::CeilingFallback,
            };
        }

        let best = match priority {
            PriorityMode::Cost => first_min(candidates, |m| m.cost_per_1k_tokens),
            PriorityMode::Speed => first_max(candidates, |m| m.speed_score),
            PriorityMode::Quality => first_max(candidates, |m| m.quality_score),
            PriorityMode::Balanced => return self.balanced(tier, ceiling, candidates, catalog),
        };
        objective(best, catalog)
    }

    fn balanced<'a>(
        &self,
        tier: ComplexityTier,
        ceiling: Option<f64>,
        candidates: Vec<&'a ModelProfile>,
        catalog: &'a Catalog,
    ) -> Selection<'a> {
        match tier {
            ComplexityTier::High => {
                let floor = self.policy.high_quality_floor;
                let qualifying = candidates.iter().copied().filter(|m| m.quality_score >= floor);
                match first_min(qualifying, |m| m.cost_per_1k_tokens) {
                    Some(model) => Selection {
                        model,
                        reason: SelectionReason::Objective,
                    },
                    None => {
                        let flagship = catalog.flagship();
                        warn!(
                            ceiling = ?ceiling,
                            floor,
                            flagship = %flagship.id,
                            "no candidate meets the quality floor, overriding with flagship"
                        );
                        Selection {
                            model: flagship,
                            reason: SelectionReason::QualityFloorOverride,
                        }
                    }
                }
            }
            ComplexityTier::Medium => {
                let mid_tier = catalog.mid_tier();
                if candidates.iter().any(|m| m.id == mid_tier.id) {
                    return Selection {
                        model: mid_tier,
                        reason: SelectionReason::MidTier,
                    };
                }
                let floor = self.policy.mid_tier_quality_floor;
                let qualifying = candidates.iter().copied().filter(|m| m.quality_score >= floor);
                let model = first_min(qualifying, |m| m.cost_per_1k_tokens)
                    .or_else(|| first_min(candidates.iter().copied(), |m| m.cost_per_1k_tokens));
                Selection {
                    model: model.unwrap_or(mid_tier),
                    reason: SelectionReason::MidTierFallback,
                }
            }
            ComplexityTier::Low => {
                objective(first_min(candidates, |m| m.cost_per_1k_tokens), catalog)
            }
        }
    }
}

// Candidate sets are never empty by the time an objective runs.
fn objective<'a>(best: Option<&'a ModelProfile>, catalog: &'a Catalog) -> Selection<'a> {
    Selection {
        model: best.unwrap_or_else(|| catalog.cheapest()),
        reason: SelectionReason::Objective,
    }
}

#[cfg(test)]
mod tests {
    use nowgo_config::model::CatalogConfig;
    use proptest::prelude::*;

    use super::*;

    const TIERS: [ComplexityTier; 3] = [
        ComplexityTier::Low,
        ComplexityTier::Medium,
        ComplexityTier::High,
    ];
    const PRIORITIES: [PriorityMode; 4] = [
        PriorityMode::Cost,
        PriorityMode::Speed,
        PriorityMode::Quality,
        PriorityMode::Balanced,
    ];

    fn catalog() -> Catalog {
        Catalog::from_config(&CatalogConfig::default()).unwrap()
    }

    fn profile(id: &str, cost: f64, quality: f64, speed: f64) -> ModelProfile {
        ModelProfile {
            id: id.to_string(),
            description: String::new(),
            cost_per_1k_tokens: cost,
            quality_score: quality,
            speed_score: speed,
            max_tokens: 1000,
        }
    }

    fn pick(tier: ComplexityTier, priority: PriorityMode, ceiling: Option<f64>) -> String {
        let catalog = catalog();
        ModelSelector::default()
            .select(tier, priority, ceiling, &catalog)
            .model
            .id
            .clone()
    }

    #[test]
    fn policy_table_without_ceiling() {
        use ComplexityTier::*;
        use PriorityMode::*;

        let expected = [
            (Low, Cost, "gpt-j"),
            (Medium, Cost, "gpt-j"),
            (High, Cost, "gpt-j"),
            (Low, Speed, "gpt-j"),
            (Medium, Speed, "gpt-j"),
            (High, Speed, "gpt-j"),
            (Low, Quality, "gpt-4"),
            (Medium, Quality, "gpt-4"),
            (High, Quality, "gpt-4"),
            (Low, Balanced, "gpt-j"),
            (Medium, Balanced, "gpt-3.5"),
            (High, Balanced, "claude-2"),
        ];
        for (tier, priority, model) in expected {
            assert_eq!(pick(tier, priority, None), model, "{tier}/{priority}");
        }
    }

    #[test]
    fn cost_priority_respects_ceiling() {
        assert_eq!(
            pick(ComplexityTier::Low, PriorityMode::Cost, Some(0.001)),
            "gpt-j"
        );
        assert_eq!(
            pick(ComplexityTier::Low, PriorityMode::Quality, Some(0.002)),
            "gpt-3.5"
        );
    }

    #[test]
    fn ceiling_below_every_model_falls_back_to_cheapest() {
        let catalog = catalog();
        let selector = ModelSelector::default();
        for tier in TIERS {
            for priority in PRIORITIES {
                let selection = selector.select(tier, priority, Some(0.00001), &catalog);
                assert_eq!(selection.model.id, "gpt-j");
                assert_eq!(selection.reason, SelectionReason::CeilingFallback);
            }
        }
    }

    #[test]
    fn zero_ceiling_is_a_real_ceiling() {
        let catalog = catalog();
        let selection = ModelSelector::default().select(
            ComplexityTier::Low,
            PriorityMode::Quality,
            Some(0.0),
            &catalog,
        );
        assert_eq!(selection.reason, SelectionReason::CeilingFallback);
    }

    #[test]
    fn balanced_high_overrides_ceiling_with_flagship() {
        let catalog = catalog();
        let selection = ModelSelector::default().select(
            ComplexityTier::High,
            PriorityMode::Balanced,
            Some(0.01),
            &catalog,
        );
        assert_eq!(selection.model.id, "gpt-4");
        assert_eq!(selection.reason, SelectionReason::QualityFloorOverride);
        assert!(selection.model.cost_per_1k_tokens > 0.01);
    }

    #[test]
    fn balanced_medium_without_mid_tier_uses_cheapest_qualifying() {
        // gpt-3.5 costs 0.002, so a 0.0018 ceiling removes it; claude-instant qualifies.
        let catalog = catalog();
        let selection = ModelSelector::default().select(
            ComplexityTier::Medium,
            PriorityMode::Balanced,
            Some(0.0018),
            &catalog,
        );
        assert_eq!(selection.model.id, "claude-instant");
        assert_eq!(selection.reason, SelectionReason::MidTierFallback);
    }

    #[test]
    fn balanced_medium_without_qualifying_uses_cheapest_candidate() {
        let catalog = catalog();
        let selection = ModelSelector::default().select(
            ComplexityTier::Medium,
            PriorityMode::Balanced,
            Some(0.001),
            &catalog,
        );
        assert_eq!(selection.model.id, "gpt-j");
        assert_eq!(selection.reason, SelectionReason::MidTierFallback);
    }

    #[test]
    fn ties_go_to_the_earlier_entry() {
        let catalog = Catalog::new(
            vec![
                profile("first", 0.01, 0.9, 0.7),
                profile("second", 0.01, 0.9, 0.7),
            ],
            "first",
            "first",
        )
        .unwrap();
        let selector = ModelSelector::default();
        for tier in TIERS {
            for priority in PRIORITIES {
                let selection = selector.select(tier, priority, None, &catalog);
                assert_eq!(selection.model.id, "first", "{tier}/{priority}");
            }
        }
    }

    #[test]
    fn custom_floors_change_balanced_choice() {
        let selector = ModelSelector::new(SelectionPolicy {
            high_quality_floor: 0.95,
            mid_tier_quality_floor: 0.75,
        });
        let catalog = catalog();
        let selection = selector.select(ComplexityTier::High, PriorityMode::Balanced, None, &catalog);
        assert_eq!(selection.model.id, "gpt-4");
        assert_eq!(selection.reason, SelectionReason::Objective);
    }

    proptest! {
        #[test]
        fn never_exceeds_ceiling_except_documented_fallbacks(
            ceiling in 0.0f64..0.1,
            tier_idx in 0usize..3,
            priority_idx in 0usize..4,
        ) {
            let catalog = catalog();
            let selection = ModelSelector::default().select(
                TIERS[tier_idx],
                PRIORITIES[priority_idx],
                Some(ceiling),
                &catalog,
            );
            let exempt = matches!(
                selection.reason,
                SelectionReason::CeilingFallback | SelectionReason::QualityFloorOverride
            );
            prop_assert!(exempt || selection.model.cost_per_1k_tokens <= ceiling);
        }

        #[test]
        fn quality_priority_without_ceiling_is_global_best(tier_idx in 0usize..3) {
            let catalog = catalog();
            let selection =
                ModelSelector::default().select(TIERS[tier_idx], PriorityMode::Quality, None, &catalog);
            prop_assert_eq!(selection.model.id.as_str(), "gpt-4");
        }
    }
}
