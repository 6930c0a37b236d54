// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Savings percentage relative to a baseline model.

use nowgo_core::NowgoError;

use crate::catalog::{Catalog, ModelProfile};

/// Whole-number percentage saved by using `chosen` instead of `baseline`.
///
/// Truncates toward zero, never negative, capped at 100. A zero-cost
/// baseline yields 0.
pub fn savings_percentage(chosen: &ModelProfile, baseline: &ModelProfile) -> u8 {
    let baseline_cost = baseline.cost_per_1k_tokens;
    if !(baseline_cost > 0.0) {
        return 0;
    }
    let pct = (baseline_cost - chosen.cost_per_1k_tokens) / baseline_cost * 100.0;
    pct.clamp(0.0, 100.0).floor() as u8
}

impl Catalog {
    /// Savings of `chosen_id` against `baseline_id`, or against the catalog
    /// baseline when none is given.
    pub fn savings(&self, chosen_id: &str, baseline_id: Option<&str>) -> Result<u8, NowgoError> {
        let chosen = self.lookup(chosen_id)?;
        let baseline = match baseline_id {
            Some(id) => self.lookup(id)?,
            None => self.baseline(),
        };
        Ok(savings_percentage(chosen, baseline))
    }
}

#[cfg(test)]
mod tests {
    use nowgo_config::model::CatalogConfig;
    use proptest::prelude::*;

    use super::*;
    use crate::catalog::tests::profile;

    fn default_catalog() -> Catalog {
        Catalog::from_config(&CatalogConfig::default()).unwrap()
    }

    #[test]
    fn savings_against_flagship() {
        let catalog = default_catalog();
        assert_eq!(catalog.savings("gpt-j", None).unwrap(), 99);
        assert_eq!(catalog.savings("gpt-3.5", None).unwrap(), 96);
        assert_eq!(catalog.savings("claude-instant", None).unwrap(), 97);
        assert_eq!(catalog.savings("claude-2", None).unwrap(), 58);
        assert_eq!(catalog.savings("gpt-4", None).unwrap(), 0);
    }

    #[test]
    fn more_expensive_than_baseline_is_zero() {
        let catalog = default_catalog();
        assert_eq!(catalog.savings("gpt-4", Some("gpt-3.5")).unwrap(), 0);
    }

    #[test]
    fn explicit_baseline() {
        let catalog = default_catalog();
        // 89.99999999999999 in f64; the floor keeps it at 89
        assert_eq!(catalog.savings("gpt-j", Some("gpt-3.5")).unwrap(), 89);
    }

    #[test]
    fn exact_fractions_floor_cleanly() {
        let chosen = profile("chosen", 0.25, 0.5, 0.5);
        let baseline = profile("baseline", 1.0, 0.5, 0.5);
        assert_eq!(savings_percentage(&chosen, &baseline), 75);
    }

    #[test]
    fn zero_cost_baseline_is_zero() {
        let free = profile("free", 0.0, 0.5, 0.5);
        let paid = profile("paid", 0.01, 0.5, 0.5);
        assert_eq!(savings_percentage(&paid, &free), 0);
        assert_eq!(savings_percentage(&free, &free), 0);
    }

    #[test]
    fn free_model_against_paid_baseline_is_full() {
        let free = profile("free", 0.0, 0.5, 0.5);
        let paid = profile("paid", 0.01, 0.5, 0.5);
        assert_eq!(savings_percentage(&free, &paid), 100);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let catalog = default_catalog();
        assert!(matches!(
            catalog.savings("nope", None),
            Err(NowgoError::ModelNotFound { .. })
        ));
        assert!(matches!(
            catalog.savings("gpt-j", Some("nope")),
            Err(NowgoError::ModelNotFound { .. })
        ));
    }

    proptest! {
        #[test]
        fn savings_stay_in_range(chosen in 0.0f64..10.0, baseline in 0.0f64..10.0) {
            let pct = savings_percentage(
                &profile("c", chosen, 0.5, 0.5),
                &profile("b", baseline, 0.5, 0.5),
            );
            prop_assert!(pct <= 100);
            if chosen >= baseline {
                prop_assert_eq!(pct, 0);
            }
        }

        #[test]
        fn same_model_saves_nothing(cost in 0.0f64..10.0) {
            let model = profile("m", cost, 0.5, 0.5);
            prop_assert_eq!(savings_percentage(&model, &model), 0);
        }
    }
}
