// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes:
//! catalog invariants, score ranges, cross-references between sections.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{CatalogConfig, ClassifierConfig, NowgoConfig, SelectionConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &NowgoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "server.log_level `{}` must be one of: {}",
            config.server.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::validation("gateway.host must not be empty"));
    }

    validate_catalog(&config.catalog, &mut errors);
    validate_classifier(&config.classifier, &mut errors);
    validate_selection(&config.selection, &mut errors);
    validate_plans_and_keys(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_catalog(catalog: &CatalogConfig, errors: &mut Vec<ConfigError>) {
    if catalog.models.is_empty() {
        errors.push(ConfigError::validation(
            "catalog.models must contain at least one model",
        ));
        return;
    }

    let mut seen = HashSet::new();
    for (i, model) in catalog.models.iter().enumerate() {
        if model.id.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "catalog.models[{i}].id must not be empty"
            )));
        } else if !seen.insert(model.id.as_str()) {
            errors.push(ConfigError::validation(format!(
                "duplicate model id `{}` in [[catalog.models]]",
                model.id
            )));
        }

        if !model.cost_per_1k_tokens.is_finite() || model.cost_per_1k_tokens < 0.0 {
            errors.push(ConfigError::validation(format!(
                "catalog.models[{i}].cost_per_1k_tokens must be a non-negative number, got {}",
                model.cost_per_1k_tokens
            )));
        }
        for (name, score) in [
            ("quality_score", model.quality_score),
            ("speed_score", model.speed_score),
        ] {
            if !(0.0..=1.0).contains(&score) {
                errors.push(ConfigError::validation(format!(
                    "catalog.models[{i}].{name} must be within 0.0-1.0, got {score}"
                )));
            }
        }
        if model.max_tokens == 0 {
            errors.push(ConfigError::validation(format!(
                "catalog.models[{i}].max_tokens must be greater than zero"
            )));
        }
    }

    let mut designated = vec![
        ("catalog.flagship", catalog.flagship.as_str()),
        ("catalog.mid_tier", catalog.mid_tier.as_str()),
    ];
    if let Some(baseline) = catalog.baseline.as_deref() {
        designated.push(("catalog.baseline", baseline));
    }
    for (key, id) in designated {
        if !seen.contains(id) {
            errors.push(ConfigError::validation(format!(
                "{key} `{id}` does not name a model in [[catalog.models]]"
            )));
        }
    }
}

fn validate_classifier(classifier: &ClassifierConfig, errors: &mut Vec<ConfigError>) {
    for (name, list) in [
        ("technical_terms", &classifier.technical_terms),
        ("creative_terms", &classifier.creative_terms),
        ("reasoning_terms", &classifier.reasoning_terms),
    ] {
        if list.iter().any(|t| t.trim().is_empty()) {
            errors.push(ConfigError::validation(format!(
                "classifier.{name} must not contain empty terms"
            )));
        }
    }

    if classifier.medium_word_count > classifier.high_word_count {
        errors.push(ConfigError::validation(format!(
            "classifier.medium_word_count ({}) must not exceed classifier.high_word_count ({})",
            classifier.medium_word_count, classifier.high_word_count
        )));
    }
}

fn validate_selection(selection: &SelectionConfig, errors: &mut Vec<ConfigError>) {
    for (name, floor) in [
        ("high_quality_floor", selection.high_quality_floor),
        ("mid_tier_quality_floor", selection.mid_tier_quality_floor),
    ] {
        if !(0.0..=1.0).contains(&floor) {
            errors.push(ConfigError::validation(format!(
                "selection.{name} must be within 0.0-1.0, got {floor}"
            )));
        }
    }
}

fn validate_plans_and_keys(config: &NowgoConfig, errors: &mut Vec<ConfigError>) {
    let mut plan_ids = HashSet::new();
    for plan in &config.plans {
        if !plan_ids.insert(plan.id.as_str()) {
            errors.push(ConfigError::validation(format!(
                "duplicate plan id `{}` in [[plans]]",
                plan.id
            )));
        }
        if !plan.price.is_finite() || plan.price < 0.0 {
            errors.push(ConfigError::validation(format!(
                "plans `{}` price must be non-negative, got {}",
                plan.id, plan.price
            )));
        }
    }

    let mut keys = HashSet::new();
    let mut callers = HashSet::new();
    for (i, api_key) in config.api_keys.iter().enumerate() {
        if api_key.key.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "api_keys[{i}].key must not be empty"
            )));
        } else if !keys.insert(api_key.key.as_str()) {
            // The key itself is a secret: report by position only.
            errors.push(ConfigError::validation(format!(
                "api_keys[{i}].key duplicates an earlier key"
            )));
        }
        if !callers.insert(api_key.caller_id.as_str()) {
            errors.push(ConfigError::validation(format!(
                "duplicate caller_id `{}` in [[api_keys]]",
                api_key.caller_id
            )));
        }
        if !plan_ids.contains(api_key.plan.as_str()) {
            errors.push(ConfigError::validation(format!(
                "api_keys[{i}].plan `{}` does not name a plan in [[plans]]",
                api_key.plan
            )));
        }
    }
}
