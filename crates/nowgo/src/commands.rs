// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot CLI commands: `decide`, `models`, `plans`, `check`.

use colored::Colorize;
use nowgo_config::model::NowgoConfig;
use nowgo_core::NowgoError;
use nowgo_gateway::handlers::OptimizeRequest;
use nowgo_router::DecisionEngine;
use serde::Serialize;

/// JSON printed by `nowgo decide`.
#[derive(Debug, Serialize)]
pub struct DecideOutput {
    pub selected_model: String,
    pub complexity: String,
    pub priority: String,
    pub cost: f64,
    pub savings_percentage: u8,
    pub reason: String,
    pub decision_id: String,
    pub elapsed_us: u128,
}

/// Run one decision against the configured catalog.
pub fn decide(
    config: &NowgoConfig,
    query: String,
    priority: Option<String>,
    max_cost: Option<f64>,
) -> Result<DecideOutput, NowgoError> {
    let request = OptimizeRequest {
        query,
        max_cost,
        priority,
        user_id: None,
    }
    .into_decision_request()?;

    let engine = DecisionEngine::from_config(config)?;
    let decision = engine.evaluate(&request)?;
    let record = decision.record;

    Ok(DecideOutput {
        selected_model: record.model,
        complexity: record.complexity.to_string(),
        priority: request.priority.to_string(),
        cost: record.cost,
        savings_percentage: record.savings_percentage,
        reason: decision.reason.to_string(),
        decision_id: record.decision_id.to_string(),
        elapsed_us: record.elapsed.as_micros(),
    })
}

/// Render the catalog as a table.
pub fn models_table(config: &NowgoConfig) -> String {
    let mut out = format!(
        "{:<16} {:>10} {:>8} {:>6} {:>8}  {}\n",
        "MODEL", "COST/1K", "QUALITY", "SPEED", "TOKENS", "DESCRIPTION"
    );
    for m in &config.catalog.models {
        let mut marker = String::new();
        if m.id == config.catalog.flagship {
            marker.push_str(" [flagship]");
        }
        if m.id == config.catalog.mid_tier {
            marker.push_str(" [mid-tier]");
        }
        out.push_str(&format!(
            "{:<16} {:>10.4} {:>8.2} {:>6.2} {:>8}  {}{}\n",
            m.id,
            m.cost_per_1k_tokens,
            m.quality_score,
            m.speed_score,
            m.max_tokens,
            m.description,
            marker
        ));
    }
    out
}

/// Render the subscription plans.
pub fn plans_table(config: &NowgoConfig) -> String {
    let mut out = String::new();
    for plan in &config.plans {
        out.push_str(&format!(
            "{} ({}) ${:.2}/month, {} requests, {} support\n",
            plan.name, plan.id, plan.price, plan.requests_per_month, plan.support_level
        ));
        for feature in &plan.features {
            out.push_str(&format!("  - {feature}\n"));
        }
    }
    out
}

/// One-line summary of a valid configuration.
pub fn check_summary(config: &NowgoConfig) -> String {
    format!(
        "{} configuration valid: {} models (flagship {}, mid-tier {}), {} plans, {} API keys",
        "ok".green().bold(),
        config.catalog.models.len(),
        config.catalog.flagship,
        config.catalog.mid_tier,
        config.plans.len(),
        config.api_keys.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decide_uses_configured_catalog() {
        let output = decide(
            &NowgoConfig::default(),
            "Summarize this document briefly".to_string(),
            Some("cost".to_string()),
            Some(0.001),
        )
        .unwrap();
        assert_eq!(output.selected_model, "gpt-j");
        assert_eq!(output.priority, "cost");
        assert_eq!(output.reason, "objective");
        assert_eq!(output.decision_id.len(), 16);
    }

    #[test]
    fn decide_rejects_invalid_input() {
        let err = decide(&NowgoConfig::default(), " ".to_string(), None, None).unwrap_err();
        assert!(err.is_client_error());
        let err = decide(
            &NowgoConfig::default(),
            "hi".to_string(),
            Some("fast".to_string()),
            None,
        )
        .unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn tables_list_everything() {
        let config = NowgoConfig::default();
        let models = models_table(&config);
        assert_eq!(models.lines().count(), 6);
        assert!(models.contains("gpt-4"));
        assert!(models.contains("[flagship]"));
        assert!(models.contains("[mid-tier]"));

        let plans = plans_table(&config);
        assert!(plans.contains("Starter (starter) $99.00/month, 10000 requests, Email support"));
    }

    #[test]
    fn check_summary_counts() {
        colored::control::set_override(false);
        let summary = check_summary(&NowgoConfig::default());
        assert!(summary.starts_with("ok configuration valid: 5 models"));
    }
}
