// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder (Prometheus, statsd, etc.)
//! can collect these metrics. Without an installed recorder every call is
//! a no-op.

use metrics::{describe_counter, describe_histogram};

/// Register all Nowgo metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "nowgo_decisions_total",
        "Routing decisions by chosen model, tier, and priority"
    );
    describe_histogram!(
        "nowgo_decision_latency_seconds",
        "Time spent computing a routing decision"
    );
    describe_histogram!(
        "nowgo_savings_percentage",
        "Savings versus the baseline model per decision"
    );
    describe_counter!(
        "nowgo_admission_denied_total",
        "Requests refused before reaching the engine"
    );
    describe_counter!(
        "nowgo_ceiling_fallbacks_total",
        "Decisions where the cost ceiling excluded every model"
    );
    describe_counter!(
        "nowgo_quality_overrides_total",
        "Balanced high-tier decisions overridden with the flagship model"
    );
}

/// Record a completed decision.
pub fn record_decision(model: &str, tier: &str, priority: &str) {
    metrics::counter!(
        "nowgo_decisions_total",
        "model" => model.to_string(),
        "tier" => tier.to_string(),
        "priority" => priority.to_string()
    )
    .increment(1);
}

/// Record decision latency.
pub fn record_decision_latency(seconds: f64) {
    metrics::histogram!("nowgo_decision_latency_seconds").record(seconds);
}

/// Record the savings percentage of a decision.
pub fn record_savings(percentage: u8) {
    metrics::histogram!("nowgo_savings_percentage").record(f64::from(percentage));
}

/// Record an admission denial (`unknown_caller`, `quota_exceeded`, `unauthenticated`).
pub fn record_admission_denied(reason: &str) {
    metrics::counter!("nowgo_admission_denied_total", "reason" => reason.to_string())
        .increment(1);
}

pub fn record_ceiling_fallback() {
    metrics::counter!("nowgo_ceiling_fallbacks_total").increment(1);
}

pub fn record_quality_override() {
    metrics::counter!("nowgo_quality_overrides_total").increment(1);
}

#[cfg(test)]
mod tests {
    use metrics_exporter_prometheus::PrometheusBuilder;

    use super::*;

    fn render_with(record: impl FnOnce()) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            register_metrics();
            record();
        });
        handle.render()
    }

    #[test]
    fn decisions_are_labelled() {
        let output = render_with(|| {
            record_decision("gpt-j", "low", "balanced");
            record_decision("gpt-j", "low", "balanced");
        });
        assert!(output.contains("nowgo_decisions_total{"));
        assert!(output.contains("model=\"gpt-j\""));
        assert!(output.contains("tier=\"low\""));
        assert!(output.contains("priority=\"balanced\""));
        assert!(output.contains("} 2"));
    }

    #[test]
    fn denials_carry_reason() {
        let output = render_with(|| record_admission_denied("quota_exceeded"));
        assert!(output.contains("nowgo_admission_denied_total{reason=\"quota_exceeded\"} 1"));
    }

    #[test]
    fn fallback_counters_render() {
        let output = render_with(|| {
            record_ceiling_fallback();
            record_quality_override();
            record_quality_override();
        });
        assert!(output.contains("nowgo_ceiling_fallbacks_total 1"));
        assert!(output.contains("nowgo_quality_overrides_total 2"));
    }

    #[test]
    fn histograms_render() {
        let output = render_with(|| {
            record_decision_latency(0.002);
            record_savings(99);
        });
        assert!(output.contains("nowgo_decision_latency_seconds"));
        assert!(output.contains("nowgo_savings_percentage"));
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        record_decision("gpt-4", "high", "quality");
        record_ceiling_fallback();
    }
}
