// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory usage ledger.
//!
//! Totals are kept per caller for the current calendar month (UTC) and
//! reset when a record arrives in a new month.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use nowgo_core::{CallerId, DecisionRecord, NowgoError, UsageReporter, UsageSink, UsageSummary};
use tracing::debug;

#[derive(Debug, Default)]
struct CallerUsage {
    period: String,
    total_queries: u64,
    total_cost: f64,
    total_savings: f64,
    total_elapsed: Duration,
    by_model: BTreeMap<String, u64>,
}

impl CallerUsage {
    fn new(period: &str) -> Self {
        Self {
            period: period.to_string(),
            ..Default::default()
        }
    }

    fn to_summary(&self) -> UsageSummary {
        let avg_response_time = if self.total_queries == 0 {
            0.0
        } else {
            self.total_elapsed.as_secs_f64() / self.total_queries as f64
        };
        UsageSummary {
            total_queries: self.total_queries,
            total_cost: self.total_cost,
            total_savings: self.total_savings,
            avg_response_time,
            queries_by_model: self.by_model.clone(),
            period: self.period.clone(),
        }
    }
}

/// Per-caller usage totals for the current month.
#[derive(Debug, Default)]
pub struct UsageLedger {
    callers: DashMap<CallerId, CallerUsage>,
}

/// Billing period label for now, e.g. `2026-10`.
pub fn current_period() -> String {
    Utc::now().format("%Y-%m").to_string()
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `record` to `caller`'s totals for `period`.
    pub fn record_in_period(&self, caller: &CallerId, record: &DecisionRecord, period: &str) {
        let mut usage = self
            .callers
            .entry(caller.clone())
            .or_insert_with(|| CallerUsage::new(period));

        if usage.period != period {
            debug!(caller = %caller, from = %usage.period, to = period, "usage period rolled over");
            *usage = CallerUsage::new(period);
        }

        usage.total_queries += 1;
        usage.total_cost += record.cost;
        usage.total_savings += record.savings_amount();
        usage.total_elapsed += record.elapsed;
        *usage.by_model.entry(record.model.clone()).or_default() += 1;
    }

    /// Totals for `caller` in `period`; empty if nothing was recorded then.
    pub fn summary_in_period(&self, caller: &CallerId, period: &str) -> UsageSummary {
        match self.callers.get(caller) {
            Some(usage) if usage.period == period => usage.to_summary(),
            _ => UsageSummary {
                period: period.to_string(),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl UsageSink for UsageLedger {
    async fn record(&self, caller: &CallerId, record: &DecisionRecord) -> Result<(), NowgoError> {
        self.record_in_period(caller, record, &current_period());
        Ok(())
    }
}

#[async_trait]
impl UsageReporter for UsageLedger {
    async fn summary(&self, caller: &CallerId) -> Result<UsageSummary, NowgoError> {
        Ok(self.summary_in_period(caller, &current_period()))
    }
}
