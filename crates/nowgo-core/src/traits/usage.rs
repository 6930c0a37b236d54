// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage sink and reporting traits.

use async_trait::async_trait;

use crate::error::NowgoError;
use crate::types::{CallerId, DecisionRecord, UsageSummary};

/// Receives completed decisions for later aggregation.
///
/// Callers treat this as fire-and-forget: an `Err` is logged, never
/// surfaced to the client whose decision was recorded.
#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn record(&self, caller: &CallerId, record: &DecisionRecord) -> Result<(), NowgoError>;
}

/// Read side of the usage history.
#[async_trait]
pub trait UsageReporter: Send + Sync {
    /// Aggregated usage for `caller` in the current period.
    async fn summary(&self, caller: &CallerId) -> Result<UsageSummary, NowgoError>;
}
