// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock usage sinks for deterministic testing.
//!
//! `RecordingSink` captures every reported decision for later assertions;
//! `FailingSink` fails every report, exercising the gateway's
//! best-effort usage path.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use nowgo_core::{CallerId, DecisionRecord, NowgoError, UsageSink};

/// A usage sink that stores every `(caller, record)` pair it receives.
#[derive(Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<(CallerId, DecisionRecord)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in arrival order.
    pub async fn records(&self) -> Vec<(CallerId, DecisionRecord)> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl UsageSink for RecordingSink {
    async fn record(&self, caller: &CallerId, record: &DecisionRecord) -> Result<(), NowgoError> {
        self.records
            .lock()
            .await
            .push((caller.clone(), record.clone()));
        Ok(())
    }
}

/// A usage sink whose every report fails.
#[derive(Clone, Default)]
pub struct FailingSink;

#[async_trait]
impl UsageSink for FailingSink {
    async fn record(&self, _caller: &CallerId, _record: &DecisionRecord) -> Result<(), NowgoError> {
        Err(NowgoError::Sink {
            message: "usage store unavailable".to_string(),
            source: None,
        })
    }
}
