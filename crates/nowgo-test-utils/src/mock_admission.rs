// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted admission collaborator.
//!
//! `MockAdmission` answers every check with a fixed outcome and counts how
//! often it was asked, so tests can assert that rejected requests never
//! reached the engine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use nowgo_core::{Admission, AdmissionAdapter, CallerId, DenialReason, NowgoError, QuotaSnapshot};

/// Admission collaborator with a fixed answer.
#[derive(Clone)]
pub struct MockAdmission {
    outcome: Admission,
    checks: Arc<AtomicUsize>,
}

impl MockAdmission {
    /// Admit every request.
    pub fn allow_all() -> Self {
        Self {
            outcome: Admission::Allowed,
            checks: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Deny every request with `reason`.
    pub fn deny_all(reason: DenialReason) -> Self {
        Self {
            outcome: Admission::Denied(reason),
            checks: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `check_and_reserve` calls so far.
    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdmissionAdapter for MockAdmission {
    async fn check_and_reserve(&self, _caller: &CallerId) -> Result<Admission, NowgoError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome.clone())
    }

    async fn quota(&self, _caller: &CallerId) -> Result<Option<QuotaSnapshot>, NowgoError> {
        Ok(None)
    }
}
