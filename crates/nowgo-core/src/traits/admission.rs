// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admission adapter trait for per-caller request quotas.

use async_trait::async_trait;

use crate::error::NowgoError;
use crate::types::{Admission, CallerId, QuotaSnapshot};

/// Permit-or-deny gate consulted once before every decision.
///
/// `check_and_reserve` must be a single atomic operation: two concurrent
/// calls for a caller with one request left must not both be allowed.
#[async_trait]
pub trait AdmissionAdapter: Send + Sync {
    /// Reserve one request for `caller`, or explain why it is refused.
    async fn check_and_reserve(&self, caller: &CallerId) -> Result<Admission, NowgoError>;

    /// Current quota state for `caller`, if the caller is known.
    async fn quota(&self, caller: &CallerId) -> Result<Option<QuotaSnapshot>, NowgoError>;
}
