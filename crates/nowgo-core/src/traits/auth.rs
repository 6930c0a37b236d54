// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication adapter trait for resolving API keys to callers.

use async_trait::async_trait;

use crate::error::NowgoError;
use crate::types::CallerId;

/// Resolves a presented API key to the caller it belongs to.
#[async_trait]
pub trait AuthAdapter: Send + Sync {
    /// Returns `Ok(None)` for keys that are not recognized.
    async fn authenticate(&self, api_key: &str) -> Result<Option<CallerId>, NowgoError>;
}
