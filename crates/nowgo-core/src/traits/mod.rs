// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the gateway around the decision engine.
//!
//! The engine itself is synchronous and pure; everything that touches caller
//! identity, quotas, or usage history sits behind these `#[async_trait]`
//! seams so implementations can be swapped without touching the engine.

pub mod admission;
pub mod auth;
pub mod usage;

pub use admission::AdmissionAdapter;
pub use auth::AuthAdapter;
pub use usage::{UsageReporter, UsageSink};
