// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Nowgo model-routing service.
//!
//! This crate provides the domain types shared by the decision engine and the
//! transport around it, the workspace error type, and the collaborator traits
//! (authentication, admission, usage) the gateway calls around each decision.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::NowgoError;
pub use types::{
    Admission, CallerId, ComplexityTier, DecisionId, DecisionRecord, DecisionRequest,
    DenialReason, PriorityMode, QuotaSnapshot, UsageSummary,
};

pub use traits::{AdmissionAdapter, AuthAdapter, UsageReporter, UsageSink};
