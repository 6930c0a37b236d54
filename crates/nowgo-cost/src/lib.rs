// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model catalog, savings, quotas, and usage accounting for Nowgo.
//!
//! This crate provides:
//! - **Catalog**: The immutable set of model profiles decisions choose from
//! - **Savings**: Percentage saved versus a baseline model
//! - **Quota registry**: API key resolution and atomic per-caller request quotas
//! - **Usage ledger**: Per-caller monthly totals behind `UsageSink`/`UsageReporter`

pub mod catalog;
pub mod quota;
pub mod savings;
pub mod usage;

pub use catalog::{first_max, first_min, Catalog, ModelProfile};
pub use quota::QuotaRegistry;
pub use savings::savings_percentage;
pub use usage::UsageLedger;
