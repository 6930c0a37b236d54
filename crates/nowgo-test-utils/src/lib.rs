// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Nowgo integration tests.
//!
//! Provides mock collaborators and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`TestHarness`] - In-process gateway driven through `tower::ServiceExt`
//! - [`MockAdmission`] - Admission collaborator with a fixed answer
//! - [`RecordingSink`] / [`FailingSink`] - Usage sinks that capture or fail

pub mod harness;
pub mod mock_admission;
pub mod mock_sink;

pub use harness::{TestHarness, TestHarnessBuilder, DEMO_KEY};
pub use mock_admission::MockAdmission;
pub use mock_sink::{FailingSink, RecordingSink};
