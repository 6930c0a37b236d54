// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query classification and model selection for Nowgo.
//!
//! This crate provides:
//! - [`ComplexityClassifier`]: Word-count and vocabulary tiering (pure, zero I/O)
//! - [`ModelSelector`]: The tier x priority selection policy over a catalog
//! - [`DecisionEngine`]: classify, select, price, and emit a `DecisionRecord`
//!
//! The engine is invoked once per admitted request. It never blocks and
//! holds no mutable state, so a single instance is shared across the server.

pub mod classifier;
pub mod engine;
pub mod selector;

pub use classifier::{ClassificationResult, ComplexityClassifier};
pub use engine::{Decision, DecisionEngine};
pub use selector::{ModelSelector, Selection, SelectionPolicy, SelectionReason};
