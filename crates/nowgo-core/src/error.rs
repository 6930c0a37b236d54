// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Nowgo routing service.

use thiserror::Error;

/// The primary error type used across the decision engine and its collaborators.
#[derive(Debug, Error)]
pub enum NowgoError {
    /// Configuration errors surfaced after startup (bad catalog, missing sections).
    #[error("configuration error: {0}")]
    Config(String),

    /// A model identifier produced by the engine is absent from the catalog.
    ///
    /// The catalog is the single source of truth for model ids, so this is an
    /// internal-consistency failure and is never retried.
    #[error("model `{model}` not found in catalog")]
    ModelNotFound { model: String },

    /// The catalog payload violates its invariants (duplicate ids, empty set).
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Caller input rejected before the engine runs (empty query, bad priority).
    #[error("validation error: {0}")]
    Validation(String),

    /// Usage sink failures. Never propagated to the caller of a decision.
    #[error("usage sink error: {message}")]
    Sink {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP gateway errors (bind failure, server crash).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NowgoError {
    /// Whether this error was caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, NowgoError::Validation(_))
    }
}
