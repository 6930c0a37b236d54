// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Nowgo routing service.
//!
//! Authenticates callers, reserves quota through the admission collaborator,
//! runs the decision engine, and hands each decision to the usage sink. The
//! engine itself stays transport-agnostic; status codes and JSON shapes live
//! here.

pub mod auth;
pub mod handlers;
pub mod server;

use std::sync::Arc;

use nowgo_config::model::NowgoConfig;
use nowgo_core::NowgoError;
use nowgo_cost::{QuotaRegistry, UsageLedger};
use nowgo_router::DecisionEngine;

pub use server::{build_router, start_server, GatewayState, HealthState, ServerConfig};

/// Build gateway state with the in-memory collaborators described by `config`.
///
/// API keys and quotas come from a [`QuotaRegistry`]; usage is kept in a
/// [`UsageLedger`].
pub fn state_from_config(
    config: &NowgoConfig,
    health: HealthState,
) -> Result<GatewayState, NowgoError> {
    let engine = Arc::new(DecisionEngine::from_config(config)?);
    let registry = Arc::new(QuotaRegistry::from_config(config)?);
    let ledger = Arc::new(UsageLedger::new());

    tracing::debug!(
        models = engine.catalog().len(),
        callers = registry.len(),
        "gateway state built"
    );

    Ok(GatewayState {
        engine,
        auth: registry.clone(),
        admission: registry,
        usage_sink: ledger.clone(),
        usage_reporter: ledger,
        plans: Arc::new(config.plans.clone()),
        health,
    })
}

impl From<&nowgo_config::model::GatewayConfig> for ServerConfig {
    fn from(config: &nowgo_config::model::GatewayConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
        }
    }
}
