// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use nowgo_config::model::PlanConfig;
use nowgo_core::{AdmissionAdapter, AuthAdapter, NowgoError, UsageReporter, UsageSink};
use nowgo_router::DecisionEngine;
use tower_http::cors::CorsLayer;

use crate::auth::auth_middleware;
use crate::handlers;

/// Health state for unauthenticated root/health/metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Service name reported by `GET /`.
    pub server_name: String,
    /// Optional Prometheus metrics render function.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl HealthState {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            start_time: std::time::Instant::now(),
            server_name: server_name.into(),
            prometheus_render: None,
        }
    }

    pub fn with_prometheus(mut self, render: Arc<dyn Fn() -> String + Send + Sync>) -> Self {
        self.prometheus_render = Some(render);
        self
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The decision engine (owns the shared catalog).
    pub engine: Arc<DecisionEngine>,
    /// Resolves bearer keys to callers.
    pub auth: Arc<dyn AuthAdapter>,
    /// Reserves one request per admitted call.
    pub admission: Arc<dyn AdmissionAdapter>,
    /// Receives every completed decision.
    pub usage_sink: Arc<dyn UsageSink>,
    /// Serves per-caller usage totals.
    pub usage_reporter: Arc<dyn UsageReporter>,
    /// Plans listed on `GET /pricing`.
    pub plans: Arc<Vec<PlanConfig>>,
    /// Health state for unauthenticated endpoints.
    pub health: HealthState,
}

/// Bind address for the gateway.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
///
/// Public routes: `GET /`, `GET /health`, `GET /metrics`, `GET /pricing`,
/// `GET /models`. Authenticated routes: `POST /optimize`, `GET /usage`.
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::get_root))
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics))
        .route("/pricing", get(handlers::get_pricing))
        .route("/models", get(handlers::get_models))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/optimize", post(handlers::post_optimize))
        .route("/usage", get(handlers::get_usage))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server and serve until `shutdown` resolves.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: F,
) -> Result<(), NowgoError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| NowgoError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!(%addr, "gateway server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| NowgoError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway server stopped");
    Ok(())
}
