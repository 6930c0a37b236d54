// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /optimize, GET /usage, GET /pricing, GET /models, GET /,
//! GET /health, and GET /metrics.

use std::str::FromStr;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use nowgo_core::{
    Admission, CallerId, ComplexityTier, DecisionRequest, DenialReason, NowgoError, PriorityMode,
    QuotaSnapshot, UsageSummary,
};
use nowgo_router::SelectionReason;
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

/// Request body for POST /optimize.
#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    /// Query text to route.
    pub query: String,
    /// Optional cost ceiling per 1K tokens.
    #[serde(default)]
    pub max_cost: Option<f64>,
    /// Priority mode name; defaults to `balanced`.
    #[serde(default)]
    pub priority: Option<String>,
    /// Client-side user label, logged only.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl OptimizeRequest {
    /// Validate the body into an engine request.
    pub fn into_decision_request(self) -> Result<DecisionRequest, NowgoError> {
        if self.query.trim().is_empty() {
            return Err(NowgoError::Validation("query must not be empty".to_string()));
        }

        let priority = match self.priority.as_deref() {
            None => PriorityMode::default(),
            Some(name) => PriorityMode::from_str(name).map_err(|_| {
                NowgoError::Validation(format!(
                    "unknown priority `{name}` (expected cost, speed, quality, or balanced)"
                ))
            })?,
        };

        if let Some(max_cost) = self.max_cost {
            if !max_cost.is_finite() || max_cost < 0.0 {
                return Err(NowgoError::Validation(
                    "max_cost must be a non-negative number".to_string(),
                ));
            }
        }

        let mut request = DecisionRequest::new(self.query).with_priority(priority);
        request.max_cost = self.max_cost;
        Ok(request)
    }
}

/// Response body for POST /optimize.
#[derive(Debug, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub selected_model: String,
    pub complexity: ComplexityTier,
    /// USD per 1K tokens of the selected model.
    pub cost: f64,
    pub savings_percentage: u8,
    /// Handler time in seconds, rounded to milliseconds.
    pub response_time: f64,
    pub request_id: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
}

/// Response body for GET /usage.
#[derive(Debug, Serialize)]
pub struct UsageResponse {
    #[serde(flatten)]
    pub summary: UsageSummary,
    pub quota: Option<QuotaSnapshot>,
}

/// One entry of GET /pricing.
#[derive(Debug, Serialize)]
pub struct PlanView {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub requests_per_month: u64,
    pub features: Vec<String>,
    pub support_level: String,
}

/// One entry of GET /models.
#[derive(Debug, Serialize)]
pub struct ModelView {
    pub name: String,
    pub description: String,
    pub cost_per_1k_tokens: f64,
    pub quality_score: f64,
    pub speed_score: f64,
    pub max_tokens: u32,
}

/// Response body for GET /models.
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelView>,
}

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway started.
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// JSON error response with the given status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

/// POST /optimize
///
/// Validates the body, reserves one request from the caller's quota, runs the
/// decision engine, and reports the decision to the usage sink.
pub async fn post_optimize(
    State(state): State<GatewayState>,
    Extension(caller): Extension<CallerId>,
    body: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();

    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let user_id = body.user_id.clone();
    let request = match body.into_decision_request() {
        Ok(request) => request,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match state.admission.check_and_reserve(&caller).await {
        Ok(Admission::Allowed) => {}
        Ok(Admission::Denied(reason)) => {
            nowgo_prometheus::record_admission_denied(reason.label());
            tracing::info!(caller = %caller, reason = reason.label(), "request denied");
            let status = match reason {
                DenialReason::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
                DenialReason::UnknownCaller => StatusCode::FORBIDDEN,
            };
            return error_response(status, capitalize(&reason.to_string()));
        }
        Err(e) => {
            tracing::error!(caller = %caller, error = %e, "admission check failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "admission unavailable");
        }
    }

    let decision = match state.engine.evaluate(&request) {
        Ok(decision) => decision,
        Err(e) => {
            tracing::error!(caller = %caller, error = %e, "decision failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
        }
    };
    let mut record = decision.record;

    nowgo_prometheus::record_decision(
        &record.model,
        &record.complexity.to_string(),
        &request.priority.to_string(),
    );
    nowgo_prometheus::record_decision_latency(record.elapsed.as_secs_f64());
    nowgo_prometheus::record_savings(record.savings_percentage);
    match decision.reason {
        SelectionReason::CeilingFallback => nowgo_prometheus::record_ceiling_fallback(),
        SelectionReason::QualityFloorOverride => nowgo_prometheus::record_quality_override(),
        _ => {}
    }

    // Usage totals average the same handler time returned as `response_time`.
    record.elapsed = started.elapsed();
    let response_time = round_millis(record.elapsed.as_secs_f64());

    if let Err(e) = state.usage_sink.record(&caller, &record).await {
        tracing::warn!(
            caller = %caller,
            decision_id = %record.decision_id,
            error = %e,
            "usage sink failed; decision still returned"
        );
    }

    tracing::debug!(
        caller = %caller,
        user_id = user_id.as_deref().unwrap_or("-"),
        decision_id = %record.decision_id,
        model = %record.model,
        "optimize request served"
    );

    let response = OptimizeResponse {
        selected_model: record.model,
        complexity: record.complexity,
        cost: record.cost,
        savings_percentage: record.savings_percentage,
        response_time,
        request_id: record.decision_id.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// GET /usage
///
/// Usage totals for the authenticated caller plus its quota state.
pub async fn get_usage(
    State(state): State<GatewayState>,
    Extension(caller): Extension<CallerId>,
) -> Response {
    let summary = match state.usage_reporter.summary(&caller).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(caller = %caller, error = %e, "usage summary failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "usage unavailable");
        }
    };
    let quota = match state.admission.quota(&caller).await {
        Ok(quota) => quota,
        Err(e) => {
            tracing::warn!(caller = %caller, error = %e, "quota lookup failed");
            None
        }
    };

    let summary = UsageSummary {
        avg_response_time: round_millis(summary.avg_response_time),
        ..summary
    };
    (StatusCode::OK, Json(UsageResponse { summary, quota })).into_response()
}

/// GET /pricing
pub async fn get_pricing(State(state): State<GatewayState>) -> Json<Vec<PlanView>> {
    Json(
        state
            .plans
            .iter()
            .map(|p| PlanView {
                id: p.id.clone(),
                name: p.name.clone(),
                price: p.price,
                requests_per_month: p.requests_per_month,
                features: p.features.clone(),
                support_level: p.support_level.clone(),
            })
            .collect(),
    )
}

/// GET /models
pub async fn get_models(State(state): State<GatewayState>) -> Json<ModelsResponse> {
    let models = state
        .engine
        .catalog()
        .all()
        .iter()
        .map(|m| ModelView {
            name: m.id.clone(),
            description: m.description.clone(),
            cost_per_1k_tokens: m.cost_per_1k_tokens,
            quality_score: m.quality_score,
            speed_score: m.speed_score,
            max_tokens: m.max_tokens,
        })
        .collect();
    Json(ModelsResponse { models })
}

/// GET /
pub async fn get_root(State(state): State<GatewayState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} routing API", state.health.server_name),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
    })
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /metrics
///
/// Prometheus text format, or 404 when the exporter is disabled.
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => error_response(StatusCode::NOT_FOUND, "metrics disabled"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
        Router,
    };
    use nowgo_config::load_and_validate_str;
    use tower::ServiceExt;

    use super::*;
    use crate::server::{build_router, HealthState};

    const CONFIG: &str = r#"
[[api_keys]]
key = "demo-key-123"
caller_id = "demo-user"
plan = "starter"
requests_limit = 2
"#;

    fn router_with(health: HealthState) -> Router {
        let config = load_and_validate_str(CONFIG).unwrap();
        build_router(crate::state_from_config(&config, health).unwrap())
    }

    fn router() -> Router {
        router_with(HealthState::new("nowgo"))
    }

    fn optimize(body: &str, key: Option<&str>) -> Request<Body> {
        let mut builder = Request::post("/optimize").header("content-type", "application/json");
        if let Some(key) = key {
            builder = builder.header("authorization", format!("Bearer {key}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn optimize_request_defaults_to_balanced() {
        let req: OptimizeRequest = serde_json::from_str(r#"{"query": "hi"}"#).unwrap();
        let decision = req.into_decision_request().unwrap();
        assert_eq!(decision.priority, PriorityMode::Balanced);
        assert!(decision.max_cost.is_none());
    }

    #[test]
    fn optimize_request_rejects_bad_input() {
        let cases = [
            r#"{"query": "   "}"#,
            r#"{"query": "hi", "priority": "fastest"}"#,
            r#"{"query": "hi", "max_cost": -1.0}"#,
        ];
        for case in cases {
            let req: OptimizeRequest = serde_json::from_str(case).unwrap();
            let err = req.into_decision_request().unwrap_err();
            assert!(err.is_client_error(), "{case}");
        }
    }

    #[test]
    fn zero_ceiling_is_accepted() {
        let req: OptimizeRequest =
            serde_json::from_str(r#"{"query": "hi", "max_cost": 0.0}"#).unwrap();
        assert_eq!(req.into_decision_request().unwrap().max_cost, Some(0.0));
    }

    #[tokio::test]
    async fn optimize_returns_decision() {
        let response = router()
            .oneshot(optimize(
                r#"{"query": "What is artificial intelligence?"}"#,
                Some("demo-key-123"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: OptimizeResponse =
            serde_json::from_value(json(response).await).unwrap();
        assert_eq!(body.selected_model, "gpt-j");
        assert_eq!(body.complexity, ComplexityTier::Low);
        assert_eq!(body.savings_percentage, 99);
        assert_eq!(body.request_id.len(), 16);
        assert!(chrono::DateTime::parse_from_rfc3339(&body.timestamp).is_ok());
    }

    #[tokio::test]
    async fn optimize_requires_valid_key() {
        let response = router()
            .oneshot(optimize(r#"{"query": "hi"}"#, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = router()
            .oneshot(optimize(r#"{"query": "hi"}"#, Some("wrong")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(response).await["error"], "Invalid API key");
    }

    #[tokio::test]
    async fn invalid_body_is_bad_request() {
        let response = router()
            .oneshot(optimize(
                r#"{"query": "hi", "priority": "cheap"}"#,
                Some("demo-key-123"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router()
            .oneshot(optimize(r#"{"prompt": "hi"}"#, Some("demo-key-123")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn quota_exhaustion_is_429() {
        let app = router();
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(optimize(r#"{"query": "hi"}"#, Some("demo-key-123")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        let response = app
            .clone()
            .oneshot(optimize(r#"{"query": "hi"}"#, Some("demo-key-123")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let error = json(response).await["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("Rate limit exceeded"));
    }

    #[tokio::test]
    async fn invalid_requests_do_not_consume_quota() {
        let app = router();
        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(optimize(r#"{"query": ""}"#, Some("demo-key-123")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
        let response = app
            .oneshot(optimize(r#"{"query": "hi"}"#, Some("demo-key-123")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn usage_reflects_decisions() {
        let app = router();
        app.clone()
            .oneshot(optimize(
                r#"{"query": "hi", "priority": "quality"}"#,
                Some("demo-key-123"),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::get("/usage")
                    .header("authorization", "Bearer demo-key-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["total_queries"], 1);
        assert_eq!(body["queries_by_model"]["gpt-4"], 1);
        assert_eq!(body["total_savings"], 0.0);
        assert_eq!(body["quota"]["used"], 1);
        assert_eq!(body["quota"]["limit"], 2);
    }

    #[tokio::test]
    async fn public_listings() {
        let response = router()
            .oneshot(Request::get("/models").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json(response).await;
        let models = body["models"].as_array().unwrap();
        assert_eq!(models.len(), 5);
        assert_eq!(models[0]["name"], "gpt-j");

        let response = router()
            .oneshot(Request::get("/pricing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["name"], "Starter");
        assert_eq!(body[2]["requests_per_month"], 200_000);
    }

    #[tokio::test]
    async fn root_and_health() {
        let response = router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json(response).await;
        assert_eq!(body["status"], "operational");

        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn metrics_endpoint_follows_exporter_state() {
        let response = router()
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let render: Arc<dyn Fn() -> String + Send + Sync> =
            Arc::new(|| "nowgo_decisions_total 3\n".to_string());
        let response = router_with(HealthState::new("nowgo").with_prometheus(render))
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"nowgo_decisions_total 3\n");
    }
}
