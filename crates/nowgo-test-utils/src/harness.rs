// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full gateway stack from a TOML config string,
//! optionally swapping in mock collaborators, and drives it in-process with
//! `tower::ServiceExt::oneshot`. No sockets, no global metrics recorder.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use nowgo_config::model::NowgoConfig;
use nowgo_core::{AdmissionAdapter, NowgoError, UsageSink};
use nowgo_gateway::{build_router, state_from_config, GatewayState, HealthState};
use tower::ServiceExt;

/// Demo API key available in [`TestHarness::DEFAULT_CONFIG`].
pub const DEMO_KEY: &str = "demo-key-123";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config_toml: String,
    admission: Option<Arc<dyn AdmissionAdapter>>,
    usage_sink: Option<Arc<dyn UsageSink>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config_toml: TestHarness::DEFAULT_CONFIG.to_string(),
            admission: None,
            usage_sink: None,
        }
    }

    /// Replace the configuration document.
    pub fn with_config(mut self, toml: &str) -> Self {
        self.config_toml = toml.to_string();
        self
    }

    /// Replace the admission collaborator.
    pub fn with_admission(mut self, admission: Arc<dyn AdmissionAdapter>) -> Self {
        self.admission = Some(admission);
        self
    }

    /// Replace the usage sink (the reporter stays the in-memory ledger).
    pub fn with_usage_sink(mut self, sink: Arc<dyn UsageSink>) -> Self {
        self.usage_sink = Some(sink);
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub fn build(self) -> Result<TestHarness, NowgoError> {
        let config = nowgo_config::load_and_validate_str(&self.config_toml).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            NowgoError::Config(messages.join("; "))
        })?;

        let mut state = state_from_config(&config, HealthState::new(config.server.name.clone()))?;
        if let Some(admission) = self.admission {
            state.admission = admission;
        }
        if let Some(sink) = self.usage_sink {
            state.usage_sink = sink;
        }

        Ok(TestHarness {
            router: build_router(state.clone()),
            state,
            config,
        })
    }
}

/// In-process gateway with helpers for issuing requests.
pub struct TestHarness {
    router: Router,
    state: GatewayState,
    config: NowgoConfig,
}

impl TestHarness {
    /// Default config: built-in catalog plus one demo key limited to 5 requests.
    pub const DEFAULT_CONFIG: &'static str = r#"
[[api_keys]]
key = "demo-key-123"
caller_id = "demo-user"
plan = "starter"
requests_limit = 5
"#;

    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with the default config.
    pub fn new() -> Result<Self, NowgoError> {
        Self::builder().build()
    }

    pub fn state(&self) -> &GatewayState {
        &self.state
    }

    pub fn config(&self) -> &NowgoConfig {
        &self.config
    }

    /// POST /optimize with a JSON body, authenticated with `api_key`.
    pub async fn optimize(
        &self,
        api_key: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::post("/optimize").header("content-type", "application/json");
        if let Some(key) = api_key {
            builder = builder.header("authorization", format!("Bearer {key}"));
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("valid request");
        self.send(request).await
    }

    /// GET `path`, optionally authenticated with `api_key`.
    pub async fn get(&self, path: &str, api_key: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::get(path);
        if let Some(key) = api_key {
            builder = builder.header("authorization", format!("Bearer {key}"));
        }
        let request = builder.body(Body::empty()).expect("valid request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}
