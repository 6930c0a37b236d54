// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Nowgo routing service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Nowgo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to the built-in catalog and plans.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NowgoConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub server: ServerConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Model catalog and its designated flagship / mid-tier models.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Vocabulary and thresholds for complexity classification.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Quality floors used by the balanced selection policy.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Subscription plans published on the pricing surface.
    #[serde(default = "default_plans")]
    pub plans: Vec<PlanConfig>,

    /// API keys accepted by the gateway.
    #[serde(default)]
    pub api_keys: Vec<ApiKeyConfig>,

    /// Prometheus exporter settings.
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

impl Default for NowgoConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            gateway: GatewayConfig::default(),
            catalog: CatalogConfig::default(),
            classifier: ClassifierConfig::default(),
            selection: SelectionConfig::default(),
            plans: default_plans(),
            api_keys: Vec::new(),
            prometheus: PrometheusConfig::default(),
        }
    }
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Display name reported by the root endpoint.
    #[serde(default = "default_server_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_server_name() -> String {
    "nowgo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Model catalog configuration.
///
/// The order of `models` is the catalog iteration order, which decides
/// ties during selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Highest-quality model: default savings baseline and balanced/high fallback.
    #[serde(default = "default_flagship")]
    pub flagship: String,

    /// Preferred model for medium-complexity balanced requests.
    #[serde(default = "default_mid_tier")]
    pub mid_tier: String,

    /// Savings baseline. Defaults to `flagship` when unset.
    #[serde(default)]
    pub baseline: Option<String>,

    /// Model profiles.
    #[serde(default = "default_models")]
    pub models: Vec<ModelEntryConfig>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            flagship: default_flagship(),
            mid_tier: default_mid_tier(),
            baseline: None,
            models: default_models(),
        }
    }
}

impl CatalogConfig {
    /// The effective savings baseline.
    pub fn baseline_model(&self) -> &str {
        self.baseline.as_deref().unwrap_or(&self.flagship)
    }
}

fn default_flagship() -> String {
    "gpt-4".to_string()
}

fn default_mid_tier() -> String {
    "gpt-3.5".to_string()
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelEntryConfig {
    /// Unique model identifier.
    pub id: String,

    /// Human-readable summary for the models listing.
    #[serde(default)]
    pub description: String,

    /// Cost in USD per 1K tokens.
    pub cost_per_1k_tokens: f64,

    /// Relative quality, 0.0-1.0.
    pub quality_score: f64,

    /// Relative speed, 0.0-1.0.
    pub speed_score: f64,

    /// Maximum context size in tokens.
    pub max_tokens: u32,
}

impl ModelEntryConfig {
    fn new(
        id: &str,
        description: &str,
        cost_per_1k_tokens: f64,
        quality_score: f64,
        speed_score: f64,
        max_tokens: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            cost_per_1k_tokens,
            quality_score,
            speed_score,
            max_tokens,
        }
    }
}

fn default_models() -> Vec<ModelEntryConfig> {
    vec![
        ModelEntryConfig::new(
            "gpt-j",
            "Fast and cost-effective for simple queries",
            0.0002,
            0.7,
            0.9,
            2048,
        ),
        ModelEntryConfig::new(
            "gpt-3.5",
            "Balanced performance for most use cases",
            0.002,
            0.85,
            0.8,
            4096,
        ),
        ModelEntryConfig::new(
            "gpt-4",
            "Highest quality for complex tasks",
            0.06,
            0.95,
            0.6,
            8192,
        ),
        ModelEntryConfig::new(
            "claude-instant",
            "Fast Claude model for quick responses",
            0.0015,
            0.8,
            0.85,
            9000,
        ),
        ModelEntryConfig::new(
            "claude-2",
            "High-quality Claude model for complex tasks",
            0.025,
            0.92,
            0.65,
            100_000,
        ),
    ]
}

/// Complexity classifier vocabulary and thresholds.
///
/// Terms are matched as case-insensitive substrings of the query.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Terms that mark a query as high complexity.
    #[serde(default = "default_technical_terms")]
    pub technical_terms: Vec<String>,

    /// Terms that mark a query as at least medium complexity.
    #[serde(default = "default_creative_terms")]
    pub creative_terms: Vec<String>,

    /// Terms that mark a query as at least medium complexity.
    #[serde(default = "default_reasoning_terms")]
    pub reasoning_terms: Vec<String>,

    /// Word count above which a query is high complexity.
    #[serde(default = "default_high_word_count")]
    pub high_word_count: usize,

    /// Word count above which a query is at least medium complexity.
    #[serde(default = "default_medium_word_count")]
    pub medium_word_count: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            technical_terms: default_technical_terms(),
            creative_terms: default_creative_terms(),
            reasoning_terms: default_reasoning_terms(),
            high_word_count: default_high_word_count(),
            medium_word_count: default_medium_word_count(),
        }
    }
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

fn default_technical_terms() -> Vec<String> {
    terms(&[
        "algorithm",
        "code",
        "function",
        "programming",
        "technical",
        "analysis",
        "detailed",
        "comprehensive",
    ])
}

fn default_creative_terms() -> Vec<String> {
    terms(&[
        "write", "create", "story", "poem", "creative", "imagine", "design",
    ])
}

fn default_reasoning_terms() -> Vec<String> {
    terms(&[
        "explain", "why", "how", "analyze", "compare", "evaluate", "solve",
    ])
}

fn default_high_word_count() -> usize {
    100
}

fn default_medium_word_count() -> usize {
    30
}

/// Quality floors for the balanced policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionConfig {
    /// Minimum quality for high-complexity balanced requests.
    #[serde(default = "default_high_quality_floor")]
    pub high_quality_floor: f64,

    /// Minimum quality when the mid-tier model is not a candidate.
    #[serde(default = "default_mid_tier_quality_floor")]
    pub mid_tier_quality_floor: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            high_quality_floor: default_high_quality_floor(),
            mid_tier_quality_floor: default_mid_tier_quality_floor(),
        }
    }
}

fn default_high_quality_floor() -> f64 {
    0.9
}

fn default_mid_tier_quality_floor() -> f64 {
    0.75
}

/// A subscription plan listed on the pricing surface.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlanConfig {
    /// Plan identifier referenced by `[[api_keys]]`.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Monthly price in USD.
    pub price: f64,

    /// Included requests per month.
    pub requests_per_month: u64,

    /// Marketing feature list.
    #[serde(default)]
    pub features: Vec<String>,

    /// Support tier description.
    pub support_level: String,
}

fn default_plans() -> Vec<PlanConfig> {
    vec![
        PlanConfig {
            id: "starter".to_string(),
            name: "Starter".to_string(),
            price: 99.0,
            requests_per_month: 10_000,
            features: terms(&[
                "Smart AI model routing",
                "Real-time cost optimization",
                "Basic analytics dashboard",
                "Email support",
                "Up to 98% cost savings",
            ]),
            support_level: "Email".to_string(),
        },
        PlanConfig {
            id: "professional".to_string(),
            name: "Professional".to_string(),
            price: 299.0,
            requests_per_month: 50_000,
            features: terms(&[
                "Everything in Starter",
                "Advanced analytics & insights",
                "Custom model preferences",
                "Priority support",
                "Webhook integrations",
                "Team collaboration tools",
            ]),
            support_level: "Priority".to_string(),
        },
        PlanConfig {
            id: "enterprise".to_string(),
            name: "Enterprise".to_string(),
            price: 999.0,
            requests_per_month: 200_000,
            features: terms(&[
                "Everything in Professional",
                "Dedicated account manager",
                "Custom integrations",
                "SLA guarantees",
                "On-premise deployment option",
                "Advanced security features",
                "Custom model training",
            ]),
            support_level: "Dedicated".to_string(),
        },
    ]
}

/// An API key accepted by the gateway.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiKeyConfig {
    /// Bearer token presented by the caller.
    pub key: String,

    /// Caller the key resolves to.
    pub caller_id: String,

    /// Plan id from `[[plans]]`.
    pub plan: String,

    /// Request limit. Defaults to the plan's `requests_per_month`.
    #[serde(default)]
    pub requests_limit: Option<u64>,
}

impl std::fmt::Debug for ApiKeyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyConfig")
            .field("key", &"[redacted]")
            .field("caller_id", &self.caller_id)
            .field("plan", &self.plan)
            .field("requests_limit", &self.requests_limit)
            .finish()
    }
}

/// Prometheus exporter configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrometheusConfig {
    /// Install the Prometheus recorder and serve `/metrics`.
    #[serde(default)]
    pub enabled: bool,
}
