// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nowgo serve`: wire configuration, engine, collaborators, and the gateway.

use std::sync::Arc;

use nowgo_config::model::NowgoConfig;
use nowgo_core::NowgoError;
use nowgo_gateway::{HealthState, ServerConfig};
use tracing::{debug, info, warn};

use crate::shutdown;

/// Run the gateway until SIGINT/SIGTERM.
pub async fn run_serve(config: NowgoConfig) -> Result<(), NowgoError> {
    init_tracing(&config.server.log_level);

    info!(
        name = %config.server.name,
        version = env!("CARGO_PKG_VERSION"),
        models = config.catalog.models.len(),
        api_keys = config.api_keys.len(),
        "starting nowgo"
    );
    if config.api_keys.is_empty() {
        warn!("no API keys configured; every authenticated route will return 401");
    }

    let mut health = HealthState::new(config.server.name.clone());
    if config.prometheus.enabled {
        match nowgo_prometheus::PrometheusAdapter::new() {
            Ok(adapter) => {
                info!("prometheus metrics enabled");
                health = health.with_prometheus(Arc::new(move || adapter.render()));
            }
            Err(e) => {
                warn!(error = %e, "prometheus initialization failed, continuing without metrics");
            }
        }
    } else {
        debug!("prometheus metrics disabled by configuration");
    }

    let state = nowgo_gateway::state_from_config(&config, health)?;
    let server_config = ServerConfig::from(&config.gateway);

    let cancel = shutdown::install_signal_handler();
    nowgo_gateway::start_server(&server_config, state, async move {
        cancel.cancelled().await;
    })
    .await?;

    info!("nowgo stopped");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nowgo={log_level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
