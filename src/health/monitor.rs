//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe every registered backend
//! - Write each probe result into the registry
//!
//! The monitor is the registry's only writer. A probe succeeds when the
//! backend accepts the connection and answers 2xx within the per-probe
//! timeout; anything else (connection refused, timeout, resolution
//! failure, non-success status) marks the backend Unhealthy. Probe
//! failures are never fatal: the loop runs until the shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::sync::broadcast;
use tokio::time;

use crate::balance::{Backend, HealthState, Registry};
use crate::config::HealthCheckConfig;
use crate::observability::metrics;

pub struct HealthMonitor {
    registry: Arc<Registry>,
    config: HealthCheckConfig,
    client: Client<HttpConnector, Body>,
}

impl HealthMonitor {
    pub fn new(registry: Arc<Registry>, config: HealthCheckConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            registry,
            config,
            client,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_ms = self.config.interval_ms,
            timeout_ms = self.config.timeout_ms,
            path = %self.config.path,
            "Health monitor starting"
        );

        let mut ticker = time::interval(Duration::from_millis(self.config.interval_ms));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn check_all(&self) {
        for backend in self.registry.all_backends() {
            let state = self.probe(backend).await;
            self.registry.set_health(backend.addr, state);
            metrics::record_backend_health(
                &backend.addr.to_string(),
                state == HealthState::Healthy,
            );
        }
    }

    async fn probe(&self, backend: &Backend) -> HealthState {
        let uri = format!("http://{}{}", backend.addr, self.config.path);

        let request = match Request::builder()
            .method("GET")
            .uri(uri)
            .header("user-agent", "balancer-health-check")
            .body(Body::empty())
        {
            Ok(request) => request,
            Err(err) => {
                tracing::error!(error = %err, "Failed to build health check request");
                return HealthState::Unhealthy;
            }
        };

        let timeout = Duration::from_millis(self.config.timeout_ms);
        match time::timeout(timeout, self.client.request(request)).await {
            Ok(Ok(response)) if response.status().is_success() => HealthState::Healthy,
            Ok(Ok(response)) => {
                tracing::warn!(
                    addr = %backend.addr,
                    status = %response.status(),
                    "Health check failed: non-success status"
                );
                HealthState::Unhealthy
            }
            Ok(Err(err)) => {
                tracing::warn!(
                    addr = %backend.addr,
                    error = %err,
                    "Health check failed: connection error"
                );
                HealthState::Unhealthy
            }
            Err(_) => {
                tracing::warn!(addr = %backend.addr, "Health check failed: timeout");
                HealthState::Unhealthy
            }
        }
    }
}
