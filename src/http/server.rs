//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router for the public listener
//! - Wire up middleware (request ID, tracing)
//! - Compose Validator → Forwarder for every inbound request
//! - Spawn the health monitor alongside the server
//! - Graceful shutdown on Ctrl+C or the shutdown broadcast

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::balance::{Forwarder, Registry};
use crate::config::BalancerConfig;
use crate::health::HealthMonitor;
use crate::http::{error, validate};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    pub max_body_bytes: usize,
}

/// UUID v4 request IDs for the `x-request-id` header.
#[derive(Clone, Copy, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    router: Router,
    config: BalancerConfig,
    registry: Arc<Registry>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: BalancerConfig) -> Self {
        let registry = Arc::new(Registry::from_config(&config.backends));
        let forwarder = Arc::new(Forwarder::new(registry.clone(), config.failover.clone()));

        let state = AppState {
            forwarder,
            max_body_bytes: config.limits.max_body_bytes,
        };

        let router = Self::build_router(state);
        Self {
            router,
            config,
            registry,
        }
    }

    /// The registry backing this server, for the admin API.
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", post(balance_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http()),
            )
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Spawns the health monitor (unless disabled) and serves until Ctrl+C
    /// or the shutdown broadcast fires.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if self.config.health_check.enabled {
            let monitor = HealthMonitor::new(self.registry.clone(), self.config.health_check.clone());
            tokio::spawn(monitor.run(shutdown.subscribe()));
        } else {
            tracing::info!("Health checks disabled");
        }

        let mut shutdown_rx = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown_rx.recv() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main request handler: validate, forward with failover, relay.
async fn balance_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let (parts, body) = request.into_parts();

    let payload = match validate::validate_request(&parts.headers, body, state.max_body_bytes).await
    {
        Ok(payload) => payload,
        Err(reject) => {
            tracing::debug!(
                request_id = %request_id,
                kind = reject.kind(),
                "Request rejected"
            );
            metrics::record_rejection(reject.kind());
            metrics::record_request("POST", reject.status().as_u16(), "none", start_time);
            return reject.into_response();
        }
    };

    match state.forwarder.forward(&payload, &request_id).await {
        Ok(reply) => {
            metrics::record_request("POST", 200, &reply.backend_addr, start_time);
            (
                [(header::CONTENT_TYPE, "application/json")],
                reply.body,
            )
                .into_response()
        }
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "No healthy backend within deadline"
            );
            metrics::record_gave_up();
            metrics::record_request("POST", 504, "none", start_time);
            error::reply(StatusCode::GATEWAY_TIMEOUT, &err.to_string())
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        // Fall through to waiting on the broadcast channel only.
        std::future::pending::<()>().await;
    }
}
