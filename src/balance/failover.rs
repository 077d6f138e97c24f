//! Forwarding with bounded-wait failover.
//!
//! # Responsibilities
//! - Select a healthy backend and forward the validated payload
//! - Absorb per-attempt failures (connect errors, timeouts, bad statuses)
//! - Poll the registry for recovery while no backend is healthy
//! - Give up once the overall request deadline elapses
//!
//! # Design Decisions
//! - The deadline is an explicit `Instant`, armed when forwarding starts;
//!   every sleep is clipped to it
//! - Individual attempt failures are logged, never surfaced to the client;
//!   the only outward signal is the single exhaustion error
//! - Each request runs its own loop with its own deadline. A client that
//!   disconnects drops the handler future and the loop with it.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request};
use http_body_util::BodyExt;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::time::{self, Instant};

use crate::balance::backend::Backend;
use crate::balance::round_robin::RoundRobin;
use crate::balance::{Registry, Selector};
use crate::config::FailoverConfig;
use crate::http::validate::Payload;

/// The wait-for-recovery deadline elapsed with no successful forward.
#[derive(Debug, Error)]
#[error("business server not available")]
pub struct Unavailable;

/// A successful forward: the backend's response body, relayed verbatim.
#[derive(Debug)]
pub struct BackendReply {
    /// Address of the backend that answered, for logs and metrics.
    pub backend_addr: String,
    pub body: Bytes,
}

/// Outcome of one forwarding try.
#[derive(Debug, Error)]
enum AttemptError {
    #[error("connect error: {0}")]
    Connect(hyper_util::client::legacy::Error),

    #[error("error reading backend response: {0}")]
    Read(hyper::Error),

    #[error("backend returned status {0}")]
    Status(u16),

    #[error("attempt timed out")]
    Timeout,
}

/// Forwards validated payloads to healthy backends, waiting for recovery
/// when none is available.
pub struct Forwarder {
    registry: Arc<Registry>,
    selector: Box<dyn Selector>,
    client: Client<HttpConnector, Body>,
    config: FailoverConfig,
}

impl Forwarder {
    pub fn new(registry: Arc<Registry>, config: FailoverConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            registry,
            selector: Box::new(RoundRobin::new()),
            client,
            config,
        }
    }

    /// Forward a validated payload, retrying until a backend answers or the
    /// deadline elapses.
    pub async fn forward(
        &self,
        payload: &Payload,
        request_id: &str,
    ) -> Result<BackendReply, Unavailable> {
        let body = payload.to_bytes();
        let deadline = Instant::now() + Duration::from_millis(self.config.deadline_ms);
        let poll = Duration::from_millis(self.config.poll_ms);

        loop {
            let healthy = self.registry.healthy_backends();
            if let Some(backend) = self.selector.next(&healthy) {
                match self.attempt(&backend, &body, request_id).await {
                    Ok(bytes) => {
                        tracing::debug!(
                            request_id = %request_id,
                            backend = %backend.addr,
                            "Forwarded to backend"
                        );
                        return Ok(BackendReply {
                            backend_addr: backend.addr.to_string(),
                            body: bytes,
                        });
                    }
                    Err(err) => {
                        tracing::warn!(
                            request_id = %request_id,
                            backend = %backend.addr,
                            error = %err,
                            "Forward attempt failed, waiting for recovery"
                        );
                    }
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(Unavailable);
            }
            time::sleep(poll.min(deadline - now)).await;
        }
    }

    async fn attempt(
        &self,
        backend: &Backend,
        body: &Bytes,
        request_id: &str,
    ) -> Result<Bytes, AttemptError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(backend.base_url.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-request-id", request_id)
            .body(Body::from(body.clone()))
            .unwrap();

        let attempt = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(AttemptError::Connect)?;

            let status = response.status();
            if !status.is_success() {
                return Err(AttemptError::Status(status.as_u16()));
            }

            let collected = response
                .into_body()
                .collect()
                .await
                .map_err(AttemptError::Read)?;
            Ok(collected.to_bytes())
        };

        let timeout = Duration::from_millis(self.config.attempt_timeout_ms);
        match time::timeout(timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(AttemptError::Timeout),
        }
    }
}
