//! Shared utilities for integration tests.
//!
//! The mock business backend implements the upstream contract the balancer
//! forwards to: `POST /` answers with the reversed `data` string and
//! `GET /status` answers health probes. Backends are abortable so tests
//! can inject outages and recoveries.

use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use load_balancer::config::{BackendConfig, BalancerConfig};
use load_balancer::{HttpServer, Shutdown};

/// Handle to a running mock business backend.
pub struct BusinessServer {
    pub addr: SocketAddr,
    task: JoinHandle<()>,
}

impl BusinessServer {
    /// Stop the backend; its port starts refusing connections.
    #[allow(dead_code)]
    pub fn stop(&self) {
        self.task.abort();
    }
}

/// Start a mock business backend on the given address.
pub async fn start_business_server(addr: SocketAddr) -> BusinessServer {
    let app = Router::new()
        .route("/", post(reverse_handler))
        .route("/status", get(|| async { "ok" }));

    let listener = TcpListener::bind(addr).await.unwrap();
    let task = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    BusinessServer { addr, task }
}

async fn reverse_handler(Json(body): Json<Value>) -> Json<Value> {
    let data = body.get("data").and_then(Value::as_str).unwrap_or_default();
    let reversed: String = data.chars().rev().collect();
    Json(json!({ "data": reversed }))
}

/// Balancer config compressed to 100 ms time units: the failover deadline
/// is 27 units, so a backend recovering at 20 units is safely inside the
/// deadline and one recovering at 30 units is safely outside it.
pub fn test_config(proxy_addr: SocketAddr, backends: &[SocketAddr]) -> BalancerConfig {
    let mut config = BalancerConfig::default();
    config.listener.bind_address = proxy_addr.to_string();
    config.backends = backends
        .iter()
        .enumerate()
        .map(|(i, addr)| BackendConfig {
            name: format!("business_{}", i + 1),
            address: addr.to_string(),
        })
        .collect();
    config.health_check.interval_ms = 150;
    config.health_check.timeout_ms = 100;
    config.failover.deadline_ms = 2_700;
    config.failover.poll_ms = 100;
    config.failover.attempt_timeout_ms = 500;
    config
}

/// Start the balancer on its configured address. The returned handle stops
/// it when triggered.
pub async fn start_balancer(config: BalancerConfig) -> Shutdown {
    let shutdown = Shutdown::new();
    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let server = HttpServer::new(config);

    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    shutdown
}

/// Non-pooling client so closed backends are not masked by kept-alive
/// connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
