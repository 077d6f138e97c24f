use std::path::Path;

use tokio::net::TcpListener;

use load_balancer::admin;
use load_balancer::config::{loader, BalancerConfig};
use load_balancer::observability::{logging, metrics};
use load_balancer::{HttpServer, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => loader::load_config(Path::new(&path))?,
        None => BalancerConfig::default(),
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = config.backends.len(),
        health_interval_ms = config.health_check.interval_ms,
        failover_deadline_ms = config.failover.deadline_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config.clone());

    if config.admin.enabled {
        let router = admin::admin_router(server.registry(), &config.admin);
        let admin_listener = TcpListener::bind(&config.admin.bind_address).await?;
        tracing::info!(address = %config.admin.bind_address, "Admin API listening");
        tokio::spawn(async move {
            let _ = axum::serve(admin_listener, router).await;
        });
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
