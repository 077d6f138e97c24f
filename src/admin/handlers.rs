use axum::{extract::State, Json};
use serde::Serialize;

use crate::admin::AdminState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub healthy_backends: usize,
    pub total_backends: usize,
}

#[derive(Serialize)]
pub struct BackendStatus {
    pub name: String,
    pub address: String,
    pub state: &'static str,
    pub last_checked_ms: u64,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        healthy_backends: state.registry.healthy_backends().len(),
        total_backends: state.registry.all_backends().len(),
    })
}

pub async fn get_backends(State(state): State<AdminState>) -> Json<Vec<BackendStatus>> {
    let statuses = state
        .registry
        .all_backends()
        .iter()
        .map(|b| BackendStatus {
            name: b.name.clone(),
            address: b.addr.to_string(),
            state: b.state().as_str(),
            last_checked_ms: b.last_checked_ms(),
        })
        .collect();

    Json(statuses)
}
