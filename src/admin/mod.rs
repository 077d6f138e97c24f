//! Read-only admin API.
//!
//! Served on its own bind address, bearer-token authenticated. Exposes the
//! registry's view of backend health; never mutates it.

pub mod auth;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tower_http::timeout::TimeoutLayer;

use crate::balance::Registry;
use crate::config::AdminConfig;

use self::auth::require_bearer;
use self::handlers::{get_backends, get_status};

#[derive(Clone)]
pub struct AdminState {
    pub registry: Arc<Registry>,
    pub api_key: Arc<str>,
}

pub fn admin_router(registry: Arc<Registry>, config: &AdminConfig) -> Router {
    let state = AdminState {
        registry,
        api_key: config.api_key.as_str().into(),
    };

    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/backends", get(get_backends))
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        .with_state(state)
}
