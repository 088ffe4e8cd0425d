//! HTTP API module for the metadata cache service
//!
//! Provides endpoints for health checks, Prometheus metrics and resource lookups.
//!
//! # Endpoints
//! - `GET /health` - health check
//! - `GET /metrics` - Prometheus metrics
//! - `GET /resources/ip/{ip}` - resource owning an IP address
//! - `GET /resources/node/{name}` - node by name

pub mod handlers;
mod state;

use axum::{Router, routing::get};
use std::sync::Arc;

pub use state::AppState;

/// Creates the main Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/resources/ip/{ip}", get(handlers::resource_by_ip))
        .route("/resources/node/{name}", get(handlers::node_by_name))
        .with_state(state)
}
