// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Resource lookup endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::net::IpAddr;
use std::sync::Arc;

use crate::api::AppState;
use crate::model::ResourceMetaData;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn found(resource: Option<Arc<ResourceMetaData>>, what: &str) -> Response {
    match resource {
        Some(resource) => (StatusCode::OK, Json(ResourceMetaData::clone(&resource))).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("no resource found for {what}")),
    }
}

/// GET /resources/ip/{ip}
pub async fn resource_by_ip(
    State(state): State<Arc<AppState>>,
    Path(ip): Path<String>,
) -> Response {
    let ip: IpAddr = match ip.parse() {
        Ok(ip) => ip,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("invalid IP address '{ip}'"),
            );
        }
    };
    tracing::trace!("Lookup by IP: {}", ip);
    found(state.datasource.get_by_ip(ip).await, &format!("IP {ip}"))
}

/// GET /resources/node/{name}
pub async fn node_by_name(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    tracing::trace!("Lookup node by name: {}", name);
    match state.datasource.get_node_by_name(&name).await {
        Ok(resource) => found(resource, &format!("node '{name}'")),
        Err(e) => {
            tracing::warn!("Node lookup for '{}' failed: {}", name, e);
            error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
    }
}
