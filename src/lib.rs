// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! # Network Metadata Cache
//!
//! Resolves IP addresses and node names to cluster resource metadata for
//! flow enrichment.
//!
//! Lookups go through a [`Datasource`], which is backed either by a live view
//! of the cluster or by a local cache kept up to date from a stream of
//! metadata change events.
//!
//! ## Main modules
//! - `api`: HTTP API handlers
//! - `cache`: dual-index metadata cache
//! - `config`: configuration management
//! - `consumer`: background update loop feeding the cache
//! - `datasource`: lookup facade over live view or cache
//! - `error`: error types
//! - `metrics`: Prometheus metrics registry
//! - `model`: resource metadata, change events and decoding
//! - `transport`: metadata stream transport
//! - `prelude`: commonly used types and traits

mod api;
mod cache;
mod config;
mod consumer;
mod datasource;
mod error;
mod metrics;
mod model;
mod transport;
pub mod prelude;

// Re-export commonly used types
/// Application configuration
pub use config::{Config, StreamConfig};

/// Application error and result type
pub use error::{AppError, Result};

/// HTTP API router and state
pub use api::{AppState, create_router};

/// Metadata cache and the loop that feeds it
pub use cache::MetadataCache;
pub use consumer::start_update_loop;

/// Lookup facade and the live view seam
pub use datasource::{Datasource, LiveView};

/// Metrics registry
pub use metrics::{CacheMetrics, MessageOutcome};

/// Resource metadata model
pub use model::{ChangeEvent, DecodeError, Operation, ResourceKind, ResourceMetaData, decode};

/// Stream transport and frame encoding (public for publishers and tests)
pub use transport::{MAX_FRAME_LEN, MessageReader, TcpFrameReader, encode_length, write_frame};
