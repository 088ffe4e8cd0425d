// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prometheus metrics for the metadata cache
//!
//! Tracks how stream messages were handled and how large the cache indexes are.

mod labels;
mod registry;

/// Outcome of handling one stream message
pub use labels::MessageOutcome;

/// Prometheus metrics registry
pub use registry::CacheMetrics;
