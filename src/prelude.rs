// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for convenient use.
//! Users of the library can import everything they need with:
//!
//! ```rust
//! use netmeta_cache::prelude::*;
//! ```

// Core types
pub use crate::config::{Config, StreamConfig};
pub use crate::error::{AppError, Result};

// Lookup
pub use crate::cache::MetadataCache;
pub use crate::datasource::{Datasource, LiveView};

// Model
pub use crate::model::{ChangeEvent, Operation, ResourceKind, ResourceMetaData};

// Stream transport
pub use crate::transport::{MessageReader, TcpFrameReader};

// Metrics
pub use crate::metrics::CacheMetrics;
