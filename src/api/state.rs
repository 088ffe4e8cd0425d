//! Application state shared across HTTP handlers

use crate::datasource::Datasource;
use crate::metrics::CacheMetrics;

/// Shared application state
pub struct AppState {
    pub metrics: CacheMetrics,
    pub datasource: Datasource,
}
