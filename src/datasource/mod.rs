// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Resource metadata datasource
//!
//! Callers resolve IPs and node names through [`Datasource`] without knowing
//! whether answers come from a live view of the cluster or from the local
//! cache fed by the metadata stream. Exactly one of the two is wired at
//! construction.

use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cache::MetadataCache;
use crate::config::StreamConfig;
use crate::consumer::start_update_loop;
use crate::error::{AppError, Result};
use crate::metrics::CacheMetrics;
use crate::model::ResourceMetaData;
use crate::transport::{MessageReader, TcpFrameReader};

/// Live, pull-based view of cluster resources
///
/// Implemented outside this crate, typically on top of watch-based informers.
#[async_trait]
pub trait LiveView: Send + Sync {
    async fn get_by_ip(&self, ip: IpAddr) -> Option<Arc<ResourceMetaData>>;

    /// # Errors
    ///
    /// Returns `AppError::LiveView` if the underlying resource store is unavailable.
    async fn get_node_by_name(&self, name: &str) -> Result<Option<Arc<ResourceMetaData>>>;
}

/// Lookup entry point backed by either a live view or the stream cache
#[derive(Clone)]
pub enum Datasource {
    LiveView(Arc<dyn LiveView>),
    StreamCache(MetadataCache),
}

impl Datasource {
    #[must_use]
    pub fn from_live_view(view: Arc<dyn LiveView>) -> Self {
        tracing::debug!("Using live view datasource");
        Self::LiveView(view)
    }

    /// Connects to the metadata stream and starts filling an empty cache
    ///
    /// Returns as soon as the connection is up; the cache fills in the
    /// background. The returned handle completes after shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream configuration is invalid or the initial
    /// connection fails.
    pub async fn connect_stream(
        config: &StreamConfig,
        metrics: CacheMetrics,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Result<(Self, JoinHandle<()>)> {
        config.validate().map_err(AppError::Config)?;
        tracing::debug!("Initializing metadata stream datasource");
        let reader = TcpFrameReader::connect(config).await?;
        Ok(Self::from_reader(reader, metrics, shutdown_rx))
    }

    /// Starts filling an empty cache from an already established transport
    pub fn from_reader<R>(
        reader: R,
        metrics: CacheMetrics,
        shutdown_rx: watch::Receiver<bool>,
    ) -> (Self, JoinHandle<()>)
    where
        R: MessageReader + 'static,
    {
        let cache = MetadataCache::new();
        let handle = start_update_loop(reader, cache.clone(), metrics, shutdown_rx);
        (Self::StreamCache(cache), handle)
    }

    /// Resolves an IP address; `None` when nothing is known about it
    pub async fn get_by_ip(&self, ip: IpAddr) -> Option<Arc<ResourceMetaData>> {
        match self {
            Self::LiveView(view) => view.get_by_ip(ip).await,
            Self::StreamCache(cache) => cache.lookup_by_ip(&ip).await,
        }
    }

    /// Resolves a node by name
    ///
    /// # Errors
    ///
    /// Only the live view can fail; the stream cache reports unknown names as `None`.
    pub async fn get_node_by_name(&self, name: &str) -> Result<Option<Arc<ResourceMetaData>>> {
        match self {
            Self::LiveView(view) => view.get_node_by_name(name).await,
            Self::StreamCache(cache) => Ok(cache.lookup_by_name(name).await),
        }
    }

    /// The stream cache, when this datasource is backed by one
    #[must_use]
    pub fn cache(&self) -> Option<&MetadataCache> {
        match self {
            Self::LiveView(_) => None,
            Self::StreamCache(cache) => Some(cache),
        }
    }

    #[must_use]
    pub fn mode(&self) -> &'static str {
        match self {
            Self::LiveView(_) => "live-view",
            Self::StreamCache(_) => "stream-cache",
        }
    }
}
