// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Dual-index metadata cache
//!
//! Keeps the latest known metadata per IP address and, for nodes, per node
//! name. Each index has its own lock; all IPs of one resource are written
//! under a single acquisition of the IP index lock.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::model::{ChangeEvent, Operation, ResourceMetaData};

/// Concurrent cache of resource metadata fed by change events
#[derive(Clone, Default)]
pub struct MetadataCache {
    by_ip: Arc<RwLock<HashMap<IpAddr, Arc<ResourceMetaData>>>>,
    by_node_name: Arc<RwLock<HashMap<String, Arc<ResourceMetaData>>>>,
}

impl MetadataCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a decoded change event
    pub async fn apply(&self, event: ChangeEvent) {
        match event.operation {
            Operation::Add | Operation::Update => self.apply_upsert(Arc::new(event.resource)).await,
            Operation::Delete => self.apply_delete(&event.resource).await,
        }
    }

    /// Indexes the resource under every one of its IPs, and under its name if it is a node
    pub async fn apply_upsert(&self, resource: Arc<ResourceMetaData>) {
        {
            let mut by_ip = self.by_ip.write().await;
            for ip in &resource.ips {
                by_ip.insert(*ip, Arc::clone(&resource));
            }
        }
        if resource.is_node() {
            let mut by_name = self.by_node_name.write().await;
            by_name.insert(resource.name.clone(), Arc::clone(&resource));
        }
        tracing::trace!(
            "Upserted {} '{}' under {} IP(s)",
            resource.kind,
            resource.name,
            resource.ips.len()
        );
    }

    /// Removes the keys listed in this record
    ///
    /// Only the IPs carried by `resource` are removed. IPs indexed by an
    /// earlier upsert but missing here are left in place.
    pub async fn apply_delete(&self, resource: &ResourceMetaData) {
        let mut removed = 0usize;
        {
            let mut by_ip = self.by_ip.write().await;
            for ip in &resource.ips {
                if by_ip.remove(ip).is_some() {
                    removed += 1;
                }
            }
        }
        if resource.is_node() {
            let mut by_name = self.by_node_name.write().await;
            by_name.remove(&resource.name);
        }
        tracing::trace!(
            "Deleted {} '{}' ({} of {} IP(s) were indexed)",
            resource.kind,
            resource.name,
            removed,
            resource.ips.len()
        );
    }

    pub async fn lookup_by_ip(&self, ip: &IpAddr) -> Option<Arc<ResourceMetaData>> {
        let by_ip = self.by_ip.read().await;
        by_ip.get(ip).cloned()
    }

    /// Looks up a node by name; only node records are ever indexed by name
    pub async fn lookup_by_name(&self, name: &str) -> Option<Arc<ResourceMetaData>> {
        let by_name = self.by_node_name.read().await;
        by_name.get(name).cloned()
    }

    /// Returns the number of indexed IPs and node names
    pub async fn entry_counts(&self) -> (usize, usize) {
        let ips = self.by_ip.read().await.len();
        let nodes = self.by_node_name.read().await.len();
        (ips, nodes)
    }
}
