// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics registry and update logic

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::metrics::labels::{EventLabels, MessageLabels, MessageOutcome};
use crate::model::Operation;

#[derive(Clone)]
pub struct CacheMetrics {
    registry: Arc<Mutex<Registry>>,
    messages: Family<MessageLabels, Counter>,
    events: Family<EventLabels, Counter>,
    ip_entries: Gauge,
    node_entries: Gauge,
    last_event_timestamp_seconds: Gauge,
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheMetrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let messages = Family::<MessageLabels, Counter>::default();
        registry.register(
            "metacache_messages",
            "Stream messages by handling outcome",
            messages.clone(),
        );
        let events = Family::<EventLabels, Counter>::default();
        registry.register(
            "metacache_events",
            "Change events applied to the cache by operation",
            events.clone(),
        );
        let ip_entries = Gauge::default();
        registry.register(
            "metacache_ip_entries",
            "Number of IP addresses in the cache",
            ip_entries.clone(),
        );
        let node_entries = Gauge::default();
        registry.register(
            "metacache_node_entries",
            "Number of node names in the cache",
            node_entries.clone(),
        );
        let last_event_timestamp_seconds = Gauge::default();
        registry.register(
            "metacache_last_event_timestamp_seconds",
            "Unix timestamp of the last applied change event",
            last_event_timestamp_seconds.clone(),
        );

        let metrics = Self {
            registry: Arc::new(Mutex::new(registry)),
            messages,
            events,
            ip_entries,
            node_entries,
            last_event_timestamp_seconds,
        };

        // Start every outcome at zero so rates are available immediately
        for outcome in [
            MessageOutcome::Applied,
            MessageOutcome::Empty,
            MessageOutcome::DecodeError,
            MessageOutcome::TransportError,
        ] {
            let _ = metrics.messages.get_or_create(&outcome.into());
        }
        metrics
    }

    pub async fn encode_metrics(&self) -> Result<String> {
        let registry = self.registry.lock().await;
        let mut buffer = String::new();
        encode(&mut buffer, &registry).map_err(|e| AppError::Metrics(e.to_string()))?;
        Ok(buffer)
    }

    pub fn record_message(&self, outcome: MessageOutcome) {
        self.messages.get_or_create(&outcome.into()).inc();
    }

    /// Records an applied change event
    pub fn record_event(&self, operation: Operation) {
        self.record_message(MessageOutcome::Applied);
        self.events.get_or_create(&operation.into()).inc();
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        #[allow(clippy::cast_possible_wrap)]
        self.last_event_timestamp_seconds.set(now as i64);
    }

    pub fn update_cache_entries(&self, ips: usize, nodes: usize) {
        #[allow(clippy::cast_possible_wrap)]
        {
            self.ip_entries.set(ips as i64);
            self.node_entries.set(nodes as i64);
        }
    }

    pub fn message_count(&self, outcome: MessageOutcome) -> u64 {
        self.messages.get_or_create(&outcome.into()).get()
    }

    pub fn event_count(&self, operation: Operation) -> u64 {
        self.events.get_or_create(&operation.into()).get()
    }
}
