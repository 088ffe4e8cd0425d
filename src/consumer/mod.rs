// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metadata update loop
//!
//! Pulls raw messages from the stream transport, decodes them and applies the
//! resulting change events to the cache, one message at a time, until shutdown.

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cache::MetadataCache;
use crate::metrics::{CacheMetrics, MessageOutcome};
use crate::model::decode;
use crate::transport::MessageReader;

/// Starts the background update loop
///
/// The loop is the only writer to `cache`. It stops once `shutdown_rx` turns
/// `true` or its sender is dropped; read, empty and decode failures only skip
/// the message at hand.
pub fn start_update_loop<R>(
    reader: R,
    cache: MetadataCache,
    metrics: CacheMetrics,
    shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    R: MessageReader + 'static,
{
    tracing::info!("Starting metadata update loop");
    tokio::spawn(run_update_loop(reader, cache, metrics, shutdown_rx))
}

async fn run_update_loop<R: MessageReader>(
    mut reader: R,
    cache: MetadataCache,
    metrics: CacheMetrics,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        // Blocking read; shutdown may interrupt it but never message processing
        let result = tokio::select! {
            result = reader.read_message() => result,
            _ = shutdown_rx.wait_for(|stop| *stop) => break,
        };

        let payload = match result {
            Ok(payload) => payload,
            Err(e) => {
                metrics.record_message(MessageOutcome::TransportError);
                tracing::error!("Failed to read metadata message: {}", e);
                continue;
            }
        };

        if payload.is_empty() {
            metrics.record_message(MessageOutcome::Empty);
            tracing::debug!("Metadata stream: empty message");
            continue;
        }

        let event = match decode(&payload) {
            Ok(event) => event,
            Err(e) => {
                metrics.record_message(MessageOutcome::DecodeError);
                tracing::error!("Failed to decode metadata message: {}", e);
                tracing::trace!("Undecodable payload: {:?}", String::from_utf8_lossy(&payload));
                continue;
            }
        };

        tracing::debug!(
            "Metadata stream: {} {} '{}' ({} IPs)",
            event.operation,
            event.resource.kind,
            event.resource.name,
            event.resource.ips.len()
        );
        let operation = event.operation;
        cache.apply(event).await;

        metrics.record_event(operation);
        let (ips, nodes) = cache.entry_counts().await;
        metrics.update_cache_entries(ips, nodes);
    }
    tracing::info!("Stopping metadata update loop");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, Result};
    use crate::model::Operation;
    use async_trait::async_trait;
    use std::net::IpAddr;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Replays scripted read results, then waits forever
    struct ScriptedReader {
        rx: mpsc::UnboundedReceiver<Result<Vec<u8>>>,
    }

    #[async_trait]
    impl MessageReader for ScriptedReader {
        async fn read_message(&mut self) -> Result<Vec<u8>> {
            match self.rx.recv().await {
                Some(result) => result,
                None => std::future::pending().await,
            }
        }
    }

    struct Harness {
        tx: mpsc::UnboundedSender<Result<Vec<u8>>>,
        cache: MetadataCache,
        metrics: CacheMetrics,
        shutdown_tx: watch::Sender<bool>,
        handle: JoinHandle<()>,
    }

    fn start() -> Harness {
        let (tx, rx) = mpsc::unbounded_channel();
        let cache = MetadataCache::new();
        let metrics = CacheMetrics::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = start_update_loop(
            ScriptedReader { rx },
            cache.clone(),
            metrics.clone(),
            shutdown_rx,
        );
        Harness {
            tx,
            cache,
            metrics,
            shutdown_tx,
            handle,
        }
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    /// Waits until the loop has handled `count` messages
    async fn wait_for_messages(metrics: &CacheMetrics, count: u64) {
        let handled = || {
            [
                MessageOutcome::Applied,
                MessageOutcome::Empty,
                MessageOutcome::DecodeError,
                MessageOutcome::TransportError,
            ]
            .into_iter()
            .map(|outcome| metrics.message_count(outcome))
            .sum::<u64>()
        };
        tokio::time::timeout(Duration::from_secs(5), async {
            while handled() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("update loop did not handle messages in time");
    }

    #[tokio::test]
    async fn test_applies_add_and_delete_events() {
        let h = start();
        h.tx.send(Ok(br#"{"operation":"add","resource":{"kind":"Node","name":"n1","ips":["10.0.0.2","10.0.0.3"]}}"#.to_vec()))
            .unwrap();
        h.tx.send(Ok(br#"{"operation":"delete","resource":{"kind":"Node","name":"n1","ips":["10.0.0.2"]}}"#.to_vec()))
            .unwrap();
        wait_for_messages(&h.metrics, 2).await;

        assert!(h.cache.lookup_by_ip(&ip("10.0.0.2")).await.is_none());
        assert!(h.cache.lookup_by_ip(&ip("10.0.0.3")).await.is_some());
        assert!(h.cache.lookup_by_name("n1").await.is_none());
        assert_eq!(h.metrics.event_count(Operation::Add), 1);
        assert_eq!(h.metrics.event_count(Operation::Delete), 1);

        let _ = h.shutdown_tx.send(true);
        h.handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_with_invalid_ip_still_removes_valid_keys() {
        let h = start();
        h.tx.send(Ok(br#"{"operation":"add","resource":{"kind":"Node","name":"n1","ips":["10.0.0.2"]}}"#.to_vec()))
            .unwrap();
        h.tx.send(Ok(br#"{"operation":"delete","resource":{"kind":"Node","name":"n1","ips":["10.0.0.2","not-an-ip"]}}"#.to_vec()))
            .unwrap();
        wait_for_messages(&h.metrics, 2).await;

        assert_eq!(h.metrics.message_count(MessageOutcome::DecodeError), 0);
        assert!(h.cache.lookup_by_ip(&ip("10.0.0.2")).await.is_none());
        assert!(h.cache.lookup_by_name("n1").await.is_none());
        assert_eq!(h.cache.entry_counts().await, (0, 0));

        let _ = h.shutdown_tx.send(true);
        h.handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_payload_is_skipped_without_decoding() {
        let h = start();
        h.tx.send(Ok(Vec::new())).unwrap();
        wait_for_messages(&h.metrics, 1).await;

        assert_eq!(h.metrics.message_count(MessageOutcome::Empty), 1);
        assert_eq!(h.metrics.message_count(MessageOutcome::DecodeError), 0);
        assert_eq!(h.cache.entry_counts().await, (0, 0));

        let _ = h.shutdown_tx.send(true);
        h.handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_loop() {
        let h = start();
        h.tx.send(Err(AppError::Transport("connection reset".to_string())))
            .unwrap();
        h.tx.send(Ok(b"{malformed".to_vec())).unwrap();
        h.tx.send(Ok(br#"{"operation":"add","resource":{"kind":"Pod","name":"p1","ips":["10.0.0.1"]}}"#.to_vec()))
            .unwrap();
        wait_for_messages(&h.metrics, 3).await;

        assert_eq!(h.metrics.message_count(MessageOutcome::TransportError), 1);
        assert_eq!(h.metrics.message_count(MessageOutcome::DecodeError), 1);
        assert_eq!(h.metrics.message_count(MessageOutcome::Applied), 1);

        // Only the valid add reached the cache
        assert_eq!(h.cache.entry_counts().await, (1, 0));
        let pod = h.cache.lookup_by_ip(&ip("10.0.0.1")).await.unwrap();
        assert_eq!(pod.name, "p1");
        assert!(h.cache.lookup_by_name("p1").await.is_none());
        assert!(!h.handle.is_finished());

        let _ = h.shutdown_tx.send(true);
        h.handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_idle_read() {
        let h = start();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!h.handle.is_finished());

        let _ = h.shutdown_tx.send(true);
        tokio::time::timeout(Duration::from_secs(1), h.handle)
            .await
            .expect("loop did not stop on shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropped_shutdown_sender_stops_loop() {
        let h = start();
        drop(h.shutdown_tx);
        tokio::time::timeout(Duration::from_secs(1), h.handle)
            .await
            .expect("loop did not stop after sender dropped")
            .unwrap();
    }

    #[tokio::test]
    async fn test_already_cancelled_loop_does_not_read() {
        let (tx, rx) = mpsc::unbounded_channel();
        let cache = MetadataCache::new();
        let metrics = CacheMetrics::new();
        let (_shutdown_tx, shutdown_rx) = watch::channel(true);
        tx.send(Ok(br#"{"operation":"add","resource":{"kind":"Pod","name":"p1","ips":["10.0.0.1"]}}"#.to_vec()))
            .unwrap();

        start_update_loop(ScriptedReader { rx }, cache.clone(), metrics.clone(), shutdown_rx)
            .await
            .unwrap();

        assert_eq!(cache.entry_counts().await, (0, 0));
        assert_eq!(metrics.message_count(MessageOutcome::Applied), 0);
    }
}
