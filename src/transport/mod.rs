// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metadata stream transport
//!
//! The update loop only needs a blocking "read next message" primitive,
//! expressed by [`MessageReader`]. [`TcpFrameReader`] implements it over a TCP
//! connection to a publisher that writes length-prefixed frames.

mod backoff;
mod protocol;

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::StreamConfig;
use crate::error::{AppError, Result};
use backoff::ReconnectState;

pub use protocol::{MAX_FRAME_LEN, encode_length, write_frame};

/// Source of raw change event payloads
///
/// `read_message` waits until a message is available. An empty payload means
/// there was nothing to apply. The update loop may drop an in-flight read when
/// it shuts down.
#[async_trait]
pub trait MessageReader: Send {
    async fn read_message(&mut self) -> Result<Vec<u8>>;
}

/// Reads frames from a TCP publisher, reconnecting after failures
pub struct TcpFrameReader {
    address: String,
    connect_timeout: Duration,
    stream: Option<TcpStream>,
    state: ReconnectState,
}

impl TcpFrameReader {
    /// Opens the initial connection to the publisher
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` if the connection cannot be established
    /// within the configured timeout.
    pub async fn connect(config: &StreamConfig) -> Result<Self> {
        let connect_timeout = Duration::from_secs(config.connect_timeout_secs);
        let stream = open_stream(&config.address, connect_timeout).await?;
        tracing::info!("Connected to metadata stream at {}", config.address);
        Ok(Self {
            address: config.address.clone(),
            connect_timeout,
            stream: Some(stream),
            state: ReconnectState::new(),
        })
    }

    async fn reconnect(&mut self) -> Result<()> {
        if let Some(delay) = self.state.reconnect_delay() {
            tracing::debug!(
                "Delaying reconnect to {} by {:?} after {} consecutive errors",
                self.address,
                delay,
                self.state.consecutive_errors()
            );
            tokio::time::sleep(delay).await;
        }
        match open_stream(&self.address, self.connect_timeout).await {
            Ok(stream) => {
                tracing::info!("Reconnected to metadata stream at {}", self.address);
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                self.state.record_error();
                Err(e)
            }
        }
    }
}

#[async_trait]
impl MessageReader for TcpFrameReader {
    async fn read_message(&mut self) -> Result<Vec<u8>> {
        if self.stream.is_none() {
            self.reconnect().await?;
        }
        let Some(stream) = self.stream.as_mut() else {
            return Err(AppError::Transport(format!(
                "no connection to {}",
                self.address
            )));
        };

        match protocol::read_frame(stream).await {
            Ok(payload) => {
                self.state.record_success();
                Ok(payload)
            }
            Err(e) => {
                // Drop the broken connection; the next read reconnects
                self.stream = None;
                self.state.record_error();
                Err(AppError::Transport(format!(
                    "read from {} failed: {}",
                    self.address, e
                )))
            }
        }
    }
}

async fn open_stream(addr: &str, connect_timeout: Duration) -> Result<TcpStream> {
    tracing::trace!("Attempting TCP connection to: {}", addr);
    let stream = timeout(connect_timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| {
            AppError::Transport(format!(
                "connection to {addr} timed out after {connect_timeout:?}"
            ))
        })?
        .map_err(|e| AppError::Transport(format!("failed to connect to {addr}: {e}")))?;
    tracing::trace!("TCP connection established to: {}", addr);
    Ok(stream)
}
