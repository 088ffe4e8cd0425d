// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Reconnect backoff for the stream transport

use std::time::Duration;
use tokio::time::Instant;

/// Failures tolerated before reconnect attempts are delayed
const BACKOFF_THRESHOLD: u32 = 3;

/// Upper bound for the reconnect delay (5 minutes)
const MAX_BACKOFF: Duration = Duration::from_secs(300);

/// Tracks consecutive transport failures
#[derive(Clone, Debug)]
pub(super) struct ReconnectState {
    consecutive_errors: u32,
    last_error_time: Option<Instant>,
}

impl ReconnectState {
    pub(super) fn new() -> Self {
        Self {
            consecutive_errors: 0,
            last_error_time: None,
        }
    }

    pub(super) fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub(super) fn record_success(&mut self) {
        self.consecutive_errors = 0;
    }

    pub(super) fn record_error(&mut self) {
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        self.last_error_time = Some(Instant::now());
    }

    fn backoff_delay(&self) -> Duration {
        // Exponential backoff: 2^n seconds, max 5 minutes
        let base_delay = 2u64.pow(self.consecutive_errors.min(9));
        Duration::from_secs(base_delay).min(MAX_BACKOFF)
    }

    /// Time left to wait before the next connection attempt, if any
    pub(super) fn reconnect_delay(&self) -> Option<Duration> {
        if self.consecutive_errors < BACKOFF_THRESHOLD {
            return None;
        }
        let last_error = self.last_error_time?;
        let remaining = self.backoff_delay().saturating_sub(last_error.elapsed());
        (!remaining.is_zero()).then_some(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconnect_state_new() {
        let state = ReconnectState::new();
        assert_eq!(state.consecutive_errors(), 0);
        assert!(state.last_error_time.is_none());
        assert!(state.reconnect_delay().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_record_error_and_success() {
        let mut state = ReconnectState::new();
        state.record_error();
        state.record_error();
        assert_eq!(state.consecutive_errors(), 2);

        state.record_success();
        assert_eq!(state.consecutive_errors(), 0);
    }

    #[test]
    fn test_backoff_delay_grows_and_caps() {
        let mut state = ReconnectState::new();
        state.consecutive_errors = 1;
        assert_eq!(state.backoff_delay(), Duration::from_secs(2));
        state.consecutive_errors = 3;
        assert_eq!(state.backoff_delay(), Duration::from_secs(8));
        state.consecutive_errors = 8;
        assert_eq!(state.backoff_delay(), Duration::from_secs(256));
        state.consecutive_errors = 9;
        assert_eq!(state.backoff_delay(), MAX_BACKOFF);
        state.consecutive_errors = 20;
        assert_eq!(state.backoff_delay(), MAX_BACKOFF);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnect_delay_only_after_threshold() {
        let mut state = ReconnectState::new();
        state.record_error();
        state.record_error();
        assert!(state.reconnect_delay().is_none());

        state.record_error();
        assert_eq!(state.reconnect_delay(), Some(Duration::from_secs(8)));

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(state.reconnect_delay(), Some(Duration::from_secs(3)));

        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(state.reconnect_delay().is_none());
    }
}
