// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Configuration module for the metadata cache service
//!
//! Loads configuration from environment variables (and a `.env` file).


/// Default configuration values
pub mod defaults {
    pub const SERVER_ADDR: &str = "0.0.0.0:9090";
    pub const STREAM_CONNECT_TIMEOUT_SECS: u64 = 5;
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const SERVER_ADDR: &str = "SERVER_ADDR";
    pub const METADATA_STREAM_ADDRESS: &str = "METADATA_STREAM_ADDRESS";
    pub const STREAM_CONNECT_TIMEOUT_SECONDS: &str = "STREAM_CONNECT_TIMEOUT_SECONDS";
}

/// Connection settings for the metadata change stream
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Publisher address as `host:port`
    pub address: String,
    pub connect_timeout_secs: u64,
}

impl StreamConfig {
    /// Validates stream configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.address.trim().is_empty() {
            return Err("Stream address cannot be empty".to_string());
        }

        // Must contain a port
        match self.address.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {}
            _ => {
                return Err(format!(
                    "Invalid stream address '{}': expected 'host:port'",
                    self.address
                ));
            }
        }

        if self.connect_timeout_secs == 0 {
            return Err("Stream connect timeout must be at least 1 second".to_string());
        }

        Ok(())
    }
}

/// Application-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    /// Stream settings; `None` when no stream address is configured
    pub stream: Option<StreamConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: defaults::SERVER_ADDR.to_string(),
            stream: None,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let server_addr =
            lookup(env_vars::SERVER_ADDR).unwrap_or_else(|| defaults::SERVER_ADDR.to_string());

        let connect_timeout_secs = lookup(env_vars::STREAM_CONNECT_TIMEOUT_SECONDS)
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::STREAM_CONNECT_TIMEOUT_SECS);

        let stream = match lookup(env_vars::METADATA_STREAM_ADDRESS) {
            Some(address) => Some(StreamConfig {
                address,
                connect_timeout_secs,
            }),
            None => {
                tracing::warn!(
                    "{} is not set. No metadata stream configured.",
                    env_vars::METADATA_STREAM_ADDRESS
                );
                None
            }
        };

        Config {
            server_addr,
            stream,
        }
    }
}
