// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Error types for the metadata cache service

use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or IO error
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Message transport error (connect or read failure)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Live view lookup error
    #[error("Live view error: {0}")]
    LiveView(String),

    /// Metrics encoding error
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Address parsing error
    #[error("Address parse error")]
    AddrParse(#[from] std::net::AddrParseError),
}

/// Convenient alias for Result with application error
pub type Result<T> = std::result::Result<T, AppError>;
