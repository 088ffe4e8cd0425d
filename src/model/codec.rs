// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Change event payload decoding

use thiserror::Error;

use super::types::ChangeEvent;

/// Payload could not be turned into a change event
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Invalid JSON, wrong field types or missing fields
    #[error("malformed change event: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("change event resource has no name")]
    MissingName,
}

/// Decodes a non-empty transport payload into a change event
///
/// # Errors
///
/// Returns `DecodeError` if the payload is not a well-formed change event.
pub fn decode(payload: &[u8]) -> Result<ChangeEvent, DecodeError> {
    let event: ChangeEvent = serde_json::from_slice(payload)?;
    if event.resource.name.trim().is_empty() {
        return Err(DecodeError::MissingName);
    }
    Ok(event)
}
