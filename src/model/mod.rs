// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Resource metadata model and change event decoding
//!
//! Change events arrive as JSON payloads, one per transport message, and
//! describe a single resource plus the operation applied to it.

mod codec;
mod types;

pub use codec::{DecodeError, decode};
pub use types::{ChangeEvent, Operation, ResourceKind, ResourceMetaData};
