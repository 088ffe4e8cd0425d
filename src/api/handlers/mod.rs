// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

mod health;
mod lookup;
mod metrics;

pub use health::health_check;
pub use lookup::{node_by_name, resource_by_ip};
pub use metrics::metrics_handler;
