// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Type definitions for cached resource metadata

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

/// Kind of cluster resource described by a metadata record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Node,
    Pod,
    Service,
    /// Any kind the cache has no special handling for
    #[serde(other)]
    Other,
}

impl ResourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "Node",
            Self::Pod => "Pod",
            Self::Service => "Service",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata snapshot of one cluster resource
///
/// Values are never mutated once built; an update replaces the whole record.
/// Only `kind`, `name` and `ips` matter to the cache; every other field is
/// carried through as-is, including fields this type does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetaData {
    pub kind: ResourceKind,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub namespace: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub host_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub host_ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub network_name: String,
    /// Addresses currently assigned to the resource
    #[serde(default, deserialize_with = "lenient_ips")]
    pub ips: Vec<IpAddr>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub secondary_net_keys: Vec<String>,
    /// Fields without a dedicated member, kept for lookups
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Producers send `null` for empty lists and maps
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses each address on its own; unparsable ones are skipped so the rest
/// of the event still applies
fn lenient_ips<'de, D>(deserializer: D) -> Result<Vec<IpAddr>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = null_as_default(deserializer)?;
    Ok(raw
        .iter()
        .filter_map(|ip| match ip.parse::<IpAddr>() {
            Ok(ip) => Some(ip),
            Err(e) => {
                tracing::warn!("Skipping invalid IP address '{}': {}", ip, e);
                None
            }
        })
        .collect())
}

impl ResourceMetaData {
    /// Creates a record with the identifying fields set and everything else empty
    #[must_use]
    pub fn new(kind: ResourceKind, name: impl Into<String>, ips: Vec<IpAddr>) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace: String::new(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            owner_name: String::new(),
            owner_kind: String::new(),
            host_name: String::new(),
            host_ip: String::new(),
            network_name: String::new(),
            ips,
            secondary_net_keys: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn is_node(&self) -> bool {
        self.kind == ResourceKind::Node
    }
}

/// Operation carried by a change event
///
/// `Add` and `Update` are both applied as an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Update,
    Delete,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One metadata change published on the stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub operation: Operation,
    pub resource: ResourceMetaData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_new_has_empty_optional_fields() {
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        let resource = ResourceMetaData::new(ResourceKind::Pod, "p1", vec![ip]);

        assert_eq!(resource.name, "p1");
        assert_eq!(resource.ips, vec![ip]);
        assert!(resource.namespace.is_empty());
        assert!(resource.labels.is_empty());
        assert!(resource.host_ip.is_empty());
        assert!(resource.extra.is_empty());
        assert!(!resource.is_node());
    }

    #[test]
    fn test_kind_unknown_string_maps_to_other() {
        let kind: ResourceKind = serde_json::from_str("\"Deployment\"").unwrap();
        assert_eq!(kind, ResourceKind::Other);
    }

    #[test]
    fn test_kind_and_operation_display() {
        assert_eq!(ResourceKind::Node.to_string(), "Node");
        assert_eq!(ResourceKind::Service.to_string(), "Service");
        assert_eq!(Operation::Update.to_string(), "update");
    }

    #[test]
    fn test_resource_serializes_camel_case() {
        let mut resource = ResourceMetaData::new(ResourceKind::Node, "n1", Vec::new());
        resource.host_name = "worker-1".to_string();

        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["kind"], "Node");
        assert_eq!(json["hostName"], "worker-1");
        assert_eq!(json["hostIp"], "");
    }
}
