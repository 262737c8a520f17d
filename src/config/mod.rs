// Copyright (c) 2025 - Cowboy AI, Inc.
//! Compiler configuration and topology manifests
//!
//! - [`CompilerSettings`] describe the environment a topology is compiled
//!   for (region and its availability zones), loaded from the environment.
//! - [`TopologyManifest`] is the declarative input: network definitions plus
//!   the pairs to peer, loaded from JSON.

pub mod network;

pub use network::{
    CapacityBounds, FlowLogPolicy, FlowLogTraffic, LaunchSpec, ListenerConfig, ListenerProtocol,
    NatGatewayPolicy, NetworkConfig,
};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{TopologyError, TopologyResult};

/// Region the topology targets and the zones it may use
///
/// Stands in for the backend's availability zone inventory; the builder
/// clamps each network's zone request to `zones.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInventory {
    pub region: String,
    pub zones: Vec<String>,
}

impl RegionInventory {
    pub fn new<I, S>(region: impl Into<String>, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            region: region.into(),
            zones: zones.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for RegionInventory {
    fn default() -> Self {
        Self::new("us-east-1", ["us-east-1a", "us-east-1b"])
    }
}

/// Settings for one compilation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerSettings {
    pub inventory: RegionInventory,
}

impl CompilerSettings {
    /// Load settings from environment variables
    ///
    /// - `TOPOLOGY_REGION` (default `us-east-1`)
    /// - `TOPOLOGY_AVAILABILITY_ZONES`, comma separated (default: zones
    ///   `a` and `b` of the region)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let region = lookup("TOPOLOGY_REGION").unwrap_or_else(|| "us-east-1".to_string());

        let zones = match lookup("TOPOLOGY_AVAILABILITY_ZONES") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|z| !z.is_empty())
                .map(String::from)
                .collect(),
            None => vec![format!("{}a", region), format!("{}b", region)],
        };

        Self {
            inventory: RegionInventory { region, zones },
        }
    }
}

/// Request to peer two networks of a manifest, by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeeringSpec {
    pub requester: String,
    pub accepter: String,
}

/// Declarative description of a whole topology
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyManifest {
    pub networks: Vec<NetworkConfig>,
    #[serde(default)]
    pub peerings: Vec<PeeringSpec>,
}

impl TopologyManifest {
    /// Parse a manifest from JSON text
    pub fn from_json(json: &str) -> TopologyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a manifest file
    pub fn from_path(path: impl AsRef<Path>) -> TopologyResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            TopologyError::Configuration(format!(
                "cannot read manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }
}
