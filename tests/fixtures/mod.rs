// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-topology
//!
//! Deterministic topology inputs shared by the integration tests: the
//! two-network peered scenario, a fixed zone inventory and a manifest
//! covering the same topology.

#![allow(dead_code)]

use cim_topology::{
    CompilerSettings, NetworkConfig, NetworkHandle, RegionInventory, TopologyBuilder,
};

pub const CORE_CIDR: &str = "10.42.11.0/24";
pub const EDGE_CIDR: &str = "10.7.11.0/24";

/// Manifest of the peered two-network scenario
pub const PEERED_MANIFEST: &str = r#"{
    "networks": [
        {
            "name": "core",
            "cidr": "10.42.11.0/24",
            "capacity": {"min": 2, "desired": 3, "max": 5},
            "launch": {"bootstrap": ["yum install -y httpd", "systemctl enable --now httpd"]}
        },
        {
            "name": "edge",
            "cidr": "10.7.11.0/24",
            "capacity": {"min": 2, "desired": 3, "max": 5}
        }
    ],
    "peerings": [{"requester": "core", "accepter": "edge"}]
}"#;

/// Two-zone inventory matching the library default
pub fn settings() -> CompilerSettings {
    CompilerSettings {
        inventory: RegionInventory::new("us-east-1", ["us-east-1a", "us-east-1b"]),
    }
}

/// Three-zone inventory
pub fn wide_settings() -> CompilerSettings {
    CompilerSettings {
        inventory: RegionInventory::new("eu-west-1", ["eu-west-1a", "eu-west-1b", "eu-west-1c"]),
    }
}

pub fn core_config() -> NetworkConfig {
    NetworkConfig::new("core", CORE_CIDR)
        .with_capacity(2, 3, 5)
        .with_bootstrap(["yum install -y httpd", "systemctl enable --now httpd"])
}

pub fn edge_config() -> NetworkConfig {
    NetworkConfig::new("edge", EDGE_CIDR).with_capacity(2, 3, 5)
}

/// Builder with `core` and `edge` defined but not yet peered
pub fn two_networks() -> (TopologyBuilder, NetworkHandle, NetworkHandle) {
    let mut builder = TopologyBuilder::new(settings());
    let core = builder
        .define_network(&core_config())
        .expect("core network is valid");
    let edge = builder
        .define_network(&edge_config())
        .expect("edge network is valid");
    (builder, core, edge)
}
