// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declarative network topology compiler for the Composable Information Machine
//!
//! Network definitions go in; an ordered, fully resolved provisioning plan
//! comes out. Nothing here talks to a cloud API: the plan is handed to a
//! [`ProvisioningBackend`].
//!
//! - [`TopologyBuilder`] expands each network definition into its resources
//!   and peers networks through the [`PeeringPlanner`]
//! - [`ReferenceResolver`] turns symbolic references into concrete ids
//! - [`PlanEmitter`] orders the graph into an immutable [`Plan`]

pub mod backend;
pub mod builder;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod graph;
pub mod peering;
pub mod plan;
pub mod resolver;

pub use backend::{
    submit, BackendError, CollectingBackend, LoggingBackend, NullBackend, ProvisioningBackend,
};
pub use builder::{NetworkHandle, TopologyBuilder};
pub use config::{
    CapacityBounds, CompilerSettings, FlowLogPolicy, FlowLogTraffic, LaunchSpec, ListenerConfig,
    ListenerProtocol, NatGatewayPolicy, NetworkConfig, PeeringSpec, RegionInventory,
    TopologyManifest,
};
pub use domain::{CidrBlock, ResourceName, ResourceType};
pub use errors::{TopologyError, TopologyResult};
pub use events::TopologyEvent;
pub use graph::{NodeId, ParamValue, ResourceGraph, ResourceNode};
pub use peering::{PeeringLink, PeeringPlanner};
pub use plan::{OpType, Operation, Plan, PlanEmitter};
pub use resolver::{ConcreteId, ReferenceResolver};

/// Compile a manifest into a plan
pub fn compile(manifest: &TopologyManifest, settings: CompilerSettings) -> TopologyResult<Plan> {
    TopologyBuilder::from_manifest(manifest, settings)?.emit()
}
