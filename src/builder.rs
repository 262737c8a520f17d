// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Builder
//!
//! Declarative construction of a topology, one network definition per call.
//!
//! ```text
//! define_network(a) ─┐
//! define_network(b) ─┼─> ResourceGraph ──> PlanEmitter::emit ──> Plan
//! peer(a, b) ────────┘
//! ```
//!
//! Construction is two-phase: every network is defined first, then pairs
//! are linked. A definition either registers its complete node set or, on
//! the first invalid input, nothing.
//!
//! # Example
//!
//! ```rust
//! use cim_topology::{CompilerSettings, NetworkConfig, TopologyBuilder};
//!
//! let mut builder = TopologyBuilder::new(CompilerSettings::default());
//! let core = builder
//!     .define_network(&NetworkConfig::new("core", "10.42.11.0/24").with_capacity(2, 3, 5))
//!     .unwrap();
//! let edge = builder
//!     .define_network(&NetworkConfig::new("edge", "10.7.11.0/24"))
//!     .unwrap();
//! builder.peer(&core, &edge).unwrap();
//!
//! let plan = builder.emit().unwrap();
//! assert!(!plan.is_empty());
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{
    CompilerSettings, ListenerProtocol, NatGatewayPolicy, NetworkConfig, TopologyManifest,
};
use crate::domain::invariants::{
    effective_az_count, validate_capacity, validate_not_blank, validate_port, validate_threshold,
};
use crate::domain::{CidrBlock, ResourceName, ResourceType};
use crate::errors::{TopologyError, TopologyResult};
use crate::events::{NetworkDefined, NetworksPeered, TopologyEvent};
use crate::graph::{NodeId, ParamValue, ResourceGraph, ResourceNode};
use crate::peering::{PeeringLink, PeeringPlanner};
use crate::plan::{Plan, PlanEmitter};

/// Handle to a defined network
///
/// Exposes the identities later construction steps need, most importantly
/// the private subnets and their route tables for the peering planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkHandle {
    name: ResourceName,
    cidr: CidrBlock,
    network: NodeId,
    target_group: NodeId,
    load_balancer: NodeId,
    scaling_group: NodeId,
    availability_zones: Vec<String>,
    public_subnets: Vec<NodeId>,
    private_subnets: Vec<NodeId>,
    private_route_tables: Vec<NodeId>,
}

impl NetworkHandle {
    pub fn name(&self) -> &ResourceName {
        &self.name
    }

    pub fn cidr(&self) -> &CidrBlock {
        &self.cidr
    }

    /// Network node
    pub fn network(&self) -> &NodeId {
        &self.network
    }

    pub fn target_group(&self) -> &NodeId {
        &self.target_group
    }

    pub fn load_balancer(&self) -> &NodeId {
        &self.load_balancer
    }

    pub fn scaling_group(&self) -> &NodeId {
        &self.scaling_group
    }

    /// Zones spanned, after clamping to the region inventory
    pub fn availability_zones(&self) -> &[String] {
        &self.availability_zones
    }

    pub fn public_subnets(&self) -> &[NodeId] {
        &self.public_subnets
    }

    pub fn private_subnets(&self) -> &[NodeId] {
        &self.private_subnets
    }

    /// Route tables of the private subnets, index-aligned with
    /// [`NetworkHandle::private_subnets`]
    pub fn private_route_tables(&self) -> &[NodeId] {
        &self.private_route_tables
    }
}

/// Network definition after every field passed validation
struct ValidatedNetwork<'a> {
    config: &'a NetworkConfig,
    name: ResourceName,
    cidr: CidrBlock,
    zones: Vec<String>,
    subnet_blocks: Vec<CidrBlock>,
}

/// Builds a topology into a resource graph it owns until emission
#[derive(Debug)]
pub struct TopologyBuilder {
    settings: CompilerSettings,
    graph: ResourceGraph,
    networks: Vec<NetworkHandle>,
    planner: PeeringPlanner,
    correlation_id: Uuid,
    uncommitted_events: Vec<TopologyEvent>,
}

impl TopologyBuilder {
    /// Create a builder with an empty graph
    pub fn new(settings: CompilerSettings) -> Self {
        Self {
            settings,
            graph: ResourceGraph::new(),
            networks: Vec::new(),
            planner: PeeringPlanner::new(),
            correlation_id: Uuid::now_v7(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Build every network of a manifest, then every requested peering
    pub fn from_manifest(
        manifest: &TopologyManifest,
        settings: CompilerSettings,
    ) -> TopologyResult<Self> {
        let mut builder = Self::new(settings);

        for config in &manifest.networks {
            builder.define_network(config)?;
        }

        for spec in &manifest.peerings {
            let requester = builder.require_network(&spec.requester)?;
            let accepter = builder.require_network(&spec.accepter)?;
            builder.peer(&requester, &accepter)?;
        }

        Ok(builder)
    }

    /// Define one network and register its complete node set
    ///
    /// # Errors
    /// `Configuration` for a malformed name or CIDR, invalid capacity
    /// bounds, threshold or port, a CIDR too small for the subnets, an empty
    /// zone inventory, or a name that is already defined. The graph is left
    /// untouched on error.
    pub fn define_network(&mut self, config: &NetworkConfig) -> TopologyResult<NetworkHandle> {
        let validated = self.validate(config)?;

        if self.network(validated.name.as_str()).is_some() {
            return Err(TopologyError::Configuration(format!(
                "network {} is already defined",
                validated.name
            )));
        }

        let (nodes, handle) = network_nodes(&validated);
        let node_count = self.graph.register_all(nodes)?;

        debug!(
            network = %handle.name,
            nodes = node_count,
            "Registered network node set"
        );
        info!(
            "Defined network {} ({}) across {} availability zones",
            handle.name,
            handle.cidr,
            handle.availability_zones.len()
        );

        self.uncommitted_events
            .push(TopologyEvent::NetworkDefined(NetworkDefined::new(
                self.correlation_id,
                handle.name.as_str(),
                handle.cidr.as_cidr(),
                handle.availability_zones.len(),
                node_count,
            )));
        self.networks.push(handle.clone());

        Ok(handle)
    }

    /// Peer two defined networks
    ///
    /// See [`PeeringPlanner::peer`] for the rules. Peering an already peered
    /// pair, in either argument order, fails with `DuplicateLink`.
    pub fn peer(&mut self, a: &NetworkHandle, b: &NetworkHandle) -> TopologyResult<PeeringLink> {
        let link = self.planner.peer(&mut self.graph, a, b)?;

        self.uncommitted_events
            .push(TopologyEvent::NetworksPeered(NetworksPeered::new(
                self.correlation_id,
                link.requester().as_str(),
                link.accepter().as_str(),
                link.id().clone(),
                link.routes().len(),
            )));

        Ok(link)
    }

    /// Handle of a defined network, by name
    pub fn network(&self, name: &str) -> Option<&NetworkHandle> {
        self.networks.iter().find(|n| n.name.as_str() == name)
    }

    /// Defined networks in definition order
    pub fn networks(&self) -> &[NetworkHandle] {
        &self.networks
    }

    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Get uncommitted events and clear the list
    pub fn take_uncommitted_events(&mut self) -> Vec<TopologyEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }

    /// Hand the graph over, ending construction
    pub fn into_graph(self) -> ResourceGraph {
        self.graph
    }

    /// End construction and emit the plan
    pub fn emit(self) -> TopologyResult<Plan> {
        PlanEmitter::new().emit(self.graph)
    }

    fn require_network(&self, name: &str) -> TopologyResult<NetworkHandle> {
        self.network(name).cloned().ok_or_else(|| {
            TopologyError::Configuration(format!("peering references unknown network {}", name))
        })
    }

    fn validate<'a>(&self, config: &'a NetworkConfig) -> TopologyResult<ValidatedNetwork<'a>> {
        let name = ResourceName::new(config.name.as_str())?;
        let cidr = CidrBlock::new(&config.cidr)?;

        let capacity = &config.capacity;
        validate_capacity(capacity.min, capacity.desired, capacity.max)?;
        validate_threshold(config.scale_on_cpu_percent)?;
        validate_port(config.listener.port)?;
        validate_not_blank("machine_image", &config.launch.machine_image)?;
        validate_not_blank("instance_type", &config.launch.instance_type)?;

        let inventory = &self.settings.inventory;
        let az_count = effective_az_count(config.max_azs, &inventory.region, inventory.zones.len())?;
        if (config.max_azs as usize) > az_count {
            warn!(
                network = %name,
                requested = config.max_azs,
                available = az_count,
                "Clamped availability zone request to region inventory"
            );
        }

        // One public and one private subnet per zone
        let subnet_blocks = cidr.carve(az_count * 2)?;

        Ok(ValidatedNetwork {
            config,
            name,
            cidr,
            zones: inventory.zones[..az_count].to_vec(),
            subnet_blocks,
        })
    }
}

/// Full node set of one network, in registration order, and its handle
fn network_nodes(net: &ValidatedNetwork<'_>) -> (Vec<ResourceNode>, NetworkHandle) {
    let config = net.config;
    let root = NodeId::new(net.name.as_str());
    let az_count = net.zones.len();
    let mut nodes = Vec::new();

    let vpc = root.child("network");
    nodes.push(
        ResourceNode::new(vpc.clone(), ResourceType::Network)
            .with_param("name", net.name.as_str())
            .with_param("cidr_block", net.cidr)
            .with_param("enable_dns_support", true)
            .with_param("enable_dns_hostnames", true),
    );

    let igw = root.child("internet-gateway");
    nodes.push(
        ResourceNode::new(igw.clone(), ResourceType::InternetGateway)
            .owned_by(&vpc)
            .with_param("vpc_id", &vpc),
    );

    if config.flow_logs.enabled {
        nodes.push(
            ResourceNode::new(root.child("flow-log"), ResourceType::FlowLog)
                .owned_by(&vpc)
                .with_param("resource_id", &vpc)
                .with_param("traffic_type", config.flow_logs.traffic.as_str())
                .with_param("log_destination_type", "cloud-watch-logs"),
        );
    }

    // Public subnets take the low blocks, private subnets the next ones
    let (public_blocks, private_blocks) = net.subnet_blocks.split_at(az_count);
    let mut subnet_ids = |tier: &str, blocks: &[CidrBlock], public: bool| -> Vec<NodeId> {
        blocks
            .iter()
            .zip(&net.zones)
            .enumerate()
            .map(|(i, (block, zone))| {
                let id = root.child("subnet").child(format!("{}-{}", tier, i + 1));
                nodes.push(
                    ResourceNode::new(id.clone(), ResourceType::Subnet)
                        .owned_by(&vpc)
                        .with_param("vpc_id", &vpc)
                        .with_param("cidr_block", *block)
                        .with_param("availability_zone", zone.as_str())
                        .with_param("tier", tier)
                        .with_param("map_public_ip_on_launch", public),
                );
                id
            })
            .collect()
    };
    let public_subnets = subnet_ids("public", public_blocks, true);
    let private_subnets = subnet_ids("private", private_blocks, false);

    let route_table = |subnet: &NodeId| -> (NodeId, ResourceNode) {
        let suffix = subnet.as_str().rsplit('/').next().unwrap_or_default();
        let id = root.child("route-table").child(suffix);
        let node = ResourceNode::new(id.clone(), ResourceType::RouteTable)
            .owned_by(subnet)
            .with_param("vpc_id", &vpc)
            .with_param("subnet_id", subnet);
        (id, node)
    };
    let mut public_route_tables = Vec::new();
    for subnet in &public_subnets {
        let (id, node) = route_table(subnet);
        nodes.push(node);
        public_route_tables.push(id);
    }
    let mut private_route_tables = Vec::new();
    for subnet in &private_subnets {
        let (id, node) = route_table(subnet);
        nodes.push(node);
        private_route_tables.push(id);
    }

    let nat_gateways: Vec<NodeId> = public_subnets
        .iter()
        .take(config.nat_gateways.gateway_count(az_count))
        .enumerate()
        .map(|(i, subnet)| {
            let id = root.child("nat-gateway").child(i + 1);
            nodes.push(
                ResourceNode::new(id.clone(), ResourceType::NatGateway)
                    .owned_by(subnet)
                    .with_param("subnet_id", subnet)
                    .with_param("connectivity_type", "public"),
            );
            id
        })
        .collect();

    for table in &public_route_tables {
        nodes.push(egress_route(table, "gateway_id", &igw));
    }
    if config.nat_gateways != NatGatewayPolicy::None {
        for (i, table) in private_route_tables.iter().enumerate() {
            // Per-AZ gateways pair up by zone; a single gateway serves all
            let nat = &nat_gateways[i.min(nat_gateways.len() - 1)];
            nodes.push(egress_route(table, "nat_gateway_id", nat));
        }
    }

    let port = config.listener.port;
    let protocol = config.listener.protocol;

    let lb_security_group = root.child("security-group").child("load-balancer");
    let ingress_source = if config.internet_facing {
        "0.0.0.0/0".to_string()
    } else {
        net.cidr.as_cidr()
    };
    nodes.push(
        ResourceNode::new(lb_security_group.clone(), ResourceType::SecurityGroup)
            .owned_by(&vpc)
            .with_param("vpc_id", &vpc)
            .with_param("description", "load balancer ingress")
            .with_param("ingress_port", port)
            .with_param("ingress_cidr", ingress_source),
    );

    let instance_security_group = root.child("security-group").child("instances");
    nodes.push(
        ResourceNode::new(instance_security_group.clone(), ResourceType::SecurityGroup)
            .owned_by(&vpc)
            .with_param("vpc_id", &vpc)
            .with_param("description", "instance ingress from load balancer")
            .with_param("ingress_port", port)
            .with_param("ingress_source_security_group", &lb_security_group),
    );

    let target_group = root.child("target-group");
    let mut tg_node = ResourceNode::new(target_group.clone(), ResourceType::TargetGroup)
        .owned_by(&vpc)
        .with_param("vpc_id", &vpc)
        .with_param("protocol", protocol.as_str())
        .with_param("port", port)
        .with_param("target_type", "instance");
    if protocol != ListenerProtocol::Tcp {
        tg_node = tg_node.with_param("health_check_path", "/");
    }
    nodes.push(tg_node);

    let load_balancer = root.child("load-balancer");
    let (scheme, lb_subnets) = if config.internet_facing {
        ("internet-facing", &public_subnets)
    } else {
        ("internal", &private_subnets)
    };
    nodes.push(
        ResourceNode::new(load_balancer.clone(), ResourceType::LoadBalancer)
            .owned_by(&vpc)
            .with_param("type", protocol.load_balancer_kind())
            .with_param("scheme", scheme)
            .with_param("subnets", ParamValue::references_to(lb_subnets))
            .with_param("security_groups", ParamValue::references_to(&[lb_security_group])),
    );

    nodes.push(
        ResourceNode::new(root.child("listener"), ResourceType::Listener)
            .owned_by(&load_balancer)
            .with_param("load_balancer_arn", &load_balancer)
            .with_param("protocol", protocol.as_str())
            .with_param("port", port)
            .with_param("default_target_group_arn", &target_group),
    );

    let launch_template = root.child("launch-template");
    nodes.push(
        ResourceNode::new(launch_template.clone(), ResourceType::LaunchTemplate)
            .owned_by(&vpc)
            .with_param("image_id", config.launch.machine_image.as_str())
            .with_param("instance_type", config.launch.instance_type.as_str())
            .with_param(
                "security_group_ids",
                ParamValue::references_to(&[instance_security_group]),
            )
            .with_param("user_data", config.launch.bootstrap.clone()),
    );

    let scaling_group = root.child("scaling-group");
    let capacity = config.capacity;
    nodes.push(
        ResourceNode::new(scaling_group.clone(), ResourceType::ScalingGroup)
            .owned_by(&vpc)
            .with_param("launch_template_id", &launch_template)
            .with_param("vpc_zone_identifier", ParamValue::references_to(&private_subnets))
            .with_param("target_group_arns", ParamValue::references_to(&[target_group.clone()]))
            .with_param("min_size", capacity.min)
            .with_param("desired_capacity", capacity.desired)
            .with_param("max_size", capacity.max),
    );

    nodes.push(
        ResourceNode::new(root.child("scaling-policy"), ResourceType::ScalingPolicy)
            .owned_by(&scaling_group)
            .with_param("auto_scaling_group_name", &scaling_group)
            .with_param("policy_type", "TargetTrackingScaling")
            .with_param("predefined_metric", "ASGAverageCPUUtilization")
            .with_param("target_value", config.scale_on_cpu_percent),
    );

    let handle = NetworkHandle {
        name: net.name.clone(),
        cidr: net.cidr,
        network: vpc,
        target_group,
        load_balancer,
        scaling_group,
        availability_zones: net.zones.clone(),
        public_subnets,
        private_subnets,
        private_route_tables,
    };

    (nodes, handle)
}

/// Default route of a route table through an internet or NAT gateway
fn egress_route(table: &NodeId, target_key: &str, target: &NodeId) -> ResourceNode {
    ResourceNode::new(table.child("default"), ResourceType::EgressRoute)
        .owned_by(table)
        .with_param("route_table_id", table)
        .with_param("destination_cidr_block", "0.0.0.0/0")
        .with_param(target_key, target)
}
