// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Resource Type Domain Model
//!
//! Defines the taxonomy of resources a topology can contain, together with
//! the fixed emission tier that orders them in a plan and the names the
//! provisioning backend knows them by.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unknown resource type name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown resource type: {0}")]
pub struct UnknownResourceType(pub String);

/// Topology resource type taxonomy
///
/// Variants are declared in emission order; [`ResourceType::tier`] is the
/// authoritative ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    // Address space
    /// Virtual network owning a CIDR block
    Network,
    /// Internet gateway attached to a network
    InternetGateway,
    /// Flow log capturing a network's traffic
    FlowLog,
    /// Public or private subnet in one availability zone
    Subnet,
    /// Route table associated with one subnet
    RouteTable,
    /// NAT gateway placed in a public subnet
    NatGateway,
    /// Default route of a route table (internet or NAT egress)
    EgressRoute,

    // Traffic
    /// Security group
    SecurityGroup,
    /// Load balancer target group
    TargetGroup,
    /// Load balancer
    LoadBalancer,
    /// Load balancer listener
    Listener,

    // Compute
    /// Launch specification for scaling group instances
    LaunchTemplate,
    /// Scaling group
    ScalingGroup,
    /// Target tracking scaling policy
    ScalingPolicy,

    // Cross-network
    /// Peering link between two networks
    PeeringLink,
    /// Peering route in a private subnet's route table
    Route,
}

impl ResourceType {
    /// All resource types in emission order
    pub const ALL: [ResourceType; 16] = [
        Self::Network,
        Self::InternetGateway,
        Self::FlowLog,
        Self::Subnet,
        Self::RouteTable,
        Self::NatGateway,
        Self::EgressRoute,
        Self::SecurityGroup,
        Self::TargetGroup,
        Self::LoadBalancer,
        Self::Listener,
        Self::LaunchTemplate,
        Self::ScalingGroup,
        Self::ScalingPolicy,
        Self::PeeringLink,
        Self::Route,
    ];

    /// Emission tier: lower tiers are emitted first when dependencies allow
    pub fn tier(&self) -> u8 {
        match self {
            Self::Network => 0,
            Self::InternetGateway | Self::FlowLog => 1,
            Self::Subnet => 2,
            Self::RouteTable => 3,
            Self::NatGateway => 4,
            Self::EgressRoute => 5,
            Self::SecurityGroup => 6,
            Self::TargetGroup => 7,
            Self::LoadBalancer => 8,
            Self::Listener => 9,
            Self::LaunchTemplate => 10,
            Self::ScalingGroup => 11,
            Self::ScalingPolicy => 12,
            Self::PeeringLink => 13,
            Self::Route => 14,
        }
    }

    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::InternetGateway => "internet_gateway",
            Self::FlowLog => "flow_log",
            Self::Subnet => "subnet",
            Self::RouteTable => "route_table",
            Self::NatGateway => "nat_gateway",
            Self::EgressRoute => "egress_route",
            Self::SecurityGroup => "security_group",
            Self::TargetGroup => "target_group",
            Self::LoadBalancer => "load_balancer",
            Self::Listener => "listener",
            Self::LaunchTemplate => "launch_template",
            Self::ScalingGroup => "scaling_group",
            Self::ScalingPolicy => "scaling_policy",
            Self::PeeringLink => "peering_link",
            Self::Route => "route",
        }
    }

    /// Resource type name understood by the provisioning backend
    pub fn backend_type(&self) -> &'static str {
        match self {
            Self::Network => "AWS::EC2::VPC",
            Self::InternetGateway => "AWS::EC2::InternetGateway",
            Self::FlowLog => "AWS::EC2::FlowLog",
            Self::Subnet => "AWS::EC2::Subnet",
            Self::RouteTable => "AWS::EC2::RouteTable",
            Self::NatGateway => "AWS::EC2::NatGateway",
            Self::EgressRoute | Self::Route => "AWS::EC2::Route",
            Self::SecurityGroup => "AWS::EC2::SecurityGroup",
            Self::TargetGroup => "AWS::ElasticLoadBalancingV2::TargetGroup",
            Self::LoadBalancer => "AWS::ElasticLoadBalancingV2::LoadBalancer",
            Self::Listener => "AWS::ElasticLoadBalancingV2::Listener",
            Self::LaunchTemplate => "AWS::EC2::LaunchTemplate",
            Self::ScalingGroup => "AWS::AutoScaling::AutoScalingGroup",
            Self::ScalingPolicy => "AWS::AutoScaling::ScalingPolicy",
            Self::PeeringLink => "AWS::EC2::VPCPeeringConnection",
        }
    }

    /// Prefix of concrete identifiers for this type
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Network => "vpc",
            Self::InternetGateway => "igw",
            Self::FlowLog => "fl",
            Self::Subnet => "subnet",
            Self::RouteTable => "rtb",
            Self::NatGateway => "nat",
            Self::EgressRoute | Self::Route => "r",
            Self::SecurityGroup => "sg",
            Self::TargetGroup => "tg",
            Self::LoadBalancer => "lb",
            Self::Listener => "lsn",
            Self::LaunchTemplate => "lt",
            Self::ScalingGroup => "asg",
            Self::ScalingPolicy => "asp",
            Self::PeeringLink => "pcx",
        }
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Network => "Network",
            Self::InternetGateway => "Internet Gateway",
            Self::FlowLog => "Flow Log",
            Self::Subnet => "Subnet",
            Self::RouteTable => "Route Table",
            Self::NatGateway => "NAT Gateway",
            Self::EgressRoute => "Egress Route",
            Self::SecurityGroup => "Security Group",
            Self::TargetGroup => "Target Group",
            Self::LoadBalancer => "Load Balancer",
            Self::Listener => "Listener",
            Self::LaunchTemplate => "Launch Template",
            Self::ScalingGroup => "Scaling Group",
            Self::ScalingPolicy => "Scaling Policy",
            Self::PeeringLink => "Peering Link",
            Self::Route => "Peering Route",
        }
    }

    /// Check if this type only exists between networks
    pub fn is_cross_network(&self) -> bool {
        matches!(self, Self::PeeringLink | Self::Route)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ResourceType {
    type Err = UnknownResourceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "network" | "vpc" => Ok(Self::Network),
            "internet_gateway" | "igw" => Ok(Self::InternetGateway),
            "flow_log" => Ok(Self::FlowLog),
            "subnet" => Ok(Self::Subnet),
            "route_table" => Ok(Self::RouteTable),
            "nat_gateway" | "nat" => Ok(Self::NatGateway),
            "egress_route" => Ok(Self::EgressRoute),
            "security_group" | "sg" => Ok(Self::SecurityGroup),
            "target_group" => Ok(Self::TargetGroup),
            "load_balancer" | "lb" => Ok(Self::LoadBalancer),
            "listener" => Ok(Self::Listener),
            "launch_template" => Ok(Self::LaunchTemplate),
            "scaling_group" | "asg" => Ok(Self::ScalingGroup),
            "scaling_policy" => Ok(Self::ScalingPolicy),
            "peering_link" | "peering" => Ok(Self::PeeringLink),
            "route" => Ok(Self::Route),
            _ => Err(UnknownResourceType(s.to_string())),
        }
    }
}
