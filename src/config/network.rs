// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network definition settings
//!
//! Every field of a network definition is either required or carries a named
//! default, so a definition means the same thing whether it comes from code
//! or from a manifest with fields omitted.

use serde::{Deserialize, Serialize};

/// Default cap on availability zones; clamped to what the region offers
pub const DEFAULT_MAX_AZS: u32 = 99;

/// Default scale trigger: average CPU utilization percentage
pub const DEFAULT_SCALE_ON_CPU_PERCENT: u8 = 50;

/// Default machine image for scaling group instances
pub const DEFAULT_MACHINE_IMAGE: &str = "amazon-linux-2";

/// Default instance size for scaling group instances
pub const DEFAULT_INSTANCE_TYPE: &str = "t3.micro";

/// Definition of one topology unit: a network with a load-balanced,
/// auto-scaled instance tier
///
/// `name` and `cidr` are kept as given and validated when the network is
/// defined, so a malformed value surfaces as a configuration error from the
/// builder rather than from deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Name of the topology unit (DNS label)
    pub name: String,

    /// IPv4 CIDR block of the network
    pub cidr: String,

    /// Upper bound on availability zones to span
    #[serde(default = "default_max_azs")]
    pub max_azs: u32,

    /// NAT gateway placement for private subnet egress
    #[serde(default)]
    pub nat_gateways: NatGatewayPolicy,

    /// Flow log policy
    #[serde(default)]
    pub flow_logs: FlowLogPolicy,

    /// Load balancer listener
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Scaling group capacity bounds
    #[serde(default)]
    pub capacity: CapacityBounds,

    /// Instance launch specification
    #[serde(default)]
    pub launch: LaunchSpec,

    /// Target average CPU utilization (0-100) for the scaling policy
    #[serde(default = "default_scale_on_cpu_percent")]
    pub scale_on_cpu_percent: u8,

    /// Whether the load balancer faces the internet
    #[serde(default = "default_internet_facing")]
    pub internet_facing: bool,
}

fn default_max_azs() -> u32 {
    DEFAULT_MAX_AZS
}

fn default_scale_on_cpu_percent() -> u8 {
    DEFAULT_SCALE_ON_CPU_PERCENT
}

fn default_internet_facing() -> bool {
    true
}

impl NetworkConfig {
    /// Definition with every optional field at its named default
    pub fn new(name: impl Into<String>, cidr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cidr: cidr.into(),
            max_azs: DEFAULT_MAX_AZS,
            nat_gateways: NatGatewayPolicy::default(),
            flow_logs: FlowLogPolicy::default(),
            listener: ListenerConfig::default(),
            capacity: CapacityBounds::default(),
            launch: LaunchSpec::default(),
            scale_on_cpu_percent: DEFAULT_SCALE_ON_CPU_PERCENT,
            internet_facing: true,
        }
    }

    pub fn with_max_azs(mut self, max_azs: u32) -> Self {
        self.max_azs = max_azs;
        self
    }

    pub fn with_nat_gateways(mut self, policy: NatGatewayPolicy) -> Self {
        self.nat_gateways = policy;
        self
    }

    pub fn with_flow_logs(mut self, flow_logs: FlowLogPolicy) -> Self {
        self.flow_logs = flow_logs;
        self
    }

    pub fn without_flow_logs(mut self) -> Self {
        self.flow_logs.enabled = false;
        self
    }

    pub fn with_listener(mut self, protocol: ListenerProtocol, port: u16) -> Self {
        self.listener = ListenerConfig { protocol, port };
        self
    }

    pub fn with_capacity(mut self, min: u32, desired: u32, max: u32) -> Self {
        self.capacity = CapacityBounds { min, desired, max };
        self
    }

    pub fn with_launch(mut self, launch: LaunchSpec) -> Self {
        self.launch = launch;
        self
    }

    /// Replace the bootstrap commands run at instance boot
    pub fn with_bootstrap<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.launch.bootstrap = commands.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scale_on_cpu(mut self, percent: u8) -> Self {
        self.scale_on_cpu_percent = percent;
        self
    }

    /// Place the load balancer in private subnets
    pub fn internal(mut self) -> Self {
        self.internet_facing = false;
        self
    }
}

/// NAT gateway placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NatGatewayPolicy {
    /// No NAT gateways; private subnets have no egress route
    None,
    /// One NAT gateway shared by every private subnet
    Single,
    /// One NAT gateway per availability zone
    #[default]
    PerAz,
}

impl NatGatewayPolicy {
    /// Number of NAT gateways for a network spanning `az_count` zones
    pub fn gateway_count(&self, az_count: usize) -> usize {
        match self {
            Self::None => 0,
            Self::Single => az_count.min(1),
            Self::PerAz => az_count,
        }
    }
}

/// Flow log policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowLogPolicy {
    pub enabled: bool,
    pub traffic: FlowLogTraffic,
}

impl Default for FlowLogPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            traffic: FlowLogTraffic::All,
        }
    }
}

/// Traffic captured by a flow log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowLogTraffic {
    #[default]
    All,
    Accept,
    Reject,
}

impl FlowLogTraffic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Accept => "ACCEPT",
            Self::Reject => "REJECT",
        }
    }
}

/// Listener protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerProtocol {
    #[default]
    Http,
    Https,
    Tcp,
}

impl ListenerProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "HTTP",
            Self::Https => "HTTPS",
            Self::Tcp => "TCP",
        }
    }

    /// Load balancer flavour serving this protocol
    pub fn load_balancer_kind(&self) -> &'static str {
        match self {
            Self::Http | Self::Https => "application",
            Self::Tcp => "network",
        }
    }
}

/// Load balancer listener settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    pub protocol: ListenerProtocol,
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            protocol: ListenerProtocol::Http,
            port: 80,
        }
    }
}

/// Scaling group capacity bounds, `min <= desired <= max`, all positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityBounds {
    pub min: u32,
    pub desired: u32,
    pub max: u32,
}

impl Default for CapacityBounds {
    fn default() -> Self {
        Self {
            min: 1,
            desired: 1,
            max: 1,
        }
    }
}

/// Instance launch specification
///
/// Bootstrap commands are opaque: they are passed to the backend verbatim
/// and in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSpec {
    pub machine_image: String,
    pub instance_type: String,
    pub bootstrap: Vec<String>,
}

impl Default for LaunchSpec {
    fn default() -> Self {
        Self {
            machine_image: DEFAULT_MACHINE_IMAGE.to_string(),
            instance_type: DEFAULT_INSTANCE_TYPE.to_string(),
            bootstrap: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_omitted_fields_take_named_defaults() {
        let parsed: NetworkConfig =
            serde_json::from_str(r#"{"name": "core", "cidr": "10.42.11.0/24"}"#).unwrap();
        assert_eq!(parsed, NetworkConfig::new("core", "10.42.11.0/24"));
        assert_eq!(parsed.max_azs, 99);
        assert_eq!(parsed.nat_gateways, NatGatewayPolicy::PerAz);
        assert!(parsed.flow_logs.enabled);
        assert_eq!(parsed.listener.port, 80);
        assert_eq!(parsed.launch.instance_type, "t3.micro");
    }

    #[test]
    fn test_partial_nested_settings() {
        let parsed: NetworkConfig = serde_json::from_str(
            r#"{
                "name": "edge",
                "cidr": "10.7.11.0/24",
                "nat_gateways": "single",
                "listener": {"port": 8080},
                "capacity": {"min": 2, "desired": 3, "max": 5},
                "launch": {"bootstrap": ["yum install -y httpd"]}
            }"#,
        )
        .unwrap();

        assert_eq!(parsed.nat_gateways, NatGatewayPolicy::Single);
        assert_eq!(parsed.listener.protocol, ListenerProtocol::Http);
        assert_eq!(parsed.listener.port, 8080);
        assert_eq!(
            parsed.capacity,
            CapacityBounds {
                min: 2,
                desired: 3,
                max: 5
            }
        );
        assert_eq!(parsed.launch.machine_image, DEFAULT_MACHINE_IMAGE);
        assert_eq!(parsed.launch.bootstrap, vec!["yum install -y httpd"]);
    }

    #[test]
    fn test_builder_methods() {
        let config = NetworkConfig::new("core", "10.0.0.0/16")
            .with_capacity(2, 3, 5)
            .with_listener(ListenerProtocol::Tcp, 443)
            .with_bootstrap(["echo one", "echo two"])
            .without_flow_logs()
            .internal();

        assert_eq!(config.capacity.desired, 3);
        assert_eq!(config.listener.protocol.load_balancer_kind(), "network");
        assert_eq!(config.launch.bootstrap.len(), 2);
        assert!(!config.flow_logs.enabled);
        assert!(!config.internet_facing);
    }

    #[test]
    fn test_nat_gateway_count() {
        assert_eq!(NatGatewayPolicy::None.gateway_count(3), 0);
        assert_eq!(NatGatewayPolicy::Single.gateway_count(3), 1);
        assert_eq!(NatGatewayPolicy::PerAz.gateway_count(3), 3);
    }
}
