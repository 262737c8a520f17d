// Copyright (c) 2025 - Cowboy AI, Inc.
//! Peering Planner
//!
//! Links two already defined networks with one peering link node and, on
//! each side, one route per private route table towards the other network.
//! The private subnets of both networks can then reach each other; public
//! subnets are not routed.
//!
//! Links are pairwise only. Peering a with b and b with c does not make a
//! reach c.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::builder::NetworkHandle;
use crate::domain::{CidrBlock, ResourceName, ResourceType};
use crate::errors::{TopologyError, TopologyResult};
use crate::graph::{NodeId, ResourceGraph, ResourceNode};

/// Scope of peering link node ids
pub const PEERING_SCOPE: &str = "peering";

/// Joins the two network names in a link id; never valid inside a name
const LINK_SEPARATOR: char = '.';

/// Result of peering two networks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeeringLink {
    id: NodeId,
    requester: ResourceName,
    accepter: ResourceName,
    requester_cidr: CidrBlock,
    accepter_cidr: CidrBlock,
    routes: Vec<NodeId>,
}

impl PeeringLink {
    /// Peering link node
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn requester(&self) -> &ResourceName {
        &self.requester
    }

    pub fn accepter(&self) -> &ResourceName {
        &self.accepter
    }

    pub fn requester_cidr(&self) -> &CidrBlock {
        &self.requester_cidr
    }

    pub fn accepter_cidr(&self) -> &CidrBlock {
        &self.accepter_cidr
    }

    /// Route nodes added on both sides, requester side first
    pub fn routes(&self) -> &[NodeId] {
        &self.routes
    }
}

/// Tracks which unordered network pairs are already linked
#[derive(Debug, Clone, Default)]
pub struct PeeringPlanner {
    links: BTreeMap<(ResourceName, ResourceName), NodeId>,
}

impl PeeringPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Peer two networks, registering the link and its routes in `graph`
    ///
    /// # Errors
    /// Checked in this order, adding nothing on failure:
    /// - `Overlap` if the CIDR blocks overlap (peering a network with itself
    ///   always overlaps)
    /// - `DuplicateLink` if the pair is already linked, in either order
    /// - `UnresolvedDependency` if either network is not in `graph`
    pub fn peer(
        &mut self,
        graph: &mut ResourceGraph,
        a: &NetworkHandle,
        b: &NetworkHandle,
    ) -> TopologyResult<PeeringLink> {
        if a.cidr().overlaps(b.cidr()) {
            return Err(TopologyError::Overlap {
                first: a.cidr().to_string(),
                second: b.cidr().to_string(),
            });
        }

        let key = pair_key(a.name(), b.name());
        if self.links.contains_key(&key) {
            return Err(TopologyError::DuplicateLink {
                first: a.name().to_string(),
                second: b.name().to_string(),
            });
        }

        let id = link_id(a.name(), b.name());
        for network in [a.network(), b.network()] {
            if !graph.contains(network) {
                return Err(TopologyError::UnresolvedDependency {
                    node: id.to_string(),
                    missing: network.to_string(),
                });
            }
        }

        let mut nodes = vec![ResourceNode::new(id.clone(), ResourceType::PeeringLink)
            .with_param("vpc_id", a.network())
            .with_param("peer_vpc_id", b.network())
            .with_param("requester_cidr_block", *a.cidr())
            .with_param("accepter_cidr_block", *b.cidr())];

        let mut routes = Vec::new();
        for (local, remote) in [(a, b), (b, a)] {
            for table in local.private_route_tables() {
                let route = table.child(format!("to-{}", remote.name()));
                nodes.push(
                    ResourceNode::new(route.clone(), ResourceType::Route)
                        .owned_by(table)
                        .with_param("route_table_id", table)
                        .with_param("destination_cidr_block", *remote.cidr())
                        .with_param("vpc_peering_connection_id", &id),
                );
                routes.push(route);
            }
        }

        graph.register_all(nodes)?;
        self.links.insert(key, id.clone());

        info!(
            "Peered {} ({}) with {} ({}) using {} routes",
            a.name(),
            a.cidr(),
            b.name(),
            b.cidr(),
            routes.len()
        );

        Ok(PeeringLink {
            id,
            requester: a.name().clone(),
            accepter: b.name().clone(),
            requester_cidr: *a.cidr(),
            accepter_cidr: *b.cidr(),
            routes,
        })
    }

    /// Check whether two networks are linked, in either order
    pub fn is_peered(&self, a: &ResourceName, b: &ResourceName) -> bool {
        self.links.contains_key(&pair_key(a, b))
    }

    /// Number of links planned so far
    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

/// `peering/<a>.<b>`, unique per ordered pair of network names
fn link_id(a: &ResourceName, b: &ResourceName) -> NodeId {
    NodeId::new(PEERING_SCOPE).child(format!("{}{}{}", a, LINK_SEPARATOR, b))
}

fn pair_key(a: &ResourceName, b: &ResourceName) -> (ResourceName, ResourceName) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TopologyBuilder;
    use crate::config::{CompilerSettings, NatGatewayPolicy, NetworkConfig};
    use crate::graph::ParamValue;

    fn two_networks() -> (ResourceGraph, NetworkHandle, NetworkHandle) {
        let mut builder = TopologyBuilder::new(CompilerSettings::default());
        let core = builder
            .define_network(&NetworkConfig::new("core", "10.42.11.0/24"))
            .unwrap();
        let edge = builder
            .define_network(&NetworkConfig::new("edge", "10.7.11.0/24"))
            .unwrap();
        (builder.into_graph(), core, edge)
    }

    #[test]
    fn test_peer_adds_link_and_routes_both_ways() {
        let (mut graph, core, edge) = two_networks();
        let before = graph.len();
        let mut planner = PeeringPlanner::new();

        let link = planner.peer(&mut graph, &core, &edge).unwrap();

        assert_eq!(link.id().as_str(), "peering/core.edge");
        assert_eq!(link.routes().len(), 4);
        assert_eq!(graph.len(), before + 5);
        assert_eq!(graph.count_of(ResourceType::PeeringLink), 1);

        let route = graph
            .get(&NodeId::new("core/route-table/private-1/to-edge"))
            .unwrap();
        assert_eq!(
            route.param("destination_cidr_block"),
            Some(&ParamValue::from("10.7.11.0/24"))
        );
        assert_eq!(route.owner(), Some(&core.private_route_tables()[0]));

        let back = graph
            .get(&NodeId::new("edge/route-table/private-2/to-core"))
            .unwrap();
        assert_eq!(
            back.param("vpc_peering_connection_id"),
            Some(&ParamValue::Ref(link.id().clone()))
        );
        assert!(planner.is_peered(edge.name(), core.name()));
    }

    #[test]
    fn test_duplicate_in_either_order() {
        let (mut graph, core, edge) = two_networks();
        let mut planner = PeeringPlanner::new();
        planner.peer(&mut graph, &core, &edge).unwrap();
        let before = graph.len();

        for (a, b) in [(&core, &edge), (&edge, &core)] {
            assert!(matches!(
                planner.peer(&mut graph, a, b),
                Err(TopologyError::DuplicateLink { .. })
            ));
        }
        assert_eq!(graph.len(), before);
        assert_eq!(planner.link_count(), 1);
    }

    #[test]
    fn test_overlap_names_both_blocks() {
        let mut builder = TopologyBuilder::new(CompilerSettings::default());
        let wide = builder
            .define_network(&NetworkConfig::new("wide", "10.0.0.0/16"))
            .unwrap();
        let inner = builder
            .define_network(&NetworkConfig::new("inner", "10.0.4.0/24"))
            .unwrap();
        let mut graph = builder.into_graph();
        let before = graph.len();

        let err = PeeringPlanner::new()
            .peer(&mut graph, &wide, &inner)
            .unwrap_err();
        assert_eq!(
            err,
            TopologyError::Overlap {
                first: "10.0.0.0/16".into(),
                second: "10.0.4.0/24".into(),
            }
        );
        assert_eq!(graph.len(), before);
    }

    #[test]
    fn test_self_peering_is_an_overlap() {
        let (mut graph, core, _) = two_networks();
        assert!(matches!(
            PeeringPlanner::new().peer(&mut graph, &core, &core),
            Err(TopologyError::Overlap { .. })
        ));
    }

    #[test]
    fn test_network_missing_from_graph() {
        let (_, core, edge) = two_networks();
        let mut empty = ResourceGraph::new();

        assert_eq!(
            PeeringPlanner::new()
                .peer(&mut empty, &core, &edge)
                .unwrap_err(),
            TopologyError::UnresolvedDependency {
                node: "peering/core.edge".into(),
                missing: "core/network".into(),
            }
        );
        assert!(empty.is_empty());
    }

    #[test]
    fn test_hyphenated_names_get_distinct_links() {
        let mut builder = TopologyBuilder::new(CompilerSettings::default());
        let mut define = |name: &str, cidr: &str| {
            builder
                .define_network(&NetworkConfig::new(name, cidr).with_max_azs(1))
                .unwrap()
        };
        let a_b = define("a--b", "10.1.0.0/16");
        let c = define("c", "10.2.0.0/16");
        let a = define("a", "10.3.0.0/16");
        let b_c = define("b--c", "10.4.0.0/16");
        let mut graph = builder.into_graph();
        let mut planner = PeeringPlanner::new();

        let first = planner.peer(&mut graph, &a_b, &c).unwrap();
        let second = planner.peer(&mut graph, &a, &b_c).unwrap();

        assert_eq!(first.id().as_str(), "peering/a--b.c");
        assert_eq!(second.id().as_str(), "peering/a.b--c");
        assert_eq!(graph.count_of(ResourceType::PeeringLink), 2);
        assert_eq!(planner.link_count(), 2);
    }

    #[test]
    fn test_routes_follow_private_route_tables() {
        let mut builder = TopologyBuilder::new(CompilerSettings::default());
        let one = builder
            .define_network(
                &NetworkConfig::new("one", "10.1.0.0/16")
                    .with_max_azs(1)
                    .with_nat_gateways(NatGatewayPolicy::Single),
            )
            .unwrap();
        let two = builder
            .define_network(&NetworkConfig::new("two", "10.2.0.0/16"))
            .unwrap();
        let mut graph = builder.into_graph();

        let link = PeeringPlanner::new().peer(&mut graph, &one, &two).unwrap();
        assert_eq!(link.routes().len(), 1 + 2);
        assert_eq!(link.routes()[0].as_str(), "one/route-table/private-1/to-two");
    }
}
