// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Graph
//!
//! The shared, append-only collection of [`ResourceNode`]s built up by the
//! topology builder and the peering planner. Registration order is kept and
//! is the tie-breaker for deterministic plan emission.
//!
//! Registration is atomic per batch: either every node of a batch is added
//! or, on the first conflict, none is.

pub mod node;

pub use node::{NodeId, ParamValue, ResourceNode};

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::domain::ResourceType;
use crate::errors::{TopologyError, TopologyResult};

/// Resource graph in registration order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceGraph {
    nodes: Vec<ResourceNode>,
    #[serde(skip)]
    index: HashMap<NodeId, usize>,
}

impl ResourceGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single node
    pub fn register(&mut self, node: ResourceNode) -> TopologyResult<()> {
        self.register_all(vec![node]).map(|_| ())
    }

    /// Register a batch of nodes atomically
    ///
    /// Fails with a configuration error, adding nothing, if any id in the
    /// batch is already registered or repeated within the batch. References
    /// are not checked here; forward references are resolved at emission.
    pub fn register_all(&mut self, nodes: Vec<ResourceNode>) -> TopologyResult<usize> {
        let mut batch: HashSet<&NodeId> = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if self.index.contains_key(node.id()) || !batch.insert(node.id()) {
                return Err(TopologyError::Configuration(format!(
                    "resource {} is already registered",
                    node.id()
                )));
            }
        }

        let count = nodes.len();
        for node in nodes {
            self.index.insert(node.id().clone(), self.nodes.len());
            self.nodes.push(node);
        }
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<&ResourceNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Registration index of a node
    pub fn position(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Nodes in registration order
    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter()
    }

    /// Nodes of one type, in registration order
    pub fn nodes_of_type(&self, resource_type: ResourceType) -> impl Iterator<Item = &ResourceNode> {
        self.nodes
            .iter()
            .filter(move |n| n.resource_type() == resource_type)
    }

    pub fn count_of(&self, resource_type: ResourceType) -> usize {
        self.nodes_of_type(resource_type).count()
    }

    /// Direct children of a node in the ownership tree
    pub fn owned_by<'a>(&'a self, owner: &'a NodeId) -> impl Iterator<Item = &'a ResourceNode> + 'a {
        self.nodes.iter().filter(move |n| n.owner() == Some(owner))
    }
}
