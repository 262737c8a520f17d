// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reference Resolver
//!
//! Turns the symbolic references between nodes into concrete identifiers and
//! into the dependency edges the plan emitter orders by.
//!
//! Concrete identifiers are derived deterministically from the logical node
//! id (`<prefix>-<17 hex>` from a UUIDv5), so the same topology always yields
//! the same identifiers. Identifiers the backend assigns later can be bound
//! over the derived ones with [`ReferenceResolver::bind`].
//!
//! Construction rejects reference cycles. Ownership in a topology is a tree
//! and cross-network nodes are added only after both networks exist, so a
//! cycle means the graph was assembled by hand incorrectly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{TopologyError, TopologyResult};
use crate::graph::{NodeId, ResourceGraph, ResourceNode};

/// Namespace for deriving concrete identifiers from node ids
const CONCRETE_ID_NAMESPACE: Uuid = Uuid::from_u128(0x3c1d_7a52_9e04_4b6f_a8d2_51f0_c6e3_9b17);

/// Hex characters kept from the derived UUID
const CONCRETE_ID_LEN: usize = 17;

/// Concrete identifier handed to the provisioning backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConcreteId(String);

impl ConcreteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Deterministic identifier for a node
    pub fn derive(node: &ResourceNode) -> Self {
        let uuid = Uuid::new_v5(&CONCRETE_ID_NAMESPACE, node.id().as_str().as_bytes());
        let hex = uuid.simple().to_string();
        Self(format!(
            "{}-{}",
            node.resource_type().id_prefix(),
            &hex[..CONCRETE_ID_LEN]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConcreteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolver over one resource graph snapshot
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    /// Node ids in registration order
    order: Vec<NodeId>,
    positions: HashMap<NodeId, usize>,
    /// Resolvable dependencies per node (registration indices)
    dependencies: Vec<Vec<usize>>,
    dependents: Vec<Vec<usize>>,
    /// First dangling reference per node, if any
    dangling: Vec<Option<NodeId>>,
    derived: Vec<ConcreteId>,
    bound: HashMap<usize, ConcreteId>,
}

impl ReferenceResolver {
    /// Index the graph and check it for reference cycles
    pub fn new(graph: &ResourceGraph) -> TopologyResult<Self> {
        let order: Vec<NodeId> = graph.iter().map(|n| n.id().clone()).collect();
        let positions: HashMap<NodeId, usize> = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut dependencies = vec![Vec::new(); order.len()];
        let mut dependents = vec![Vec::new(); order.len()];
        let mut dangling = vec![None; order.len()];

        for (i, node) in graph.iter().enumerate() {
            for dep in node.dependencies() {
                match positions.get(dep) {
                    Some(&d) => {
                        dependencies[i].push(d);
                        dependents[d].push(i);
                    }
                    None => {
                        if dangling[i].is_none() {
                            dangling[i] = Some(dep.clone());
                        }
                    }
                }
            }
        }

        if let Some(cycle) = find_cycle(&dependencies) {
            return Err(TopologyError::CyclicReference {
                cycle: cycle.into_iter().map(|i| order[i].to_string()).collect(),
            });
        }

        let derived = graph.iter().map(ConcreteId::derive).collect();

        debug!(nodes = order.len(), "Indexed resource graph references");

        Ok(Self {
            order,
            positions,
            dependencies,
            dependents,
            dangling,
            derived,
            bound: HashMap::new(),
        })
    }

    /// Record a backend-assigned identifier for a node
    ///
    /// # Errors
    /// `UnresolvedDependency` from `binding <backend_id>` if `id` is not in
    /// the graph.
    pub fn bind(&mut self, id: &NodeId, backend_id: impl Into<String>) -> TopologyResult<()> {
        let backend_id = backend_id.into();
        let Some(&position) = self.positions.get(id) else {
            return Err(TopologyError::UnresolvedDependency {
                node: format!("binding {}", backend_id),
                missing: id.to_string(),
            });
        };
        self.bound.insert(position, ConcreteId::new(backend_id));
        Ok(())
    }

    /// Concrete identifier of a registered node, if any
    pub fn lookup(&self, id: &NodeId) -> Option<&ConcreteId> {
        self.positions.get(id).map(|&i| self.concrete_at(i))
    }

    /// Resolve a reference held by `from` to its concrete identifier
    pub fn resolve(&self, from: &NodeId, target: &NodeId) -> TopologyResult<&ConcreteId> {
        self.lookup(target)
            .ok_or_else(|| TopologyError::UnresolvedDependency {
                node: from.to_string(),
                missing: target.to_string(),
            })
    }

    /// Check that every reference in the graph resolves
    ///
    /// Reports the first dangling reference in registration order.
    pub fn verify(&self) -> TopologyResult<()> {
        for (i, missing) in self.dangling.iter().enumerate() {
            if let Some(missing) = missing {
                return Err(TopologyError::UnresolvedDependency {
                    node: self.order[i].to_string(),
                    missing: missing.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Render a node's parameters with every reference resolved
    pub fn resolve_parameters(&self, node: &ResourceNode) -> TopologyResult<Map<String, Value>> {
        for dep in node.dependencies() {
            self.resolve(node.id(), dep)?;
        }
        Ok(self.render_parameters(node))
    }

    /// Render parameters without checking; unknown references become `null`
    pub(crate) fn render_parameters(&self, node: &ResourceNode) -> Map<String, Value> {
        let lookup = |id: &NodeId| self.lookup(id).map(|c| c.to_string());
        node.parameters()
            .iter()
            .map(|(k, v)| (k.clone(), v.resolve(&lookup)))
            .collect()
    }

    /// Direct dependencies of a registered node
    pub fn dependencies(&self, id: &NodeId) -> Option<Vec<&NodeId>> {
        let i = *self.positions.get(id)?;
        Some(self.dependencies[i].iter().map(|&d| &self.order[d]).collect())
    }

    /// Nodes that directly depend on a registered node
    pub fn dependents(&self, id: &NodeId) -> Option<Vec<&NodeId>> {
        let i = *self.positions.get(id)?;
        Some(self.dependents[i].iter().map(|&d| &self.order[d]).collect())
    }

    pub(crate) fn dependency_indices(&self) -> &[Vec<usize>] {
        &self.dependencies
    }

    pub(crate) fn dependent_indices(&self) -> &[Vec<usize>] {
        &self.dependents
    }

    pub(crate) fn concrete_at(&self, position: usize) -> &ConcreteId {
        self.bound
            .get(&position)
            .unwrap_or(&self.derived[position])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// First cycle found by depth-first search in registration order, as a
/// closed path `[a, b, ..., a]`
///
/// The search keeps its own stack of `(node, next dependency)` frames so a
/// long dependency chain cannot exhaust the thread stack.
fn find_cycle(dependencies: &[Vec<usize>]) -> Option<Vec<usize>> {
    let mut marks = vec![Mark::Unvisited; dependencies.len()];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..dependencies.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::OnPath;
        stack.push((start, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let Some(&dep) = dependencies[node].get(next) else {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match marks[dep] {
                Mark::OnPath => {
                    let from = stack.iter().position(|&(n, _)| n == dep).unwrap_or(0);
                    let mut cycle: Vec<usize> = stack[from..].iter().map(|&(n, _)| n).collect();
                    cycle.push(dep);
                    return Some(cycle);
                }
                Mark::Unvisited => {
                    marks[dep] = Mark::OnPath;
                    stack.push((dep, 0));
                }
                Mark::Done => {}
            }
        }
    }
    None
}
