// Copyright (c) 2025 - Cowboy AI, Inc.
//! Plan Emitter
//!
//! Orders a finished resource graph into a [`Plan`].
//!
//! The order is a topological sort (Kahn) where, among the nodes whose
//! dependencies are all placed, the one with the lowest `(tier, registration
//! index)` goes next. Given the same graph the plan is always the same.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, info};

use crate::errors::TopologyResult;
use crate::graph::{NodeId, ResourceGraph};
use crate::resolver::ReferenceResolver;

use super::Plan;

/// Emits plans, optionally overriding derived identifiers with ones the
/// backend already assigned
#[derive(Debug, Clone, Default)]
pub struct PlanEmitter {
    bindings: Vec<(NodeId, String)>,
}

impl PlanEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `backend_id` as the concrete identifier of `id`
    pub fn bind(mut self, id: NodeId, backend_id: impl Into<String>) -> Self {
        self.bindings.push((id, backend_id.into()));
        self
    }

    /// Consume a graph and produce its plan
    ///
    /// # Errors
    /// - `CyclicReference` naming the nodes of the first cycle found
    /// - `UnresolvedDependency` for the first reference to an unknown node,
    ///   or a binding for an unknown node
    pub fn emit(&self, graph: ResourceGraph) -> TopologyResult<Plan> {
        let mut resolver = ReferenceResolver::new(&graph)?;
        resolver.verify()?;

        for (id, backend_id) in &self.bindings {
            resolver.bind(id, backend_id.clone())?;
        }

        let order = stable_order(&graph, &resolver);
        debug_assert_eq!(order.len(), graph.len());

        let cross_network = order
            .iter()
            .filter(|&&i| graph.nodes()[i].resource_type().is_cross_network())
            .count();
        debug!(bindings = self.bindings.len(), "Resolved plan references");
        info!(
            "Emitted plan with {} operations ({} cross-network)",
            order.len(),
            cross_network
        );

        Ok(Plan::new(graph, resolver, order))
    }
}

/// Topological order with `(tier, registration index)` as tie-breaker
fn stable_order(graph: &ResourceGraph, resolver: &ReferenceResolver) -> Vec<usize> {
    let nodes = graph.nodes();
    let dependents = resolver.dependent_indices();
    let mut remaining: Vec<usize> = resolver
        .dependency_indices()
        .iter()
        .map(Vec::len)
        .collect();

    let key = |i: usize| Reverse((nodes[i].resource_type().tier(), i));
    let mut ready: BinaryHeap<Reverse<(u8, usize)>> = remaining
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == 0)
        .map(|(i, _)| key(i))
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(Reverse((_, i))) = ready.pop() {
        order.push(i);
        for &dependent in &dependents[i] {
            remaining[dependent] -= 1;
            if remaining[dependent] == 0 {
                ready.push(key(dependent));
            }
        }
    }

    order
}
