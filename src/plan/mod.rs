// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Plan
//!
//! A [`Plan`] is the frozen result of emission: the resource graph, its
//! resolved references and one stable creation order. Operations are
//! produced on demand from that snapshot, so iterating twice yields the same
//! sequence and a plan can be replayed against a backend any number of
//! times.
//!
//! ```text
//! ResourceGraph ──> PlanEmitter::emit ──> Plan ──operations()──> Operation*
//!                                          ├──teardown()──> Delete*  (reverse order)
//!                                          └──diff(prev)──> Create/Update/Delete
//! ```

pub mod diff;
pub mod emitter;

pub use diff::diff_operations;
pub use emitter::PlanEmitter;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::iter::FusedIterator;

use crate::domain::ResourceType;
use crate::errors::TopologyResult;
use crate::graph::{NodeId, ResourceGraph};
use crate::resolver::{ConcreteId, ReferenceResolver};

/// Kind of change an operation asks the backend for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpType {
    Create,
    Update,
    Delete,
}

/// One ordered instruction for the provisioning backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub op_type: OpType,
    pub resource_type: ResourceType,

    /// Resource type name understood by the backend
    pub backend_type: String,

    /// Concrete identifier of the resource
    pub resource_id: ConcreteId,

    /// Logical node the resource was planned from
    pub logical_id: NodeId,

    /// Parameters with every reference resolved to a concrete identifier
    pub parameters: Map<String, Value>,
}

impl Operation {
    /// Same resource, different kind of change
    pub fn with_op_type(mut self, op_type: OpType) -> Self {
        self.op_type = op_type;
        self
    }

    /// Delete instruction for this resource
    ///
    /// A delete carries only the identity of the resource.
    pub fn to_delete(&self) -> Self {
        Self {
            op_type: OpType::Delete,
            resource_type: self.resource_type,
            backend_type: self.backend_type.clone(),
            resource_id: self.resource_id.clone(),
            logical_id: self.logical_id.clone(),
            parameters: Map::new(),
        }
    }
}

/// Immutable provisioning plan
#[derive(Debug, Clone)]
pub struct Plan {
    graph: ResourceGraph,
    resolver: ReferenceResolver,
    /// Registration indices in emission order
    order: Vec<usize>,
}

impl Plan {
    pub(crate) fn new(graph: ResourceGraph, resolver: ReferenceResolver, order: Vec<usize>) -> Self {
        Self {
            graph,
            resolver,
            order,
        }
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Creation operations in dependency order
    ///
    /// Restartable: every call starts again at the first operation.
    pub fn operations(&self) -> Operations<'_> {
        Operations {
            plan: self,
            front: 0,
            back: self.order.len(),
        }
    }

    /// Delete operations in reverse creation order
    pub fn teardown(&self) -> impl Iterator<Item = Operation> + '_ {
        self.operations().rev().map(|op| op.to_delete())
    }

    /// Operations that turn a previously applied operation list into this
    /// plan
    pub fn diff(&self, previous: &[Operation]) -> Vec<Operation> {
        diff_operations(self.operations(), previous)
    }

    /// Logical ids in emission order
    pub fn logical_order(&self) -> Vec<&NodeId> {
        self.order
            .iter()
            .map(|&i| self.graph.nodes()[i].id())
            .collect()
    }

    /// Position of a node's operation in the plan
    pub fn position_of(&self, id: &NodeId) -> Option<usize> {
        let registered = self.graph.position(id)?;
        self.order.iter().position(|&i| i == registered)
    }

    /// Number of operations creating resources of one type
    pub fn count_of(&self, resource_type: ResourceType) -> usize {
        self.graph.count_of(resource_type)
    }

    /// Graph the plan was emitted from
    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    pub fn resolver(&self) -> &ReferenceResolver {
        &self.resolver
    }

    /// Serialize the creation operations as a pretty JSON array
    pub fn to_json(&self) -> TopologyResult<String> {
        let operations: Vec<Operation> = self.operations().collect();
        Ok(serde_json::to_string_pretty(&operations)?)
    }

    fn operation_at(&self, step: usize) -> Operation {
        let position = self.order[step];
        let node = &self.graph.nodes()[position];
        let resource_type = node.resource_type();

        Operation {
            op_type: OpType::Create,
            resource_type,
            backend_type: resource_type.backend_type().to_string(),
            resource_id: self.resolver.concrete_at(position).clone(),
            logical_id: node.id().clone(),
            parameters: self.resolver.render_parameters(node),
        }
    }
}

/// Lazy iterator over a plan's creation operations
#[derive(Debug, Clone)]
pub struct Operations<'a> {
    plan: &'a Plan,
    front: usize,
    back: usize,
}

impl Iterator for Operations<'_> {
    type Item = Operation;

    fn next(&mut self) -> Option<Operation> {
        if self.front == self.back {
            return None;
        }
        let op = self.plan.operation_at(self.front);
        self.front += 1;
        Some(op)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Operations<'_> {
    fn next_back(&mut self) -> Option<Operation> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.plan.operation_at(self.back))
    }
}

impl ExactSizeIterator for Operations<'_> {}

impl FusedIterator for Operations<'_> {}
