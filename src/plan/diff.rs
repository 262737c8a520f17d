// Copyright (c) 2025 - Cowboy AI, Inc.
//! Plan diffing against a previously applied operation list
//!
//! Resources are matched by concrete identifier. Because identifiers are
//! derived from logical ids, re-compiling an unchanged topology matches every
//! resource.

use std::collections::{HashMap, HashSet};

use crate::resolver::ConcreteId;

use super::{OpType, Operation};

/// Changes that take `previous` to `current`
///
/// - new resources as `Create`, in `current` order
/// - resources whose type or parameters changed as `Update`, in `current`
///   order
/// - resources no longer present as `Delete`, in reverse `previous` order
///
/// Deletes in `previous` are ignored; those resources are already gone.
pub fn diff_operations<I>(current: I, previous: &[Operation]) -> Vec<Operation>
where
    I: IntoIterator<Item = Operation>,
{
    let applied: HashMap<&ConcreteId, &Operation> = previous
        .iter()
        .filter(|op| op.op_type != OpType::Delete)
        .map(|op| (&op.resource_id, op))
        .collect();

    let mut seen: HashSet<ConcreteId> = HashSet::new();
    let mut changes = Vec::new();

    for op in current {
        seen.insert(op.resource_id.clone());
        match applied.get(&op.resource_id) {
            None => changes.push(op.with_op_type(OpType::Create)),
            Some(old) if old.resource_type != op.resource_type || old.parameters != op.parameters => {
                changes.push(op.with_op_type(OpType::Update))
            }
            Some(_) => {}
        }
    }

    changes.extend(
        previous
            .iter()
            .rev()
            .filter(|op| op.op_type != OpType::Delete && !seen.contains(&op.resource_id))
            .map(Operation::to_delete),
    );

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TopologyBuilder;
    use crate::config::{CompilerSettings, NetworkConfig};
    use crate::domain::ResourceType;
    use crate::plan::Plan;

    fn compile(configs: &[NetworkConfig]) -> Plan {
        let mut builder = TopologyBuilder::new(CompilerSettings::default());
        for config in configs {
            builder.define_network(config).unwrap();
        }
        builder.emit().unwrap()
    }

    #[test]
    fn test_unchanged_topology_has_no_changes() {
        let config = NetworkConfig::new("core", "10.42.11.0/24");
        let previous: Vec<Operation> = compile(&[config.clone()]).operations().collect();

        assert!(compile(&[config]).diff(&previous).is_empty());
    }

    #[test]
    fn test_empty_previous_creates_everything() {
        let plan = compile(&[NetworkConfig::new("core", "10.42.11.0/24")]);
        let changes = plan.diff(&[]);

        assert_eq!(changes.len(), plan.len());
        assert!(changes.iter().all(|op| op.op_type == OpType::Create));
    }

    #[test]
    fn test_changed_capacity_is_an_update() {
        let previous: Vec<Operation> = compile(&[NetworkConfig::new("core", "10.42.11.0/24")])
            .operations()
            .collect();
        let plan = compile(&[NetworkConfig::new("core", "10.42.11.0/24").with_capacity(2, 3, 5)]);

        let changes = plan.diff(&previous);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].op_type, OpType::Update);
        assert_eq!(changes[0].resource_type, ResourceType::ScalingGroup);
        assert_eq!(changes[0].parameters["desired_capacity"], 3);
    }

    #[test]
    fn test_removed_network_is_deleted_in_reverse() {
        let previous: Vec<Operation> = compile(&[
            NetworkConfig::new("core", "10.42.11.0/24"),
            NetworkConfig::new("edge", "10.7.11.0/24"),
        ])
        .operations()
        .collect();
        let plan = compile(&[NetworkConfig::new("core", "10.42.11.0/24")]);

        let changes = plan.diff(&previous);
        assert_eq!(changes.len(), 25);
        assert!(changes
            .iter()
            .all(|op| op.op_type == OpType::Delete && op.logical_id.scope() == "edge"));
        assert_eq!(changes.last().unwrap().resource_type, ResourceType::Network);
    }
}
