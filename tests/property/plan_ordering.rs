// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Plan Emission
//!
//! For arbitrary valid network definitions the emitted plan must respect
//! every dependency edge and the tier grouping, be reproducible, and tear
//! down in exact reverse.

use cim_topology::{
    CompilerSettings, NatGatewayPolicy, NetworkConfig, NodeId, Operation, RegionInventory,
    TopologyBuilder,
};
use proptest::prelude::*;
use std::collections::HashMap;

// ============================================================================
// Strategies
// ============================================================================

fn arb_settings() -> impl Strategy<Value = CompilerSettings> {
    (1usize..=4).prop_map(|zones| CompilerSettings {
        inventory: RegionInventory::new(
            "test-1",
            (0..zones).map(|z| format!("test-1{}", (b'a' + z as u8) as char)),
        ),
    })
}

fn arb_nat_policy() -> impl Strategy<Value = NatGatewayPolicy> {
    prop_oneof![
        Just(NatGatewayPolicy::None),
        Just(NatGatewayPolicy::Single),
        Just(NatGatewayPolicy::PerAz),
    ]
}

/// Valid capacity bounds `min <= desired <= max`
fn arb_capacity() -> impl Strategy<Value = (u32, u32, u32)> {
    (1u32..10, 0u32..10, 0u32..10).prop_map(|(min, d, m)| (min, min + d, min + d + m))
}

/// Network `index` gets `10.<index>.0.0/<prefix>`, disjoint from the others
fn arb_network(index: u8) -> impl Strategy<Value = NetworkConfig> {
    (
        16u8..=24,
        1u32..=6,
        arb_nat_policy(),
        arb_capacity(),
        0u8..=100,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            move |(prefix, azs, nat, (min, desired, max), cpu, flow_logs, internet_facing)| {
                let mut config = NetworkConfig::new(format!("net-{}", index), format!("10.{}.0.0/{}", index, prefix))
                    .with_max_azs(azs)
                    .with_nat_gateways(nat)
                    .with_capacity(min, desired, max)
                    .with_scale_on_cpu(cpu);
                if !flow_logs {
                    config = config.without_flow_logs();
                }
                if !internet_facing {
                    config = config.internal();
                }
                config
            },
        )
}

fn arb_networks() -> impl Strategy<Value = Vec<NetworkConfig>> {
    (1u8..=4).prop_flat_map(|count| (0..count).map(arb_network).collect::<Vec<_>>())
}

/// Build every network, then peer each consecutive pair
fn build(settings: CompilerSettings, configs: &[NetworkConfig]) -> TopologyBuilder {
    let mut builder = TopologyBuilder::new(settings);
    let handles: Vec<_> = configs
        .iter()
        .map(|c| builder.define_network(c).unwrap())
        .collect();
    for pair in handles.windows(2) {
        builder.peer(&pair[0], &pair[1]).unwrap();
    }
    builder
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: every node is emitted after everything it depends on
    #[test]
    fn prop_dependencies_are_emitted_first(
        settings in arb_settings(),
        configs in arb_networks(),
    ) {
        let plan = build(settings, &configs).emit().unwrap();

        let position: HashMap<&NodeId, usize> = plan
            .logical_order()
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();

        prop_assert_eq!(position.len(), plan.graph().len());
        for node in plan.graph().iter() {
            for dep in node.dependencies() {
                prop_assert!(
                    position[dep] < position[node.id()],
                    "{} emitted before its dependency {}",
                    node.id(),
                    dep
                );
            }
        }
    }

    /// Property: resources are grouped by tier across all networks, so
    /// e.g. every subnet of every network precedes any route table
    #[test]
    fn prop_tiers_never_decrease(
        settings in arb_settings(),
        configs in arb_networks(),
    ) {
        let plan = build(settings, &configs).emit().unwrap();

        let tiers: Vec<u8> = plan
            .logical_order()
            .into_iter()
            .map(|id| plan.graph().get(id).unwrap().resource_type().tier())
            .collect();

        for (i, pair) in tiers.windows(2).enumerate() {
            prop_assert!(
                pair[0] <= pair[1],
                "tier drops from {} to {} at position {}",
                pair[0],
                pair[1],
                i + 1
            );
        }
    }

    /// Property: compiling the same input twice yields the same plan
    #[test]
    fn prop_emission_is_reproducible(
        settings in arb_settings(),
        configs in arb_networks(),
    ) {
        let first: Vec<Operation> = build(settings.clone(), &configs).emit().unwrap().operations().collect();
        let second: Vec<Operation> = build(settings, &configs).emit().unwrap().operations().collect();
        prop_assert_eq!(first, second);
    }

    /// Property: teardown is the exact reverse of creation
    #[test]
    fn prop_teardown_reverses_creation(
        settings in arb_settings(),
        configs in arb_networks(),
    ) {
        let plan = build(settings, &configs).emit().unwrap();

        let mut created: Vec<_> = plan.operations().map(|op| op.resource_id).collect();
        created.reverse();
        let deleted: Vec<_> = plan.teardown().map(|op| op.resource_id).collect();
        prop_assert_eq!(created, deleted);
    }

    /// Property: a plan diffed against itself is empty
    #[test]
    fn prop_self_diff_is_empty(
        settings in arb_settings(),
        configs in arb_networks(),
    ) {
        let plan = build(settings, &configs).emit().unwrap();
        let applied: Vec<Operation> = plan.operations().collect();
        prop_assert!(plan.diff(&applied).is_empty());
    }
}
