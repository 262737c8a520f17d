// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Peering and Definition Atomicity

use cim_topology::{
    CompilerSettings, NetworkConfig, RegionInventory, ResourceType, TopologyBuilder,
    TopologyError,
};
use proptest::prelude::*;

fn settings(zones: usize) -> CompilerSettings {
    CompilerSettings {
        inventory: RegionInventory::new("test-1", (0..zones).map(|z| format!("test-1-az{}", z))),
    }
}

proptest! {
    /// Property: peering adds exactly 2P routes and one link, where P is
    /// the private subnet count per network
    #[test]
    fn prop_peering_adds_two_p_routes(
        zones in 1usize..=5,
        a in 0u8..=127,
        b in 128u8..=255,
    ) {
        let mut builder = TopologyBuilder::new(settings(zones));
        let first = builder
            .define_network(&NetworkConfig::new("first", format!("10.{}.0.0/16", a)))
            .unwrap();
        let second = builder
            .define_network(&NetworkConfig::new("second", format!("10.{}.0.0/16", b)))
            .unwrap();
        let before = builder.graph().len();

        builder.peer(&first, &second).unwrap();

        let p = first.private_subnets().len();
        prop_assert_eq!(p, zones);
        prop_assert_eq!(builder.graph().count_of(ResourceType::Route), 2 * p);
        prop_assert_eq!(builder.graph().count_of(ResourceType::PeeringLink), 1);
        prop_assert_eq!(builder.graph().len(), before + 2 * p + 1);
    }

    /// Property: overlapping networks never peer and add nothing
    #[test]
    fn prop_overlap_always_rejected(
        outer in 8u8..=16,
        inner in 17u8..=24,
        third_octet in any::<u8>(),
        reversed in any::<bool>(),
    ) {
        let mut builder = TopologyBuilder::new(settings(2));
        let wide = builder
            .define_network(&NetworkConfig::new("wide", format!("10.0.0.0/{}", outer)))
            .unwrap();
        // Host bits beyond the inner prefix are zero
        let block = u32::from(third_octet) << 8 & (u32::MAX << (32 - inner));
        let narrow = builder
            .define_network(&NetworkConfig::new(
                "narrow",
                format!("10.0.{}.0/{}", block >> 8 & 0xff, inner),
            ))
            .unwrap();
        let before = builder.graph().len();

        let result = if reversed {
            builder.peer(&narrow, &wide)
        } else {
            builder.peer(&wide, &narrow)
        };

        let is_overlap = matches!(result, Err(TopologyError::Overlap { .. }));
        prop_assert!(is_overlap);
        prop_assert_eq!(builder.graph().len(), before);
    }

    /// Property: a pair is the same pair in either argument order
    #[test]
    fn prop_reversed_peering_is_duplicate(reverse_first in any::<bool>()) {
        let mut builder = TopologyBuilder::new(settings(2));
        let a = builder.define_network(&NetworkConfig::new("a", "10.1.0.0/16")).unwrap();
        let b = builder.define_network(&NetworkConfig::new("b", "10.2.0.0/16")).unwrap();

        let (x, y) = if reverse_first { (&b, &a) } else { (&a, &b) };
        builder.peer(x, y).unwrap();
        let before = builder.graph().len();

        let is_duplicate = matches!(builder.peer(y, x), Err(TopologyError::DuplicateLink { .. }));
        prop_assert!(is_duplicate);
        prop_assert_eq!(builder.graph().len(), before);
    }

    /// Property: capacity bounds out of order fail and add no nodes
    #[test]
    fn prop_invalid_capacity_adds_nothing(
        min in 1u32..100,
        desired in 1u32..100,
        max in 1u32..100,
    ) {
        prop_assume!(!(min <= desired && desired <= max));

        let mut builder = TopologyBuilder::new(settings(2));
        let result = builder.define_network(
            &NetworkConfig::new("core", "10.42.11.0/24").with_capacity(min, desired, max),
        );

        let is_configuration = matches!(result, Err(TopologyError::Configuration(_)));
        prop_assert!(is_configuration);
        prop_assert!(builder.graph().is_empty());
        prop_assert!(builder.take_uncommitted_events().is_empty());
    }
}
