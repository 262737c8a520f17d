// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Domain Models
//!
//! Value objects and pure invariants shared by the builder, the peering
//! planner and the plan emitter.
//!
//! # Value Objects with Invariants
//!
//! - [`CidrBlock`] - IPv4 address space with overlap checks and subnet carving
//! - [`ResourceName`] - DNS-label names identifying a topology unit
//! - [`ResourceType`] - resource taxonomy with emission tiers

pub mod invariants;
pub mod name;
pub mod network;
pub mod resource_type;

pub use invariants::{ValidationError, ValidationResult};
pub use name::{NameError, ResourceName};
pub use network::{CidrBlock, NetworkError};
pub use resource_type::{ResourceType, UnknownResourceType};
