// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Construction Events
//!
//! The builder records one event per successful construction call. Events
//! are facts about the graph, named in past tense, carrying the builder's
//! correlation id so a whole compilation can be traced. Failed calls record
//! nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::graph::NodeId;

/// Current schema version of topology events
pub const EVENT_VERSION: u32 = 1;

/// Topology construction events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TopologyEvent {
    /// A network and its derived resources were registered
    NetworkDefined(NetworkDefined),

    /// Two networks were linked by a peering link and routes
    NetworksPeered(NetworksPeered),
}

impl TopologyEvent {
    pub fn event_id(&self) -> Uuid {
        match self {
            Self::NetworkDefined(e) => e.event_id,
            Self::NetworksPeered(e) => e.event_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::NetworkDefined(e) => e.timestamp,
            Self::NetworksPeered(e) => e.timestamp,
        }
    }

    pub fn correlation_id(&self) -> Uuid {
        match self {
            Self::NetworkDefined(e) => e.correlation_id,
            Self::NetworksPeered(e) => e.correlation_id,
        }
    }

    /// Event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::NetworkDefined(_) => "network_defined",
            Self::NetworksPeered(_) => "networks_peered",
        }
    }
}

/// A network definition was accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDefined {
    /// Event version for schema evolution
    pub event_version: u32,

    /// Unique event identifier (UUID v7 for time ordering)
    pub event_id: Uuid,

    /// When this event occurred
    pub timestamp: DateTime<Utc>,

    /// Correlation ID of the compilation
    pub correlation_id: Uuid,

    pub network: String,
    pub cidr: String,

    /// Zones actually spanned after clamping
    pub availability_zones: usize,

    /// Nodes registered by the definition
    pub node_count: usize,
}

impl NetworkDefined {
    pub fn new(
        correlation_id: Uuid,
        network: impl Into<String>,
        cidr: impl Into<String>,
        availability_zones: usize,
        node_count: usize,
    ) -> Self {
        Self {
            event_version: EVENT_VERSION,
            event_id: Uuid::now_v7(),
            timestamp: Utc::now(),
            correlation_id,
            network: network.into(),
            cidr: cidr.into(),
            availability_zones,
            node_count,
        }
    }
}

/// Two networks were peered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworksPeered {
    pub event_version: u32,
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Uuid,

    pub requester: String,
    pub accepter: String,

    /// Peering link node
    pub link: NodeId,

    /// Routes added on both sides
    pub route_count: usize,
}

impl NetworksPeered {
    pub fn new(
        correlation_id: Uuid,
        requester: impl Into<String>,
        accepter: impl Into<String>,
        link: NodeId,
        route_count: usize,
    ) -> Self {
        Self {
            event_version: EVENT_VERSION,
            event_id: Uuid::now_v7(),
            timestamp: Utc::now(),
            correlation_id,
            requester: requester.into(),
            accepter: accepter.into(),
            link,
            route_count,
        }
    }
}
