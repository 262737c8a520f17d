// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for topology construction and plan emission

use thiserror::Error;

use crate::domain::{NameError, NetworkError, ValidationError};

/// Errors raised while building, linking or emitting a topology
///
/// Every error is raised synchronously by the call that detects it. A failed
/// call leaves the resource graph exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// Invalid input to the topology builder (bounds, malformed CIDR, names)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Two networks to be peered share address space
    #[error("CIDR overlap: {first} overlaps {second}")]
    Overlap { first: String, second: String },

    /// The unordered network pair is already linked
    #[error("Networks {first} and {second} are already peered")]
    DuplicateLink { first: String, second: String },

    /// The resource graph contains a reference cycle
    #[error("Cyclic reference: {}", cycle.join(" -> "))]
    CyclicReference { cycle: Vec<String> },

    /// A node references an identity that is not registered
    #[error("Unresolved dependency: {node} references unknown {missing}")]
    UnresolvedDependency { node: String, missing: String },
}

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;

impl From<NetworkError> for TopologyError {
    fn from(err: NetworkError) -> Self {
        TopologyError::Configuration(err.to_string())
    }
}

impl From<NameError> for TopologyError {
    fn from(err: NameError) -> Self {
        TopologyError::Configuration(err.to_string())
    }
}

impl From<ValidationError> for TopologyError {
    fn from(err: ValidationError) -> Self {
        TopologyError::Configuration(err.to_string())
    }
}

impl From<serde_json::Error> for TopologyError {
    fn from(err: serde_json::Error) -> Self {
        TopologyError::Configuration(format!("invalid manifest: {}", err))
    }
}
