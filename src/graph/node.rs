// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Node Model
//!
//! A [`ResourceNode`] is the immutable description of one infrastructure
//! object: its logical identity, its type, its owner and its parameters.
//! Parameters may hold symbolic references ([`ParamValue::Ref`]) to other
//! nodes; those references are the edges of the resource graph and are only
//! turned into concrete identifiers at emission time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{CidrBlock, ResourceType};

/// Logical identity of a node, e.g. `core/subnet/private-1`
///
/// The first segment names the topology unit that produced the node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node id from its full path
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Extend this id with one more path segment
    pub fn child(&self, segment: impl fmt::Display) -> Self {
        Self(format!("{}/{}", self.0, segment))
    }

    /// First path segment (the owning topology unit)
    pub fn scope(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Parameter value of a resource node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    /// Literal text
    Text(String),
    /// Literal integer
    Integer(i64),
    /// Literal flag
    Bool(bool),
    /// Ordered list
    List(Vec<ParamValue>),
    /// Symbolic reference to another node's identifier
    Ref(NodeId),
}

impl ParamValue {
    /// Reference to another node
    pub fn reference(id: &NodeId) -> Self {
        Self::Ref(id.clone())
    }

    /// List of references
    pub fn references_to(ids: &[NodeId]) -> Self {
        Self::List(ids.iter().map(Self::reference).collect())
    }

    /// All node ids referenced from this value, in order
    pub fn references(&self) -> Vec<&NodeId> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a NodeId>) {
        match self {
            Self::Ref(id) => out.push(id),
            Self::List(items) => {
                for item in items {
                    item.collect_references(out);
                }
            }
            Self::Text(_) | Self::Integer(_) | Self::Bool(_) => {}
        }
    }

    /// Render as JSON, replacing references with the identifiers from `lookup`
    ///
    /// References `lookup` cannot answer render as `null`.
    pub fn resolve<F>(&self, lookup: &F) -> Value
    where
        F: Fn(&NodeId) -> Option<String>,
    {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::from(*i),
            Self::Bool(b) => Value::Bool(*b),
            Self::List(items) => Value::Array(items.iter().map(|i| i.resolve(lookup)).collect()),
            Self::Ref(id) => lookup(id).map(Value::String).unwrap_or(Value::Null),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<u32> for ParamValue {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u16> for ParamValue {
    fn from(i: u16) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u8> for ParamValue {
    fn from(i: u8) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<CidrBlock> for ParamValue {
    fn from(cidr: CidrBlock) -> Self {
        Self::Text(cidr.as_cidr())
    }
}

impl From<&NodeId> for ParamValue {
    fn from(id: &NodeId) -> Self {
        Self::reference(id)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Immutable description of one infrastructure object
///
/// Built with the consuming `with_*` methods and frozen once registered in
/// a [`super::ResourceGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    id: NodeId,
    resource_type: ResourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<NodeId>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    parameters: BTreeMap<String, ParamValue>,
}

impl ResourceNode {
    /// Create a node with no owner and no parameters
    pub fn new(id: NodeId, resource_type: ResourceType) -> Self {
        Self {
            id,
            resource_type,
            owner: None,
            parameters: BTreeMap::new(),
        }
    }

    /// Set the owning node (destroyed together with the owner)
    pub fn owned_by(mut self, owner: &NodeId) -> Self {
        self.owner = Some(owner.clone());
        self
    }

    /// Set a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn owner(&self) -> Option<&NodeId> {
        self.owner.as_ref()
    }

    pub fn parameters(&self) -> &BTreeMap<String, ParamValue> {
        &self.parameters
    }

    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }

    /// Nodes this node depends on: its owner and every referenced node,
    /// deduplicated in first-seen order
    pub fn dependencies(&self) -> Vec<&NodeId> {
        let mut deps: Vec<&NodeId> = Vec::new();
        let referenced = self.parameters.values().flat_map(|v| v.references());
        for id in self.owner.iter().chain(referenced) {
            if !deps.contains(&id) {
                deps.push(id);
            }
        }
        deps
    }
}
