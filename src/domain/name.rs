// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Name Value Object

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Resource name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Resource name is empty")]
    Empty,

    #[error("Resource name exceeds maximum length of 63 characters: {0}")]
    TooLong(String),

    #[error("Invalid character in resource name: {0:?}")]
    InvalidCharacter(char),

    #[error("Resource name cannot start or end with hyphen: {0}")]
    InvalidFormat(String),
}

/// Name of a topology unit (a network and everything derived from it)
///
/// Names become the first segment of every logical node id, so they follow
/// single DNS label rules with lowercase letters only:
/// - 1-63 characters
/// - `a-z`, `0-9` and `-`
/// - no leading or trailing hyphen
///
/// # Examples
///
/// ```rust
/// use cim_topology::domain::ResourceName;
///
/// assert!(ResourceName::new("edge-west").is_ok());
/// assert!(ResourceName::new("Edge").is_err());
/// assert!(ResourceName::new("edge/west").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    /// Maximum length (one DNS label)
    pub const MAX_LENGTH: usize = 63;

    /// Create a new resource name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();

        if name.is_empty() {
            return Err(NameError::Empty);
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(NameError::TooLong(name));
        }

        if let Some(ch) = name
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(NameError::InvalidCharacter(ch));
        }

        if name.starts_with('-') || name.ends_with('-') {
            return Err(NameError::InvalidFormat(name));
        }

        Ok(Self(name))
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ResourceName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ResourceName {
    type Error = NameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceName> for String {
    fn from(name: ResourceName) -> Self {
        name.0
    }
}
