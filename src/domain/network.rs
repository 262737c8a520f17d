// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Address Value Objects with Validation Invariants

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;
use thiserror::Error;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Only IPv4 address space is supported: {0}")]
    UnsupportedFamily(String),

    #[error("CIDR has host bits set: {given} (did you mean {canonical}?)")]
    HostBitsSet { given: String, canonical: String },

    #[error("Cannot carve {count} subnets out of {cidr}: prefix /{prefix} exceeds /{limit}")]
    AddressSpaceExhausted {
        cidr: String,
        count: usize,
        prefix: u32,
        limit: u8,
    },
}

/// IPv4 CIDR block value object
///
/// Represents the private address space of a network or subnet.
/// Invariants:
/// - Valid `a.b.c.d/p` notation with an explicit prefix
/// - IPv4 only
/// - No host bits set (the address is the network address)
///
/// # Examples
///
/// ```rust
/// use cim_topology::domain::CidrBlock;
///
/// let cidr = CidrBlock::new("10.42.11.0/24").unwrap();
/// assert_eq!(cidr.prefix_len(), 24);
/// assert!(cidr.overlaps(&CidrBlock::new("10.42.11.128/25").unwrap()));
/// assert!(!cidr.overlaps(&CidrBlock::new("10.7.11.0/24").unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CidrBlock(Ipv4Net);

impl CidrBlock {
    /// Longest prefix a carved subnet may have
    pub const MAX_SUBNET_PREFIX: u8 = 28;

    /// Parse and validate a CIDR block
    ///
    /// # Invariants
    /// - Explicit prefix length 0-32
    /// - Address equals the network address of the block
    pub fn new(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let cidr = cidr.as_ref().trim();

        let Some((addr_str, _)) = cidr.split_once('/') else {
            return Err(NetworkError::InvalidCidr(cidr.to_string()));
        };

        if Ipv6Addr::from_str(addr_str).is_ok() {
            return Err(NetworkError::UnsupportedFamily(cidr.to_string()));
        }

        let net = Ipv4Net::from_str(cidr)
            .map_err(|_| NetworkError::InvalidCidr(cidr.to_string()))?;

        // Invariant: no host bits
        if net.trunc() != net {
            return Err(NetworkError::HostBitsSet {
                given: cidr.to_string(),
                canonical: net.trunc().to_string(),
            });
        }

        Ok(Self(net))
    }

    /// Underlying network
    pub fn net(&self) -> Ipv4Net {
        self.0
    }

    /// Prefix length
    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// Whether the two blocks share any address
    ///
    /// Two CIDR blocks either nest or are disjoint, so it is enough to check
    /// whether either one contains the other's network address.
    pub fn overlaps(&self, other: &CidrBlock) -> bool {
        self.0.contains(&other.0.network()) || other.0.contains(&self.0.network())
    }

    /// Split the block into `count` equally sized subnets, in address order
    ///
    /// The subnet prefix grows by `ceil(log2(count))` bits, so some address
    /// space is left unallocated when `count` is not a power of two.
    pub fn carve(&self, count: usize) -> Result<Vec<CidrBlock>, NetworkError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let bits = count.next_power_of_two().trailing_zeros();
        let prefix = u32::from(self.prefix_len()) + bits;

        if prefix > u32::from(Self::MAX_SUBNET_PREFIX) {
            return Err(NetworkError::AddressSpaceExhausted {
                cidr: self.to_string(),
                count,
                prefix,
                limit: Self::MAX_SUBNET_PREFIX,
            });
        }

        // prefix <= 28 here, so the cast and the split cannot fail
        let subnets = self
            .0
            .subnets(prefix as u8)
            .map_err(|_| NetworkError::InvalidCidr(self.to_string()))?;

        Ok(subnets.take(count).map(CidrBlock).collect())
    }

    /// Get as CIDR notation string
    pub fn as_cidr(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CidrBlock {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CidrBlock {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CidrBlock> for String {
    fn from(cidr: CidrBlock) -> Self {
        cidr.as_cidr()
    }
}
