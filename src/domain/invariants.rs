// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Topology Invariants
//!
//! Business rule validation for network definitions. All functions are pure
//! (no side effects) and return the first violated rule.
//!
//! # Invariant Categories
//!
//! 1. **Capacity**: scaling bounds are positive and ordered
//! 2. **Placement**: availability zone requests can be satisfied
//! 3. **Traffic**: listener ports and scaling thresholds are in range
//! 4. **Launch**: instance launch settings are present

/// Validation result with detailed error information
pub type ValidationResult = Result<(), ValidationError>;

/// Validation error with context
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A capacity bound is zero
    #[error("Capacity bound {field} must be a positive integer")]
    ZeroCapacity { field: &'static str },

    /// Capacity bounds out of order
    #[error("Capacity bounds must satisfy min <= desired <= max, got min={min}, desired={desired}, max={max}")]
    CapacityOrder { min: u32, desired: u32, max: u32 },

    /// Scale trigger threshold outside 0-100
    #[error("Scaling threshold must be a percentage 0-100, got {0}")]
    ThresholdOutOfRange(u8),

    /// Requested zero availability zones
    #[error("Maximum availability zone count must be at least 1")]
    InvalidAzCount,

    /// The region inventory has no availability zones
    #[error("Region {0} has no availability zones")]
    NoAvailabilityZones(String),

    /// Listener port zero
    #[error("Listener port must be 1-65535, got {0}")]
    InvalidPort(u16),

    /// A required text field is blank
    #[error("Field {0} must not be empty")]
    EmptyField(&'static str),
}

/// Validate scaling group capacity bounds
///
/// # Rules
/// - min, desired, max are all positive
/// - min <= desired <= max
pub fn validate_capacity(min: u32, desired: u32, max: u32) -> ValidationResult {
    for (field, value) in [("min", min), ("desired", desired), ("max", max)] {
        if value == 0 {
            return Err(ValidationError::ZeroCapacity { field });
        }
    }

    if !(min <= desired && desired <= max) {
        return Err(ValidationError::CapacityOrder { min, desired, max });
    }

    Ok(())
}

/// Validate scale trigger threshold (percentage)
pub fn validate_threshold(percent: u8) -> ValidationResult {
    if percent > 100 {
        return Err(ValidationError::ThresholdOutOfRange(percent));
    }
    Ok(())
}

/// Validate listener port
pub fn validate_port(port: u16) -> ValidationResult {
    if port == 0 {
        return Err(ValidationError::InvalidPort(port));
    }
    Ok(())
}

/// Validate a required text setting
pub fn validate_not_blank(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

/// Number of availability zones a network actually spans
///
/// # Rules
/// - At least one zone must be requested
/// - The region must offer at least one zone
/// - Large requests are clamped to what the region offers
pub fn effective_az_count(
    requested: u32,
    region: &str,
    available: usize,
) -> Result<usize, ValidationError> {
    if requested == 0 {
        return Err(ValidationError::InvalidAzCount);
    }

    if available == 0 {
        return Err(ValidationError::NoAvailabilityZones(region.to_string()));
    }

    Ok(available.min(requested as usize))
}
