//! Error types for the packing engine.
//!
//! Items that cannot be placed are reported as data in the packing result.
//! The errors here are reserved for input that makes a run meaningless.

use thiserror::Error;

use crate::geometry::BoundsViolation;

/// Result type alias for packing operations.
pub type Result<T> = std::result::Result<T, PackError>;

/// Validation error for container and item data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A dimension is zero, negative or produces an unrepresentable volume.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// An identifier is empty or used twice.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Template quantities expand into more instances than a run accepts.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// Errors that abort a packing run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// The container failed validation.
    #[error("Invalid container: {0}")]
    InvalidContainer(ValidationError),

    /// An item instance failed validation.
    #[error("Invalid item: {0}")]
    InvalidItem(ValidationError),

    /// The run was configured to require items but none were supplied.
    #[error("No items to pack")]
    NoItems,

    /// Utilization cannot be computed for an empty container.
    #[error("Container volume is zero")]
    ZeroContainerVolume,

    /// A placement left the container (strict bounds checking only).
    #[error("Placement out of bounds: {0}")]
    OutOfBounds(BoundsViolation),
}
