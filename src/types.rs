//! Common types and traits for integer box geometry.
//!
//! All extents in the packing engine are whole units, so dimensions are
//! stored as `u64` and compared exactly without tolerances.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Extent of a box along the three container axes.
///
/// `length` runs along X (the shelf direction), `width` along Y and
/// `height` along Z.
///
/// # Examples
/// ```ignore
/// let dims = Dims::new(4, 6, 2);
/// assert_eq!(dims.volume(), 48);
/// assert_eq!(dims.swap_footprint(), Dims::new(6, 4, 2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Dims {
    pub length: u64,
    pub width: u64,
    pub height: u64,
}

impl Dims {
    /// Creates a new dimension triple.
    #[inline]
    pub const fn new(length: u64, width: u64, height: u64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Calculates the volume, saturating at `u64::MAX`.
    ///
    /// Validated inputs never saturate, see [`Dims::checked_volume`].
    #[inline]
    pub fn volume(&self) -> u64 {
        self.checked_volume().unwrap_or(u64::MAX)
    }

    /// Calculates the volume, or `None` if it does not fit into `u64`.
    #[inline]
    pub fn checked_volume(&self) -> Option<u64> {
        self.length
            .checked_mul(self.width)
            .and_then(|area| area.checked_mul(self.height))
    }

    /// Returns the dimensions with length and width exchanged.
    #[inline]
    pub const fn swap_footprint(&self) -> Self {
        Self::new(self.width, self.length, self.height)
    }

    /// Checks if the box fits within another box (component-wise <=).
    #[inline]
    pub fn fits_within(&self, outer: &Self) -> bool {
        self.length <= outer.length && self.width <= outer.width && self.height <= outer.height
    }
}

impl std::fmt::Display for Dims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.length, self.width, self.height)
    }
}

/// Trait for objects with a box-shaped extent.
pub trait Dimensional {
    /// Returns the dimensions of the object.
    fn dimensions(&self) -> Dims;

    /// Calculates the volume.
    fn volume(&self) -> u64 {
        self.dimensions().volume()
    }
}

/// Validation helpers shared by the container and item constructors.
pub mod validation {
    use crate::error::ValidationError;

    use super::Dims;

    /// Validates a single raw dimension and converts it to an unsigned extent.
    ///
    /// # Parameters
    /// * `value` - The raw value as read from input
    /// * `name` - Name of the dimension for error messages
    pub fn validate_dimension(value: i64, name: &str) -> Result<u64, ValidationError> {
        if value <= 0 {
            return Err(ValidationError::InvalidDimension(format!(
                "{} must be positive, got: {}",
                name, value
            )));
        }
        Ok(value as u64)
    }

    /// Validates all three extents and checks that the volume is representable.
    ///
    /// # Parameters
    /// * `dims` - Raw dimensions (length, width, height)
    /// * `subject` - Prefix for error messages, e.g. "Container"
    pub fn validate_dims(dims: (i64, i64, i64), subject: &str) -> Result<Dims, ValidationError> {
        let length = validate_dimension(dims.0, &format!("{} length", subject))?;
        let width = validate_dimension(dims.1, &format!("{} width", subject))?;
        let height = validate_dimension(dims.2, &format!("{} height", subject))?;
        let dims = Dims::new(length, width, height);
        if dims.checked_volume().is_none() {
            return Err(ValidationError::InvalidDimension(format!(
                "{} volume {} overflows",
                subject, dims
            )));
        }
        Ok(dims)
    }
}
