//! Data models for the shelf packing engine.
//!
//! - `Container`: the single box all items are packed into
//! - `ItemInstance`: one physical item, already expanded from its template
//!
//! Both types are read-only inputs to the sequencer. Results are reported
//! through separate placement records, so the same item list can be reused
//! across independent runs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::types::{Dimensional, Dims, validation};

fn ensure_positive(dims: &Dims, subject: &str) -> Result<(), ValidationError> {
    for (value, axis) in [
        (dims.length, "length"),
        (dims.width, "width"),
        (dims.height, "height"),
    ] {
        if value == 0 {
            return Err(ValidationError::InvalidDimension(format!(
                "{} {} must be positive, got: 0",
                subject, axis
            )));
        }
    }
    if dims.checked_volume().is_none() {
        return Err(ValidationError::InvalidDimension(format!(
            "{} volume {} overflows",
            subject, dims
        )));
    }
    Ok(())
}

/// Represents the packing container.
///
/// # Fields
/// * `dims` - Inner length (X), width (Y) and height (Z)
/// * `unit` - Unit label, carried through for display only
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Container {
    pub dims: Dims,
    pub unit: Option<String>,
}

impl Container {
    /// Creates a new container after validating the raw dimensions.
    ///
    /// # Parameters
    /// * `dims` - Raw dimensions (length, width, height)
    /// * `unit` - Optional unit label
    ///
    /// # Returns
    /// `Ok(Container)` for positive dimensions, otherwise `Err(ValidationError)`
    pub fn new(dims: (i64, i64, i64), unit: Option<String>) -> Result<Self, ValidationError> {
        let dims = validation::validate_dims(dims, "Container")?;
        Ok(Self { dims, unit })
    }

    /// Re-checks a container that may have been built field by field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive(&self.dims, "Container")
    }
}

impl Dimensional for Container {
    fn dimensions(&self) -> Dims {
        self.dims
    }
}

/// A single item to be packed.
///
/// # Fields
/// * `instance_id` - Unique identifier of this instance, e.g. `"BOX#2"`
/// * `parent_item_id` - Identifier of the template the instance was expanded from
/// * `dims` - Original (un-rotated) dimensions
/// * `allow_rotation` - Whether length and width may be exchanged
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemInstance {
    pub instance_id: String,
    pub parent_item_id: String,
    pub dims: Dims,
    pub allow_rotation: bool,
}

impl ItemInstance {
    /// Creates a new item instance with validation.
    ///
    /// # Examples
    /// ```ignore
    /// let item = ItemInstance::new("A#1", "A", (5, 5, 5), false);
    /// assert!(item.is_ok());
    ///
    /// let invalid = ItemInstance::new("A#1", "A", (0, 5, 5), false);
    /// assert!(invalid.is_err());
    /// ```
    pub fn new(
        instance_id: impl Into<String>,
        parent_item_id: impl Into<String>,
        dims: (i64, i64, i64),
        allow_rotation: bool,
    ) -> Result<Self, ValidationError> {
        let instance_id = instance_id.into();
        let dims = validation::validate_dims(dims, &format!("Item {}", instance_id))?;
        let item = Self {
            instance_id,
            parent_item_id: parent_item_id.into(),
            dims,
            allow_rotation,
        };
        item.validate()?;
        Ok(item)
    }

    /// Re-checks an item that may have been built field by field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.instance_id.trim().is_empty() {
            return Err(ValidationError::InvalidIdentifier(
                "instance id must not be empty".to_string(),
            ));
        }
        ensure_positive(&self.dims, &format!("Item {}", self.instance_id))
    }
}

impl Dimensional for ItemInstance {
    fn dimensions(&self) -> Dims {
        self.dims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_rejects_non_positive_dimensions() {
        assert!(Container::new((10, 10, 10), None).is_ok());
        assert!(Container::new((0, 10, 10), None).is_err());
        assert!(Container::new((10, -1, 10), None).is_err());
        assert!(Container::new((10, 10, 0), Some("cm".to_string())).is_err());
    }

    #[test]
    fn container_validate_catches_manual_construction() {
        let container = Container {
            dims: Dims::new(10, 0, 10),
            unit: None,
        };
        let err = container.validate().unwrap_err();
        assert!(err.to_string().contains("width"), "{}", err);
    }

    #[test]
    fn item_requires_identifier() {
        let err = ItemInstance::new("  ", "A", (1, 1, 1), false).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidIdentifier(_)));
    }

    #[test]
    fn item_volume_uses_original_dimensions() {
        let item = ItemInstance::new("A#1", "A", (2, 3, 4), true).unwrap();
        assert_eq!(item.volume(), 24);
        assert_eq!(item.dimensions(), Dims::new(2, 3, 4));
    }
}
