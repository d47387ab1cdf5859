//! Orientation candidates for an item.
//!
//! Items always stand upright: only the footprint may be turned by 90°,
//! the height axis is never permuted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::ItemInstance;
use crate::types::{Dimensional, Dims};

/// Name of an allowed rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum OrientationName {
    /// Original dimensions.
    #[serde(rename = "XYZ")]
    Xyz,
    /// Length and width exchanged.
    #[serde(rename = "YXZ")]
    Yxz,
}

impl OrientationName {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrientationName::Xyz => "XYZ",
            OrientationName::Yxz => "YXZ",
        }
    }
}

impl std::fmt::Display for OrientationName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item's dimensions under one allowed rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Orientation {
    pub name: OrientationName,
    pub dims: Dims,
}

impl Orientation {
    /// The un-rotated orientation.
    pub fn xyz(item: &ItemInstance) -> Self {
        Self {
            name: OrientationName::Xyz,
            dims: item.dims,
        }
    }

    /// Footprint turned by 90°, height unchanged.
    pub fn yxz(item: &ItemInstance) -> Self {
        Self {
            name: OrientationName::Yxz,
            dims: item.dims.swap_footprint(),
        }
    }
}

impl Dimensional for Orientation {
    fn dimensions(&self) -> Dims {
        self.dims
    }
}

/// Enumerates the orientation candidates of an item, un-rotated first.
///
/// # Returns
/// `[XYZ]` if rotation is disallowed, otherwise `[XYZ, YXZ]`. Square
/// footprints still yield both candidates.
pub fn generate_orientations(item: &ItemInstance) -> Vec<Orientation> {
    if item.allow_rotation {
        vec![Orientation::xyz(item), Orientation::yxz(item)]
    } else {
        vec![Orientation::xyz(item)]
    }
}
