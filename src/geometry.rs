//! Fit predicates and bounds checks for shelf placement.
//!
//! These functions are pure: they only compare extents and never touch the
//! shelves they inspect.

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::Container;
use crate::orientation::Orientation;
use crate::shelf::Shelf;
use crate::types::{Dimensional, Dims};

/// Checks whether a candidate fits the empty container.
///
/// # Parameters
/// * `candidate` - Usually an orientation of an item
/// * `container` - The container
///
/// # Returns
/// `true` if every extent is within the container's extent on the same axis
pub fn fits_in_container(candidate: &impl Dimensional, container: &Container) -> bool {
    candidate.dimensions().fits_within(&container.dimensions())
}

/// Checks whether an orientation still fits on an existing shelf.
///
/// Only the remaining room along X and the container width are checked.
/// The height is not compared against the container ceiling here; that
/// check happens once, when a shelf is created.
///
/// # Parameters
/// * `orientation` - Candidate orientation of an item
/// * `shelf` - The shelf to append to
/// * `container` - The container
pub fn fits_on_shelf(orientation: &Orientation, shelf: &Shelf, container: &Container) -> bool {
    shelf.current_x.saturating_add(orientation.dims.length) <= container.dims.length
        && orientation.dims.width <= container.dims.width
}

/// Container axis a placement can overrun.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Length,
    Width,
    Height,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Length => f.write_str("length"),
            Axis::Width => f.write_str("width"),
            Axis::Height => f.write_str("height"),
        }
    }
}

/// A placed item that reaches beyond the container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct BoundsViolation {
    pub item_instance_id: String,
    pub axis: Axis,
    /// Far edge of the item along `axis`.
    pub end: u64,
    /// Container extent along `axis`.
    pub limit: u64,
}

impl std::fmt::Display for BoundsViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "item {} exceeds container {} ({} > {})",
            self.item_instance_id, self.axis, self.end, self.limit
        )
    }
}

/// Checks a finished placement against the container walls.
///
/// Axes are checked in the order length, width, height; the first overrun
/// is reported.
///
/// # Parameters
/// * `item_instance_id` - Identifier used in the violation report
/// * `position` - Lower front left corner (x, y, z)
/// * `dims` - Dimensions of the chosen orientation
/// * `container` - The container
pub fn check_bounds(
    item_instance_id: &str,
    position: (u64, u64, u64),
    dims: &Dims,
    container: &Container,
) -> Result<(), BoundsViolation> {
    let (x, y, z) = position;
    let checks = [
        (Axis::Length, x.saturating_add(dims.length), container.dims.length),
        (Axis::Width, y.saturating_add(dims.width), container.dims.width),
        (Axis::Height, z.saturating_add(dims.height), container.dims.height),
    ];

    for (axis, end, limit) in checks {
        if end > limit {
            return Err(BoundsViolation {
                item_instance_id: item_instance_id.to_string(),
                axis,
                end,
                limit,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::OrientationName;

    fn container() -> Container {
        Container::new((10, 10, 10), None).unwrap()
    }

    fn orientation(length: u64, width: u64, height: u64) -> Orientation {
        Orientation {
            name: OrientationName::Xyz,
            dims: Dims::new(length, width, height),
        }
    }

    #[test]
    fn container_fit_is_inclusive() {
        let c = container();
        assert!(fits_in_container(&orientation(10, 10, 10), &c));
        assert!(!fits_in_container(&orientation(11, 1, 1), &c));
        assert!(!fits_in_container(&orientation(1, 11, 1), &c));
        assert!(!fits_in_container(&orientation(1, 1, 11), &c));
    }

    #[test]
    fn shelf_fit_checks_remaining_length() {
        let c = container();
        let mut shelf = Shelf::new(0, 0, 6);
        shelf.current_x = 6;

        assert!(fits_on_shelf(&orientation(4, 4, 4), &shelf, &c));
        assert!(!fits_on_shelf(&orientation(5, 4, 4), &shelf, &c));
        assert!(!fits_on_shelf(&orientation(2, 11, 4), &shelf, &c));
    }

    #[test]
    fn shelf_fit_ignores_height_ceiling() {
        let c = container();
        let shelf = Shelf::new(1, 8, 2);

        // 8 + 9 would overrun the ceiling, the shelf check accepts it anyway.
        assert!(fits_on_shelf(&orientation(2, 2, 9), &shelf, &c));
    }

    #[test]
    fn bounds_check_reports_first_overrun() {
        let c = container();
        assert!(check_bounds("A#1", (0, 0, 0), &Dims::new(10, 10, 10), &c).is_ok());

        let violation = check_bounds("A#1", (0, 0, 8), &Dims::new(2, 2, 9), &c).unwrap_err();
        assert_eq!(violation.axis, Axis::Height);
        assert_eq!(violation.end, 17);
        assert_eq!(violation.limit, 10);

        let violation = check_bounds("B#1", (9, 0, 0), &Dims::new(2, 2, 2), &c).unwrap_err();
        assert_eq!(violation.axis, Axis::Length);
        assert_eq!(
            violation.to_string(),
            "item B#1 exceeds container length (11 > 10)"
        );
    }
}
