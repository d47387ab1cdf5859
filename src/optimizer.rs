//! Shelf-based First-Fit-Decreasing packing of items into one container.
//!
//! Items are sorted by volume (largest first) and placed one after another:
//! - each allowed orientation is tried in order,
//! - the first existing shelf with enough room along X takes the item,
//! - otherwise a new shelf is opened on top of the previous ones.
//!
//! The loop never backtracks. Items that cannot be placed are reported with
//! a reason instead of failing the run.

use std::cmp::Reverse;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{PackError, Result, ValidationError};
use crate::geometry::{BoundsViolation, check_bounds, fits_in_container, fits_on_shelf};
use crate::metrics::Metrics;
use crate::model::{Container, ItemInstance};
use crate::orientation::{Orientation, OrientationName, generate_orientations};
use crate::shelf::Shelf;
use crate::types::{Dimensional, Dims};

/// How finished placements are checked against the container walls.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BoundsCheck {
    /// No check.
    Off,
    /// Violations are reported in the result, the run still succeeds.
    Warn,
    /// The first violation fails the run.
    Strict,
}

impl BoundsCheck {
    /// Parses the textual form used in configuration (`off`, `warn`, `strict`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "off" | "none" | "0" => Some(BoundsCheck::Off),
            "warn" | "warning" => Some(BoundsCheck::Warn),
            "strict" | "error" => Some(BoundsCheck::Strict),
            _ => None,
        }
    }
}

/// Configuration for the packing run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PackingConfig {
    /// Post-placement bounds verification mode
    pub bounds_check: BoundsCheck,
    /// Reject an empty item list instead of returning an empty result
    pub require_items: bool,
}

impl PackingConfig {
    pub const DEFAULT_BOUNDS_CHECK: BoundsCheck = BoundsCheck::Warn;
    pub const DEFAULT_REQUIRE_ITEMS: bool = false;

    /// Creates a builder for a custom configuration.
    pub fn builder() -> PackingConfigBuilder {
        PackingConfigBuilder::default()
    }
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            bounds_check: Self::DEFAULT_BOUNDS_CHECK,
            require_items: Self::DEFAULT_REQUIRE_ITEMS,
        }
    }
}

/// Builder for `PackingConfig`.
#[derive(Clone, Debug, Default)]
pub struct PackingConfigBuilder {
    config: PackingConfig,
}

impl PackingConfigBuilder {
    /// Sets the bounds verification mode.
    pub fn bounds_check(mut self, mode: BoundsCheck) -> Self {
        self.config.bounds_check = mode;
        self
    }

    /// Sets whether an empty item list is an error.
    pub fn require_items(mut self, require: bool) -> Self {
        self.config.require_items = require;
        self
    }

    /// Builds the final configuration.
    pub fn build(self) -> PackingConfig {
        self.config
    }
}

/// Final position and orientation of one item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Placement {
    pub item_instance_id: String,
    pub orientation: OrientationName,
    pub shelf_index: usize,
    pub shelf_start_z: u64,
    /// Shelf height right after this item was placed.
    pub shelf_height: u64,
    pub x: u64,
    pub y: u64,
    pub z: u64,
    pub length: u64,
    pub width: u64,
    pub height: u64,
    pub volume: u64,
}

impl Placement {
    /// Dimensions of the chosen orientation.
    pub fn dims(&self) -> Dims {
        Dims::new(self.length, self.width, self.height)
    }

    /// Lower front left corner.
    pub fn position(&self) -> (u64, u64, u64) {
        (self.x, self.y, self.z)
    }
}

/// Reasons why an item could not be placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnpackedReason {
    /// A new shelf for the item would reach above the container.
    HeightOverflow,
    /// No orientation of the item fits the empty container.
    NoOrientationFits,
}

impl UnpackedReason {
    pub fn code(&self) -> &'static str {
        match self {
            UnpackedReason::HeightOverflow => "height_overflow",
            UnpackedReason::NoOrientationFits => "no_orientation_fits",
        }
    }
}

impl std::fmt::Display for UnpackedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnpackedReason::HeightOverflow => write!(f, "height overflow"),
            UnpackedReason::NoOrientationFits => write!(f, "no orientation fits"),
        }
    }
}

/// Item that could not be placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnpackedItem {
    pub item_instance_id: String,
    pub reason: UnpackedReason,
}

impl UnpackedItem {
    /// Human readable entry, e.g. `"BOX#2 (height overflow)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.item_instance_id, self.reason)
    }
}

/// Overall outcome of a run. Unplaced items do not change it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PackStatus {
    Success,
}

/// Result of the packing run.
#[derive(Clone, Debug)]
pub struct PackingResult {
    pub status: PackStatus,
    pub metrics: Metrics,
    pub placements: Vec<Placement>,
    pub unpacked: Vec<UnpackedItem>,
    pub shelves: Vec<Shelf>,
    pub bounds_violations: Vec<BoundsViolation>,
}

impl PackingResult {
    /// Indicates whether all items were placed.
    pub fn is_complete(&self) -> bool {
        self.unpacked.is_empty()
    }

    /// Returns the number of shelves opened.
    pub fn shelf_count(&self) -> usize {
        self.shelves.len()
    }

    /// Returns the number of items that were not placed.
    pub fn unpacked_count(&self) -> usize {
        self.unpacked.len()
    }

    /// Unpacked entries in their textual `"<id> (<reason>)"` form.
    pub fn unpacked_labels(&self) -> Vec<String> {
        self.unpacked.iter().map(UnpackedItem::label).collect()
    }

    /// Looks up the placement of an item instance.
    #[cfg(test)]
    pub fn placement_for(&self, item_instance_id: &str) -> Option<&Placement> {
        self.placements
            .iter()
            .find(|p| p.item_instance_id == item_instance_id)
    }
}

/// Events emitted while packing, for tracing and live visualization.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum PackEvent {
    /// Items were validated and sorted.
    Started {
        total_items: usize,
        container: Dims,
    },
    /// Processing of an item begins.
    ItemStarted { id: String, volume: u64 },
    /// An orientation does not fit the empty container.
    OrientationRejected {
        id: String,
        orientation: OrientationName,
        dims: Dims,
    },
    /// An existing shelf has no room for the orientation.
    ShelfRejected {
        id: String,
        orientation: OrientationName,
        shelf_index: usize,
    },
    /// A new shelf was opened.
    ShelfCreated {
        index: usize,
        start_z: u64,
        height: u64,
    },
    /// An item was placed.
    ItemPlaced {
        id: String,
        orientation: OrientationName,
        shelf_index: usize,
        pos: (u64, u64, u64),
        dims: Dims,
    },
    /// An item could not be placed.
    ItemUnpacked {
        id: String,
        reason_code: String,
        reason_text: String,
    },
    /// A placement reaches beyond the container.
    BoundsViolated { violation: BoundsViolation },
    /// Packing finished.
    Finished {
        packed: usize,
        unpacked: usize,
        utilization_percent: f64,
    },
}

/// Packs items into the container with the default configuration.
///
/// # Parameters
/// * `container` - The container
/// * `items` - Single-quantity item instances in input order
///
/// # Returns
/// `PackingResult` with placements and unpacked items, or `PackError` for invalid input
#[cfg(test)]
pub fn pack_items(container: &Container, items: &[ItemInstance]) -> Result<PackingResult> {
    pack_items_with_config(container, items, PackingConfig::default())
}

/// Like `pack_items`, with a custom configuration.
pub fn pack_items_with_config(
    container: &Container,
    items: &[ItemInstance],
    config: PackingConfig,
) -> Result<PackingResult> {
    pack_items_with_progress(container, items, config, |_| {})
}

/// Packs items and reports every decision to a callback.
///
/// The callback replaces any global debug switch: callers decide whether the
/// events are logged, streamed or dropped.
pub fn pack_items_with_progress(
    container: &Container,
    items: &[ItemInstance],
    config: PackingConfig,
    mut on_event: impl FnMut(&PackEvent),
) -> Result<PackingResult> {
    validate_input(container, items, &config)?;

    // Stable sort: equal volumes keep their input order.
    let mut order: Vec<&ItemInstance> = items.iter().collect();
    order.sort_by_key(|item| Reverse(item.volume()));

    on_event(&PackEvent::Started {
        total_items: order.len(),
        container: container.dims,
    });

    let mut shelves: Vec<Shelf> = Vec::new();
    let mut placements: Vec<Placement> = Vec::new();
    let mut unpacked: Vec<UnpackedItem> = Vec::new();
    let mut current_z: u64 = 0;

    for item in order {
        on_event(&PackEvent::ItemStarted {
            id: item.instance_id.clone(),
            volume: item.volume(),
        });

        match place_item(item, container, &mut shelves, &mut current_z, &mut on_event) {
            ItemOutcome::Placed(placement) => {
                on_event(&PackEvent::ItemPlaced {
                    id: placement.item_instance_id.clone(),
                    orientation: placement.orientation,
                    shelf_index: placement.shelf_index,
                    pos: placement.position(),
                    dims: placement.dims(),
                });
                placements.push(placement);
            }
            ItemOutcome::Unpacked(reason) => {
                on_event(&PackEvent::ItemUnpacked {
                    id: item.instance_id.clone(),
                    reason_code: reason.code().to_string(),
                    reason_text: reason.to_string(),
                });
                unpacked.push(UnpackedItem {
                    item_instance_id: item.instance_id.clone(),
                    reason,
                });
            }
        }
    }

    let bounds_violations = verify_placements(&placements, container, config.bounds_check)?;
    for violation in &bounds_violations {
        on_event(&PackEvent::BoundsViolated {
            violation: violation.clone(),
        });
    }

    let metrics = Metrics::compute(
        container,
        placements.iter().map(|p| p.volume),
        unpacked.len(),
    )?;

    on_event(&PackEvent::Finished {
        packed: metrics.items_packed,
        unpacked: metrics.items_unpacked,
        utilization_percent: metrics.utilization_percent,
    });

    Ok(PackingResult {
        status: PackStatus::Success,
        metrics,
        placements,
        unpacked,
        shelves,
        bounds_violations,
    })
}

enum ItemOutcome {
    Placed(Placement),
    Unpacked(UnpackedReason),
}

/// Tries the orientations of one item against the shelves.
///
/// A height overflow while opening a new shelf ends the search for this
/// item, even if a later orientation might still fit.
fn place_item(
    item: &ItemInstance,
    container: &Container,
    shelves: &mut Vec<Shelf>,
    current_z: &mut u64,
    on_event: &mut impl FnMut(&PackEvent),
) -> ItemOutcome {
    for orientation in generate_orientations(item) {
        if !fits_in_container(&orientation, container) {
            on_event(&PackEvent::OrientationRejected {
                id: item.instance_id.clone(),
                orientation: orientation.name,
                dims: orientation.dims,
            });
            continue;
        }

        for shelf in shelves.iter_mut() {
            if fits_on_shelf(&orientation, shelf, container) {
                return ItemOutcome::Placed(place_on_shelf(item, &orientation, shelf));
            }
            on_event(&PackEvent::ShelfRejected {
                id: item.instance_id.clone(),
                orientation: orientation.name,
                shelf_index: shelf.index,
            });
        }

        let start_z = *current_z;
        let overflows = start_z
            .checked_add(orientation.dims.height)
            .is_none_or(|top| top > container.dims.height);
        if overflows {
            return ItemOutcome::Unpacked(UnpackedReason::HeightOverflow);
        }

        let mut shelf = Shelf::new(shelves.len(), start_z, orientation.dims.height);
        on_event(&PackEvent::ShelfCreated {
            index: shelf.index,
            start_z,
            height: shelf.height,
        });
        let placement = place_on_shelf(item, &orientation, &mut shelf);
        *current_z += shelf.height;
        shelves.push(shelf);
        return ItemOutcome::Placed(placement);
    }

    ItemOutcome::Unpacked(UnpackedReason::NoOrientationFits)
}

fn place_on_shelf(item: &ItemInstance, orientation: &Orientation, shelf: &mut Shelf) -> Placement {
    let (x, y, z) = shelf.place(item, orientation);
    let dims = orientation.dims;

    Placement {
        item_instance_id: item.instance_id.clone(),
        orientation: orientation.name,
        shelf_index: shelf.index,
        shelf_start_z: shelf.start_z,
        shelf_height: shelf.height,
        x,
        y,
        z,
        length: dims.length,
        width: dims.width,
        height: dims.height,
        volume: dims.volume(),
    }
}

fn validate_input(
    container: &Container,
    items: &[ItemInstance],
    config: &PackingConfig,
) -> Result<()> {
    container.validate().map_err(PackError::InvalidContainer)?;

    if items.is_empty() && config.require_items {
        return Err(PackError::NoItems);
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(items.len());
    for item in items {
        item.validate().map_err(PackError::InvalidItem)?;
        if !seen.insert(item.instance_id.as_str()) {
            return Err(PackError::InvalidItem(ValidationError::InvalidIdentifier(
                format!("duplicate instance id: {}", item.instance_id),
            )));
        }
    }
    Ok(())
}

fn verify_placements(
    placements: &[Placement],
    container: &Container,
    mode: BoundsCheck,
) -> Result<Vec<BoundsViolation>> {
    if mode == BoundsCheck::Off {
        return Ok(Vec::new());
    }

    let mut violations = Vec::new();
    for placement in placements {
        if let Err(violation) = check_bounds(
            &placement.item_instance_id,
            placement.position(),
            &placement.dims(),
            container,
        ) {
            if mode == BoundsCheck::Strict {
                return Err(PackError::OutOfBounds(violation));
            }
            violations.push(violation);
        }
    }
    Ok(violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Axis;

    fn container(l: i64, w: i64, h: i64) -> Container {
        Container::new((l, w, h), Some("cm".to_string())).unwrap()
    }

    fn item(id: &str, dims: (i64, i64, i64), allow_rotation: bool) -> ItemInstance {
        ItemInstance::new(id, id.split('#').next().unwrap(), dims, allow_rotation).unwrap()
    }

    /// Deterministic pseudo-random item set for property checks.
    fn generated_items(seed: u64, count: usize, max_dim: u64) -> Vec<ItemInstance> {
        let mut state = seed;
        let mut next = move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) % max_dim + 1
        };
        (0..count)
            .map(|i| {
                let dims = (next() as i64, next() as i64, next() as i64);
                item(&format!("G{}#1", i), dims, next() % 2 == 0)
            })
            .collect()
    }

    #[test]
    fn scenario_single_item_lands_in_corner() {
        let result = pack_items(&container(10, 10, 10), &[item("A#1", (5, 5, 5), false)]).unwrap();

        assert_eq!(result.status, PackStatus::Success);
        assert_eq!(result.placements.len(), 1);
        let placement = &result.placements[0];
        assert_eq!(placement.position(), (0, 0, 0));
        assert_eq!(placement.orientation, OrientationName::Xyz);
        assert_eq!(result.shelf_count(), 1);
        assert!((result.metrics.utilization_percent - 12.5).abs() < 1e-9);
        assert!(result.is_complete());
    }

    #[test]
    fn scenario_second_cube_overflows_height() {
        let items = vec![item("A#1", (6, 6, 6), false), item("A#2", (6, 6, 6), false)];
        let result = pack_items(&container(10, 10, 10), &items).unwrap();

        let first = result.placement_for("A#1").unwrap();
        assert_eq!(first.shelf_index, 0);
        assert_eq!((first.x, first.z), (0, 0));

        assert_eq!(result.unpacked.len(), 1);
        assert_eq!(result.unpacked[0].reason, UnpackedReason::HeightOverflow);
        assert_eq!(result.unpacked_labels(), vec!["A#2 (height overflow)"]);
        assert_eq!(result.shelf_count(), 1);
        assert_eq!(result.status, PackStatus::Success);
    }

    #[test]
    fn scenario_no_rotation_fits() {
        let result = pack_items(&container(10, 10, 10), &[item("L#1", (12, 4, 4), true)]).unwrap();

        assert!(result.placements.is_empty());
        assert_eq!(result.unpacked_labels(), vec!["L#1 (no orientation fits)"]);
        assert_eq!(result.metrics.items_unpacked, 1);
    }

    #[test]
    fn scenario_unrotatable_item_too_wide_opens_no_shelf() {
        let result = pack_items(&container(10, 10, 10), &[item("W#1", (4, 12, 4), false)]).unwrap();

        assert_eq!(
            result.unpacked[0].reason,
            UnpackedReason::NoOrientationFits
        );
        assert_eq!(result.shelf_count(), 0);
        assert_eq!(result.metrics.packed_volume, 0);
        assert_eq!(result.metrics.utilization_percent, 0.0);
    }

    #[test]
    fn rotation_used_when_original_footprint_is_too_wide() {
        let result = pack_items(&container(15, 10, 10), &[item("W#1", (4, 12, 4), true)]).unwrap();
        assert!(result.is_complete());

        let placement = &result.placements[0];
        assert_eq!(placement.orientation, OrientationName::Yxz);
        assert_eq!(placement.dims(), Dims::new(12, 4, 4));
        assert_eq!(placement.volume, 192);
    }

    #[test]
    fn height_overflow_stops_before_alternate_orientation() {
        // Shelf 0 ends at x = 8. XYZ (3x9) has no room on it and a new shelf
        // would reach 6 + 5 > 10, so YXZ is never looked at.
        let items = vec![
            item("A#1", (8, 8, 6), false),
            item("B#1", (3, 9, 5), true),
        ];
        let mut events = Vec::new();
        let result = pack_items_with_progress(
            &container(10, 10, 10),
            &items,
            PackingConfig::default(),
            |evt| events.push(evt.clone()),
        )
        .unwrap();

        assert_eq!(result.unpacked_labels(), vec!["B#1 (height overflow)"]);
        let yxz_tried = events.iter().any(|evt| {
            matches!(
                evt,
                PackEvent::ShelfRejected {
                    orientation: OrientationName::Yxz,
                    ..
                } | PackEvent::OrientationRejected {
                    orientation: OrientationName::Yxz,
                    ..
                }
            )
        });
        assert!(!yxz_tried, "no orientation after an overflow may be tried");
    }

    #[test]
    fn height_overflow_is_final_even_if_rotation_would_fit_shelf() {
        // XYZ (6x2) overflows while opening a new shelf, YXZ (2x6) would have
        // fitted onto shelf 0 (current_x 7 + 2 <= 10). The overflow wins.
        let items = vec![
            item("A#1", (7, 7, 7), false),
            item("B#1", (6, 2, 4), true),
        ];
        let result = pack_items(&container(10, 10, 10), &items).unwrap();

        assert!(result.placement_for("A#1").is_some());
        assert_eq!(result.unpacked_labels(), vec!["B#1 (height overflow)"]);
    }

    #[test]
    fn items_fill_shelves_left_to_right_then_upwards() {
        let items = vec![
            item("A#1", (4, 4, 3), false),
            item("A#2", (4, 4, 3), false),
            item("A#3", (4, 4, 3), false),
        ];
        let result = pack_items(&container(10, 10, 10), &items).unwrap();

        let positions: Vec<_> = result.placements.iter().map(|p| p.position()).collect();
        assert_eq!(positions, vec![(0, 0, 0), (4, 0, 0), (0, 0, 3)]);
        assert_eq!(result.shelf_count(), 2);
        assert_eq!(result.shelves[1].start_z, 3);
        assert!(result.placements.iter().all(|p| p.y == 0));
    }

    #[test]
    fn items_processed_by_descending_volume_with_stable_ties() {
        let items = vec![
            item("S#1", (1, 1, 1), false),
            item("M#1", (2, 2, 2), false),
            item("T#1", (2, 4, 1), false),
            item("L#1", (3, 3, 3), false),
            item("T#2", (4, 2, 1), false),
        ];
        let mut started = Vec::new();
        pack_items_with_progress(
            &container(20, 20, 20),
            &items,
            PackingConfig::default(),
            |evt| {
                if let PackEvent::ItemStarted { id, .. } = evt {
                    started.push(id.clone());
                }
            },
        )
        .unwrap();

        // M#1, T#1 and T#2 all have volume 8 and keep their input order.
        assert_eq!(started, vec!["L#1", "M#1", "T#1", "T#2", "S#1"]);
    }

    #[test]
    fn caller_items_are_left_untouched() {
        let items = vec![item("B#1", (2, 2, 2), true), item("A#1", (5, 5, 5), true)];
        let snapshot = items.clone();

        let first = pack_items(&container(10, 10, 10), &items).unwrap();
        let second = pack_items(&container(10, 10, 10), &items).unwrap();

        assert_eq!(items, snapshot);
        assert_eq!(first.placements, second.placements);
    }

    #[test]
    fn strict_bounds_check_fails_run_on_ceiling_overrun() {
        // Shelf 0: A#1 at z=0 (h=4). Shelf 1: B#1 at z=4 (h=4). Shelf 2:
        // C#1 at z=8 (h=2, length 5). D#1 (1x1x6) has no room on shelves 0
        // and 1 but fits shelf 2 along X and ends at z = 14.
        let items = vec![
            item("A#1", (10, 10, 4), false),
            item("B#1", (10, 10, 4), false),
            item("C#1", (5, 10, 2), false),
            item("D#1", (1, 1, 6), false),
        ];
        let c = container(10, 10, 10);

        let warn = pack_items(&c, &items).unwrap();
        let tall = warn.placement_for("D#1").unwrap();
        assert_eq!((tall.shelf_index, tall.x, tall.z), (2, 5, 8));
        assert_eq!(warn.shelves[2].height, 6);
        assert_eq!(warn.bounds_violations.len(), 1);
        assert_eq!(warn.bounds_violations[0].axis, Axis::Height);
        assert_eq!(warn.bounds_violations[0].end, 14);

        let off = pack_items_with_config(
            &c,
            &items,
            PackingConfig::builder().bounds_check(BoundsCheck::Off).build(),
        )
        .unwrap();
        assert!(off.bounds_violations.is_empty());
        assert_eq!(off.placements, warn.placements);

        let strict = pack_items_with_config(
            &c,
            &items,
            PackingConfig::builder()
                .bounds_check(BoundsCheck::Strict)
                .build(),
        );
        assert!(matches!(strict, Err(PackError::OutOfBounds(ref v)) if v.item_instance_id == "D#1"));
    }

    #[test]
    fn empty_item_list_succeeds_unless_items_required() {
        let c = container(10, 10, 10);
        let result = pack_items(&c, &[]).unwrap();
        assert_eq!(result.metrics.total_items, 0);
        assert!(result.is_complete());

        let config = PackingConfig::builder().require_items(true).build();
        assert_eq!(
            pack_items_with_config(&c, &[], config).unwrap_err(),
            PackError::NoItems
        );
    }

    #[test]
    fn invalid_input_fails_fast() {
        let bad_container = Container {
            dims: Dims::new(0, 10, 10),
            unit: None,
        };
        assert!(matches!(
            pack_items(&bad_container, &[item("A#1", (1, 1, 1), false)]),
            Err(PackError::InvalidContainer(_))
        ));

        let duplicates = vec![item("A#1", (1, 1, 1), false), item("A#1", (2, 2, 2), false)];
        assert!(matches!(
            pack_items(&container(10, 10, 10), &duplicates),
            Err(PackError::InvalidItem(ValidationError::InvalidIdentifier(_)))
        ));

        let mut zero = item("Z#1", (1, 1, 1), false);
        zero.dims.height = 0;
        assert!(matches!(
            pack_items(&container(10, 10, 10), &[zero]),
            Err(PackError::InvalidItem(ValidationError::InvalidDimension(_)))
        ));
    }

    #[test]
    fn events_trace_shelf_creation_and_finish() {
        let items = vec![item("A#1", (6, 6, 6), false), item("A#2", (6, 6, 6), false)];
        let mut events = Vec::new();
        pack_items_with_progress(
            &container(10, 10, 10),
            &items,
            PackingConfig::default(),
            |evt| events.push(evt.clone()),
        )
        .unwrap();

        assert!(matches!(
            events.first(),
            Some(PackEvent::Started { total_items: 2, .. })
        ));
        assert!(events.iter().any(|evt| matches!(
            evt,
            PackEvent::ShelfCreated {
                index: 0,
                start_z: 0,
                height: 6
            }
        )));
        assert!(events.iter().any(|evt| matches!(
            evt,
            PackEvent::ShelfRejected { shelf_index: 0, .. }
        )));
        assert!(matches!(
            events.last(),
            Some(PackEvent::Finished {
                packed: 1,
                unpacked: 1,
                ..
            })
        ));

        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["type"], "Started");
    }

    #[test]
    fn generated_runs_keep_invariants() {
        let c = container(40, 25, 30);

        for seed in 1..=40 {
            let items = generated_items(seed, 30, 18);
            let result = pack_items_with_config(
                &c,
                &items,
                PackingConfig::builder().bounds_check(BoundsCheck::Off).build(),
            )
            .unwrap();
            let metrics = &result.metrics;

            assert_eq!(
                metrics.items_packed + metrics.items_unpacked,
                metrics.total_items
            );
            assert_eq!(metrics.total_items, items.len());

            let mut resolved: Vec<&str> = result
                .placements
                .iter()
                .map(|p| p.item_instance_id.as_str())
                .chain(result.unpacked.iter().map(|u| u.item_instance_id.as_str()))
                .collect();
            resolved.sort_unstable();
            resolved.dedup();
            assert_eq!(resolved.len(), items.len(), "seed {}", seed);

            let mut previous_z = 0;
            for shelf in &result.shelves {
                assert!(shelf.current_x <= c.dims.length);
                assert!(shelf.start_z >= previous_z);
                previous_z = shelf.start_z;

                let tallest = result
                    .placements
                    .iter()
                    .filter(|p| p.shelf_index == shelf.index)
                    .map(|p| p.height)
                    .max()
                    .unwrap();
                assert_eq!(shelf.height, tallest);

                let first = result
                    .placements
                    .iter()
                    .find(|p| p.shelf_index == shelf.index)
                    .unwrap();
                assert!(shelf.start_z + first.height <= c.dims.height);
            }

            let packed: u64 = result.placements.iter().map(|p| p.volume).sum();
            let expected = 100.0 * packed as f64 / c.volume() as f64;
            assert!((metrics.utilization_percent - expected).abs() < 1e-9);
        }
    }
}
