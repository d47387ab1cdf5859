//! Shelves: horizontal rows at a fixed floor level.

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::ItemInstance;
use crate::orientation::Orientation;

/// A row of items sharing one floor level.
///
/// # Fields
/// * `index` - Creation order, starting at 0
/// * `start_z` - Floor level, fixed at creation
/// * `height` - Height of the tallest item placed so far
/// * `current_x` - Offset where the next item starts
/// * `items` - Instance ids in placement order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Shelf {
    pub index: usize,
    pub start_z: u64,
    pub height: u64,
    pub current_x: u64,
    pub items: Vec<String>,
}

impl Shelf {
    /// Allocates an empty shelf.
    pub fn new(index: usize, start_z: u64, initial_height: u64) -> Self {
        Self {
            index,
            start_z,
            height: initial_height,
            current_x: 0,
            items: Vec::new(),
        }
    }

    /// Appends an item to the shelf.
    ///
    /// The item starts at the current X offset, at the front edge (y = 0),
    /// on the shelf floor. The offset then advances by the item's length and
    /// the shelf grows to the item's height if it is taller.
    ///
    /// # Returns
    /// Position `(x, y, z)` of the item's lower front left corner
    pub fn place(&mut self, item: &ItemInstance, orientation: &Orientation) -> (u64, u64, u64) {
        let position = (self.current_x, 0, self.start_z);

        self.current_x += orientation.dims.length;
        self.height = self.height.max(orientation.dims.height);
        self.items.push(item.instance_id.clone());

        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::generate_orientations;

    fn item(id: &str, dims: (i64, i64, i64)) -> ItemInstance {
        ItemInstance::new(id, "P", dims, false).unwrap()
    }

    #[test]
    fn new_shelf_starts_empty_at_origin() {
        let shelf = Shelf::new(2, 7, 3);
        assert_eq!(shelf.index, 2);
        assert_eq!(shelf.start_z, 7);
        assert_eq!(shelf.height, 3);
        assert_eq!(shelf.current_x, 0);
        assert!(shelf.items.is_empty());
    }

    #[test]
    fn placing_advances_offset_and_grows_height() {
        let mut shelf = Shelf::new(0, 4, 2);

        let first = item("A#1", (3, 5, 2));
        let pos = shelf.place(&first, &generate_orientations(&first)[0]);
        assert_eq!(pos, (0, 0, 4));
        assert_eq!(shelf.current_x, 3);
        assert_eq!(shelf.height, 2);

        let second = item("B#1", (2, 2, 5));
        let pos = shelf.place(&second, &generate_orientations(&second)[0]);
        assert_eq!(pos, (3, 0, 4));
        assert_eq!(shelf.current_x, 5);
        assert_eq!(shelf.height, 5);

        let third = item("C#1", (1, 1, 1));
        shelf.place(&third, &generate_orientations(&third)[0]);
        assert_eq!(shelf.height, 5, "shelf height never shrinks");
        assert_eq!(shelf.start_z, 4, "floor level never moves");
        assert_eq!(shelf.items, vec!["A#1", "B#1", "C#1"]);
    }
}
