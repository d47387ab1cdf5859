//! Volume and utilization statistics over a finished placement set.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{PackError, Result};
use crate::model::Container;
use crate::types::Dimensional;

/// Summary statistics of one packing run.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Metrics {
    pub container_volume: u64,
    pub packed_volume: u64,
    pub utilization_percent: f64,
    pub total_items: usize,
    pub items_packed: usize,
    pub items_unpacked: usize,
}

impl Metrics {
    /// Aggregates the metrics of a run.
    ///
    /// # Parameters
    /// * `container` - The container that was packed
    /// * `placed_volumes` - Volume of each placed orientation
    /// * `items_unpacked` - Number of items that were not placed
    ///
    /// # Returns
    /// `Err(PackError::ZeroContainerVolume)` if the container has no volume
    pub fn compute(
        container: &Container,
        placed_volumes: impl IntoIterator<Item = u64>,
        items_unpacked: usize,
    ) -> Result<Self> {
        let container_volume = container.volume();
        if container_volume == 0 {
            return Err(PackError::ZeroContainerVolume);
        }

        let mut packed_volume: u64 = 0;
        let mut items_packed = 0;
        for volume in placed_volumes {
            packed_volume = packed_volume.saturating_add(volume);
            items_packed += 1;
        }

        Ok(Self {
            container_volume,
            packed_volume,
            utilization_percent: packed_volume as f64 / container_volume as f64 * 100.0,
            total_items: items_packed + items_unpacked,
            items_packed,
            items_unpacked,
        })
    }
}
