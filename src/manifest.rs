//! Input document and expansion of item templates.
//!
//! An input document names one container and a list of item templates. A
//! template may carry a quantity; before packing, every template is expanded
//! into that many single-quantity `ItemInstance`s with ids `"<parent>#<n>"`.

use std::collections::HashMap;

use serde::Deserialize;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToSchema;

use crate::error::{PackError, ValidationError};
use crate::model::{Container, ItemInstance};

/// Upper limit for the number of instances one document may expand into.
pub const MAX_INSTANCES: usize = 100_000;

/// Container section of the input document.
#[derive(Deserialize, Clone, Debug, ToSchema)]
pub struct ContainerSpec {
    pub length: i64,
    pub width: i64,
    pub height: i64,
    #[serde(default)]
    #[schema(nullable = true)]
    pub unit: Option<String>,
}

impl ContainerSpec {
    fn into_container(self) -> Result<Container, ValidationError> {
        let unit = self.unit.filter(|unit| !unit.trim().is_empty());
        Container::new((self.length, self.width, self.height), unit)
    }
}

/// Item template, possibly standing for several identical items.
///
/// Instance ids are always generated during expansion.
#[derive(Deserialize, Clone, Debug, ToSchema)]
pub struct ItemTemplate {
    #[serde(default)]
    #[schema(nullable = true)]
    pub parent_item_id: Option<String>,
    pub original_length: i64,
    pub original_width: i64,
    pub original_height: i64,
    /// Values below 1 (or a missing field) count as 1.
    #[serde(default)]
    #[schema(nullable = true)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub allow_rotation: bool,
}

/// Complete input document.
#[derive(Deserialize, Clone, Debug, ToSchema)]
#[schema(
    example = json!({
        "container": { "length": 100, "width": 60, "height": 50, "unit": "cm" },
        "items": [
            {
                "parent_item_id": "BOX",
                "original_length": 30,
                "original_width": 20,
                "original_height": 25,
                "quantity": 4,
                "allow_rotation": true
            }
        ]
    })
)]
pub struct PackInput {
    pub container: ContainerSpec,
    #[serde(default)]
    pub items: Vec<ItemTemplate>,
}

impl PackInput {
    /// Validates the container and expands the templates.
    pub fn into_parts(self) -> Result<(Container, Vec<ItemInstance>), PackError> {
        let container = self
            .container
            .into_container()
            .map_err(PackError::InvalidContainer)?;
        let items = expand_templates(&self.items).map_err(PackError::InvalidItem)?;
        Ok((container, items))
    }
}

/// Expands templates into single-quantity instances, preserving input order.
///
/// Templates without a parent id are named `"ITEM-<n>"` after their 1-based
/// position. Numbering is per parent id and continues across templates that
/// share a parent. More than [`MAX_INSTANCES`] instances in total are
/// rejected before anything is allocated.
pub fn expand_templates(templates: &[ItemTemplate]) -> Result<Vec<ItemInstance>, ValidationError> {
    let total = templates
        .iter()
        .try_fold(0usize, |sum, template| {
            let quantity = usize::try_from(effective_quantity(template)).ok()?;
            sum.checked_add(quantity).filter(|&sum| sum <= MAX_INSTANCES)
        })
        .ok_or_else(|| {
            ValidationError::InvalidQuantity(format!(
                "templates expand into more than {} instances",
                MAX_INSTANCES
            ))
        })?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut items = Vec::with_capacity(total);

    for (idx, template) in templates.iter().enumerate() {
        let parent_id = template
            .parent_item_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("ITEM-{}", idx + 1));

        let quantity = effective_quantity(template);
        let dims = (
            template.original_length,
            template.original_width,
            template.original_height,
        );

        for _ in 0..quantity {
            let counter = counts.entry(parent_id.clone()).or_insert(0);
            *counter += 1;
            items.push(ItemInstance::new(
                format!("{}#{}", parent_id, counter),
                parent_id.clone(),
                dims,
                template.allow_rotation,
            )?);
        }
    }

    Ok(items)
}

/// Missing or non-positive quantities count as one.
fn effective_quantity(template: &ItemTemplate) -> i64 {
    template.quantity.filter(|&qty| qty > 0).unwrap_or(1)
}
