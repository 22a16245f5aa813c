#![warn(missing_docs)]
//! Shared fixtures for smithing tests.
//!
//! The fixture pack holds copper, tin bronze and iron ingots with matching
//! bits and work items, a pattern workable (refined iron bloom), tool head
//! recipes including two arrowhead batch sizes, nugget-only, workable-only
//! and repair-only recipes, four tool molds and one fuel.

use anyhow::{Context, Result};
use forgework_assets::{catalog_from_str, Catalog};
use forgework_core::{AssetCode, ItemStack, RecipeId, VoxelCell, VoxelGrid};

/// Raw JSON of the fixture pack.
pub const FIXTURE_PACK: &str = include_str!("../fixtures/smithing_pack.json");

/// Recipe ids of the fixture pack, in catalog order.
pub mod recipes {
    use super::RecipeId;

    /// Copper pickaxe head, 37 voxels.
    pub const PICKAXEHEAD_COPPER: RecipeId = RecipeId(1);
    /// Iron pickaxe head, 37 voxels.
    pub const PICKAXEHEAD_IRON: RecipeId = RecipeId(3);
    /// Copper axe head, 42 voxels.
    pub const AXEHEAD_COPPER: RecipeId = RecipeId(4);
    /// Iron axe head, 42 voxels.
    pub const AXEHEAD_IRON: RecipeId = RecipeId(6);
    /// Four copper arrowheads, 42 voxels.
    pub const ARROWHEAD_COPPER_X4: RecipeId = RecipeId(7);
    /// Four iron arrowheads, 42 voxels.
    pub const ARROWHEAD_IRON_X4: RecipeId = RecipeId(8);
    /// Two copper arrowheads, 30 voxels.
    pub const ARROWHEAD_COPPER_X2: RecipeId = RecipeId(9);
    /// Two iron arrowheads, 30 voxels.
    pub const ARROWHEAD_IRON_X2: RecipeId = RecipeId(10);
    /// Copper nails, nugget-only, 4 voxels.
    pub const NAIL_COPPER: RecipeId = RecipeId(11);
    /// Iron plate, workable-only, 48 voxels.
    pub const METALPLATE_IRON: RecipeId = RecipeId(12);
    /// Copper helmet, repair-only, 2 voxels.
    pub const HELMET_COPPER: RecipeId = RecipeId(13);
}

/// Load the fixture pack.
pub fn try_fixture_catalog() -> Result<Catalog> {
    catalog_from_str(FIXTURE_PACK).context("fixture pack failed to load")
}

/// Load the fixture pack, panicking if it is invalid.
pub fn fixture_catalog() -> Catalog {
    match try_fixture_catalog() {
        Ok(catalog) => catalog,
        Err(err) => panic!("{err:#}"),
    }
}

/// Parse a code, panicking on malformed input.
pub fn code(input: &str) -> AssetCode {
    match AssetCode::parse(input) {
        Ok(code) => code,
        Err(err) => panic!("bad fixture code {input:?}: {err}"),
    }
}

/// A single item of `input` at `temperature`.
pub fn hot_stack(input: &str, temperature: f32) -> ItemStack {
    ItemStack::new(code(input), 1).with_temperature(temperature)
}

/// An anvil-sized grid whose first `count` cells along the x axis of the
/// bottom layer are metal, wrapping to the next z row every 16 cells.
pub fn metal_grid(count: usize) -> VoxelGrid {
    VoxelGrid::from_fn(16, 6, 16, |x, y, z| {
        if y == 0 && z * 16 + x < count {
            VoxelCell::Metal
        } else {
            VoxelCell::Empty
        }
    })
}
