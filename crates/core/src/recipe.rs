//! Smithing recipes - voxel targets forged from an ingredient material

use crate::code::AssetCode;
use crate::voxel::VoxelGrid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque recipe identifier assigned by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecipeId(pub u32);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Recipe-level attributes attached to the ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeFlags {
    /// Only used to repair existing work; never offered for new work.
    pub repair_only: bool,
    /// Only offered when starting from metal bits.
    pub nugget_recipe: bool,
    /// Only offered when starting from a custom anvil workable.
    pub workable_recipe: bool,
    /// Marks a recycling tool ingredient in grid recipes.
    pub recycling_recipe: bool,
    /// Used as a tool, not consumed as material, in grid recipes.
    pub tool: bool,
}

/// Ingredient matcher of a smithing recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    /// Code or wildcard pattern (e.g. `game:ingot-*`).
    pub code: AssetCode,
    /// Recipe attributes.
    pub flags: RecipeFlags,
}

impl RecipeIngredient {
    /// Whether the ingredient accepts an item.
    pub fn accepts(&self, code: &AssetCode) -> bool {
        self.code.matches(code)
    }

    /// Whether stacks matching this ingredient are tools of a recycling
    /// recipe rather than metal to recover.
    pub fn is_recycling_tool(&self) -> bool {
        self.flags.tool || self.flags.recycling_recipe
    }
}

/// Resolved output of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipeOutput {
    /// Item produced.
    pub code: AssetCode,
    /// Number of items produced.
    pub stack_size: u32,
}

/// A smithing recipe known to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SmithingRecipe {
    /// Catalog identifier.
    pub id: RecipeId,
    /// Accepted input material.
    pub ingredient: RecipeIngredient,
    /// Produced stack.
    pub output: RecipeOutput,
    /// Target shape.
    pub voxels: VoxelGrid,
}

impl SmithingRecipe {
    /// Number of filled cells in the target shape.
    pub fn voxel_count(&self) -> usize {
        self.voxels.total_count()
    }

    /// Output stack size, never below one.
    pub fn output_size(&self) -> usize {
        self.output.stack_size.max(1) as usize
    }
}
