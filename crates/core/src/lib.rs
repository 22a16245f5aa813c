#![warn(missing_docs)]
//! Voxel and material primitives for anvil smithing.

pub mod catalog;
pub mod code;
pub mod item;
pub mod mold;
pub mod pattern;
pub mod recipe;
pub mod voxel;

// Re-export commonly used types
pub use catalog::MaterialCatalog;
pub use code::{AssetCode, CodeError, DEFAULT_DOMAIN};
pub use item::{HelveWorkableMode, ItemKind, ItemMeta, ItemStack, WorkableDef};
pub use mold::{MoldDrop, ToolMold, DEFAULT_REQUIRED_UNITS, METAL_PLACEHOLDER};
pub use pattern::{Pattern, PatternError};
pub use recipe::{RecipeFlags, RecipeId, RecipeIngredient, RecipeOutput, SmithingRecipe};
pub use voxel::{
    OverlayError, VoxelCell, VoxelError, VoxelGrid, ANVIL_SIZE_X, ANVIL_SIZE_Y, ANVIL_SIZE_Z,
};
