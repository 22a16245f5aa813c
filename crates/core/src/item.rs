//! Item metadata and stacks.

use crate::code::AssetCode;
use crate::pattern::Pattern;
use crate::voxel::VoxelGrid;
use serde::{Deserialize, Serialize};

/// Broad item role, as far as smithing cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Anything without special smithing handling.
    #[default]
    Generic,
    /// A metal ingot: the canonical base material of its metal.
    Ingot,
    /// A partially worked anvil piece carrying its own voxel grid.
    WorkItem,
}

/// How a helve hammer treats a workable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelveWorkableMode {
    /// The helve hammer ignores it.
    #[default]
    NotWorkable,
    /// Workable once enough voxels are present.
    TestSufficientVoxelsWorkable,
    /// Always workable.
    AllWorkable,
}

/// Anvil-workable capability declared by an item.
///
/// The set is closed: either a configured voxel pattern or the fixed small
/// "bit" pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkableDef {
    /// Voxels come from a declared pattern.
    Pattern {
        /// Layered cell pattern.
        pattern: Pattern,
        /// Whether randomized cells may fill when placed.
        extra_voxels: bool,
        /// Fill chance for `o` / `x` cells.
        extra_chance: f32,
        /// Helve hammer behavior.
        helve_mode: HelveWorkableMode,
    },
    /// A metal bit: fixed two-voxel pattern plus one optional extra.
    Nugget {
        /// Never roll the extra voxel.
        ignore_extra_voxels: bool,
    },
}

/// Declared attributes of an item, supplied by the host catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemMeta {
    /// Item identity.
    pub code: AssetCode,
    /// Item role.
    pub kind: ItemKind,
    /// Melting point in degrees; 0 when the item does not melt.
    pub melting_point: f32,
    /// Explicit workable temperature, overriding `melting_point / 2`.
    pub workable_temperature: Option<f32>,
    /// Units of smelted output per item, when the item smelts.
    pub smelted_ratio: Option<u32>,
    /// Item produced when this one is smelted.
    pub smelted_into: Option<AssetCode>,
    /// Fuel burn temperature, when the item is a fuel.
    pub burn_temperature: Option<f32>,
    /// Metal tier (ingots).
    pub tier: Option<u8>,
    /// Explicit anvil tier requirement.
    pub requires_anvil_tier: Option<i32>,
    /// Anvil-workable capability.
    pub workable: Option<WorkableDef>,
}

impl ItemMeta {
    /// Metadata with every optional attribute unset.
    pub fn new(code: AssetCode, kind: ItemKind) -> Self {
        Self {
            code,
            kind,
            melting_point: 0.0,
            workable_temperature: None,
            smelted_ratio: None,
            smelted_into: None,
            burn_temperature: None,
            tier: None,
            requires_anvil_tier: None,
            workable: None,
        }
    }

    /// Temperature at or above which the item can be worked.
    pub fn workable_temperature(&self) -> f32 {
        self.workable_temperature
            .unwrap_or(self.melting_point / 2.0)
    }
}

/// A concrete stack handed over by the host for one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStack {
    /// Item identity.
    pub code: AssetCode,
    /// Quantity.
    pub stack_size: u32,
    /// Current temperature in degrees.
    pub temperature: f32,
    /// Stored voxel grid (work items only).
    pub voxels: Option<VoxelGrid>,
}

impl ItemStack {
    /// Cold stack without voxels.
    pub fn new(code: AssetCode, stack_size: u32) -> Self {
        Self {
            code,
            stack_size,
            temperature: 0.0,
            voxels: None,
        }
    }

    /// Set the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Attach a stored voxel grid.
    pub fn with_voxels(mut self, voxels: VoxelGrid) -> Self {
        self.voxels = Some(voxels);
        self
    }
}
