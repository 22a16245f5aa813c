//! Liquid-unit costs of casting molds.

use forgework_core::{AssetCode, SmithingRecipe};

use crate::query::{cheapest_recipe, voxels_per_output};

/// Units are rounded down to a multiple of this.
pub const UNIT_ROUNDING: u32 = 5;

/// Smelted ratio assumed for metal bits that do not declare one.
pub const DEFAULT_BIT_SMELTED_RATIO: u32 = 5;

/// Outcome of a required-units computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredUnits {
    /// Derived from smithing recipe voxels.
    Computed(u32),
    /// No usable recipe data; the static value applies.
    Fallback(u32),
}

impl RequiredUnits {
    /// The unit count, whichever way it was obtained.
    pub fn value(self) -> u32 {
        match self {
            Self::Computed(units) | Self::Fallback(units) => units,
        }
    }

    /// Whether the static value was used.
    pub fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Voxels needed to smith `stack_size` of `item` via its cheapest recipe,
/// or `None` if nothing produces it.
pub fn voxels_for_stack(
    recipes: &[SmithingRecipe],
    item: &AssetCode,
    stack_size: u32,
) -> Option<usize> {
    cheapest_recipe(recipes, item).map(|r| voxels_per_output(r) * stack_size as usize)
}

/// Total voxels for a set of output stacks; `None` when no output has a
/// recipe at all.
pub fn voxels_for_stacks(recipes: &[SmithingRecipe], outputs: &[(AssetCode, u32)]) -> Option<usize> {
    outputs
        .iter()
        .map(|(code, size)| voxels_for_stack(recipes, code, *size))
        .fold(None, |acc, count| match (acc, count) {
            (None, None) => None,
            (acc, count) => Some(acc.unwrap_or(0) + count.unwrap_or(0)),
        })
}

/// Convert voxels to liquid units, rounded down to a multiple of five.
pub fn units_for_voxels(
    voxel_count: usize,
    voxels_per_reference_ingot: f32,
    units_per_reference_ingot: f32,
) -> u32 {
    let units_per_voxel = units_per_reference_ingot / voxels_per_reference_ingot;
    let steps = (voxel_count as f32 * units_per_voxel / UNIT_ROUNDING as f32).floor();
    steps.max(0.0) as u32 * UNIT_ROUNDING
}

/// Units a mold with the given outputs should require.
///
/// Falls back to `fallback` when no output has a recipe or the outputs sum
/// to zero voxels.
pub fn required_units(
    recipes: &[SmithingRecipe],
    outputs: &[(AssetCode, u32)],
    fallback: u32,
    voxels_per_reference_ingot: f32,
    units_per_reference_ingot: f32,
) -> RequiredUnits {
    match voxels_for_stacks(recipes, outputs) {
        None | Some(0) => RequiredUnits::Fallback(fallback),
        Some(voxels) => RequiredUnits::Computed(units_for_voxels(
            voxels,
            voxels_per_reference_ingot,
            units_per_reference_ingot,
        )),
    }
}

/// Metal bits needed to fill `required_units`.
///
/// A missing or zero smelted ratio counts as the default ratio.
pub fn casting_bits(required_units: u32, smelted_ratio: Option<u32>) -> u32 {
    let ratio = smelted_ratio
        .filter(|ratio| *ratio > 0)
        .unwrap_or(DEFAULT_BIT_SMELTED_RATIO) as f32;
    let units_per_bit = 100.0 / ratio;
    (required_units as f32 / units_per_bit).ceil() as u32
}
