//! Smithing tunables.

use forgework_core::{AssetCode, DEFAULT_DOMAIN};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::workable::PlacementMode;

/// Lowest accepted voxels-per-bit ratio.
pub const MIN_VOXELS_PER_BIT: f32 = 2.0;
/// Highest accepted voxels-per-bit ratio.
pub const MAX_VOXELS_PER_BIT: f32 = 3.0;

/// Server-side smithing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmithingConfig {
    /// Voxels represented by one metal bit.
    pub voxels_per_bit: f32,
    /// Metal bits may start a new work piece on an empty anvil.
    pub smith_with_bits: bool,
    /// Metal bits may be added onto an existing work piece.
    pub bits_top_up: bool,
    /// Compute mold units from smithing recipes instead of the static value.
    pub dynamic_mold_units: bool,
    /// Metal assumed for mold drop templates.
    pub reference_ingot: AssetCode,
    /// Voxels in one reference ingot.
    pub voxels_per_reference_ingot: f32,
    /// Liquid units in one reference ingot.
    pub units_per_reference_ingot: f32,
    /// Divisor for ingredient counts shown in the recipe selector.
    pub voxels_per_ingot_display: f32,
}

impl Default for SmithingConfig {
    fn default() -> Self {
        Self {
            voxels_per_bit: 2.1,
            smith_with_bits: true,
            bits_top_up: true,
            dynamic_mold_units: false,
            reference_ingot: AssetCode::from_parts(DEFAULT_DOMAIN, "ingot-copper"),
            voxels_per_reference_ingot: 42.0,
            units_per_reference_ingot: 100.0,
            voxels_per_ingot_display: 42.0,
        }
    }
}

impl SmithingConfig {
    /// Clamp out-of-range values, warning about each one.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(MIN_VOXELS_PER_BIT..=MAX_VOXELS_PER_BIT).contains(&self.voxels_per_bit) {
            let clamped = if self.voxels_per_bit.is_nan() {
                defaults.voxels_per_bit
            } else {
                self.voxels_per_bit
                    .clamp(MIN_VOXELS_PER_BIT, MAX_VOXELS_PER_BIT)
            };
            warn!(
                configured = self.voxels_per_bit,
                clamped, "voxels_per_bit out of range [2, 3]"
            );
            self.voxels_per_bit = clamped;
        }
        for (name, value, default) in [
            (
                "voxels_per_reference_ingot",
                &mut self.voxels_per_reference_ingot,
                defaults.voxels_per_reference_ingot,
            ),
            (
                "units_per_reference_ingot",
                &mut self.units_per_reference_ingot,
                defaults.units_per_reference_ingot,
            ),
            (
                "voxels_per_ingot_display",
                &mut self.voxels_per_ingot_display,
                defaults.voxels_per_ingot_display,
            ),
        ] {
            if !(*value > 0.0) {
                warn!(setting = name, configured = *value, default, "ratio must be positive, using default");
                *value = default;
            }
        }
        self
    }

    /// Where metal bits may be placed, from the two bit toggles.
    pub fn bit_placement_mode(&self) -> PlacementMode {
        match (self.smith_with_bits, self.bits_top_up) {
            (true, true) => PlacementMode::Normal,
            (true, false) => PlacementMode::Empty,
            (false, true) => PlacementMode::Present,
            (false, false) => PlacementMode::None,
        }
    }

    /// Chance of a metal bit's third voxel: the fractional part of
    /// `voxels_per_bit`.
    pub fn bit_extra_chance(&self) -> f32 {
        self.voxels_per_bit - self.voxels_per_bit.floor()
    }

    /// Metal variant substituted into mold drop templates.
    pub fn reference_metal(&self) -> &str {
        self.reference_ingot.last_part()
    }
}
