//! Anvil workables: items that can be placed on an anvil as voxels.

use forgework_core::{HelveWorkableMode, Pattern, VoxelGrid, WorkableDef};
use rand::Rng;

use crate::config::SmithingConfig;
use crate::query::QueryContext;

/// Voxels a metal bit is credited with in the handbook.
pub const BIT_HANDBOOK_VOXELS: usize = 2;

/// Where a workable may be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementMode {
    /// Never.
    None,
    /// On an empty anvil or onto an existing work piece.
    Normal,
    /// Only on an empty anvil.
    Empty,
    /// Only onto an existing work piece.
    Present,
}

impl PlacementMode {
    /// Whether a new work piece may be started.
    pub fn allows_empty(self) -> bool {
        matches!(self, Self::Normal | Self::Empty)
    }

    /// Whether voxels may be added to an existing work piece.
    pub fn allows_present(self) -> bool {
        matches!(self, Self::Normal | Self::Present)
    }
}

/// A workable definition bound to the active configuration.
#[derive(Debug, Clone, Copy)]
pub struct Workable<'a> {
    def: &'a WorkableDef,
    config: &'a SmithingConfig,
}

impl<'a> Workable<'a> {
    /// Bind `def` to `config`.
    pub fn new(def: &'a WorkableDef, config: &'a SmithingConfig) -> Self {
        Self { def, config }
    }

    /// Voxels placed on the anvil.
    ///
    /// Randomized cells only roll when the workable enables extra voxels and
    /// an RNG is supplied.
    pub fn voxels<R: Rng>(&self, rng: Option<&mut R>) -> VoxelGrid {
        match self.def {
            WorkableDef::Pattern {
                pattern,
                extra_voxels: true,
                extra_chance,
                ..
            } => pattern.generate(rng, *extra_chance),
            WorkableDef::Pattern { pattern, .. } => pattern.generate_deterministic(),
            WorkableDef::Nugget {
                ignore_extra_voxels: true,
            } => Pattern::metal_bit().generate_deterministic(),
            WorkableDef::Nugget { .. } => {
                Pattern::metal_bit().generate(rng, self.config.bit_extra_chance())
            }
        }
    }

    /// Guaranteed voxel count, as shown in the handbook.
    pub fn handbook_voxel_count(&self) -> usize {
        match self.def {
            WorkableDef::Pattern { pattern, .. } => pattern.generate_deterministic().material_count(),
            WorkableDef::Nugget { .. } => BIT_HANDBOOK_VOXELS,
        }
    }

    /// Where the workable may be placed.
    pub fn placement_mode(&self) -> PlacementMode {
        match self.def {
            WorkableDef::Pattern { .. } => PlacementMode::Normal,
            WorkableDef::Nugget { .. } => self.config.bit_placement_mode(),
        }
    }

    /// Helve hammer behavior.
    pub fn helve_mode(&self) -> HelveWorkableMode {
        match self.def {
            WorkableDef::Pattern { helve_mode, .. } => *helve_mode,
            WorkableDef::Nugget { .. } => HelveWorkableMode::NotWorkable,
        }
    }

    /// Recipe query context for this workable.
    pub fn query_context(&self) -> QueryContext {
        match self.def {
            WorkableDef::Pattern { .. } => QueryContext::PatternWorkable,
            WorkableDef::Nugget { .. } => QueryContext::Nugget,
        }
    }
}
