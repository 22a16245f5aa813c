//! Placing workables onto an anvil, and reading anvil progress.

use forgework_core::{AssetCode, ItemStack, OverlayError, VoxelGrid};
use thiserror::Error;
use tracing::debug;

use crate::metal::MetalMaterial;
use crate::workable::PlacementMode;

/// Current contents of an anvil.
#[derive(Debug, Clone, PartialEq)]
pub struct AnvilState {
    /// The work piece on the anvil, if any.
    pub work_item: Option<ItemStack>,
    /// Voxels of the work piece (all empty without one).
    pub voxels: VoxelGrid,
}

impl AnvilState {
    /// An anvil with nothing on it.
    pub fn empty() -> Self {
        Self {
            work_item: None,
            voxels: VoxelGrid::anvil(),
        }
    }

    /// An anvil holding `work_item` with `voxels`.
    pub fn holding(work_item: ItemStack, voxels: VoxelGrid) -> Self {
        Self {
            work_item: Some(work_item),
            voxels,
        }
    }
}

impl Default for AnvilState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Why a workable could not be placed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    /// The item (or the piece already on the anvil) is too cold to work.
    #[error("{0} is not hot enough to work")]
    NotWorkable(AssetCode),
    /// The item is not an anvil workable.
    #[error("{0} cannot be placed on an anvil")]
    NotAWorkable(AssetCode),
    /// The workable's placement mode forbids this anvil state.
    #[error("placement mode {mode:?} does not allow this anvil state")]
    PlacementNotAllowed {
        /// Mode of the workable.
        mode: PlacementMode,
    },
    /// The work piece on the anvil is a different metal.
    #[error(
        "must be the same metal to add voxels ({placed} onto {})",
        describe_existing(.existing)
    )]
    IncompatibleMaterial {
        /// Ingot of the placed material.
        placed: AssetCode,
        /// Ingot of the work piece, when it has one.
        existing: Option<AssetCode>,
    },
    /// The item has no resolvable metal.
    #[error("{0} has no metal material")]
    NoMetalMaterial(AssetCode),
    /// The workable produced no metal voxels.
    #[error("{0} has no voxels to place")]
    NothingToPlace(AssetCode),
    /// The voxels do not fit on the work piece.
    #[error("try hammering down before adding additional voxels: {0}")]
    Overflow(#[from] OverlayError),
}

fn describe_existing(existing: &Option<AssetCode>) -> String {
    existing
        .as_ref()
        .map_or_else(|| "unknown metal".to_string(), ToString::to_string)
}

/// A successful placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Anvil voxels after the merge.
    pub voxels: VoxelGrid,
    /// Work item now on the anvil, carrying the placed item's temperature.
    pub work_item: ItemStack,
}

/// Everything known about the item being placed.
#[derive(Debug, Clone, Copy)]
pub struct PlacementRequest<'a> {
    /// The stack being placed.
    pub stack: &'a ItemStack,
    /// Its metal, if resolvable.
    pub material: Option<&'a MetalMaterial>,
    /// Its placement mode.
    pub mode: PlacementMode,
    /// Voxels it contributes.
    pub voxels: &'a VoxelGrid,
}

/// Merge a workable's voxels onto the anvil.
///
/// Workability of both the item and the anvil's piece is checked by the
/// caller; this applies the placement mode, metal compatibility and the
/// all-or-nothing overlay. The anvil is never modified.
pub fn place_on_anvil(
    anvil: &AnvilState,
    anvil_material: Option<&MetalMaterial>,
    request: PlacementRequest<'_>,
) -> Result<Placement, PlacementError> {
    let code = &request.stack.code;
    let material = request
        .material
        .ok_or_else(|| PlacementError::NoMetalMaterial(code.clone()))?;
    if request.voxels.material_count() == 0 {
        return Err(PlacementError::NothingToPlace(code.clone()));
    }

    let mut work_item = ItemStack::new(material.work_item.clone(), 1)
        .with_temperature(request.stack.temperature);

    if anvil.work_item.is_none() {
        if !request.mode.allows_empty() {
            debug!(code = %code, mode = ?request.mode, "refusing to start a work piece");
            return Err(PlacementError::PlacementNotAllowed { mode: request.mode });
        }
        let voxels = anvil.voxels.overlay(request.voxels)?;
        work_item.voxels = Some(voxels.clone());
        return Ok(Placement { voxels, work_item });
    }

    if !request.mode.allows_present() {
        debug!(code = %code, mode = ?request.mode, "refusing to add onto a work piece");
        return Err(PlacementError::PlacementNotAllowed { mode: request.mode });
    }

    if anvil_material != Some(material) {
        debug!(
            code = %code,
            placed = %material.ingot,
            existing = ?anvil_material.map(|m| m.ingot.to_string()),
            "incompatible metal on anvil"
        );
        return Err(PlacementError::IncompatibleMaterial {
            placed: material.ingot.clone(),
            existing: anvil_material.map(|m| m.ingot.clone()),
        });
    }

    let voxels = anvil.voxels.overlay(request.voxels).map_err(|err| {
        debug!(code = %code, error = %err, "voxels do not fit on work piece");
        PlacementError::Overflow(err)
    })?;
    work_item.voxels = Some(voxels.clone());
    Ok(Placement { voxels, work_item })
}

/// Progress of the selected recipe on an anvil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnvilProgress {
    /// Metal voxels currently on the anvil.
    pub current: usize,
    /// Voxels in the selected recipe.
    pub target: usize,
    /// Slag voxels currently on the anvil.
    pub slag: usize,
}

/// Progress readout for `voxels` against a recipe with `recipe_voxels`.
pub fn anvil_progress(voxels: &VoxelGrid, recipe_voxels: usize) -> AnvilProgress {
    AnvilProgress {
        current: voxels.material_count(),
        target: recipe_voxels,
        slag: voxels.slag_count(),
    }
}
