//! Ingredient counts shown in the anvil recipe selector.

/// `ceil(numerator / denominator)` for positive integers.
pub fn ceil_div(numerator: usize, denominator: usize) -> usize {
    numerator.div_ceil(denominator.max(1))
}

/// How many of an input item a recipe with `recipe_voxels` consumes.
///
/// Workables divide by their handbook voxel count; anything else is
/// measured in ingots of `voxels_per_ingot`, scaled by its smelted ratio.
pub fn ingredient_count(
    recipe_voxels: usize,
    handbook_voxels: Option<usize>,
    smelted_ratio: Option<u32>,
    voxels_per_ingot: f32,
) -> u32 {
    match handbook_voxels {
        Some(per_item) => ceil_div(recipe_voxels, per_item) as u32,
        None => {
            let ratio = f64::from(smelted_ratio.unwrap_or(1));
            (recipe_voxels as f64 * ratio / f64::from(voxels_per_ingot)).ceil() as u32
        }
    }
}
