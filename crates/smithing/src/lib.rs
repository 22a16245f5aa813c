#![warn(missing_docs)]
//! Anvil smithing rules: recipe selection, mold unit costs, voxel placement
//! and bit recycling, over a host-supplied [`MaterialCatalog`].

pub mod anvil;
pub mod bits;
pub mod cache;
pub mod config;
pub mod metal;
pub mod query;
pub mod selector;
pub mod units;
pub mod workable;

use forgework_core::{
    AssetCode, ItemMeta, ItemStack, MaterialCatalog, RecipeId, RecipeIngredient, SmithingRecipe,
    VoxelGrid,
};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

pub use anvil::{
    anvil_progress, place_on_anvil, AnvilProgress, AnvilState, Placement, PlacementError,
    PlacementRequest,
};
pub use bits::{bit_yield, bits_for_voxels, BitInput, BitYield};
pub use cache::MemoCache;
pub use config::{SmithingConfig, MAX_VOXELS_PER_BIT, MIN_VOXELS_PER_BIT};
pub use metal::{resolve_metal_material, MetalMaterial};
pub use query::QueryContext;
pub use units::RequiredUnits;
pub use workable::{PlacementMode, Workable, BIT_HANDBOOK_VOXELS};

/// Metal bits that can fill a mold, and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastingRequirement {
    /// The bit item.
    pub bit: AssetCode,
    /// Bits needed for one cast.
    pub count: u32,
}

/// Smithing rules bound to a catalog and configuration.
///
/// Lookups that only depend on catalog contents are memoized; call
/// [`Smithy::reset_caches`] after the catalog changes.
#[derive(Debug)]
pub struct Smithy<C> {
    catalog: C,
    config: SmithingConfig,
    metals: MemoCache<AssetCode, Option<MetalMaterial>>,
    recipe_voxels: MemoCache<RecipeId, usize>,
    max_burn_temperature: MemoCache<(), f32>,
}

impl<C: MaterialCatalog> Smithy<C> {
    /// Bind `catalog` to a sanitized copy of `config`.
    pub fn new(catalog: C, config: SmithingConfig) -> Self {
        Self {
            catalog,
            config: config.sanitized(),
            metals: MemoCache::new(),
            recipe_voxels: MemoCache::new(),
            max_burn_temperature: MemoCache::new(),
        }
    }

    /// The catalog.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Active (sanitized) configuration.
    pub fn config(&self) -> &SmithingConfig {
        &self.config
    }

    fn recipes(&self) -> &[SmithingRecipe] {
        self.catalog.smithing_recipes()
    }

    /// Metal material of `code`, memoized.
    pub fn metal_material(&self, code: &AssetCode) -> Option<MetalMaterial> {
        self.metals.get_or_insert_with(code.clone(), || {
            resolve_metal_material(&self.catalog, code)
        })
    }

    /// Anvil-workable capability of `code`, if it has one.
    pub fn workable(&self, code: &AssetCode) -> Option<Workable<'_>> {
        let def = self.catalog.item(code)?.workable.as_ref()?;
        Some(Workable::new(def, &self.config))
    }

    /// Recipe query context for `code`.
    pub fn query_context(&self, code: &AssetCode) -> QueryContext {
        QueryContext::for_item(self.catalog.item(code))
    }

    /// Temperature at which `code` becomes workable.
    ///
    /// Items that declare neither a melting point nor an override (work
    /// items usually) inherit the threshold of their metal's ingot.
    pub fn workable_temperature(&self, code: &AssetCode) -> Option<f32> {
        let meta = self.catalog.item(code);
        if let Some(meta) = meta.filter(|m| declares_workability(m)) {
            return Some(meta.workable_temperature());
        }
        let ingot = self.metal_material(code)?.ingot;
        self.catalog
            .item(&ingot)
            .filter(|m| declares_workability(m))
            .map(ItemMeta::workable_temperature)
    }

    /// Whether `stack` is hot enough to work.
    pub fn is_workable(&self, stack: &ItemStack) -> bool {
        self.workable_temperature(&stack.code)
            .is_some_and(|threshold| stack.temperature >= threshold)
    }

    /// Recipes `stack` can be worked into, in dialog order.
    pub fn matching_recipes(&self, stack: &ItemStack) -> Vec<&SmithingRecipe> {
        let base = self.metal_material(&stack.code).map(|m| m.ingot);
        query::matching_recipes(
            self.recipes(),
            &stack.code,
            base.as_ref(),
            self.query_context(&stack.code),
        )
    }

    /// Recipe producing `item` with the most voxels per output item.
    pub fn cheapest_recipe(&self, item: &AssetCode) -> Option<&SmithingRecipe> {
        query::cheapest_recipe(self.recipes(), item)
    }

    /// Recipe producing `item` with the largest output stack.
    pub fn largest_recipe(&self, item: &AssetCode) -> Option<&SmithingRecipe> {
        query::largest_recipe(self.recipes(), item)
    }

    /// Recipe producing exactly `stack_size` of `item`.
    pub fn recipe_with_output_size(
        &self,
        item: &AssetCode,
        stack_size: u32,
    ) -> Option<&SmithingRecipe> {
        query::recipe_with_output_size(self.recipes(), item, stack_size)
    }

    /// Recipe producing a single `item`.
    pub fn single_recipe(&self, item: &AssetCode) -> Option<&SmithingRecipe> {
        query::single_recipe(self.recipes(), item)
    }

    /// Voxel count of a recipe, memoized by id.
    pub fn recipe_voxel_count(&self, id: RecipeId) -> Option<usize> {
        if let Some(count) = self.recipe_voxels.get(&id) {
            return Some(count);
        }
        let recipe = self.catalog.recipe(id)?;
        Some(
            self.recipe_voxels
                .get_or_insert_with(id, || recipe.voxel_count()),
        )
    }

    /// Units a mold with `outputs` should require, or `fallback`.
    pub fn required_units(&self, outputs: &[(AssetCode, u32)], fallback: u32) -> RequiredUnits {
        units::required_units(
            self.recipes(),
            outputs,
            fallback,
            self.config.voxels_per_reference_ingot,
            self.config.units_per_reference_ingot,
        )
    }

    /// Units the mold `code` requires, cast in the reference metal.
    ///
    /// Returns `None` for unknown molds. The static units apply unless
    /// dynamic mold units are enabled and the drops have recipes.
    pub fn mold_required_units(&self, code: &AssetCode) -> Option<RequiredUnits> {
        let mold = self.catalog.mold(code)?;
        let fallback = mold.static_units();
        if !self.config.dynamic_mold_units {
            return Some(RequiredUnits::Fallback(fallback));
        }
        let reference = &self.config.reference_ingot;
        if self.catalog.item(reference).is_none() {
            debug!(mold = %code, reference = %reference, "reference ingot missing, using static units");
            return Some(RequiredUnits::Fallback(fallback));
        }
        let drops = match mold.resolve_drops(self.config.reference_metal()) {
            Ok(drops) => drops,
            Err(err) => {
                debug!(mold = %code, error = %err, "unresolvable drop template, using static units");
                return Some(RequiredUnits::Fallback(fallback));
            }
        };
        let outputs: Vec<(AssetCode, u32)> = drops
            .into_iter()
            .filter(|(drop, _)| self.catalog.item(drop).is_some())
            .collect();
        let units = match self.required_units(&outputs, fallback) {
            RequiredUnits::Computed(0) => RequiredUnits::Fallback(fallback),
            units => units,
        };
        if units.is_fallback() {
            debug!(mold = %code, units = fallback, "no recipe data for drops, using static units");
        }
        Some(units)
    }

    /// Guaranteed voxel count of a workable, as shown in the handbook.
    pub fn voxel_count_for_handbook(&self, code: &AssetCode) -> Option<usize> {
        self.workable(code).map(|w| w.handbook_voxel_count())
    }

    /// Stack `incoming` onto `existing`; the original grid and `false` when
    /// any column does not fit.
    pub fn try_overlay(&self, existing: &VoxelGrid, incoming: &VoxelGrid) -> (VoxelGrid, bool) {
        existing.try_overlay(incoming)
    }

    /// Place one of `stack` onto `anvil`.
    ///
    /// Both the item and the piece already on the anvil must be hot enough
    /// to work. Randomized voxels roll only when `rng` is given.
    pub fn try_place<R: Rng>(
        &self,
        stack: &ItemStack,
        anvil: &AnvilState,
        rng: Option<&mut R>,
    ) -> Result<Placement, PlacementError> {
        let workable = self
            .workable(&stack.code)
            .ok_or_else(|| PlacementError::NotAWorkable(stack.code.clone()))?;
        if !self.is_workable(stack) {
            return Err(PlacementError::NotWorkable(stack.code.clone()));
        }
        if let Some(piece) = anvil.work_item.as_ref().filter(|p| !self.is_workable(p)) {
            return Err(PlacementError::NotWorkable(piece.code.clone()));
        }

        let material = self.metal_material(&stack.code);
        let anvil_material = anvil
            .work_item
            .as_ref()
            .and_then(|piece| self.metal_material(&piece.code));
        let voxels = workable.voxels(rng);
        place_on_anvil(
            anvil,
            anvil_material.as_ref(),
            PlacementRequest {
                stack,
                material: material.as_ref(),
                mode: workable.placement_mode(),
                voxels: &voxels,
            },
        )
    }

    /// Bits recovered from the inputs of a recycling recipe.
    ///
    /// `ingredients` are the recipe's ingredients; stacks accepted by a tool
    /// or recycling ingredient are kept, not melted down. Inputs without a
    /// metal are ignored. Each counts its stored voxels, or its cheapest
    /// recipe's voxels per output times the stack size.
    pub fn compute_bit_yield(
        &self,
        inputs: &[ItemStack],
        ingredients: &[RecipeIngredient],
    ) -> Option<BitYield> {
        let tools: Vec<&RecipeIngredient> = ingredients
            .iter()
            .filter(|ingredient| ingredient.is_recycling_tool())
            .collect();
        let contributions = inputs
            .iter()
            .filter(|stack| !tools.iter().any(|tool| tool.accepts(&stack.code)))
            .filter(|stack| self.metal_material(&stack.code).is_some())
            .map(|stack| BitInput {
                voxels: self.stack_voxels(stack).unwrap_or(0),
                temperature: stack.temperature,
            });
        bit_yield(contributions, self.config.voxels_per_bit)
    }

    fn stack_voxels(&self, stack: &ItemStack) -> Option<usize> {
        match &stack.voxels {
            Some(grid) => Some(grid.material_count()),
            None => units::voxels_for_stack(self.recipes(), &stack.code, stack.stack_size),
        }
    }

    /// Bits produced by recycling one `source` item.
    ///
    /// Uses the stored grid when present, otherwise the voxels per output of
    /// the item's largest recipe. `None` when neither is known.
    pub fn recycling_output(&self, source: &ItemStack) -> Option<BitYield> {
        let voxels = match &source.voxels {
            Some(grid) => grid.material_count(),
            None => query::voxels_per_output(self.largest_recipe(&source.code)?),
        };
        Some(BitYield {
            bits: bits_for_voxels(voxels, self.config.voxels_per_bit),
            temperature: source.temperature,
        })
    }

    /// Inputs of `input`'s kind consumed by recipe `id`, as shown in the
    /// recipe selector. `None` for unknown recipes.
    pub fn ingredient_cost(&self, id: RecipeId, input: &ItemStack) -> Option<u32> {
        let voxels = self.recipe_voxel_count(id)?;
        let handbook = self.voxel_count_for_handbook(&input.code);
        let smelted_ratio = self.catalog.item(&input.code).and_then(|m| m.smelted_ratio);
        Some(selector::ingredient_count(
            voxels,
            handbook,
            smelted_ratio,
            self.config.voxels_per_ingot_display,
        ))
    }

    /// Progress of recipe `id` on an anvil holding `voxels`.
    pub fn anvil_progress(&self, voxels: &VoxelGrid, id: RecipeId) -> Option<AnvilProgress> {
        Some(anvil_progress(voxels, self.recipe_voxel_count(id)?))
    }

    /// Hottest burn temperature of any fuel in the catalog, memoized.
    pub fn max_fuel_burn_temperature(&self) -> f32 {
        self.max_burn_temperature.get_or_insert_with((), || {
            self.catalog
                .items()
                .filter_map(|meta| meta.burn_temperature)
                .filter(|t| *t > 0.0)
                .fold(0.0, f32::max)
        })
    }

    /// Metal bits that can fill the mold `code`, with the count each needs.
    ///
    /// A bit qualifies when it smelts into something, melts in the hottest
    /// available fuel, and its metal yields an existing drop of the mold.
    pub fn casting_requirements(&self, code: &AssetCode) -> Option<Vec<CastingRequirement>> {
        let mold = self.catalog.mold(code)?;
        let units = self.mold_required_units(code)?.value();
        let max_burn = self.max_fuel_burn_temperature();
        let castable = |metal: &str| {
            mold.resolve_drops(metal).is_ok_and(|drops| {
                drops.iter().any(|(drop, _)| self.catalog.item(drop).is_some())
            })
        };
        let requirements = self
            .catalog
            .items()
            .filter(|meta| meta.code.path().contains("metalbit"))
            .filter(|meta| meta.smelted_into.is_some())
            .filter(|meta| meta.melting_point <= max_burn)
            .filter(|meta| castable(meta.code.last_part()))
            .map(|meta| CastingRequirement {
                bit: meta.code.clone(),
                count: units::casting_bits(units, meta.smelted_ratio),
            })
            .collect();
        Some(requirements)
    }

    /// Bits of `bit` needed to fill the mold `mold`.
    pub fn casting_bits_required(&self, mold: &AssetCode, bit: &AssetCode) -> Option<u32> {
        let units = self.mold_required_units(mold)?.value();
        let ratio = self.catalog.item(bit)?.smelted_ratio;
        Some(units::casting_bits(units, ratio))
    }

    /// Anvil tier needed to work `code`: the declared requirement, else one
    /// below its metal's tier, else 0.
    pub fn required_anvil_tier(&self, code: &AssetCode) -> i32 {
        if let Some(tier) = self.catalog.item(code).and_then(|m| m.requires_anvil_tier) {
            return tier;
        }
        self.metal_material(code)
            .map(|m| i32::from(m.tier) - 1)
            .unwrap_or(0)
    }

    /// Drop every memoized lookup.
    pub fn reset_caches(&self) {
        self.metals.reset();
        self.recipe_voxels.reset();
        self.max_burn_temperature.reset();
        debug!("smithing caches reset");
    }
}

fn declares_workability(meta: &ItemMeta) -> bool {
    meta.melting_point > 0.0 || meta.workable_temperature.is_some()
}
