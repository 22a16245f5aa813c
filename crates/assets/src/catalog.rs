use std::collections::{HashMap, HashSet};

use forgework_core::{
    AssetCode, ItemMeta, MaterialCatalog, MoldDrop, Pattern, RecipeId, RecipeIngredient,
    RecipeOutput, SmithingRecipe, ToolMold, WorkableDef, METAL_PLACEHOLDER,
};
use tracing::{debug, error, warn};

use crate::{
    AssetError, ItemDefinition, MoldDefinition, PackDefinition, RecipeDefinition,
    StackDefinition, WorkableDefinition,
};

/// In-memory catalog built from a content pack.
///
/// Items keep their pack order; recipes are numbered from 1 in pack order
/// after variant expansion.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<ItemMeta>,
    item_index: HashMap<AssetCode, usize>,
    recipes: Vec<SmithingRecipe>,
    molds: HashMap<AssetCode, ToolMold>,
}

impl Catalog {
    /// Build a catalog from a parsed pack.
    pub fn from_pack(pack: PackDefinition) -> Result<Self, AssetError> {
        let mut catalog = Self::default();
        for def in pack.items {
            catalog.insert_item(item_from_definition(def))?;
        }

        let mut seen = HashSet::new();
        for def in pack.smithing_recipes {
            for recipe in expand_recipe(def, catalog.recipes.len() as u32 + 1)? {
                let key = (
                    recipe.ingredient.code.clone(),
                    recipe.output.code.clone(),
                    recipe.output.stack_size,
                );
                if !seen.insert(key) {
                    return Err(AssetError::DuplicateRecipe {
                        ingredient: recipe.ingredient.code,
                        output: recipe.output.code,
                        stack_size: recipe.output.stack_size,
                    });
                }
                catalog.recipes.push(recipe);
            }
        }

        for def in pack.molds {
            let mold = mold_from_definition(def);
            if catalog.molds.contains_key(&mold.code) {
                return Err(AssetError::DuplicateMold(mold.code));
            }
            catalog.molds.insert(mold.code.clone(), mold);
        }

        debug!(
            items = catalog.items.len(),
            recipes = catalog.recipes.len(),
            molds = catalog.molds.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    fn insert_item(&mut self, meta: ItemMeta) -> Result<(), AssetError> {
        if self.item_index.contains_key(&meta.code) {
            return Err(AssetError::DuplicateItem(meta.code));
        }
        if let Some(WorkableDef::Pattern { pattern, .. }) = &meta.workable {
            warn_if_oversized(pattern, &meta.code);
            if pattern.generate_deterministic().material_count() == 0 {
                error!(
                    code = %meta.code,
                    "anvil workable has no voxels defined, check its voxel pattern"
                );
            }
        }
        self.item_index.insert(meta.code.clone(), self.items.len());
        self.items.push(meta);
        Ok(())
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of smithing recipes.
    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    /// Mold codes in sorted order.
    pub fn mold_codes(&self) -> Vec<&AssetCode> {
        let mut codes: Vec<_> = self.molds.keys().collect();
        codes.sort();
        codes
    }
}

impl MaterialCatalog for Catalog {
    fn smithing_recipes(&self) -> &[SmithingRecipe] {
        &self.recipes
    }

    fn item(&self, code: &AssetCode) -> Option<&ItemMeta> {
        self.item_index.get(code).map(|&idx| &self.items[idx])
    }

    fn items(&self) -> Box<dyn Iterator<Item = &ItemMeta> + '_> {
        Box::new(self.items.iter())
    }

    fn mold(&self, code: &AssetCode) -> Option<&ToolMold> {
        self.molds.get(code)
    }

    fn recipe(&self, id: RecipeId) -> Option<&SmithingRecipe> {
        let idx = (id.0 as usize).checked_sub(1)?;
        self.recipes.get(idx).filter(|r| r.id == id)
    }
}

fn item_from_definition(def: ItemDefinition) -> ItemMeta {
    let workable = def.workable.map(|w| match w {
        WorkableDefinition::Pattern {
            voxels,
            extra_voxels,
            extra_chance,
            helve_mode,
        } => WorkableDef::Pattern {
            pattern: voxels,
            extra_voxels,
            extra_chance,
            helve_mode,
        },
        WorkableDefinition::Nugget {
            ignore_extra_voxels,
        } => WorkableDef::Nugget {
            ignore_extra_voxels,
        },
    });
    ItemMeta {
        code: def.code,
        kind: def.kind,
        melting_point: def.melting_point,
        workable_temperature: def.workable_temperature,
        smelted_ratio: def.smelted_ratio,
        smelted_into: def.smelted_into,
        burn_temperature: def.burn_temperature,
        tier: def.tier,
        requires_anvil_tier: def.requires_anvil_tier,
        workable,
    }
}

fn warn_if_oversized(pattern: &Pattern, code: &AssetCode) {
    if !pattern.fits_anvil() {
        warn!(
            code = %code,
            width = pattern.width(),
            length = pattern.length(),
            height = pattern.height(),
            "voxel pattern exceeds anvil bounds, clamping"
        );
    }
}

fn expand_recipe(def: RecipeDefinition, first_id: u32) -> Result<Vec<SmithingRecipe>, AssetError> {
    warn_if_oversized(&def.pattern, &def.output.code);
    let voxels = def.pattern.generate_deterministic();
    let variants: Vec<Option<&str>> = if def.metals.is_empty() {
        vec![None]
    } else {
        def.metals.iter().map(|m| Some(m.as_str())).collect()
    };

    variants
        .into_iter()
        .enumerate()
        .map(|(offset, metal)| -> Result<SmithingRecipe, AssetError> {
            let (ingredient, output) = match metal {
                Some(metal) => (
                    def.ingredient.fill_placeholder(METAL_PLACEHOLDER, metal)?,
                    def.output.code.fill_placeholder(METAL_PLACEHOLDER, metal)?,
                ),
                None => (def.ingredient.clone(), def.output.code.clone()),
            };
            Ok(SmithingRecipe {
                id: RecipeId(first_id + offset as u32),
                ingredient: RecipeIngredient {
                    code: ingredient,
                    flags: def.attributes,
                },
                output: RecipeOutput {
                    code: output,
                    stack_size: def.output.stack_size,
                },
                voxels: voxels.clone(),
            })
        })
        .collect()
}

fn mold_from_definition(def: MoldDefinition) -> ToolMold {
    let drops = match def.drop {
        Some(single) => vec![single],
        None => def.drops,
    };
    ToolMold {
        code: def.code,
        required_units: def.required_units,
        drops: drops.into_iter().map(drop_from_definition).collect(),
    }
}

fn drop_from_definition(def: StackDefinition) -> MoldDrop {
    MoldDrop {
        code: def.code,
        stack_size: def.stack_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_pack_from_str;

    fn catalog(json: &str) -> Result<Catalog, AssetError> {
        Catalog::from_pack(load_pack_from_str(json)?)
    }

    fn code(s: &str) -> AssetCode {
        AssetCode::parse(s).unwrap()
    }

    #[test]
    fn expands_metal_variants_in_order() {
        let catalog = catalog(
            r####"{ "smithing_recipes": [
                { "ingredient": "game:ingot-{metal}", "output": { "code": "game:axehead-{metal}" },
                  "pattern": [["###"]], "metals": ["copper", "iron"] },
                { "ingredient": "game:ingot-*", "output": { "code": "game:arrowhead-*", "stack_size": 4 },
                  "pattern": [["#"]] }
            ] }"####,
        )
        .unwrap();

        let recipes = catalog.smithing_recipes();
        assert_eq!(recipes.len(), 3);
        assert_eq!(recipes[0].id, RecipeId(1));
        assert_eq!(recipes[0].output.code, code("game:axehead-copper"));
        assert_eq!(recipes[1].ingredient.code, code("game:ingot-iron"));
        assert_eq!(recipes[1].voxel_count(), 3);
        assert_eq!(recipes[2].id, RecipeId(3));
        assert_eq!(recipes[2].output.stack_size, 4);

        assert_eq!(catalog.recipe(RecipeId(2)).map(|r| r.id), Some(RecipeId(2)));
        assert!(catalog.recipe(RecipeId(0)).is_none());
        assert!(catalog.recipe(RecipeId(4)).is_none());
    }

    #[test]
    fn rejects_duplicates() {
        let dup_item = catalog(
            r#"{ "items": [ { "code": "game:ingot-iron" }, { "code": "game:ingot-iron" } ] }"#,
        );
        assert!(matches!(dup_item, Err(AssetError::DuplicateItem(c)) if c == code("game:ingot-iron")));

        let dup_recipe = catalog(
            r####"{ "smithing_recipes": [
                { "ingredient": "game:ingot-iron", "output": { "code": "game:axehead-iron" }, "pattern": [["#"]] },
                { "ingredient": "game:ingot-{metal}", "output": { "code": "game:axehead-{metal}" },
                  "pattern": [["##"]], "metals": ["iron"] }
            ] }"####,
        );
        assert!(matches!(dup_recipe, Err(AssetError::DuplicateRecipe { .. })));

        let dup_mold = catalog(
            r#"{ "molds": [ { "code": "game:toolmold-axe" }, { "code": "game:toolmold-axe" } ] }"#,
        );
        assert!(matches!(dup_mold, Err(AssetError::DuplicateMold(_))));
    }

    #[test]
    fn single_drop_takes_precedence() {
        let catalog = catalog(
            r#"{ "molds": [ {
                "code": "game:toolmold-axe",
                "required_units": 100,
                "drop": { "code": "game:axehead-{metal}" },
                "drops": [ { "code": "game:ignored-{metal}" } ]
            } ] }"#,
        )
        .unwrap();
        let mold = catalog.mold(&code("game:toolmold-axe")).unwrap();
        assert_eq!(mold.required_units, Some(100));
        assert_eq!(mold.drops.len(), 1);
        assert_eq!(mold.drops[0].code, code("game:axehead-{metal}"));
        assert_eq!(catalog.mold_codes(), vec![&code("game:toolmold-axe")]);
    }

    #[test]
    fn oversized_recipe_pattern_loads_clamped() {
        let long_row = "#".repeat(20);
        let json = format!(
            r#"{{ "smithing_recipes": [
                {{ "ingredient": "game:ingot-iron", "output": {{ "code": "game:bar-iron" }},
                  "pattern": [["{long_row}"]] }}
            ] }}"#
        );
        let catalog = catalog(&json).unwrap();
        assert_eq!(catalog.smithing_recipes()[0].voxel_count(), 16);
    }

    #[test]
    fn empty_workable_pattern_still_loads() {
        let catalog = catalog(
            r#"{ "items": [ { "code": "game:blank", "workable": { "type": "pattern", "voxels": [["_"]] } } ] }"#,
        )
        .unwrap();
        assert_eq!(catalog.item_count(), 1);
        assert!(catalog.item(&code("game:blank")).is_some());
        assert_eq!(catalog.items().count(), 1);
    }
}
