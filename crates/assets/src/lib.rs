#![warn(missing_docs)]
//! Content pack schema, loading and the in-memory material catalog.

mod catalog;
mod loader;

pub use catalog::Catalog;
pub use loader::{catalog_from_file, catalog_from_str};

use forgework_core::{
    AssetCode, CodeError, HelveWorkableMode, ItemKind, Pattern, PatternError, RecipeFlags,
};
use serde::Deserialize;
use thiserror::Error;

/// Top-level content pack.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PackDefinition {
    /// Item metadata.
    pub items: Vec<ItemDefinition>,
    /// Smithing recipes, in catalog order.
    pub smithing_recipes: Vec<RecipeDefinition>,
    /// Casting molds.
    pub molds: Vec<MoldDefinition>,
}

/// Item metadata as authored in packs.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemDefinition {
    /// Item code (e.g. `game:ingot-copper`).
    pub code: AssetCode,
    /// Item role (`generic`, `ingot`, `work_item`).
    #[serde(default)]
    pub kind: ItemKind,
    /// Melting point in degrees.
    #[serde(default)]
    pub melting_point: f32,
    /// Explicit workable temperature.
    #[serde(default)]
    pub workable_temperature: Option<f32>,
    /// Smelted output units per item.
    #[serde(default)]
    pub smelted_ratio: Option<u32>,
    /// Item produced when smelted.
    #[serde(default)]
    pub smelted_into: Option<AssetCode>,
    /// Fuel burn temperature.
    #[serde(default)]
    pub burn_temperature: Option<f32>,
    /// Metal tier.
    #[serde(default)]
    pub tier: Option<u8>,
    /// Explicit anvil tier requirement.
    #[serde(default)]
    pub requires_anvil_tier: Option<i32>,
    /// Anvil-workable capability.
    #[serde(default)]
    pub workable: Option<WorkableDefinition>,
}

/// Anvil-workable capability as authored in packs.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkableDefinition {
    /// Pattern-driven workable.
    Pattern {
        /// Layered voxel pattern.
        voxels: Pattern,
        /// Roll randomized cells when placed.
        #[serde(default)]
        extra_voxels: bool,
        /// Fill chance for randomized cells.
        #[serde(default)]
        extra_chance: f32,
        /// Helve hammer behavior.
        #[serde(default)]
        helve_mode: HelveWorkableMode,
    },
    /// Metal bit.
    Nugget {
        /// Never roll the extra voxel.
        #[serde(default)]
        ignore_extra_voxels: bool,
    },
}

/// Smithing recipe as authored in packs.
///
/// When `metals` is non-empty the recipe is expanded once per metal, with
/// `{metal}` substituted in both the ingredient and the output code.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeDefinition {
    /// Ingredient code or wildcard.
    pub ingredient: AssetCode,
    /// Recipe attributes.
    #[serde(default)]
    pub attributes: RecipeFlags,
    /// Produced stack.
    pub output: StackDefinition,
    /// Target shape.
    pub pattern: Pattern,
    /// Metal variants to expand the recipe over.
    #[serde(default)]
    pub metals: Vec<String>,
}

/// A code plus quantity.
#[derive(Debug, Clone, Deserialize)]
pub struct StackDefinition {
    /// Item code.
    pub code: AssetCode,
    /// Quantity (defaults to 1).
    #[serde(default = "default_stack_size")]
    pub stack_size: u32,
}

fn default_stack_size() -> u32 {
    1
}

/// Casting mold as authored in packs.
#[derive(Debug, Clone, Deserialize)]
pub struct MoldDefinition {
    /// Mold code.
    pub code: AssetCode,
    /// Static liquid units.
    #[serde(default)]
    pub required_units: Option<u32>,
    /// Single drop; takes precedence over `drops`.
    #[serde(default)]
    pub drop: Option<StackDefinition>,
    /// Drops.
    #[serde(default)]
    pub drops: Vec<StackDefinition>,
}

/// Errors emitted during pack loading.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading packs.
    #[error("failed to read asset pack: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse asset pack: {0}")]
    Parse(#[from] serde_json::Error),
    /// A code produced by variant expansion is invalid.
    #[error("invalid code in asset pack: {0}")]
    Code(#[from] CodeError),
    /// A pattern could not be built.
    #[error("invalid voxel pattern: {0}")]
    Pattern(#[from] PatternError),
    /// Two recipes share ingredient and output.
    #[error("duplicate smithing recipe {ingredient} -> {output} x{stack_size}")]
    DuplicateRecipe {
        /// Ingredient code.
        ingredient: AssetCode,
        /// Output code.
        output: AssetCode,
        /// Output quantity.
        stack_size: u32,
    },
    /// Two items share a code.
    #[error("duplicate item {0}")]
    DuplicateItem(AssetCode),
    /// Two molds share a code.
    #[error("duplicate mold {0}")]
    DuplicateMold(AssetCode),
}

/// Parse a JSON string into a pack definition.
pub fn load_pack_from_str(input: &str) -> Result<PackDefinition, AssetError> {
    Ok(serde_json::from_str(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_pack() {
        let pack = load_pack_from_str(
            r####"{
                "items": [
                    { "code": "game:ingot-copper", "kind": "ingot", "melting_point": 1084, "tier": 2 },
                    { "code": "game:metalbit-copper", "workable": { "type": "nugget" } },
                    { "code": "game:blister-steel", "workable": {
                        "type": "pattern",
                        "voxels": [["###", "#_#"]],
                        "extra_voxels": true,
                        "extra_chance": 0.25,
                        "helve_mode": "all_workable"
                    } }
                ],
                "smithing_recipes": [
                    {
                        "ingredient": "game:ingot-{metal}",
                        "output": { "code": "game:axehead-{metal}" },
                        "pattern": [["##"]],
                        "metals": ["copper", "iron"]
                    }
                ]
            }"####,
        )
        .unwrap();

        assert_eq!(pack.items.len(), 3);
        assert_eq!(pack.items[0].kind, ItemKind::Ingot);
        assert_eq!(pack.items[0].tier, Some(2));
        assert!(matches!(
            pack.items[1].workable,
            Some(WorkableDefinition::Nugget {
                ignore_extra_voxels: false
            })
        ));
        match &pack.items[2].workable {
            Some(WorkableDefinition::Pattern {
                extra_chance,
                helve_mode,
                ..
            }) => {
                assert_eq!(*extra_chance, 0.25);
                assert_eq!(*helve_mode, HelveWorkableMode::AllWorkable);
            }
            other => panic!("unexpected workable {other:?}"),
        }
        assert_eq!(pack.smithing_recipes[0].output.stack_size, 1);
        assert_eq!(pack.smithing_recipes[0].metals.len(), 2);
        assert!(pack.molds.is_empty());
    }

    #[test]
    fn rejects_bad_patterns_and_codes() {
        let bad_pattern = r#"{ "smithing_recipes": [
            { "ingredient": "game:ingot-iron", "output": { "code": "game:axehead-iron" }, "pattern": [] }
        ] }"#;
        assert!(matches!(
            load_pack_from_str(bad_pattern),
            Err(AssetError::Parse(_))
        ));

        let bad_code = r#"{ "items": [ { "code": "game:Ingot Iron" } ] }"#;
        assert!(load_pack_from_str(bad_code).is_err());
    }
}
