//! Host material catalog seam.

use crate::code::AssetCode;
use crate::item::ItemMeta;
use crate::mold::ToolMold;
use crate::recipe::{RecipeId, SmithingRecipe};

/// Read-only lookups the smithing computations need from the host.
///
/// Recipe iteration order is the catalog's order and must be stable: tie
/// breaks in recipe selection resolve to the first recipe encountered.
pub trait MaterialCatalog {
    /// All smithing recipes, in catalog order.
    fn smithing_recipes(&self) -> &[SmithingRecipe];

    /// Declared attributes of an item.
    fn item(&self, code: &AssetCode) -> Option<&ItemMeta>;

    /// Every known item, in a stable order.
    fn items(&self) -> Box<dyn Iterator<Item = &ItemMeta> + '_>;

    /// A mold definition.
    fn mold(&self, code: &AssetCode) -> Option<&ToolMold>;

    /// Recipe by id.
    fn recipe(&self, id: RecipeId) -> Option<&SmithingRecipe> {
        self.smithing_recipes().iter().find(|r| r.id == id)
    }
}

impl<T: MaterialCatalog + ?Sized> MaterialCatalog for &T {
    fn smithing_recipes(&self) -> &[SmithingRecipe] {
        (**self).smithing_recipes()
    }

    fn item(&self, code: &AssetCode) -> Option<&ItemMeta> {
        (**self).item(code)
    }

    fn items(&self) -> Box<dyn Iterator<Item = &ItemMeta> + '_> {
        (**self).items()
    }

    fn mold(&self, code: &AssetCode) -> Option<&ToolMold> {
        (**self).mold(code)
    }

    fn recipe(&self, id: RecipeId) -> Option<&SmithingRecipe> {
        (**self).recipe(id)
    }
}
