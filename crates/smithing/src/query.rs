//! Smithing recipe selection.
//!
//! Orderings here are part of the contract: the anvil dialog indexes into
//! [`matching_recipes`] and unit costs depend on which recipe
//! [`cheapest_recipe`] picks.

use forgework_core::{AssetCode, ItemKind, ItemMeta, RecipeFlags, SmithingRecipe, WorkableDef};

/// What kind of item is asking for recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryContext {
    /// An ingot or any other plain material.
    Plain,
    /// An existing work item; recipe attributes are not consulted.
    WorkItem,
    /// A pattern-driven anvil workable.
    PatternWorkable,
    /// A metal bit.
    Nugget,
}

impl QueryContext {
    /// Context for an item with the given metadata.
    pub fn for_item(meta: Option<&ItemMeta>) -> Self {
        let Some(meta) = meta else {
            return Self::Plain;
        };
        match (&meta.kind, &meta.workable) {
            (ItemKind::WorkItem, _) => Self::WorkItem,
            (_, Some(WorkableDef::Nugget { .. })) => Self::Nugget,
            (_, Some(WorkableDef::Pattern { .. })) => Self::PatternWorkable,
            _ => Self::Plain,
        }
    }

    /// Whether a recipe with `flags` may be offered in this context.
    pub fn allows(self, flags: &RecipeFlags) -> bool {
        if self == Self::WorkItem {
            return true;
        }
        if flags.nugget_recipe && self != Self::Nugget {
            return false;
        }
        if flags.workable_recipe && !matches!(self, Self::PatternWorkable | Self::Nugget) {
            return false;
        }
        !flags.repair_only
    }
}

/// Recipes an item can be worked into.
///
/// A recipe matches when its ingredient accepts the base material or the
/// item itself, its output is not the item itself, and the context allows
/// its attributes. Results are sorted by output code, then output size, and
/// repeated outputs keep only their first recipe.
pub fn matching_recipes<'a>(
    recipes: &'a [SmithingRecipe],
    item: &AssetCode,
    base_material: Option<&AssetCode>,
    context: QueryContext,
) -> Vec<&'a SmithingRecipe> {
    let mut matched: Vec<&SmithingRecipe> = recipes
        .iter()
        .filter(|r| {
            base_material.is_some_and(|base| r.ingredient.accepts(base)) || r.ingredient.accepts(item)
        })
        .filter(|r| r.output.code != *item)
        .filter(|r| context.allows(&r.ingredient.flags))
        .collect();

    matched.sort_by(|a, b| {
        a.output
            .code
            .cmp(&b.output.code)
            .then(a.output.stack_size.cmp(&b.output.stack_size))
    });
    matched.dedup_by(|later, first| later.output == first.output);
    matched
}

/// Voxels one output item of `recipe` accounts for (integer division).
pub fn voxels_per_output(recipe: &SmithingRecipe) -> usize {
    recipe.voxel_count() / recipe.output_size()
}

/// Among recipes producing `item`, the one with the most voxels per output
/// item. Ties resolve to the first recipe in catalog order.
pub fn cheapest_recipe<'a>(
    recipes: &'a [SmithingRecipe],
    item: &AssetCode,
) -> Option<&'a SmithingRecipe> {
    first_max_by_key(producing(recipes, item), voxels_per_output)
}

/// Among recipes producing `item`, the one with the largest output stack.
/// Ties resolve to the first recipe in catalog order.
pub fn largest_recipe<'a>(
    recipes: &'a [SmithingRecipe],
    item: &AssetCode,
) -> Option<&'a SmithingRecipe> {
    first_max_by_key(producing(recipes, item), |r| r.output.stack_size)
}

/// First recipe producing `item` with exactly `stack_size` outputs.
pub fn recipe_with_output_size<'a>(
    recipes: &'a [SmithingRecipe],
    item: &AssetCode,
    stack_size: u32,
) -> Option<&'a SmithingRecipe> {
    producing(recipes, item).find(|r| r.output.stack_size == stack_size)
}

/// First recipe producing a single `item`.
pub fn single_recipe<'a>(
    recipes: &'a [SmithingRecipe],
    item: &AssetCode,
) -> Option<&'a SmithingRecipe> {
    recipe_with_output_size(recipes, item, 1)
}

fn producing<'a, 'b>(
    recipes: &'a [SmithingRecipe],
    item: &'b AssetCode,
) -> impl Iterator<Item = &'a SmithingRecipe> + 'b
where
    'a: 'b,
{
    recipes.iter().filter(move |r| r.output.code == *item)
}

// `Iterator::max_by_key` keeps the last maximum; selection here keeps the first.
fn first_max_by_key<'a, I, K, F>(iter: I, mut key: F) -> Option<&'a SmithingRecipe>
where
    I: Iterator<Item = &'a SmithingRecipe>,
    K: Ord,
    F: FnMut(&SmithingRecipe) -> K,
{
    let mut best: Option<(K, &'a SmithingRecipe)> = None;
    for recipe in iter {
        let k = key(recipe);
        if best.as_ref().map_or(true, |(best_key, _)| k > *best_key) {
            best = Some((k, recipe));
        }
    }
    best.map(|(_, recipe)| recipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgework_core::{Pattern, RecipeId, RecipeIngredient, RecipeOutput};

    fn code(s: &str) -> AssetCode {
        AssetCode::parse(s).unwrap()
    }

    fn recipe(id: u32, ingredient: &str, output: &str, size: u32, row: &str) -> SmithingRecipe {
        SmithingRecipe {
            id: RecipeId(id),
            ingredient: RecipeIngredient {
                code: code(ingredient),
                flags: RecipeFlags::default(),
            },
            output: RecipeOutput {
                code: code(output),
                stack_size: size,
            },
            voxels: Pattern::from_rows(&[&[row]]).unwrap().generate_deterministic(),
        }
    }

    fn flagged(mut r: SmithingRecipe, flags: RecipeFlags) -> SmithingRecipe {
        r.ingredient.flags = flags;
        r
    }

    #[test]
    fn contexts_filter_attributes() {
        let nugget = RecipeFlags {
            nugget_recipe: true,
            ..Default::default()
        };
        let workable = RecipeFlags {
            workable_recipe: true,
            ..Default::default()
        };
        let repair = RecipeFlags {
            repair_only: true,
            ..Default::default()
        };

        assert!(!QueryContext::Plain.allows(&nugget));
        assert!(!QueryContext::Plain.allows(&workable));
        assert!(!QueryContext::Plain.allows(&repair));

        assert!(QueryContext::Nugget.allows(&nugget));
        assert!(QueryContext::Nugget.allows(&workable));
        assert!(!QueryContext::Nugget.allows(&repair));

        assert!(!QueryContext::PatternWorkable.allows(&nugget));
        assert!(QueryContext::PatternWorkable.allows(&workable));
        assert!(!QueryContext::PatternWorkable.allows(&repair));

        assert!(QueryContext::WorkItem.allows(&nugget));
        assert!(QueryContext::WorkItem.allows(&repair));
    }

    #[test]
    fn matching_sorts_dedups_and_excludes_self() {
        let recipes = vec![
            recipe(1, "game:ingot-iron", "game:pickaxehead-iron", 1, "#####"),
            recipe(2, "game:ingot-*", "game:axehead-iron", 1, "####"),
            recipe(3, "game:ingot-iron", "game:arrowhead-iron", 4, "###"),
            recipe(4, "game:ingot-iron", "game:arrowhead-iron", 2, "##"),
            recipe(5, "game:ingot-iron", "game:axehead-iron", 1, "######"),
            recipe(6, "game:ingot-iron", "game:ingot-iron", 1, "#"),
            recipe(7, "game:ingot-copper", "game:hoehead-copper", 1, "#"),
        ];
        let item = code("game:ingot-iron");
        let ids: Vec<u32> = matching_recipes(&recipes, &item, Some(&item), QueryContext::Plain)
            .iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[test]
    fn matching_accepts_base_material_or_item() {
        let recipes = vec![
            recipe(1, "game:ingot-copper", "game:axehead-copper", 1, "#"),
            recipe(2, "game:metalbit-copper", "game:rivet-copper", 1, "#"),
            flagged(
                recipe(3, "game:ingot-copper", "game:nail-copper", 1, "#"),
                RecipeFlags {
                    nugget_recipe: true,
                    ..Default::default()
                },
            ),
        ];
        let bit = code("game:metalbit-copper");
        let base = code("game:ingot-copper");
        let ids: Vec<u32> = matching_recipes(&recipes, &bit, Some(&base), QueryContext::Nugget)
            .iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(ids, vec![1, 3, 2]);

        let without_base: Vec<u32> = matching_recipes(&recipes, &bit, None, QueryContext::Nugget)
            .iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(without_base, vec![2]);
    }

    #[test]
    fn cheapest_maximizes_voxels_per_output_first_wins() {
        let recipes = vec![
            recipe(1, "game:ingot-iron", "game:arrowhead-iron", 4, "#########"),
            recipe(2, "game:ingot-iron", "game:arrowhead-iron", 2, "#####"),
            recipe(3, "game:ingot-iron", "game:arrowhead-iron", 1, "##"),
            recipe(4, "game:ingot-iron", "game:axehead-iron", 1, "##########"),
        ];
        let item = code("game:arrowhead-iron");
        // 9/4 = 2, 5/2 = 2, 2/1 = 2 -> first encountered
        assert_eq!(cheapest_recipe(&recipes, &item).unwrap().id, RecipeId(1));
        assert_eq!(largest_recipe(&recipes, &item).unwrap().id, RecipeId(1));
        assert_eq!(
            recipe_with_output_size(&recipes, &item, 2).unwrap().id,
            RecipeId(2)
        );
        assert_eq!(single_recipe(&recipes, &item).unwrap().id, RecipeId(3));
        assert!(cheapest_recipe(&recipes, &code("game:hoehead-iron")).is_none());
    }

    #[test]
    fn cheapest_prefers_more_voxels_per_output() {
        let recipes = vec![
            recipe(1, "game:ingot-iron", "game:arrowhead-iron", 4, "####"),
            recipe(2, "game:ingot-iron", "game:arrowhead-iron", 1, "###"),
            recipe(3, "game:ingot-iron", "game:arrowhead-iron", 1, "###"),
        ];
        let item = code("game:arrowhead-iron");
        assert_eq!(cheapest_recipe(&recipes, &item).unwrap().id, RecipeId(2));
        assert_eq!(voxels_per_output(&recipes[0]), 1);
    }

    #[test]
    fn zero_output_size_counts_as_one() {
        let recipes = vec![recipe(1, "game:ingot-iron", "game:axehead-iron", 0, "####")];
        let item = code("game:axehead-iron");
        assert_eq!(voxels_per_output(&recipes[0]), 4);
        assert!(cheapest_recipe(&recipes, &item).is_some());
    }
}
