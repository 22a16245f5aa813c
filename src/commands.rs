use std::str::FromStr;

use anyhow::{bail, Result};
use clap::Subcommand;
use forgework_core::{AssetCode, ItemStack, MaterialCatalog, RecipeFlags, RecipeIngredient};
use forgework_smithing::{RequiredUnits, Smithy};
use serde_json::{json, Value};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Liquid units and casting bits for a mold
    Units {
        /// Mold code, e.g. game:toolmold-burned-axe
        mold: AssetCode,
    },
    /// Smithing recipes an item can be worked into
    Recipes {
        /// Item code, e.g. game:ingot-copper
        item: AssetCode,
    },
    /// Handbook facts for an item: voxels, workability, anvil tier
    Handbook {
        /// Item code
        item: AssetCode,
    },
    /// Bits recovered from consumed items
    Bits {
        /// Inputs as code[:count[@temperature]]
        #[arg(required = true)]
        inputs: Vec<BitArg>,
        /// Recipe tool ingredients to keep out of the melt, e.g. game:chisel-*
        #[arg(long = "tool")]
        tools: Vec<AssetCode>,
    },
}

/// One consumed input on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct BitArg {
    pub code: AssetCode,
    pub count: u32,
    pub temperature: f32,
}

impl FromStr for BitArg {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (rest, temperature) = match input.rsplit_once('@') {
            Some((rest, temp)) => {
                let temp = temp
                    .parse::<f32>()
                    .map_err(|err| format!("bad temperature {temp:?}: {err}"))?;
                (rest, temp)
            }
            None => (input, 20.0),
        };
        let (code, count) = match rest.rsplit_once(':') {
            Some((code, count)) if !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit()) => {
                let count = count
                    .parse::<u32>()
                    .map_err(|err| format!("bad count {count:?}: {err}"))?;
                (code, count)
            }
            _ => (rest, 1),
        };
        let code = AssetCode::parse(code).map_err(|err| err.to_string())?;
        Ok(Self {
            code,
            count,
            temperature,
        })
    }
}

impl Command {
    pub fn run<C: MaterialCatalog>(&self, smithy: &Smithy<C>) -> Result<Value> {
        match self {
            Self::Units { mold } => units(smithy, mold),
            Self::Recipes { item } => Ok(recipes(smithy, item)),
            Self::Handbook { item } => handbook(smithy, item),
            Self::Bits { inputs, tools } => Ok(bits(smithy, inputs, tools)),
        }
    }
}

fn units<C: MaterialCatalog>(smithy: &Smithy<C>, mold: &AssetCode) -> Result<Value> {
    let Some(units) = smithy.mold_required_units(mold) else {
        bail!("unknown mold {mold}");
    };
    let casting = smithy.casting_requirements(mold).unwrap_or_default();
    Ok(json!({
        "mold": mold,
        "required_units": units.value(),
        "fallback": matches!(units, RequiredUnits::Fallback(_)),
        "casting": casting,
    }))
}

fn recipes<C: MaterialCatalog>(smithy: &Smithy<C>, item: &AssetCode) -> Value {
    let stack = ItemStack::new(item.clone(), 1);
    let matched: Vec<Value> = smithy
        .matching_recipes(&stack)
        .into_iter()
        .map(|recipe| {
            json!({
                "id": recipe.id.0,
                "output": recipe.output.code,
                "stack_size": recipe.output.stack_size,
                "voxels": smithy.recipe_voxel_count(recipe.id),
                "ingredient_cost": smithy.ingredient_cost(recipe.id, &stack),
            })
        })
        .collect();
    json!({
        "item": item,
        "context": format!("{:?}", smithy.query_context(item)),
        "recipes": matched,
        "cheapest": smithy.cheapest_recipe(item).map(|r| r.id.0),
        "largest": smithy.largest_recipe(item).map(|r| r.id.0),
    })
}

fn handbook<C: MaterialCatalog>(smithy: &Smithy<C>, item: &AssetCode) -> Result<Value> {
    if smithy.catalog().item(item).is_none() {
        bail!("unknown item {item}");
    }
    let metal = smithy.metal_material(item).map(|m| {
        json!({
            "metal": m.metal,
            "ingot": m.ingot,
            "work_item": m.work_item,
            "tier": m.tier,
        })
    });
    let workable = smithy.workable(item);
    Ok(json!({
        "item": item,
        "metal": metal,
        "handbook_voxels": smithy.voxel_count_for_handbook(item),
        "placement_mode": workable.map(|w| format!("{:?}", w.placement_mode())),
        "workable_temperature": smithy.workable_temperature(item),
        "required_anvil_tier": smithy.required_anvil_tier(item),
        "recycles_into": smithy.recycling_output(&ItemStack::new(item.clone(), 1)),
    }))
}

fn bits<C: MaterialCatalog>(
    smithy: &Smithy<C>,
    inputs: &[BitArg],
    tools: &[AssetCode],
) -> Value {
    let stacks: Vec<ItemStack> = inputs
        .iter()
        .map(|arg| ItemStack::new(arg.code.clone(), arg.count).with_temperature(arg.temperature))
        .collect();
    let tools: Vec<RecipeIngredient> = tools
        .iter()
        .map(|code| RecipeIngredient {
            code: code.clone(),
            flags: RecipeFlags {
                tool: true,
                ..Default::default()
            },
        })
        .collect();
    json!({ "yield": smithy.compute_bit_yield(&stacks, &tools) })
}
