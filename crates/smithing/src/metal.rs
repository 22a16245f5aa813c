//! Metal material resolution.

use forgework_core::{AssetCode, ItemKind, MaterialCatalog};
use tracing::debug;

/// The metal an item is made of, with its canonical ingot and work item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetalMaterial {
    /// Metal variant (`copper`, `tinbronze`, ...).
    pub metal: String,
    /// Base material: the metal's ingot.
    pub ingot: AssetCode,
    /// Work item produced when the metal is placed on an anvil.
    pub work_item: AssetCode,
    /// Metal tier, from the ingot.
    pub tier: u8,
}

/// Resolve the metal material of `code`.
///
/// The last dash-separated part of the path names the metal when an
/// `ingot-<metal>` item exists in the same domain. Otherwise the item's
/// declared `smelted_into` ingot decides.
pub fn resolve_metal_material<C>(catalog: &C, code: &AssetCode) -> Option<MetalMaterial>
where
    C: MaterialCatalog + ?Sized,
{
    let by_variant = code
        .with_path(&format!("ingot-{}", code.last_part()))
        .ok()
        .filter(|ingot| catalog.item(ingot).is_some());

    let ingot = match by_variant {
        Some(ingot) => ingot,
        None => {
            let smelted = catalog.item(code)?.smelted_into.clone()?;
            let meta = catalog.item(&smelted)?;
            if meta.kind != ItemKind::Ingot {
                debug!(code = %code, smelted = %smelted, "smelted output is not an ingot");
                return None;
            }
            smelted
        }
    };

    let metal = ingot.last_part().to_string();
    let work_item = ingot.with_path(&format!("workitem-{metal}")).ok()?;
    let tier = catalog.item(&ingot).and_then(|m| m.tier).unwrap_or(0);
    Some(MetalMaterial {
        metal,
        ingot,
        work_item,
        tier,
    })
}
