use std::fs;
use std::path::Path;

use crate::{AssetError, Catalog};

/// Load a material catalog from the provided JSON file path.
pub fn catalog_from_file(path: &Path) -> Result<Catalog, AssetError> {
    let data = fs::read_to_string(path)?;
    catalog_from_str(&data)
}

/// Load a material catalog from an in-memory JSON string.
pub fn catalog_from_str(input: &str) -> Result<Catalog, AssetError> {
    let pack = crate::load_pack_from_str(input)?;
    Catalog::from_pack(pack)
}
