//! Casting molds.

use crate::code::{AssetCode, CodeError};

/// Placeholder substituted with a metal variant in drop templates.
pub const METAL_PLACEHOLDER: &str = "metal";

/// Units a mold requires when it declares none.
pub const DEFAULT_REQUIRED_UNITS: u32 = 100;

/// One templated drop of a mold (e.g. `game:axehead-{metal}` x1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoldDrop {
    /// Code template; may contain `{metal}`.
    pub code: AssetCode,
    /// Number of items dropped.
    pub stack_size: u32,
}

/// A casting mold definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMold {
    /// Mold identity.
    pub code: AssetCode,
    /// Statically declared liquid units needed to fill the mold.
    pub required_units: Option<u32>,
    /// Items produced when the cast is taken out.
    pub drops: Vec<MoldDrop>,
}

impl ToolMold {
    /// Static units, [`DEFAULT_REQUIRED_UNITS`] when the mold declares none.
    pub fn static_units(&self) -> u32 {
        self.required_units.unwrap_or(DEFAULT_REQUIRED_UNITS)
    }

    /// Drop codes and sizes with `{metal}` replaced by `metal`.
    pub fn resolve_drops(&self, metal: &str) -> Result<Vec<(AssetCode, u32)>, CodeError> {
        self.drops
            .iter()
            .map(|drop| {
                drop.code
                    .fill_placeholder(METAL_PLACEHOLDER, metal)
                    .map(|code| (code, drop.stack_size))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_metal_templates() {
        let mold = ToolMold {
            code: AssetCode::parse("game:toolmold-burned-arrowhead").unwrap(),
            required_units: Some(100),
            drops: vec![
                MoldDrop {
                    code: AssetCode::parse("game:arrowhead-{metal}").unwrap(),
                    stack_size: 4,
                },
                MoldDrop {
                    code: AssetCode::parse("game:slag").unwrap(),
                    stack_size: 1,
                },
            ],
        };
        let drops = mold.resolve_drops("copper").unwrap();
        assert_eq!(drops[0].0.to_string(), "game:arrowhead-copper");
        assert_eq!(drops[0].1, 4);
        assert_eq!(drops[1].0.to_string(), "game:slag");
        assert_eq!(mold.static_units(), 100);
    }

    #[test]
    fn undeclared_units_use_default() {
        let mold = ToolMold {
            code: AssetCode::parse("game:toolmold-burned-pickaxe").unwrap(),
            required_units: None,
            drops: Vec::new(),
        };
        assert_eq!(mold.static_units(), DEFAULT_REQUIRED_UNITS);
    }
}
