//! Textual voxel patterns.
//!
//! A pattern is a list of horizontal layers (bottom first); each layer is a
//! list of rows and each row a string with one character per cell:
//!
//! | char | cell |
//! |------|------|
//! | `#`  | metal |
//! | `*`  | slag |
//! | `o`  | metal with the extra-voxel chance, else empty |
//! | `x`  | slag with the extra-voxel chance, else empty |
//! | `?`  | metal or slag, 50/50 |
//! | other | empty |
//!
//! The randomized characters only ever fill when an RNG is supplied. Without
//! one the pattern resolves deterministically, which is what handbook counts
//! and recipe grids use.

use crate::voxel::{VoxelCell, VoxelGrid, ANVIL_SIZE_X, ANVIL_SIZE_Y, ANVIL_SIZE_Z};
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Patterns that cannot be turned into a grid at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern has no layers.
    #[error("pattern has no layers")]
    NoLayers,
    /// The first layer has no rows, or its first row is empty.
    #[error("pattern's first layer has no cells")]
    EmptyFirstRow,
}

/// Layered character pattern, validated on construction.
///
/// Width is the number of rows in the first layer, length the number of
/// characters in its first row. Rows are centered on the anvil along z and
/// characters along x. Later rows or layers that are shorter than the first
/// leave their missing cells empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct Pattern {
    layers: Vec<Vec<String>>,
}

impl Pattern {
    /// Validate and wrap raw layers.
    pub fn new(layers: Vec<Vec<String>>) -> Result<Self, PatternError> {
        let first = layers.first().ok_or(PatternError::NoLayers)?;
        match first.first() {
            Some(row) if !row.is_empty() => Ok(Self { layers }),
            _ => Err(PatternError::EmptyFirstRow),
        }
    }

    /// Convenience for literal patterns in code and tests.
    pub fn from_rows(layers: &[&[&str]]) -> Result<Self, PatternError> {
        Self::new(
            layers
                .iter()
                .map(|layer| layer.iter().map(|row| row.to_string()).collect())
                .collect(),
        )
    }

    /// The metal bit shape: two fixed metal cells plus one extra-chance cell.
    pub fn metal_bit() -> Self {
        Self {
            layers: vec![vec!["##".to_string(), "_o".to_string()]],
        }
    }

    /// Raw layers.
    pub fn layers(&self) -> &[Vec<String>] {
        &self.layers
    }

    /// Number of layers.
    pub fn height(&self) -> usize {
        self.layers.len()
    }

    /// Rows in the first layer.
    pub fn width(&self) -> usize {
        self.layers[0].len()
    }

    /// Characters in the first row of the first layer.
    pub fn length(&self) -> usize {
        self.layers[0][0].chars().count()
    }

    /// Whether the anvil grid can hold the pattern without truncation.
    pub fn fits_anvil(&self) -> bool {
        self.width() <= ANVIL_SIZE_Z as usize
            && self.length() <= ANVIL_SIZE_X as usize
            && self.height() <= ANVIL_SIZE_Y as usize
    }

    /// Generate an anvil-sized grid.
    ///
    /// With `rng` absent the extra-voxel chance is treated as 0 and every
    /// randomized character resolves to empty. Oversized patterns are clamped
    /// to the anvil bounds; see [`Pattern::fits_anvil`].
    pub fn generate<R>(&self, mut rng: Option<&mut R>, extra_chance: f32) -> VoxelGrid
    where
        R: Rng,
    {
        let extra_chance = if rng.is_some() { extra_chance as f64 } else { 0.0 };

        let width = self.width().min(ANVIL_SIZE_Z as usize);
        let length = self.length().min(ANVIL_SIZE_X as usize);
        let height = self.height().min(ANVIL_SIZE_Y as usize);
        let offset_z = (ANVIL_SIZE_Z as usize - width) / 2;
        let offset_x = (ANVIL_SIZE_X as usize - length) / 2;

        let mut grid = VoxelGrid::anvil();
        for (y, layer) in self.layers.iter().take(height).enumerate() {
            for (row_idx, row) in layer.iter().take(width).enumerate() {
                for (col_idx, ch) in row.chars().take(length).enumerate() {
                    let cell = match ch {
                        '#' => VoxelCell::Metal,
                        '*' => VoxelCell::Slag,
                        'o' => chance_cell(rng.as_deref_mut(), extra_chance, VoxelCell::Metal),
                        'x' => chance_cell(rng.as_deref_mut(), extra_chance, VoxelCell::Slag),
                        '?' => match rng.as_deref_mut() {
                            Some(r) => {
                                if r.gen::<f64>() < 0.5 {
                                    VoxelCell::Metal
                                } else {
                                    VoxelCell::Slag
                                }
                            }
                            None => VoxelCell::Empty,
                        },
                        _ => VoxelCell::Empty,
                    };
                    grid.set(col_idx + offset_x, y, row_idx + offset_z, cell);
                }
            }
        }
        grid
    }

    /// Deterministic ("handbook") grid: randomized characters stay empty.
    pub fn generate_deterministic(&self) -> VoxelGrid {
        self.generate::<StdRng>(None, 0.0)
    }
}

fn chance_cell<R>(rng: Option<&mut R>, chance: f64, hit: VoxelCell) -> VoxelCell
where
    R: Rng,
{
    match rng {
        Some(r) if chance > 0.0 => {
            if r.gen::<f64>() < chance {
                hit
            } else {
                VoxelCell::Empty
            }
        }
        _ => VoxelCell::Empty,
    }
}

impl TryFrom<Vec<Vec<String>>> for Pattern {
    type Error = PatternError;

    fn try_from(value: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Pattern> for Vec<Vec<String>> {
    fn from(pattern: Pattern) -> Self {
        pattern.layers
    }
}
