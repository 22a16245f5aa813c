//! Anvil voxel grids.
//!
//! A work piece on an anvil is a small `x * y * z` grid of cells, each empty,
//! metal or slag. Grids never change size; the only mutation after
//! construction is [`VoxelGrid::overlay`], which builds a new grid and leaves
//! the original untouched so a failed merge is a no-op.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Anvil grid width (x).
pub const ANVIL_SIZE_X: u8 = 16;
/// Anvil grid height (y).
pub const ANVIL_SIZE_Y: u8 = 6;
/// Anvil grid depth (z).
pub const ANVIL_SIZE_Z: u8 = 16;

/// Material state of one voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum VoxelCell {
    /// Nothing here.
    #[default]
    Empty = 0,
    /// Workable metal.
    Metal = 1,
    /// Slag, counts toward volume but not toward material.
    Slag = 2,
}

impl VoxelCell {
    /// Decode the on-disk byte value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Empty),
            1 => Some(Self::Metal),
            2 => Some(Self::Slag),
            _ => None,
        }
    }

    /// Encode as the on-disk byte value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether the cell holds nothing.
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }
}

/// Why an overlay was refused. The target grid is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// The target column has no empty cell left.
    #[error("column ({x}, {z}) is already full")]
    ColumnFull {
        /// Column x.
        x: usize,
        /// Column z.
        z: usize,
    },
    /// Stacking the source column would run past the top of the target.
    #[error("column ({x}, {z}) would overflow the grid height")]
    ColumnOverflow {
        /// Column x.
        x: usize,
        /// Column z.
        z: usize,
    },
    /// A stacked cell would land on an occupied cell above a gap.
    #[error("cell ({x}, {y}, {z}) is already occupied")]
    CellOccupied {
        /// Cell x.
        x: usize,
        /// Cell y.
        y: usize,
        /// Cell z.
        z: usize,
    },
}

/// Errors decoding a serialized grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoxelError {
    /// Fewer than the three header bytes.
    #[error("voxel data too short: {0} bytes")]
    TooShort(usize),
    /// Body length does not match the header dimensions.
    #[error("voxel data length mismatch: expected {expected} cells, found {actual}")]
    LengthMismatch {
        /// Cells implied by the header.
        expected: usize,
        /// Cells present.
        actual: usize,
    },
    /// A cell byte outside 0..=2.
    #[error("unknown voxel value {value} at cell {index}")]
    UnknownCell {
        /// Offending byte.
        value: u8,
        /// Cell index within the body.
        index: usize,
    },
}

/// Fixed-size 3D grid of [`VoxelCell`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoxelGrid {
    size_x: u8,
    size_y: u8,
    size_z: u8,
    cells: Vec<VoxelCell>,
}

impl VoxelGrid {
    /// All-empty grid of the given size.
    pub fn new(size_x: u8, size_y: u8, size_z: u8) -> Self {
        let volume = size_x as usize * size_y as usize * size_z as usize;
        Self {
            size_x,
            size_y,
            size_z,
            cells: vec![VoxelCell::Empty; volume],
        }
    }

    /// All-empty grid with the standard anvil dimensions (16 x 6 x 16).
    pub fn anvil() -> Self {
        Self::new(ANVIL_SIZE_X, ANVIL_SIZE_Y, ANVIL_SIZE_Z)
    }

    /// Build a grid by evaluating `f(x, y, z)` for every cell.
    pub fn from_fn<F>(size_x: u8, size_y: u8, size_z: u8, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> VoxelCell,
    {
        let mut grid = Self::new(size_x, size_y, size_z);
        for x in 0..grid.size_x() {
            for y in 0..grid.size_y() {
                for z in 0..grid.size_z() {
                    let idx = grid.index(x, y, z);
                    grid.cells[idx] = f(x, y, z);
                }
            }
        }
        grid
    }

    /// Extent along x.
    pub fn size_x(&self) -> usize {
        self.size_x as usize
    }

    /// Extent along y (height).
    pub fn size_y(&self) -> usize {
        self.size_y as usize
    }

    /// Extent along z.
    pub fn size_z(&self) -> usize {
        self.size_z as usize
    }

    /// Total number of cells.
    pub fn volume(&self) -> usize {
        self.cells.len()
    }

    /// Cell at `(x, y, z)`, or `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<VoxelCell> {
        if x >= self.size_x() || y >= self.size_y() || z >= self.size_z() {
            return None;
        }
        Some(self.cells[self.index(x, y, z)])
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, z: usize, cell: VoxelCell) {
        if x < self.size_x() && y < self.size_y() && z < self.size_z() {
            let idx = self.index(x, y, z);
            self.cells[idx] = cell;
        }
    }

    /// Number of metal cells.
    pub fn material_count(&self) -> usize {
        self.count(VoxelCell::Metal)
    }

    /// Number of slag cells.
    pub fn slag_count(&self) -> usize {
        self.count(VoxelCell::Slag)
    }

    /// Metal plus slag.
    pub fn total_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.count(VoxelCell::Empty)
    }

    fn count(&self, kind: VoxelCell) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// Stack `source` onto this grid column by column.
    ///
    /// For every `(x, z)` in the overlap of both grids, the source column is
    /// placed starting at the lowest empty cell of the target column, keeping
    /// the source's vertical offsets. Any full column, overflow or collision
    /// fails the whole overlay; on success a new grid is returned.
    pub fn overlay(&self, source: &VoxelGrid) -> Result<VoxelGrid, OverlayError> {
        let mut merged = self.clone();
        let overlap_x = self.size_x().min(source.size_x());
        let overlap_z = self.size_z().min(source.size_z());
        let height = self.size_y();

        for x in 0..overlap_x {
            for z in 0..overlap_z {
                let base = (0..height)
                    .find(|&y| merged.cells[merged.index(x, y, z)].is_empty())
                    .ok_or(OverlayError::ColumnFull { x, z })?;

                for sy in 0..source.size_y() {
                    let cell = source.cells[source.index(x, sy, z)];
                    if cell.is_empty() {
                        continue;
                    }
                    let ty = base + sy;
                    if ty >= height {
                        return Err(OverlayError::ColumnOverflow { x, z });
                    }
                    let idx = merged.index(x, ty, z);
                    if !merged.cells[idx].is_empty() {
                        return Err(OverlayError::CellOccupied { x, y: ty, z });
                    }
                    merged.cells[idx] = cell;
                }
            }
        }

        Ok(merged)
    }

    /// Host-facing form of [`overlay`](Self::overlay): the merged grid and
    /// `true`, or an unchanged copy of this grid and `false`.
    pub fn try_overlay(&self, source: &VoxelGrid) -> (VoxelGrid, bool) {
        match self.overlay(source) {
            Ok(merged) => (merged, true),
            Err(_) => (self.clone(), false),
        }
    }

    /// Serialize as `[size_x, size_y, size_z, cells...]`, x-major.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(3 + self.cells.len());
        out.extend_from_slice(&[self.size_x, self.size_y, self.size_z]);
        out.extend(self.cells.iter().map(|c| c.as_u8()));
        out
    }

    /// Decode bytes written by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VoxelError> {
        if bytes.len() < 3 {
            return Err(VoxelError::TooShort(bytes.len()));
        }
        let (size_x, size_y, size_z) = (bytes[0], bytes[1], bytes[2]);
        let body = &bytes[3..];
        let expected = size_x as usize * size_y as usize * size_z as usize;
        if body.len() != expected {
            return Err(VoxelError::LengthMismatch {
                expected,
                actual: body.len(),
            });
        }
        let cells = body
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                VoxelCell::from_u8(value).ok_or(VoxelError::UnknownCell { value, index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            size_x,
            size_y,
            size_z,
            cells,
        })
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.size_y() + y) * self.size_z() + z
    }
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::anvil()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_grid(x: usize, z: usize, cells: &[VoxelCell]) -> VoxelGrid {
        VoxelGrid::from_fn(ANVIL_SIZE_X, ANVIL_SIZE_Y, ANVIL_SIZE_Z, |gx, gy, gz| {
            if gx == x && gz == z {
                cells.get(gy).copied().unwrap_or_default()
            } else {
                VoxelCell::Empty
            }
        })
    }

    #[test]
    fn new_grid_is_empty() {
        let grid = VoxelGrid::anvil();
        assert_eq!(grid.volume(), 16 * 6 * 16);
        assert_eq!(grid.material_count(), 0);
        assert_eq!(grid.slag_count(), 0);
        assert_eq!(grid.empty_count(), grid.volume());
        assert_eq!(grid.get(16, 0, 0), None);
    }

    #[test]
    fn counts_split_metal_and_slag() {
        let grid = VoxelGrid::from_fn(2, 2, 2, |x, y, _| match (x, y) {
            (0, 0) => VoxelCell::Metal,
            (1, 1) => VoxelCell::Slag,
            _ => VoxelCell::Empty,
        });
        assert_eq!(grid.material_count(), 2);
        assert_eq!(grid.slag_count(), 2);
        assert_eq!(grid.total_count(), 4);
        assert_eq!(grid.empty_count(), 4);
    }

    #[test]
    fn overlay_stacks_on_existing_material() {
        let target = column_grid(3, 4, &[VoxelCell::Metal, VoxelCell::Metal]);
        let source = column_grid(3, 4, &[VoxelCell::Slag, VoxelCell::Metal]);

        let merged = target.overlay(&source).unwrap();
        assert_eq!(merged.get(3, 2, 4), Some(VoxelCell::Slag));
        assert_eq!(merged.get(3, 3, 4), Some(VoxelCell::Metal));
        assert_eq!(merged.material_count(), 3);
        assert_eq!(merged.slag_count(), 1);
    }

    #[test]
    fn overlay_keeps_source_gaps() {
        let target = VoxelGrid::anvil();
        let source = column_grid(0, 0, &[VoxelCell::Metal, VoxelCell::Empty, VoxelCell::Metal]);

        let merged = target.overlay(&source).unwrap();
        assert_eq!(merged.get(0, 0, 0), Some(VoxelCell::Metal));
        assert_eq!(merged.get(0, 1, 0), Some(VoxelCell::Empty));
        assert_eq!(merged.get(0, 2, 0), Some(VoxelCell::Metal));
    }

    #[test]
    fn full_column_fails_whole_overlay() {
        let target = column_grid(0, 0, &[VoxelCell::Metal; 6]);
        let source = column_grid(0, 0, &[VoxelCell::Metal]);

        assert_eq!(
            target.overlay(&source),
            Err(OverlayError::ColumnFull { x: 0, z: 0 })
        );
        let (grid, ok) = target.try_overlay(&source);
        assert!(!ok);
        assert_eq!(grid, target);
    }

    #[test]
    fn full_column_fails_even_when_source_column_is_empty() {
        let target = column_grid(0, 0, &[VoxelCell::Metal; 6]);
        let source = column_grid(5, 5, &[VoxelCell::Metal]);
        assert!(target.overlay(&source).is_err());
    }

    #[test]
    fn overflow_discards_columns_already_merged() {
        let mut target = VoxelGrid::anvil();
        for y in 0..5 {
            target.set(9, y, 9, VoxelCell::Metal);
        }
        let source = VoxelGrid::from_fn(16, 6, 16, |x, y, z| {
            if (x == 0 && z == 0 && y == 0) || (x == 9 && z == 9 && y < 2) {
                VoxelCell::Metal
            } else {
                VoxelCell::Empty
            }
        });

        assert_eq!(
            target.overlay(&source),
            Err(OverlayError::ColumnOverflow { x: 9, z: 9 })
        );
        let (grid, ok) = target.try_overlay(&source);
        assert!(!ok);
        assert_eq!(grid.get(0, 0, 0), Some(VoxelCell::Empty));
    }

    #[test]
    fn overlay_refuses_to_overwrite_floating_cells() {
        let target = column_grid(1, 1, &[VoxelCell::Metal, VoxelCell::Empty, VoxelCell::Slag]);
        let source = column_grid(1, 1, &[VoxelCell::Metal, VoxelCell::Metal]);
        assert_eq!(
            target.overlay(&source),
            Err(OverlayError::CellOccupied { x: 1, y: 2, z: 1 })
        );
    }

    #[test]
    fn overlay_uses_overlap_of_extents() {
        let target = VoxelGrid::new(4, 3, 4);
        let source = VoxelGrid::from_fn(16, 6, 16, |_, y, _| {
            if y == 0 {
                VoxelCell::Metal
            } else {
                VoxelCell::Empty
            }
        });
        let merged = target.overlay(&source).unwrap();
        assert_eq!(merged.material_count(), 16);
        assert_eq!(merged.size_x(), 4);
    }

    #[test]
    fn bytes_round_trip_and_reject_garbage() {
        let grid = column_grid(2, 7, &[VoxelCell::Metal, VoxelCell::Slag]);
        let bytes = grid.to_bytes();
        assert_eq!(bytes.len(), 3 + 16 * 6 * 16);
        assert_eq!(VoxelGrid::from_bytes(&bytes).unwrap(), grid);

        assert_eq!(VoxelGrid::from_bytes(&[1, 1]), Err(VoxelError::TooShort(2)));
        assert_eq!(
            VoxelGrid::from_bytes(&[1, 1, 2, 0]),
            Err(VoxelError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            VoxelGrid::from_bytes(&[1, 1, 1, 7]),
            Err(VoxelError::UnknownCell { value: 7, index: 0 })
        );
    }
}
