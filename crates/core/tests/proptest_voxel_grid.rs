//! Property-based tests for voxel grids
//!
//! Validates grid invariants:
//! - Cell counts always partition the volume
//! - Overlay never removes material and is all-or-nothing
//! - Patterns without randomized cells ignore the RNG
//! - Byte encoding preserves the grid

use forgework_core::{Pattern, VoxelCell, VoxelGrid};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn cell_strategy() -> impl Strategy<Value = VoxelCell> {
    prop_oneof![
        3 => Just(VoxelCell::Empty),
        2 => Just(VoxelCell::Metal),
        1 => Just(VoxelCell::Slag),
    ]
}

fn grid_strategy() -> impl Strategy<Value = VoxelGrid> {
    (1u8..=8, 1u8..=6, 1u8..=8).prop_flat_map(|(sx, sy, sz)| {
        let volume = sx as usize * sy as usize * sz as usize;
        prop::collection::vec(cell_strategy(), volume).prop_map(move |cells| {
            VoxelGrid::from_fn(sx, sy, sz, |x, y, z| {
                cells[(x * sy as usize + y) * sz as usize + z]
            })
        })
    })
}

fn deterministic_row() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just('#'), Just('*'), Just('_')], 1..=16)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    /// Property: metal + slag + empty == volume for any grid
    #[test]
    fn counts_partition_volume(grid in grid_strategy()) {
        prop_assert_eq!(
            grid.material_count() + grid.slag_count() + grid.empty_count(),
            grid.size_x() * grid.size_y() * grid.size_z()
        );
        prop_assert_eq!(grid.total_count(), grid.material_count() + grid.slag_count());
    }

    /// Property: a successful overlay never decreases the filled count,
    /// and a failed one returns the target unchanged
    #[test]
    fn overlay_is_monotone_or_unchanged(target in grid_strategy(), source in grid_strategy()) {
        let (merged, ok) = target.try_overlay(&source);
        if ok {
            prop_assert!(merged.total_count() >= target.total_count());
            prop_assert!(merged.material_count() >= target.material_count());
            prop_assert_eq!(
                (merged.size_x(), merged.size_y(), merged.size_z()),
                (target.size_x(), target.size_y(), target.size_z())
            );
            // Existing cells are never cleared or replaced.
            for x in 0..target.size_x() {
                for y in 0..target.size_y() {
                    for z in 0..target.size_z() {
                        let before = target.get(x, y, z).unwrap();
                        if !before.is_empty() {
                            prop_assert_eq!(merged.get(x, y, z), Some(before));
                        }
                    }
                }
            }
        } else {
            prop_assert_eq!(&merged, &target);
        }
    }

    /// Property: overlaying an empty source onto a grid without full
    /// columns is the identity
    #[test]
    fn overlay_of_empty_source_is_identity(sx in 1u8..=8, sy in 2u8..=6, sz in 1u8..=8) {
        let target = VoxelGrid::from_fn(sx, sy, sz, |_, y, _| {
            if y == 0 { VoxelCell::Metal } else { VoxelCell::Empty }
        });
        let merged = target.overlay(&VoxelGrid::new(sx, sy, sz)).unwrap();
        prop_assert_eq!(merged, target);
    }

    /// Property: `#` / `*` / `_` patterns generate the same grid with or
    /// without an RNG
    #[test]
    fn deterministic_patterns_ignore_rng(
        rows in prop::collection::vec(deterministic_row(), 1..=4),
        seed in any::<u64>(),
        chance in 0.0f32..=1.0,
    ) {
        let pattern = Pattern::new(vec![rows]).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let with_rng = pattern.generate(Some(&mut rng), chance);
        prop_assert_eq!(with_rng, pattern.generate_deterministic());
    }

    /// Property: byte encoding round-trips
    #[test]
    fn bytes_round_trip(grid in grid_strategy()) {
        let decoded = VoxelGrid::from_bytes(&grid.to_bytes()).unwrap();
        prop_assert_eq!(decoded, grid);
    }
}
