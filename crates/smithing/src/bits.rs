//! Metal bits recovered from consumed work.

use serde::Serialize;

/// Voxels and temperature contributed by one consumed input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitInput {
    /// Metal voxels in the input.
    pub voxels: usize,
    /// Temperature of the input.
    pub temperature: f32,
}

/// Output bit stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BitYield {
    /// Number of bits.
    pub bits: u32,
    /// Temperature of the bits.
    pub temperature: f32,
}

/// Bits for `voxels`: `floor(voxels / voxels_per_bit)`, at least one.
pub fn bits_for_voxels(voxels: usize, voxels_per_bit: f32) -> u32 {
    ((voxels as f32 / voxels_per_bit) as u32).max(1)
}

/// Combine consumed inputs into one bit stack.
///
/// Temperature is the voxel-weighted mean; inputs without voxels do not
/// affect it. Nothing is produced when the inputs hold no voxels.
pub fn bit_yield<I>(inputs: I, voxels_per_bit: f32) -> Option<BitYield>
where
    I: IntoIterator<Item = BitInput>,
{
    let mut total_voxels = 0usize;
    let mut temperature_acc = 0f32;
    for input in inputs {
        if input.voxels > 0 {
            temperature_acc += input.temperature * input.voxels as f32;
        }
        total_voxels += input.voxels;
    }
    if total_voxels == 0 {
        return None;
    }
    Some(BitYield {
        bits: bits_for_voxels(total_voxels, voxels_per_bit),
        temperature: temperature_acc / total_voxels as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(voxels: usize, temperature: f32) -> BitInput {
        BitInput {
            voxels,
            temperature,
        }
    }

    #[test]
    fn forty_two_voxels_make_twenty_bits() {
        let out = bit_yield([input(42, 1000.0)], 2.1).unwrap();
        assert_eq!(out.bits, 20);
        assert_eq!(out.temperature, 1000.0);
    }

    #[test]
    fn temperature_is_voxel_weighted() {
        let out = bit_yield([input(10, 100.0), input(30, 500.0), input(0, 9000.0)], 2.0).unwrap();
        assert_eq!(out.bits, 20);
        assert_eq!(out.temperature, 400.0);
    }

    #[test]
    fn small_inputs_still_yield_one_bit() {
        assert_eq!(bit_yield([input(1, 20.0)], 3.0).unwrap().bits, 1);
        assert_eq!(bits_for_voxels(0, 2.1), 1);
    }

    #[test]
    fn no_voxels_no_output() {
        assert!(bit_yield([input(0, 500.0), input(0, 20.0)], 2.1).is_none());
        assert!(bit_yield(std::iter::empty(), 2.1).is_none());
    }
}
