//! Hamming distance between 256-bit descriptors.

use crate::descriptor::{Descriptor, DESCRIPTOR_WORDS};

/// Number of set bits in a 32-bit word using the parallel (SWAR) reduction.
#[inline]
fn popcount32(v: u32) -> u32 {
    let v = v - ((v >> 1) & 0x5555_5555);
    let v = (v & 0x3333_3333) + ((v >> 2) & 0x3333_3333);
    ((v + (v >> 4)) & 0x0F0F_0F0F).wrapping_mul(0x0101_0101) >> 24
}

/// Returns the number of differing bits between `a` and `b` (0..=256).
#[inline]
pub fn bit_distance(a: &Descriptor, b: &Descriptor) -> u32 {
    let (wa, wb) = (a.words(), b.words());
    let mut dist = 0u32;
    for i in 0..DESCRIPTOR_WORDS {
        dist += popcount32(wa[i] ^ wb[i]);
    }
    dist
}
