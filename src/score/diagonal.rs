//! Diagonal-band averaging.
//!
//! Every diagonal of the block corresponds to one level difference
//! `k = row - col` between the two keypoints. The band with the lowest mean
//! distance wins.

use crate::matrix::Block;
use crate::score::{BlockScore, BlockScorer};
use crate::util::math::ceil_div;

/// Starting bound for the band search; a band must average strictly below it.
pub const DIAGONAL_SCORE_CEILING: u32 = 255;

/// Picks the scale-difference diagonal with the lowest mean distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiagonalBandScorer;

impl BlockScorer for DiagonalBandScorer {
    fn score(&self, block: Block<'_>, _s1: usize, _s2: usize) -> BlockScore {
        let n = block.size() as isize;
        let mut best = DIAGONAL_SCORE_CEILING;
        let mut best_offset = 0isize;

        // Offsets ascend from -(n-1), so ties keep the most negative one.
        for offset in -(n - 1)..n {
            let (row0, col0) = if offset >= 0 { (offset, 0) } else { (0, -offset) };
            let len = n - offset.abs();
            let sum: u32 = (0..len)
                .map(|i| block.at((row0 + i) as usize, (col0 + i) as usize))
                .sum();
            let mean = ceil_div(sum, len as u32);
            if mean < best {
                best = mean;
                best_offset = offset;
            }
        }

        BlockScore {
            score: best,
            scale1: best_offset.max(0) as usize,
            scale2: (-best_offset).max(0) as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DiagonalBandScorer, DIAGONAL_SCORE_CEILING};
    use crate::matrix::Block;
    use crate::score::{BlockScore, BlockScorer};

    #[test]
    fn main_diagonal_wins() {
        let data = [2, 8, 6, 4];
        let out = DiagonalBandScorer.score(Block::from_slice(&data, 2).unwrap(), 0, 0);
        assert_eq!(
            out,
            BlockScore {
                score: 3,
                scale1: 0,
                scale2: 0
            }
        );
    }

    #[test]
    fn offsets_split_by_sign() {
        // Lower diagonal (row - col = 1) holds the smallest values.
        let data = [50, 50, 50, 1, 50, 50, 50, 2, 50];
        let out = DiagonalBandScorer.score(Block::from_slice(&data, 3).unwrap(), 0, 0);
        assert_eq!((out.score, out.scale1, out.scale2), (2, 1, 0));

        let data = [50, 1, 50, 50, 50, 2, 50, 50, 50];
        let out = DiagonalBandScorer.score(Block::from_slice(&data, 3).unwrap(), 0, 0);
        assert_eq!((out.score, out.scale1, out.scale2), (2, 0, 1));
    }

    #[test]
    fn means_round_up() {
        let data = [1, 90, 90, 2];
        let out = DiagonalBandScorer.score(Block::from_slice(&data, 2).unwrap(), 0, 0);
        assert_eq!(out.score, 2);
    }

    #[test]
    fn saturated_blocks_keep_the_ceiling() {
        let data = [256u32; 4];
        let out = DiagonalBandScorer.score(Block::from_slice(&data, 2).unwrap(), 0, 0);
        assert_eq!(
            out,
            BlockScore {
                score: DIAGONAL_SCORE_CEILING,
                scale1: 0,
                scale2: 0
            }
        );
    }
}
