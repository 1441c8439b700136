//! Correlation-based scoring around the detection levels.
//!
//! The block is filtered with a [`DiagonalKernel`] and normalized by the
//! filtered all-ones block, so every cell holds a (weighted) mean distance
//! along its scale-difference diagonal. A penalty overlay then restricts
//! which cells may win, relative to the detection levels of the pair.

use crate::kernel::{normalized_response, DiagonalKernel};
use crate::matrix::Block;
use crate::score::{BlockScore, BlockScorer};
use crate::util::math::first_min;

/// Penalty added to cells outside the masking region.
pub const MASK_PENALTY: f32 = 256.0;

/// Cells of the block that are eligible to win.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MaskRegion {
    /// Only the cell at the two detection levels.
    DetectionCell,
    /// The whole row and column through the detection cell.
    #[default]
    DetectionCross,
    /// Every cell at or below-right of the detection cell.
    SouthEast,
}

impl MaskRegion {
    /// Maps the numeric region selector: `-1` cell, `0` cross, anything else
    /// the south-east area.
    pub fn from_selector(selector: i32) -> Self {
        match selector {
            -1 => MaskRegion::DetectionCell,
            0 => MaskRegion::DetectionCross,
            _ => MaskRegion::SouthEast,
        }
    }

    /// Numeric selector for this region (`1` stands for the south-east area).
    pub fn selector(self) -> i32 {
        match self {
            MaskRegion::DetectionCell => -1,
            MaskRegion::DetectionCross => 0,
            MaskRegion::SouthEast => 1,
        }
    }

    fn contains(self, row: usize, col: usize, s1: usize, s2: usize) -> bool {
        match self {
            MaskRegion::DetectionCell => row == s1 && col == s2,
            MaskRegion::DetectionCross => row == s1 || col == s2,
            MaskRegion::SouthEast => row >= s1 && col >= s2,
        }
    }
}

/// Scores the normalized, masked block minimum.
///
/// Detection levels are expected below the block size. A level outside the
/// block leaves no cell unmasked, so the score is the plain normalized
/// minimum plus [`MASK_PENALTY`]; [`crate::CrossScaleMatcher`] rejects such
/// levels before scoring.
#[derive(Clone, Debug)]
pub struct CorrelationScorer {
    kernel: DiagonalKernel,
    region: MaskRegion,
}

impl CorrelationScorer {
    pub fn new(kernel: DiagonalKernel, region: MaskRegion) -> Self {
        Self { kernel, region }
    }

    pub fn kernel(&self) -> &DiagonalKernel {
        &self.kernel
    }

    pub fn region(&self) -> MaskRegion {
        self.region
    }

    /// Returns the penalty overlay for detection levels `(s1, s2)`.
    pub fn overlay(&self, n: usize, s1: usize, s2: usize) -> Vec<f32> {
        let mut mask = vec![MASK_PENALTY; n * n];
        for row in 0..n {
            for col in 0..n {
                if self.region.contains(row, col, s1, s2) {
                    mask[row * n + col] = 0.0;
                }
            }
        }
        mask
    }
}

impl BlockScorer for CorrelationScorer {
    fn score(&self, block: Block<'_>, s1: usize, s2: usize) -> BlockScore {
        let n = block.size();
        let mut masked = normalized_response(block, &self.kernel);
        for (cell, penalty) in masked.iter_mut().zip(self.overlay(n, s1, s2)) {
            *cell += penalty;
        }

        let (idx, min) = first_min(&masked).unwrap_or((0, 0.0));
        BlockScore {
            score: min.round().max(0.0) as u32,
            scale1: idx / n,
            scale2: idx % n,
        }
    }

    fn uses_detection_scales(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{CorrelationScorer, MaskRegion, MASK_PENALTY};
    use crate::kernel::{DiagonalKernel, KernelOptions};
    use crate::matrix::Block;
    use crate::score::{BlockScore, BlockScorer};

    fn scorer(half_width: usize, options: KernelOptions, region: MaskRegion) -> CorrelationScorer {
        CorrelationScorer::new(DiagonalKernel::build(half_width, options), region)
    }

    #[test]
    fn cell_mask_keeps_only_detection_cell() {
        let s = scorer(0, KernelOptions::default(), MaskRegion::DetectionCell);
        let mask = s.overlay(3, 1, 1);
        for (idx, &v) in mask.iter().enumerate() {
            if idx == 4 {
                assert_eq!(v, 0.0);
            } else {
                assert_eq!(v, MASK_PENALTY);
            }
        }

        let data = [0, 0, 0, 0, 40, 0, 0, 0, 0];
        let out = s.score(Block::from_slice(&data, 3).unwrap(), 1, 1);
        assert_eq!(
            out,
            BlockScore {
                score: 40,
                scale1: 1,
                scale2: 1
            }
        );
    }

    #[test]
    fn cross_mask_searches_row_and_column() {
        let s = scorer(0, KernelOptions::default(), MaskRegion::DetectionCross);
        let data = [1, 90, 90, 90, 90, 7, 90, 5, 90];
        // (0,0)=1 is outside the cross through (1,1); (2,1)=5 wins.
        let out = s.score(Block::from_slice(&data, 3).unwrap(), 1, 1);
        assert_eq!((out.score, out.scale1, out.scale2), (5, 2, 1));
    }

    #[test]
    fn south_east_area_excludes_finer_levels() {
        let s = scorer(0, KernelOptions::default(), MaskRegion::SouthEast);
        let data = [1, 90, 90, 90, 30, 90, 90, 90, 20];
        let out = s.score(Block::from_slice(&data, 3).unwrap(), 1, 1);
        assert_eq!((out.score, out.scale1, out.scale2), (20, 2, 2));
        assert_eq!(MaskRegion::from_selector(3), MaskRegion::SouthEast);
        assert_eq!(MaskRegion::from_selector(-4), MaskRegion::SouthEast);
    }

    #[test]
    fn window_averages_before_masking() {
        let s = scorer(1, KernelOptions::default(), MaskRegion::DetectionCell);
        let data = [10, 0, 0, 0, 20, 0, 0, 0, 31];
        // (1,1) averages 10, 20, 31 -> 20.33 -> 20.
        let out = s.score(Block::from_slice(&data, 3).unwrap(), 1, 1);
        assert_eq!(out.score, 20);
    }

    #[test]
    fn half_means_round_away_from_zero() {
        let s = scorer(1, KernelOptions::default(), MaskRegion::DetectionCell);
        let block = [4u32, 0, 0, 5];
        // (0,0) averages 4 and 5 -> 4.5 -> 5.
        let out = s.score(Block::from_slice(&block, 2).unwrap(), 0, 0);
        assert_eq!(out.score, 5);
        // (1,1) averages 3 and 4 -> 3.5 -> 4.
        let out = s.score(Block::from_slice(&[3u32, 0, 0, 4], 2).unwrap(), 1, 1);
        assert_eq!(out.score, 4);
    }

    #[test]
    fn detection_level_outside_block_masks_everything() {
        let s = scorer(0, KernelOptions::default(), MaskRegion::DetectionCell);
        let data = [9u32, 3, 7, 8];
        let out = s.score(Block::from_slice(&data, 2).unwrap(), 2, 0);
        assert_eq!((out.score, out.scale1, out.scale2), (3 + MASK_PENALTY as u32, 0, 1));
    }
}
