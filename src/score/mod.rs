//! Per-keypoint-pair block scoring strategies.
//!
//! Each strategy collapses the `n_levels x n_levels` block of cross-scale
//! distances for one keypoint pair into a [`BlockScore`]. The strategy is
//! chosen once from a [`Strategy`] and then invoked uniformly for every
//! block through the [`BlockScorer`] trait.

mod correlation;
mod diagonal;
mod min;

pub use correlation::{CorrelationScorer, MaskRegion, MASK_PENALTY};
pub use diagonal::{DiagonalBandScorer, DIAGONAL_SCORE_CEILING};
pub use min::{GlobalMinScorer, MaxCondition, GATED_SCORE};

use crate::kernel::{DiagonalKernel, KernelOptions};
use crate::matrix::Block;
use crate::util::{ScaleMatchError, ScaleMatchResult};

/// Aggregated score for one keypoint pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BlockScore {
    /// Aggregated distance.
    pub score: u32,
    /// Level (or positive level difference) attributed to the first image.
    pub scale1: usize,
    /// Level (or level difference magnitude) attributed to the second image.
    pub scale2: usize,
}

/// Reduces a square distance block to a single score.
pub trait BlockScorer: Send + Sync {
    /// Scores `block`; `s1` and `s2` are the detection levels of the two
    /// keypoints and must be below `block.size()` when the scorer uses them.
    fn score(&self, block: Block<'_>, s1: usize, s2: usize) -> BlockScore;

    /// Whether this scorer reads the detection levels.
    fn uses_detection_scales(&self) -> bool {
        false
    }
}

/// Selectable block scoring strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Global minimum over the block.
    #[default]
    GlobalMin,
    /// Lowest mean over the scale-difference diagonals.
    DiagonalBand,
    /// Diagonal correlation with the configured window and mask.
    Correlation,
    /// Correlation restricted to the south-east half of the window.
    CorrelationSouthEast,
    /// Correlation with bi-square weights.
    WeightedCorrelation,
    /// Weighted correlation restricted to the south-east half of the window.
    WeightedCorrelationSouthEast,
    /// Distance at the detection levels only (zero window, cell mask).
    DetectionScale,
}

impl Strategy {
    /// All strategies in selector order.
    pub const ALL: [Strategy; 7] = [
        Strategy::GlobalMin,
        Strategy::DiagonalBand,
        Strategy::Correlation,
        Strategy::CorrelationSouthEast,
        Strategy::WeightedCorrelation,
        Strategy::WeightedCorrelationSouthEast,
        Strategy::DetectionScale,
    ];

    /// Maps the numeric selector `0..=6` to a strategy.
    pub fn from_index(index: i64) -> ScaleMatchResult<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(ScaleMatchError::UnknownStrategy(index))
    }

    /// Numeric selector of this strategy.
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|&s| s == self)
            .unwrap_or_default()
    }

    /// Short name used in logs and file headers.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::GlobalMin => "RM",
            Strategy::DiagonalBand => "D",
            Strategy::Correlation => "C",
            Strategy::CorrelationSouthEast => "C_SEC",
            Strategy::WeightedCorrelation => "wC",
            Strategy::WeightedCorrelationSouthEast => "wC_SEC",
            Strategy::DetectionScale => "cORB",
        }
    }

    /// Kernel options for the correlation family, `None` otherwise.
    pub fn kernel_options(self) -> Option<KernelOptions> {
        let (south_east, weighted) = match self {
            Strategy::GlobalMin | Strategy::DiagonalBand => return None,
            Strategy::Correlation | Strategy::DetectionScale => (false, false),
            Strategy::CorrelationSouthEast => (true, false),
            Strategy::WeightedCorrelation => (false, true),
            Strategy::WeightedCorrelationSouthEast => (true, true),
        };
        Some(KernelOptions {
            south_east,
            weighted,
        })
    }
}

/// Parameters shared by the strategies; each strategy reads only its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ScorerParams {
    /// Kernel half-width `W` (correlation family).
    pub half_width: usize,
    /// Masking region (correlation family).
    pub mask_region: MaskRegion,
    /// Acceptance gate for the global minimum.
    pub max_condition: MaxCondition,
    /// Report the mean along the south-east diagonal from the global minimum.
    pub south_east_refine: bool,
}

/// Builds the scorer for `strategy`; the kernel is computed here once.
pub fn build_scorer(strategy: Strategy, params: ScorerParams) -> Box<dyn BlockScorer> {
    match strategy {
        Strategy::GlobalMin => Box::new(GlobalMinScorer::new(
            params.max_condition,
            params.south_east_refine,
        )),
        Strategy::DiagonalBand => Box::new(DiagonalBandScorer),
        Strategy::DetectionScale => Box::new(CorrelationScorer::new(
            DiagonalKernel::build(0, KernelOptions::default()),
            MaskRegion::DetectionCell,
        )),
        other => {
            let options = other.kernel_options().unwrap_or_default();
            Box::new(CorrelationScorer::new(
                DiagonalKernel::build(params.half_width, options),
                params.mask_region,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{build_scorer, MaskRegion, ScorerParams, Strategy};
    use crate::matrix::Block;
    use crate::util::ScaleMatchError;

    #[test]
    fn selectors_round_trip() {
        for (i, s) in Strategy::ALL.iter().enumerate() {
            assert_eq!(Strategy::from_index(i as i64).unwrap(), *s);
            assert_eq!(s.index(), i);
        }
        assert_eq!(
            Strategy::from_index(7).unwrap_err(),
            ScaleMatchError::UnknownStrategy(7)
        );
        assert!(Strategy::from_index(-1).is_err());
    }

    #[test]
    fn every_strategy_scores_a_zero_block_as_zero() {
        let data = [0u32; 9];
        let block = Block::from_slice(&data, 3).unwrap();
        for s in Strategy::ALL {
            let scorer = build_scorer(
                s,
                ScorerParams {
                    half_width: 1,
                    ..ScorerParams::default()
                },
            );
            assert_eq!(scorer.score(block, 1, 1).score, 0, "strategy {}", s.name());
        }
    }

    // Diagonal through (1,1) is 10, 40, 100; every other cell is 200.
    #[rustfmt::skip]
    const DIAGONAL_BLOCK: [u32; 9] = [
        10, 200, 200,
        200, 40, 200,
        200, 200, 100,
    ];

    #[test]
    fn correlation_strategies_get_their_kernels() {
        let block = Block::from_slice(&DIAGONAL_BLOCK, 3).unwrap();
        let params = ScorerParams {
            half_width: 1,
            mask_region: MaskRegion::DetectionCross,
            ..ScorerParams::default()
        };
        // Plain: (10 + 40 + 100) / 3. South-east: (40 + 100) / 2.
        // Bi-square weights for W=1 are 0.5625, 1, 0.5625:
        // weighted 101.875 / 2.125 = 47.94, south-east 96.25 / 1.5625 = 61.6.
        let expected = [
            (Strategy::Correlation, 50),
            (Strategy::CorrelationSouthEast, 70),
            (Strategy::WeightedCorrelation, 48),
            (Strategy::WeightedCorrelationSouthEast, 62),
        ];
        for (strategy, score) in expected {
            let out = build_scorer(strategy, params).score(block, 1, 1);
            assert_eq!(
                (out.score, out.scale1, out.scale2),
                (score, 1, 1),
                "strategy {}",
                strategy.name()
            );
        }
    }

    #[test]
    fn detection_scale_ignores_window_and_mask() {
        let block = Block::from_slice(&DIAGONAL_BLOCK, 3).unwrap();
        let configs = [
            (0, MaskRegion::DetectionCell),
            (3, MaskRegion::SouthEast),
            (3, MaskRegion::DetectionCross),
            (0, MaskRegion::DetectionCross),
        ];
        for (half_width, mask_region) in configs {
            let scorer = build_scorer(
                Strategy::DetectionScale,
                ScorerParams {
                    half_width,
                    mask_region,
                    ..ScorerParams::default()
                },
            );
            // A window would average (0,0) to 50; a cross or south-east
            // mask through (0,1) would reach 10 or 40.
            let at_origin = scorer.score(block, 0, 0);
            assert_eq!((at_origin.score, at_origin.scale1, at_origin.scale2), (10, 0, 0));
            let off_diagonal = scorer.score(block, 0, 1);
            assert_eq!((off_diagonal.score, off_diagonal.scale1, off_diagonal.scale2), (200, 0, 1));
        }
    }
}
