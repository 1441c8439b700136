//! Global-minimum scoring.

use crate::matrix::Block;
use crate::score::{BlockScore, BlockScorer};
use crate::util::math::first_min;

/// Score reported when the minimum falls outside the accepted levels.
pub const GATED_SCORE: u32 = 10_000;

/// Acceptance gate on the location of the block minimum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MaxCondition {
    /// Any location is accepted.
    #[default]
    None,
    /// Accept only minima on the first row or first column.
    FirstLevel,
    /// Accept only minima within the first two rows or columns.
    FirstTwoLevels,
}

impl MaxCondition {
    /// Maps the numeric gate level (0, 1, 2) used by configuration files.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(MaxCondition::None),
            1 => Some(MaxCondition::FirstLevel),
            2 => Some(MaxCondition::FirstTwoLevels),
            _ => None,
        }
    }

    fn accepts(self, row: usize, col: usize) -> bool {
        match self {
            MaxCondition::None => true,
            MaxCondition::FirstLevel => row == 0 || col == 0,
            MaxCondition::FirstTwoLevels => row <= 1 || col <= 1,
        }
    }
}

/// Reports the smallest distance in the block and where it lies.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalMinScorer {
    max_condition: MaxCondition,
    south_east_refine: bool,
}

impl GlobalMinScorer {
    pub fn new(max_condition: MaxCondition, south_east_refine: bool) -> Self {
        Self {
            max_condition,
            south_east_refine,
        }
    }
}

impl BlockScorer for GlobalMinScorer {
    fn score(&self, block: Block<'_>, _s1: usize, _s2: usize) -> BlockScore {
        let n = block.size();
        let cells = block.to_vec();
        let (idx, min) = first_min(&cells).unwrap_or((0, 0));
        let (row, col) = (idx / n, idx % n);

        let score = if self.south_east_refine {
            // Integer mean of the run from the minimum to the block edge.
            let run = n - row.max(col);
            let sum: u32 = (0..run).map(|k| block.at(row + k, col + k)).sum();
            sum / run as u32
        } else if self.max_condition.accepts(row, col) {
            min
        } else {
            GATED_SCORE
        };

        BlockScore {
            score,
            scale1: row,
            scale2: col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GlobalMinScorer, MaxCondition, GATED_SCORE};
    use crate::matrix::Block;
    use crate::score::{BlockScore, BlockScorer};

    fn score(scorer: GlobalMinScorer, data: &[u32], n: usize) -> BlockScore {
        scorer.score(Block::from_slice(data, n).unwrap(), 0, 0)
    }

    #[test]
    fn reports_first_minimum() {
        let out = score(GlobalMinScorer::default(), &[3, 10, 10, 3], 2);
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
    fn gate_rejects_interior_minimum() {
        let data = [9, 9, 9, 9, 9, 9, 9, 9, 1];
        let gated = score(GlobalMinScorer::new(MaxCondition::FirstLevel, false), &data, 3);
        assert_eq!(gated.score, GATED_SCORE);
        assert_eq!((gated.scale1, gated.scale2), (2, 2));

        let data = [9, 9, 9, 9, 1, 9, 9, 9, 9];
        let first = score(GlobalMinScorer::new(MaxCondition::FirstLevel, false), &data, 3);
        assert_eq!(first.score, GATED_SCORE);
        let two = score(GlobalMinScorer::new(MaxCondition::FirstTwoLevels, false), &data, 3);
        assert_eq!(two.score, 1);
    }

    #[test]
    fn south_east_refinement_averages_the_diagonal_run() {
        // Minimum at (0,1); the run is (0,1)=1, (1,2)=6 -> 7 / 2 = 3.
        let data = [5, 1, 9, 9, 8, 6, 9, 9, 9];
        let out = score(GlobalMinScorer::new(MaxCondition::None, true), &data, 3);
        assert_eq!(
            out,
            BlockScore {
                score: 3,
                scale1: 0,
                scale2: 1
            }
        );
    }
}
