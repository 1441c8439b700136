//! Per-keypoint-pair block scoring over the distance matrix.

use crate::matrix::Matrix;
use crate::score::{BlockScore, BlockScorer};
use crate::util::ScaleMatchResult;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Aggregated score matrices, one cell per keypoint pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreMatrices {
    /// Aggregated distance per pair (`Hs`).
    pub scores: Matrix<u32>,
    /// Level attributed to the first image per pair (`S1`).
    pub scales1: Matrix<usize>,
    /// Level attributed to the second image per pair (`S2`).
    pub scales2: Matrix<usize>,
}

impl ScoreMatrices {
    fn from_rows(rows: Vec<Vec<BlockScore>>, l1: usize, l2: usize) -> Self {
        let mut scores = Matrix::filled(l1, l2, 0u32);
        let mut scales1 = Matrix::filled(l1, l2, 0usize);
        let mut scales2 = Matrix::filled(l1, l2, 0usize);
        for (a, row) in rows.into_iter().enumerate() {
            for (b, s) in row.into_iter().enumerate() {
                scores.set(a, b, s.score);
                scales1.set(a, b, s.scale1);
                scales2.set(a, b, s.scale2);
            }
        }
        Self {
            scores,
            scales1,
            scales2,
        }
    }
}

/// Scores every block of keypoint `a` in image 1 against all of image 2.
fn score_row(
    h: &Matrix<u32>,
    n_levels: usize,
    a: usize,
    l2: usize,
    scorer: &dyn BlockScorer,
    s1: &[usize],
    s2: &[usize],
) -> ScaleMatchResult<Vec<BlockScore>> {
    let ds1 = s1.get(a).copied().unwrap_or(0);
    (0..l2)
        .map(|b| {
            let block = h.block(a * n_levels, b * n_levels, n_levels)?;
            let ds2 = s2.get(b).copied().unwrap_or(0);
            Ok(scorer.score(block, ds1, ds2))
        })
        .collect()
}

/// Scores all keypoint pairs sequentially.
///
/// `s1`/`s2` are the detection levels; they may be empty for scorers that do
/// not read them.
pub(crate) fn score_blocks(
    h: &Matrix<u32>,
    n_levels: usize,
    scorer: &dyn BlockScorer,
    s1: &[usize],
    s2: &[usize],
) -> ScaleMatchResult<ScoreMatrices> {
    let (l1, l2) = (h.rows() / n_levels, h.cols() / n_levels);
    let rows = (0..l1)
        .map(|a| score_row(h, n_levels, a, l2, scorer, s1, s2))
        .collect::<ScaleMatchResult<Vec<_>>>()?;
    Ok(ScoreMatrices::from_rows(rows, l1, l2))
}

/// Scores all keypoint pairs with rows of pairs distributed over rayon.
#[cfg(feature = "rayon")]
pub(crate) fn score_blocks_par(
    h: &Matrix<u32>,
    n_levels: usize,
    scorer: &dyn BlockScorer,
    s1: &[usize],
    s2: &[usize],
) -> ScaleMatchResult<ScoreMatrices> {
    let (l1, l2) = (h.rows() / n_levels, h.cols() / n_levels);
    let rows = (0..l1)
        .into_par_iter()
        .map(|a| score_row(h, n_levels, a, l2, scorer, s1, s2))
        .collect::<ScaleMatchResult<Vec<_>>>()?;
    Ok(ScoreMatrices::from_rows(rows, l1, l2))
}

#[cfg(test)]
mod tests {
    use super::score_blocks;
    use crate::matrix::Matrix;
    use crate::score::GlobalMinScorer;

    #[test]
    fn each_pair_gets_its_block_minimum() {
        // 2 keypoints x 2 keypoints, 2 levels -> 4x4 matrix.
        #[rustfmt::skip]
        let h = Matrix::from_vec(vec![
            5, 6,   9, 9,
            7, 4,   9, 8,
            1, 9,   3, 3,
            9, 9,   3, 2,
        ], 4, 4).unwrap();
        let out = score_blocks(&h, 2, &GlobalMinScorer::default(), &[], &[]).unwrap();
        assert_eq!(out.scores.as_slice(), &[4, 8, 1, 2]);
        assert_eq!(out.scales1.as_slice(), &[1, 1, 0, 1]);
        assert_eq!(out.scales2.as_slice(), &[1, 1, 0, 1]);
    }
}
