//! Greedy nearest-neighbour assignment over the aggregated scores.
//!
//! Each image-2 keypoint picks its closest image-1 keypoint. Columns are then
//! visited from the smallest to the largest distance and accept their pick
//! only if that row is still free; a column whose row is taken stays
//! unmatched. This is not an optimal bipartite assignment.

use crate::search::aggregate::ScoreMatrices;
use crate::search::Match;
use crate::util::math::first_min;

/// Best image-1 row for one image-2 column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ColumnPick {
    col: usize,
    row: usize,
    distance: u32,
}

fn column_picks(scores: &ScoreMatrices) -> Vec<ColumnPick> {
    let hs = &scores.scores;
    let mut column = Vec::with_capacity(hs.rows());
    (0..hs.cols())
        .filter_map(|col| {
            column.clear();
            column.extend((0..hs.rows()).filter_map(|row| hs.get(row, col)));
            first_min(&column).map(|(row, distance)| ColumnPick { col, row, distance })
        })
        .collect()
}

/// Turns score matrices into a match list with at most one match per row.
pub(crate) fn greedy_assign(scores: &ScoreMatrices) -> Vec<Match> {
    let mut picks = column_picks(scores);
    // Stable: equal distances keep ascending column order.
    picks.sort_by_key(|p| p.distance);

    let mut used = vec![false; scores.scores.rows()];
    let mut matches = Vec::with_capacity(picks.len());
    for pick in picks {
        if used[pick.row] {
            continue;
        }
        used[pick.row] = true;
        matches.push(Match {
            row: pick.row,
            col: pick.col,
            distance: pick.distance,
            scale1: scores.scales1.get(pick.row, pick.col).unwrap_or_default(),
            scale2: scores.scales2.get(pick.row, pick.col).unwrap_or_default(),
        });
    }
    matches
}
