//! Block filtering with a diagonal kernel.
//!
//! The kernel is applied as a correlation anchored at its centre, with an
//! isolated zero border: cells outside the block contribute nothing. Because
//! only the diagonal is nonzero this reduces to
//! `out(y, x) = sum_k w[k] * src(y + k - W, x + k - W)` over in-bounds taps.

use crate::kernel::DiagonalKernel;
use crate::matrix::Block;

/// Filters `block` with `kernel` and returns the dense `n x n` response.
pub fn correlate_diagonal(block: Block<'_>, kernel: &DiagonalKernel) -> Vec<f32> {
    let n = block.size();
    let mut out = vec![0.0f32; n * n];
    for y in 0..n {
        for x in 0..n {
            out[y * n + x] = diagonal_taps(n, y, x, kernel)
                .map(|(k, sy, sx)| kernel.diagonal()[k] * block.at(sy, sx) as f32)
                .sum();
        }
    }
    out
}

/// Filters `block` and divides each cell by the response of an all-ones block
/// of the same shape, giving a weighted mean over the in-bounds taps.
pub fn normalized_response(block: Block<'_>, kernel: &DiagonalKernel) -> Vec<f32> {
    let n = block.size();
    let mut out = correlate_diagonal(block, kernel);
    for y in 0..n {
        for x in 0..n {
            let norm: f32 = diagonal_taps(n, y, x, kernel)
                .map(|(k, _, _)| kernel.diagonal()[k])
                .sum();
            out[y * n + x] /= norm;
        }
    }
    out
}

/// In-bounds taps for output cell `(y, x)` as `(kernel index, src row, src col)`.
fn diagonal_taps(
    n: usize,
    y: usize,
    x: usize,
    kernel: &DiagonalKernel,
) -> impl Iterator<Item = (usize, usize, usize)> {
    let w = kernel.half_width() as isize;
    let (y, x, n) = (y as isize, x as isize, n as isize);
    (0..kernel.size()).filter_map(move |k| {
        let offset = k as isize - w;
        let (sy, sx) = (y + offset, x + offset);
        if sy < 0 || sx < 0 || sy >= n || sx >= n {
            return None;
        }
        Some((k, sy as usize, sx as usize))
    })
}
