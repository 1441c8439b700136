//! Dense row-major matrices and square block views.
//!
//! `Block` is a borrowed square window into a `u32` buffer with an explicit
//! stride, the same way a region of interest views its parent image. The
//! stride counts elements between the starts of consecutive rows.

use crate::util::{ScaleMatchError, ScaleMatchResult};

/// Owned row-major matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    /// Creates a `rows x cols` matrix filled with `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Wraps a row-major buffer of exactly `rows * cols` elements.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> ScaleMatchResult<Self> {
        let needed = rows
            .checked_mul(cols)
            .ok_or(ScaleMatchError::InvalidInput("matrix dimensions overflow"))?;
        if data.len() != needed {
            return Err(ScaleMatchError::InvalidInput(
                "matrix buffer length does not match its dimensions",
            ));
        }
        Ok(Self { data, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the element at `(row, col)` if it is within bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Returns row `row` as a slice.
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.data.get(start..start + self.cols)
    }

    /// Returns the row-major backing buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterates over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact(0) panics, so an empty-column matrix yields no rows.
        let cols = self.cols.max(1);
        self.data.chunks_exact(cols).take(if self.cols == 0 { 0 } else { self.rows })
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col] = value;
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl Matrix<u32> {
    /// Returns the `size x size` block whose top-left corner is `(row, col)`.
    pub fn block(&self, row: usize, col: usize, size: usize) -> ScaleMatchResult<Block<'_>> {
        if row + size > self.rows || col + size > self.cols {
            return Err(ScaleMatchError::InvalidInput("block exceeds matrix bounds"));
        }
        let start = row * self.cols + col;
        Block::new(&self.data[start..], size, size, self.cols)
    }
}

/// Borrowed square window of distances for one keypoint pair.
#[derive(Clone, Copy, Debug)]
pub struct Block<'a> {
    data: &'a [u32],
    size: usize,
    stride: usize,
}

impl<'a> Block<'a> {
    /// Creates a block view of `rows x cols` elements with the given stride.
    ///
    /// Scoring is only defined on square blocks, so `rows != cols` is rejected.
    pub fn new(data: &'a [u32], rows: usize, cols: usize, stride: usize) -> ScaleMatchResult<Self> {
        if rows != cols {
            return Err(ScaleMatchError::NonSquareBlock { rows, cols });
        }
        if rows == 0 {
            return Err(ScaleMatchError::InvalidInput("block must not be empty"));
        }
        if stride < cols {
            return Err(ScaleMatchError::InvalidInput("block stride is smaller than its width"));
        }
        let needed = (rows - 1) * stride + cols;
        if data.len() < needed {
            return Err(ScaleMatchError::InvalidInput("block buffer is too small"));
        }
        Ok(Self {
            data,
            size: rows,
            stride,
        })
    }

    /// Creates a contiguous square block from a row-major slice.
    pub fn from_slice(data: &'a [u32], size: usize) -> ScaleMatchResult<Self> {
        if data.len() != size * size {
            let cols = if size == 0 { 0 } else { data.len() / size };
            return Err(ScaleMatchError::NonSquareBlock { rows: size, cols });
        }
        Self::new(data, size, size, size)
    }

    /// Side length (the number of scale levels).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the element at `(row, col)`; both must be below `size()`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> u32 {
        debug_assert!(row < self.size && col < self.size);
        self.data[row * self.stride + col]
    }

    /// Returns row `row` as a contiguous slice.
    pub fn row(&self, row: usize) -> &'a [u32] {
        let start = row * self.stride;
        &self.data[start..start + self.size]
    }

    /// Copies the block into a dense row-major buffer.
    pub fn to_vec(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.size * self.size);
        for r in 0..self.size {
            out.extend_from_slice(self.row(r));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, Matrix};
    use crate::util::ScaleMatchError;

    #[test]
    fn block_views_parent_with_stride() {
        let m = Matrix::from_vec((0u32..16).collect(), 4, 4).unwrap();
        let b = m.block(2, 2, 2).unwrap();
        assert_eq!(b.row(0), &[10, 11]);
        assert_eq!(b.at(1, 1), 15);
        assert_eq!(b.to_vec(), vec![10, 11, 14, 15]);
        assert!(m.block(3, 0, 2).is_err());
    }

    #[test]
    fn non_square_blocks_are_rejected() {
        let data = [0u32; 6];
        let err = Block::new(&data, 2, 3, 3).unwrap_err();
        assert_eq!(err, ScaleMatchError::NonSquareBlock { rows: 2, cols: 3 });
        let err = Block::from_slice(&data, 2).unwrap_err();
        assert_eq!(err, ScaleMatchError::NonSquareBlock { rows: 2, cols: 3 });
    }

    #[test]
    fn matrix_rows_iterate_in_order() {
        let m = Matrix::from_vec(vec![1u32, 2, 3, 4, 5, 6], 2, 3).unwrap();
        let rows: Vec<&[u32]> = m.iter_rows().collect();
        assert_eq!(rows, vec![&[1, 2, 3][..], &[4, 5, 6][..]]);
        assert_eq!(m.get(1, 2), Some(6));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(Matrix::<u32>::filled(3, 0, 0).iter_rows().count(), 0);
    }
}
