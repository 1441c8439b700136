//! Diagonal aggregation kernels for the correlation-based scorers.
//!
//! A kernel of half-width `W` is a `(2W+1) x (2W+1)` matrix that is zero off
//! the main diagonal. Filtering a distance block with it averages distances
//! along a scale-difference diagonal. Two independent options shape it:
//!
//! - *south-east*: the first `W` diagonal entries are zeroed, so only cells
//!   at the same or coarser levels than the anchor contribute;
//! - *weighted*: the active entries follow the bi-square window
//!   `w(k) = (1 - (k / (W + 1))^2)^2` and are normalized to sum to one.

pub mod filter;

pub use filter::{correlate_diagonal, normalized_response};

/// Options selecting the kernel shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KernelOptions {
    /// Zero the entries above and left of the anchor.
    pub south_east: bool,
    /// Use normalized bi-square weights instead of ones.
    pub weighted: bool,
}

/// Square kernel whose only nonzero entries lie on the main diagonal.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagonalKernel {
    half_width: usize,
    diagonal: Vec<f32>,
    options: KernelOptions,
}

impl DiagonalKernel {
    /// Builds the kernel for half-width `half_width`.
    pub fn build(half_width: usize, options: KernelOptions) -> Self {
        let size = 2 * half_width + 1;
        let first_active = if options.south_east { half_width } else { 0 };
        let mut diagonal = vec![0.0f32; size];

        if options.weighted {
            let offsets = first_active as isize - half_width as isize..=half_width as isize;
            let raw: Vec<f64> = offsets.map(|k| bisquare(k, half_width)).collect();
            let total: f64 = raw.iter().sum();
            for (slot, w) in diagonal[first_active..].iter_mut().zip(raw) {
                *slot = (w / total) as f32;
            }
        } else {
            for slot in &mut diagonal[first_active..] {
                *slot = 1.0;
            }
        }

        Self {
            half_width,
            diagonal,
            options,
        }
    }

    /// Half-width `W`.
    pub fn half_width(&self) -> usize {
        self.half_width
    }

    /// Side length `2W + 1`.
    pub fn size(&self) -> usize {
        self.diagonal.len()
    }

    pub fn options(&self) -> KernelOptions {
        self.options
    }

    /// Returns the entry at `(row, col)`; off-diagonal entries are zero.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        if row != col {
            return 0.0;
        }
        self.diagonal.get(row).copied().unwrap_or(0.0)
    }

    /// All diagonal entries, masked ones included.
    pub fn diagonal(&self) -> &[f32] {
        &self.diagonal
    }

    /// The diagonal entries not removed by south-east masking.
    pub fn active_weights(&self) -> &[f32] {
        let first_active = if self.options.south_east {
            self.half_width
        } else {
            0
        };
        &self.diagonal[first_active..]
    }

    /// Expands the kernel into a dense row-major matrix.
    pub fn to_dense(&self) -> Vec<f32> {
        let size = self.size();
        let mut out = vec![0.0f32; size * size];
        for (i, &w) in self.diagonal.iter().enumerate() {
            out[i * size + i] = w;
        }
        out
    }
}

fn bisquare(offset: isize, half_width: usize) -> f64 {
    let t = offset as f64 / (half_width as f64 + 1.0);
    let u = 1.0 - t * t;
    u * u
}
