//! Cross-scale Hamming distance matrix.
//!
//! Rows and columns are in level-interleaved order, so the `n_levels`
//! descriptors of each keypoint occupy consecutive rows (or columns).

#[cfg(feature = "rayon")]
use crate::descriptor::scale_major_index;
use crate::descriptor::{bit_distance, interleaved_order, Descriptor, DescriptorSet};
use crate::matrix::Matrix;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Fills one interleaved row of the distance matrix.
fn fill_row(row: &mut [u32], query: &Descriptor, train: &[Descriptor], col_order: &[usize]) {
    for (n, desc) in train.iter().enumerate() {
        row[col_order[n]] = bit_distance(query, desc);
    }
}

/// Builds the `N1 x N2` distance matrix sequentially.
pub(crate) fn distance_matrix(d1: &DescriptorSet, d2: &DescriptorSet) -> Matrix<u32> {
    let (n1, n2) = (d1.len(), d2.len());
    let mut h = Matrix::filled(n1, n2, 0u32);
    if n1 == 0 || n2 == 0 {
        return h;
    }

    let row_order = interleaved_order(d1.num_keypoints(), d1.n_levels());
    let col_order = interleaved_order(d2.num_keypoints(), d2.n_levels());
    let data = h.as_mut_slice();
    for (j, query) in d1.as_slice().iter().enumerate() {
        let start = row_order[j] * n2;
        fill_row(&mut data[start..start + n2], query, d2.as_slice(), &col_order);
    }
    h
}

/// Builds the distance matrix with rows distributed over the rayon pool.
#[cfg(feature = "rayon")]
pub(crate) fn distance_matrix_par(d1: &DescriptorSet, d2: &DescriptorSet) -> Matrix<u32> {
    let (n1, n2) = (d1.len(), d2.len());
    let mut h = Matrix::filled(n1, n2, 0u32);
    if n1 == 0 || n2 == 0 {
        return h;
    }

    let (l1, levels1) = (d1.num_keypoints(), d1.n_levels());
    let col_order = interleaved_order(d2.num_keypoints(), d2.n_levels());
    let queries = d1.as_slice();
    h.as_mut_slice()
        .par_chunks_mut(n2)
        .enumerate()
        .for_each(|(r, row)| {
            let query = &queries[scale_major_index(r, l1, levels1)];
            fill_row(row, query, d2.as_slice(), &col_order);
        });
    h
}

#[cfg(test)]
mod tests {
    use super::distance_matrix;
    use crate::descriptor::{Descriptor, DescriptorSet};

    fn desc(bits: u32) -> Descriptor {
        Descriptor::from_words([bits, 0, 0, 0, 0, 0, 0, 0])
    }

    #[test]
    fn rows_and_columns_are_interleaved() {
        // Two keypoints, two levels, scale-major: [k0l0, k1l0, k0l1, k1l1].
        let d1 = DescriptorSet::new(vec![desc(0b0001), desc(0b0111), desc(0b0011), desc(0b1111)], 2).unwrap();
        let d2 = DescriptorSet::new(vec![desc(0), desc(0), desc(0), desc(0)], 2).unwrap();
        let h = distance_matrix(&d1, &d2);
        // Interleaved rows: k0l0, k0l1, k1l0, k1l1 -> popcounts 1, 2, 3, 4.
        let firsts: Vec<u32> = (0..4).map(|r| h.get(r, 0).unwrap()).collect();
        assert_eq!(firsts, vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_sets_give_empty_matrix() {
        let d1 = DescriptorSet::new(Vec::new(), 2).unwrap();
        let d2 = DescriptorSet::new(vec![desc(0); 2], 2).unwrap();
        let h = distance_matrix(&d1, &d2);
        assert_eq!((h.rows(), h.cols()), (0, 2));
    }
}
