//! Reindexing between scale-major and level-interleaved descriptor order.
//!
//! Scale-major order stores all `L` level-0 descriptors, then all level-1
//! descriptors, and so on. Interleaved order stores the `n_levels`
//! descriptors of each keypoint contiguously, which is the layout the
//! distance matrix and the block scorers work in.

/// Maps a scale-major row index to its level-interleaved position.
///
/// `num_keypoints` is `L`, the number of keypoints per level.
#[inline]
pub fn interleaved_index(index: usize, num_keypoints: usize, n_levels: usize) -> usize {
    debug_assert!(num_keypoints > 0 && index < num_keypoints * n_levels);
    n_levels * (index % num_keypoints) + index / num_keypoints
}

/// Inverse of [`interleaved_index`].
#[inline]
pub fn scale_major_index(index: usize, num_keypoints: usize, n_levels: usize) -> usize {
    debug_assert!(n_levels > 0 && index < num_keypoints * n_levels);
    num_keypoints * (index % n_levels) + index / n_levels
}

/// Builds the full scale-major to interleaved mapping for one descriptor set.
pub fn interleaved_order(num_keypoints: usize, n_levels: usize) -> Vec<usize> {
    (0..num_keypoints * n_levels)
        .map(|i| interleaved_index(i, num_keypoints, n_levels))
        .collect()
}
