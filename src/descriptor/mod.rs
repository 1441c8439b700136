//! Binary descriptors and multi-scale descriptor sets.
//!
//! A [`DescriptorSet`] holds `L` keypoints described at every one of
//! `n_levels` pyramid levels, stored scale-major: the `L` level-0
//! descriptors first, then the `L` level-1 descriptors, and so on.

pub mod distance;
pub mod remap;

pub use distance::bit_distance;
pub use remap::{interleaved_index, interleaved_order, scale_major_index};

use crate::util::{ScaleMatchError, ScaleMatchResult};

/// Number of bytes in a descriptor.
pub const DESCRIPTOR_BYTES: usize = 32;
/// Number of 32-bit words in a descriptor.
pub const DESCRIPTOR_WORDS: usize = 8;
/// Number of bits in a descriptor.
pub const DESCRIPTOR_BITS: usize = 256;

/// 256-bit binary descriptor stored as eight 32-bit words.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Descriptor([u32; DESCRIPTOR_WORDS]);

impl Descriptor {
    /// Creates a descriptor from its eight words.
    pub const fn from_words(words: [u32; DESCRIPTOR_WORDS]) -> Self {
        Self(words)
    }

    /// Creates a descriptor from 32 bytes, packing each group of four bytes
    /// into a little-endian word.
    pub fn from_bytes(bytes: &[u8; DESCRIPTOR_BYTES]) -> Self {
        let mut words = [0u32; DESCRIPTOR_WORDS];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self(words)
    }

    /// Returns the descriptor as 32 bytes (inverse of [`Descriptor::from_bytes`]).
    pub fn to_bytes(&self) -> [u8; DESCRIPTOR_BYTES] {
        let mut bytes = [0u8; DESCRIPTOR_BYTES];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Returns the raw words.
    pub fn words(&self) -> &[u32; DESCRIPTOR_WORDS] {
        &self.0
    }

    /// Hamming distance to `other`.
    pub fn distance(&self, other: &Self) -> u32 {
        bit_distance(self, other)
    }
}

/// Keypoint metadata carried alongside a descriptor row for persistence.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct KeypointMeta {
    pub x: f32,
    pub y: f32,
    /// Pyramid level of this row.
    pub octave: i32,
    /// Orientation in degrees.
    pub angle: f32,
    /// Diameter of the described patch.
    pub size: f32,
}

/// Scale-major descriptor set for one image.
#[derive(Clone, Debug, PartialEq)]
pub struct DescriptorSet {
    descriptors: Vec<Descriptor>,
    n_levels: usize,
}

impl DescriptorSet {
    /// Creates a set from scale-major rows.
    ///
    /// The row count must be a multiple of `n_levels`; an empty set is valid.
    pub fn new(descriptors: Vec<Descriptor>, n_levels: usize) -> ScaleMatchResult<Self> {
        if n_levels == 0 {
            return Err(ScaleMatchError::InvalidLevels { n_levels });
        }
        if descriptors.len() % n_levels != 0 {
            return Err(ScaleMatchError::LevelMismatch {
                rows: descriptors.len(),
                n_levels,
            });
        }
        Ok(Self {
            descriptors,
            n_levels,
        })
    }

    /// Creates a set from per-keypoint descriptor stacks (`levels[k][l]` is
    /// keypoint `k` at level `l`), reordering them scale-major.
    pub fn from_keypoint_levels(levels: &[Vec<Descriptor>], n_levels: usize) -> ScaleMatchResult<Self> {
        if n_levels == 0 {
            return Err(ScaleMatchError::InvalidLevels { n_levels });
        }
        if let Some(bad) = levels.iter().find(|stack| stack.len() != n_levels) {
            return Err(ScaleMatchError::LevelMismatch {
                rows: bad.len(),
                n_levels,
            });
        }
        let mut descriptors = Vec::with_capacity(levels.len() * n_levels);
        for level in 0..n_levels {
            descriptors.extend(levels.iter().map(|stack| stack[level]));
        }
        Self::new(descriptors, n_levels)
    }

    /// Number of pyramid levels per keypoint.
    pub fn n_levels(&self) -> usize {
        self.n_levels
    }

    /// Number of keypoints (`L`).
    pub fn num_keypoints(&self) -> usize {
        self.descriptors.len() / self.n_levels
    }

    /// Total number of rows (`L * n_levels`).
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if the set holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Returns the scale-major rows.
    pub fn as_slice(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Returns the descriptors of every keypoint at `level`.
    pub fn level(&self, level: usize) -> Option<&[Descriptor]> {
        if level >= self.n_levels {
            return None;
        }
        let l = self.num_keypoints();
        self.descriptors.get(level * l..(level + 1) * l)
    }

    /// Returns keypoint `keypoint` at `level`.
    pub fn get(&self, keypoint: usize, level: usize) -> Option<&Descriptor> {
        self.level(level)?.get(keypoint)
    }

    /// Returns the rows permuted into level-interleaved order.
    pub fn to_interleaved(&self) -> Vec<Descriptor> {
        let l = self.num_keypoints();
        let mut out = vec![Descriptor::default(); self.descriptors.len()];
        for (i, desc) in self.descriptors.iter().enumerate() {
            out[interleaved_index(i, l, self.n_levels)] = *desc;
        }
        out
    }
}

/// Descriptor set with the per-keypoint detection scales and optional row
/// metadata produced by a feature extractor.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureSet {
    descriptors: DescriptorSet,
    detection_scales: Vec<usize>,
    keypoints: Vec<KeypointMeta>,
}

impl FeatureSet {
    /// Bundles a descriptor set with its detection scales.
    ///
    /// `detection_scales` must hold one level index below `n_levels` per
    /// keypoint. `keypoints`, when non-empty, must hold one entry per row.
    pub fn new(
        descriptors: DescriptorSet,
        detection_scales: Vec<usize>,
        keypoints: Vec<KeypointMeta>,
    ) -> ScaleMatchResult<Self> {
        validate_detection_scales(&descriptors, &detection_scales)?;
        if !keypoints.is_empty() && keypoints.len() != descriptors.len() {
            return Err(ScaleMatchError::InvalidInput(
                "keypoint metadata must have one entry per descriptor row",
            ));
        }
        Ok(Self {
            descriptors,
            detection_scales,
            keypoints,
        })
    }

    pub fn descriptors(&self) -> &DescriptorSet {
        &self.descriptors
    }

    pub fn detection_scales(&self) -> &[usize] {
        &self.detection_scales
    }

    pub fn keypoints(&self) -> &[KeypointMeta] {
        &self.keypoints
    }
}

/// Checks that `scales` labels every keypoint of `set` with a valid level.
pub(crate) fn validate_detection_scales(set: &DescriptorSet, scales: &[usize]) -> ScaleMatchResult<()> {
    check_detection_scales(scales, set.num_keypoints(), set.n_levels())
}

pub(crate) fn check_detection_scales(
    scales: &[usize],
    num_keypoints: usize,
    n_levels: usize,
) -> ScaleMatchResult<()> {
    if scales.len() != num_keypoints {
        return Err(ScaleMatchError::InvalidInput(
            "detection scales must have one entry per keypoint",
        ));
    }
    if scales.iter().any(|&s| s >= n_levels) {
        return Err(ScaleMatchError::InvalidInput(
            "detection scale exceeds the number of levels",
        ));
    }
    Ok(())
}
