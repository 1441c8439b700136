//! Boundary to the keypoint detector and descriptor extractor.
//!
//! Detection is not part of this crate. A detector plugs in by implementing
//! [`FeatureExtractor`] and returning a [`FeatureSet`] whose descriptors hold
//! every keypoint at every pyramid level together with its detection level.

use crate::descriptor::FeatureSet;
use crate::search::DEFAULT_LEVELS;
use crate::util::{ScaleMatchError, ScaleMatchResult};

/// Borrowed 8-bit grayscale frame with a row stride in pixels.
#[derive(Clone, Copy, Debug)]
pub struct GrayFrame<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> GrayFrame<'a> {
    /// Creates a frame view, validating that `data` covers every row.
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> ScaleMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScaleMatchError::InvalidInput("frame dimensions must be non-zero"));
        }
        if stride < width {
            return Err(ScaleMatchError::InvalidInput("frame stride is smaller than its width"));
        }
        let needed = (height - 1)
            .checked_mul(stride)
            .and_then(|v| v.checked_add(width))
            .ok_or(ScaleMatchError::InvalidInput("frame dimensions overflow"))?;
        if data.len() < needed {
            return Err(ScaleMatchError::InvalidInput("frame buffer is too small"));
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Creates a contiguous frame view.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> ScaleMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns row `y`, or `None` past the last row.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.data.get(start..start + self.width)
    }
}

/// Extraction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtractParams {
    /// Number of keypoints to detect.
    pub n_features: usize,
    /// Pyramid levels every keypoint is described at.
    pub n_levels: usize,
    /// Scale ratio between consecutive pyramid levels.
    pub scale_factor: f32,
    /// Gaussian smoothing kernel size before description: 0 (off), 3, 5 or 7.
    pub blur_size: u32,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            n_features: 1000,
            n_levels: DEFAULT_LEVELS,
            scale_factor: 1.2,
            blur_size: 0,
        }
    }
}

impl ExtractParams {
    /// Checks the parameter ranges an extractor may rely on.
    pub fn validate(&self) -> ScaleMatchResult<()> {
        if self.n_levels == 0 {
            return Err(ScaleMatchError::InvalidLevels {
                n_levels: self.n_levels,
            });
        }
        if !matches!(self.blur_size, 0 | 3 | 5 | 7) {
            return Err(ScaleMatchError::InvalidInput("blur_size must be 0, 3, 5 or 7"));
        }
        if !(self.scale_factor > 1.0) {
            return Err(ScaleMatchError::InvalidInput("scale_factor must exceed 1"));
        }
        Ok(())
    }

    /// Scale of `level` relative to the full-resolution image.
    pub fn level_scale(&self, level: usize) -> f32 {
        self.scale_factor.powi(level as i32)
    }
}

/// Detects keypoints and describes each one at every pyramid level.
pub trait FeatureExtractor {
    fn extract(&self, frame: GrayFrame<'_>, params: &ExtractParams) -> ScaleMatchResult<FeatureSet>;
}
