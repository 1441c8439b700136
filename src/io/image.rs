//! Image loading via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::extract::GrayFrame;
use crate::util::{ScaleMatchError, ScaleMatchResult};
use std::path::Path;

/// Loads an image from disk and converts it to 8-bit grayscale.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> ScaleMatchResult<image::GrayImage> {
    let img = image::open(path).map_err(|err| ScaleMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    Ok(img.to_luma8())
}

/// Borrows a grayscale image buffer as an extractor frame.
pub fn frame_from_gray_image(img: &image::GrayImage) -> ScaleMatchResult<GrayFrame<'_>> {
    GrayFrame::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

#[cfg(test)]
mod tests {
    use super::{frame_from_gray_image, load_gray_image};
    use crate::util::ScaleMatchError;

    #[test]
    fn missing_file_is_an_image_error() {
        let err = load_gray_image("does/not/exist.png").unwrap_err();
        assert!(matches!(err, ScaleMatchError::ImageIo { .. }));
    }

    #[test]
    fn gray_image_views_as_frame() {
        let img = image::GrayImage::from_raw(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let frame = frame_from_gray_image(&img).unwrap();
        assert_eq!((frame.width(), frame.height()), (3, 2));
        assert_eq!(frame.row(1), Some(&[4u8, 5, 6][..]));
    }
}
