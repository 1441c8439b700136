//! Text persistence for descriptors, matrices and matches.

pub mod descriptors;
#[cfg(feature = "image-io")]
pub mod image;
pub mod matrix;

pub use descriptors::{
    read_descriptors, read_descriptors_file, write_descriptors, write_descriptors_file, DescriptorRecords,
};
#[cfg(feature = "image-io")]
pub use self::image::{frame_from_gray_image, load_gray_image};
pub use matrix::{
    read_matrix, read_matrix_file, write_matches, write_matches_file, write_matrix, write_matrix_file,
};
