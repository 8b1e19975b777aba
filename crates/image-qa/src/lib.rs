//! Perceptual image checks for lossy conversion pipelines
//!
//! A difference hash (dHash) fingerprints an image in 64 bits. Re-encoding
//! barely moves it; rotating or cropping changes it a lot. Comparing the
//! hashes of a source image and its converted output tells whether the
//! conversion kept the visual content.

pub mod dhash;
pub mod error;

pub use dhash::{
    compare_images, compute_dhash_hex, dhash, hamming_distance_hex, ImageComparison,
    DEFAULT_MAX_DISTANCE,
};
pub use error::ImageQaError;
