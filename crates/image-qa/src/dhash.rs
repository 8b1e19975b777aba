//! Difference hash (dHash) and Hamming distance

use crate::error::ImageQaError;
use image::imageops::{self, FilterType};
use image::DynamicImage;
use serde::Serialize;
use tracing::debug;

/// The grid is one column wider than the hash so each row yields 8 comparisons
const GRID_WIDTH: u32 = 9;
const GRID_HEIGHT: u32 = 8;

/// Hex length of a 64-bit hash
const HASH_HEX_LEN: usize = 16;

/// Largest distance still treated as "same picture" after lossy re-encoding
pub const DEFAULT_MAX_DISTANCE: u32 = 10;

/// 64-bit difference hash of an already decoded image.
///
/// Grayscale, squash to 9x8 ignoring aspect ratio, then for every row set a
/// bit when a pixel is brighter than its right-hand neighbour. Bits are packed
/// row-major, first comparison in the most significant bit.
pub fn dhash(image: &DynamicImage) -> u64 {
    let gray = image.to_luma8();
    let grid = imageops::resize(&gray, GRID_WIDTH, GRID_HEIGHT, FilterType::Lanczos3);

    let mut hash = 0u64;
    for y in 0..GRID_HEIGHT {
        for x in 0..GRID_WIDTH - 1 {
            let left = grid.get_pixel(x, y)[0];
            let right = grid.get_pixel(x + 1, y)[0];
            hash = (hash << 1) | u64::from(left > right);
        }
    }
    hash
}

/// Decode `image_bytes` (any format the `image` crate reads) and return its
/// dHash as 16 lowercase hex characters.
pub fn compute_dhash_hex(image_bytes: &[u8]) -> Result<String, ImageQaError> {
    let image = image::load_from_memory(image_bytes)?;
    let hex = format!("{:016x}", dhash(&image));
    debug!(
        width = image.width(),
        height = image.height(),
        hash = %hex,
        "Computed dHash"
    );
    Ok(hex)
}

/// Number of differing bits between two hex hashes.
///
/// Both inputs must be exactly 16 hex digits; anything else is a caller bug
/// and is reported as [`ImageQaError::MalformedHash`].
pub fn hamming_distance_hex(a: &str, b: &str) -> Result<u32, ImageQaError> {
    Ok((parse_hash(a)? ^ parse_hash(b)?).count_ones())
}

fn parse_hash(hex: &str) -> Result<u64, ImageQaError> {
    // from_str_radix alone would accept a leading '+'
    if hex.len() != HASH_HEX_LEN || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ImageQaError::MalformedHash(hex.to_string()));
    }
    u64::from_str_radix(hex, 16).map_err(|_| ImageQaError::MalformedHash(hex.to_string()))
}

/// Hashes of two images and the distance between them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageComparison {
    pub left_hash: String,
    pub right_hash: String,
    pub distance: u32,
}

impl ImageComparison {
    /// True when the distance is within `max_distance`
    pub fn is_similar(&self, max_distance: u32) -> bool {
        self.distance <= max_distance
    }
}

/// Hash both images and compare them
pub fn compare_images(left: &[u8], right: &[u8]) -> Result<ImageComparison, ImageQaError> {
    let left_hash = compute_dhash_hex(left)?;
    let right_hash = compute_dhash_hex(right)?;
    let distance = hamming_distance_hex(&left_hash, &right_hash)?;
    debug!(%left_hash, %right_hash, distance, "Compared images");
    Ok(ImageComparison {
        left_hash,
        right_hash,
        distance,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: A hash is at distance 0 from itself
        #[test]
        fn distance_to_self_is_zero(hash in any::<u64>()) {
            let hex = format!("{:016x}", hash);
            prop_assert_eq!(hamming_distance_hex(&hex, &hex).unwrap(), 0);
        }

        /// Property: Flipping exactly one bit gives distance 1
        #[test]
        fn single_bit_flip_is_distance_one(hash in any::<u64>(), bit in 0u32..64) {
            let a = format!("{:016x}", hash);
            let b = format!("{:016x}", hash ^ (1u64 << bit));
            prop_assert_eq!(hamming_distance_hex(&a, &b).unwrap(), 1);
        }

        /// Property: Distance is symmetric and bounded by 64
        #[test]
        fn distance_is_symmetric(x in any::<u64>(), y in any::<u64>()) {
            let a = format!("{:016x}", x);
            let b = format!("{:016x}", y);
            let d = hamming_distance_hex(&a, &b).unwrap();
            prop_assert_eq!(d, hamming_distance_hex(&b, &a).unwrap());
            prop_assert!(d <= 64);
        }
    }
}
