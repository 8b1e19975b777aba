//! dHash against real encoders: re-encoding stays close, a different picture does not

use image::{imageops, DynamicImage, GrayImage, ImageFormat, Luma};
use image_qa::{compare_images, compute_dhash_hex, ImageQaError, DEFAULT_MAX_DISTANCE};
use pretty_assertions::assert_eq;
use std::io::Cursor;

/// Nine vertical bands, 8 px wide: a slow ramp up, then a sharp fall
fn banded_image() -> GrayImage {
    const BANDS: [u8; 9] = [20, 60, 100, 140, 180, 220, 250, 120, 10];
    GrayImage::from_fn(72, 64, |x, _| Luma([BANDS[(x / 8) as usize]]))
}

fn encode(image: &GrayImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(image.clone())
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

#[test]
fn test_hash_is_deterministic() {
    let png = encode(&banded_image(), ImageFormat::Png);
    let first = compute_dhash_hex(&png).unwrap();
    let second = compute_dhash_hex(&png).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 16);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_png_and_jpeg_of_same_picture_are_similar() {
    let image = banded_image();
    let png = encode(&image, ImageFormat::Png);
    let jpeg = encode(&image, ImageFormat::Jpeg);

    let comparison = compare_images(&png, &jpeg).unwrap();
    assert!(
        comparison.is_similar(DEFAULT_MAX_DISTANCE),
        "distance {} between {} and {}",
        comparison.distance,
        comparison.left_hash,
        comparison.right_hash
    );
}

#[test]
fn test_mirrored_picture_is_not_similar() {
    let image = banded_image();
    let mirrored = imageops::flip_horizontal(&image);

    let comparison = compare_images(
        &encode(&image, ImageFormat::Png),
        &encode(&mirrored, ImageFormat::Png),
    )
    .unwrap();
    assert!(
        comparison.distance > DEFAULT_MAX_DISTANCE,
        "distance {}",
        comparison.distance
    );
}

#[test]
fn test_exact_grid_gradients() {
    let descending = GrayImage::from_fn(9, 8, |x, _| Luma([240 - (x as u8) * 25]));
    let ascending = imageops::flip_horizontal(&descending);

    let down = compute_dhash_hex(&encode(&descending, ImageFormat::Png)).unwrap();
    let up = compute_dhash_hex(&encode(&ascending, ImageFormat::Png)).unwrap();
    assert_eq!(down, "ffffffffffffffff");
    assert_eq!(up, "0000000000000000");
}

#[test]
fn test_undecodable_bytes_are_an_error() {
    let result = compute_dhash_hex(b"not an image");
    assert!(matches!(result, Err(ImageQaError::Decode(_))));
}
