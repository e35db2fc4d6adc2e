//! Tests for PNG encoding.
//!
//! Covers the indexed and RGBA encoders, automatic layout selection and
//! decoding the output back with the `image` crate.

use renderer::png::{encode_png, encode_png_indexed, encode_png_rgba, PNG_SIGNATURE};
use std::collections::HashSet;

// ============================================================================
// Helper functions
// ============================================================================

/// Pack RGBA bytes into a u32 for color counting
fn pack_color(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

/// Banded pixels drawn from a small palette, like a stepped palette render
fn generate_banded_pixels(width: usize, height: usize, bands: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let band = ((x + y) * bands / (width + height)).min(bands - 1);
            let v = (band * 255 / bands.max(1)) as u8;
            pixels.extend_from_slice(&[v, 255 - v, 96, 255]);
        }
    }
    pixels
}

fn count_unique_colors(pixels: &[u8]) -> usize {
    let mut unique: HashSet<u32> = HashSet::new();
    for chunk in pixels.chunks_exact(4) {
        unique.insert(pack_color(chunk[0], chunk[1], chunk[2], chunk[3]));
    }
    unique.len()
}

/// Color type byte from the IHDR chunk
fn color_type(png: &[u8]) -> u8 {
    png[25]
}

fn decode(png: &[u8]) -> Vec<u8> {
    image::load_from_memory(png).unwrap().to_rgba8().into_raw()
}

// ============================================================================
// Basic PNG creation tests
// ============================================================================

#[test]
fn test_encode_png_simple() {
    let pixels = [
        255, 0, 0, 255, // red
        0, 255, 0, 255, // green
        0, 255, 0, 255, // green
        255, 0, 0, 255, // red
    ];

    let png = encode_png(&pixels, 2, 2).unwrap();
    assert_eq!(&png[0..8], &PNG_SIGNATURE);
    assert_eq!(color_type(&png), 3);
    assert_eq!(decode(&png), pixels.to_vec());
}

#[test]
fn test_encode_png_rgba() {
    let pixels = [
        255, 0, 0, 255, // red
        0, 255, 0, 255, // green
        0, 0, 255, 255, // blue
        255, 255, 0, 255, // yellow
    ];

    let png = encode_png_rgba(&pixels, 2, 2).unwrap();
    assert_eq!(&png[0..8], &PNG_SIGNATURE);
    assert_eq!(color_type(&png), 6);
    assert_eq!(decode(&png), pixels.to_vec());
}

#[test]
fn test_encode_png_with_transparency() {
    let pixels = [
        255, 0, 0, 255, // red, opaque
        0, 0, 0, 0, // transparent
        0, 255, 0, 128, // green, semi-transparent
        0, 0, 255, 255, // blue, opaque
    ];

    let png = encode_png(&pixels, 2, 2).unwrap();
    assert!(png.windows(4).any(|w| w == b"tRNS"));
    assert_eq!(decode(&png), pixels.to_vec());
}

#[test]
fn test_opaque_indexed_has_no_trns() {
    let png = encode_png_indexed(2, 1, &[(1, 2, 3, 255), (4, 5, 6, 255)], &[0, 1]).unwrap();
    assert!(!png.windows(4).any(|w| w == b"tRNS"));
}

#[test]
fn test_buffer_length_mismatch() {
    assert!(encode_png(&[0, 0, 0], 1, 1).is_err());
    assert!(encode_png_rgba(&[0; 8], 1, 1).is_err());
    assert!(encode_png_indexed(2, 2, &[(0, 0, 0, 255)], &[0, 0, 0]).is_err());
}

#[test]
fn test_indexed_palette_bounds() {
    assert!(encode_png_indexed(1, 1, &[], &[0]).is_err());
    let oversized = vec![(0, 0, 0, 255); 257];
    assert!(encode_png_indexed(1, 1, &oversized, &[0]).is_err());
}

// ============================================================================
// Format selection tests
// ============================================================================

#[test]
fn test_rgba_fallback_many_colors() {
    let mut pixels = Vec::with_capacity(300 * 4);
    for i in 0..300u32 {
        pixels.extend_from_slice(&[(i % 256) as u8, (i / 256) as u8, 7, 255]);
    }

    let png = encode_png(&pixels, 300, 1).unwrap();
    assert_eq!(color_type(&png), 6);
    assert_eq!(decode(&png), pixels);
}

#[test]
fn test_exactly_256_colors_stays_indexed() {
    let mut pixels = Vec::with_capacity(256 * 4);
    for i in 0..256 {
        let v = i as u8;
        pixels.extend_from_slice(&[v, v, v, 255]);
    }

    let png = encode_png(&pixels, 256, 1).unwrap();
    assert_eq!(color_type(&png), 3);
}

#[test]
fn test_banded_render_indexed_is_smaller() {
    let pixels = generate_banded_pixels(128, 128, 12);
    assert!(count_unique_colors(&pixels) <= 256);

    let indexed = encode_png(&pixels, 128, 128).unwrap();
    let rgba = encode_png_rgba(&pixels, 128, 128).unwrap();

    assert!(
        indexed.len() < rgba.len(),
        "Indexed PNG ({} bytes) should be smaller than RGBA ({} bytes)",
        indexed.len(),
        rgba.len()
    );
}

// ============================================================================
// Large image tests (parallel processing)
// ============================================================================

#[test]
fn test_large_image_parallel_extraction() {
    // 256x256 is above the parallel threshold
    let pixels = generate_banded_pixels(256, 256, 40);

    let png = encode_png(&pixels, 256, 256).unwrap();
    assert_eq!(color_type(&png), 3);
    assert_eq!(decode(&png), pixels);
}

// ============================================================================
// Edge case tests
// ============================================================================

#[test]
fn test_single_pixel() {
    let png = encode_png(&[255, 0, 0, 255], 1, 1).unwrap();
    assert_eq!(decode(&png), vec![255, 0, 0, 255]);
}

#[test]
fn test_single_color_image_is_small() {
    let pixels: Vec<u8> = std::iter::repeat([128, 64, 32, 255])
        .take(100 * 100)
        .flatten()
        .collect();

    let png = encode_png(&pixels, 100, 100).unwrap();
    assert!(png.len() < 1000, "Single color 100x100 should be very small");
}

#[test]
fn test_all_transparent() {
    let pixels = vec![0u8; 10 * 10 * 4];
    let png = encode_png(&pixels, 10, 10).unwrap();
    assert_eq!(decode(&png), pixels);
}
