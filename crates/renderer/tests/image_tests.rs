//! Tests for the Image abstraction.

use render_common::Color;
use renderer::{Image, Size, APP_ICON_SIZE};

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Image {
    let data: Vec<u8> = rgba
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    Image::from_rgba8(width, height, &data).unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_from_rgba8_roundtrip() {
    let data = [10, 20, 30, 255, 40, 50, 60, 255];
    let image = Image::from_rgba8(2, 1, &data).unwrap();
    assert_eq!(image.width(), 2);
    assert_eq!(image.height(), 1);
    assert_eq!(image.scale(), 1.0);
    assert_eq!(image.to_rgba8(), data.to_vec());
}

#[test]
fn test_from_rgba8_rejects_bad_length() {
    assert!(Image::from_rgba8(2, 2, &[0; 12]).is_none());
    assert!(Image::from_rgba8(0, 0, &[]).is_none());
}

#[test]
fn test_pixel_out_of_bounds() {
    let image = solid(2, 2, [1, 2, 3, 255]);
    assert_eq!(image.pixel(1, 1), Some([1, 2, 3, 255]));
    assert_eq!(image.pixel(2, 0), None);
}

#[test]
fn test_with_scale() {
    let image = solid(1, 1, [0, 0, 0, 255]).with_scale(3.0);
    assert_eq!(image.scale(), 3.0);
}

// ============================================================================
// Transforms
// ============================================================================

#[test]
fn test_resize_fills_target() {
    let image = solid(4, 4, [255, 0, 0, 255]);
    let resized = image.resize(Size::new(16, 8)).unwrap();
    assert_eq!(resized.size(), Size::new(16, 8));
    assert_eq!(resized.pixel(8, 4), Some([255, 0, 0, 255]));
}

#[test]
fn test_resize_flattens_onto_white() {
    let image = solid(2, 2, [0, 0, 0, 0]);
    let resized = image.resize(Size::new(4, 4)).unwrap();
    assert_eq!(resized.pixel(2, 2), Some([255, 255, 255, 255]));
}

#[test]
fn test_crop() {
    let mut data = Vec::new();
    for y in 0..4u8 {
        for x in 0..4u8 {
            data.extend_from_slice(&[x * 10, y * 10, 0, 255]);
        }
    }
    let image = Image::from_rgba8(4, 4, &data).unwrap();

    let cropped = image.crop(1, 2, 2, 2).unwrap();
    assert_eq!(cropped.size(), Size::new(2, 2));
    assert_eq!(cropped.pixel(0, 0), Some([10, 20, 0, 255]));
    assert_eq!(cropped.pixel(1, 1), Some([20, 30, 0, 255]));
}

#[test]
fn test_crop_outside_or_empty() {
    let image = solid(4, 4, [0, 0, 0, 255]);
    assert!(image.crop(10, 10, 2, 2).is_none());
    assert!(image.crop(0, 0, 0, 2).is_none());
}

#[test]
fn test_horizontal_line() {
    let image = solid(10, 10, [255, 255, 255, 255]);
    let lined = image.draw_horizontal_line(4.5, Color::BLACK).unwrap();

    assert_eq!(lined.pixel(5, 4), Some([0, 0, 0, 255]));
    assert_eq!(lined.pixel(5, 0), Some([255, 255, 255, 255]));
    // The source is left untouched
    assert_eq!(image.pixel(5, 4), Some([255, 255, 255, 255]));
}

#[test]
fn test_guide_line_is_green() {
    let image = solid(10, 10, [255, 255, 255, 255]);
    let lined = image.draw_guide_line(2.5).unwrap();
    assert_eq!(lined.pixel(3, 2), Some([0, 255, 0, 255]));
}

#[test]
fn test_app_icon_centers_image() {
    let image = solid(100, 50, [0, 0, 255, 255]);
    let icon = image.app_icon().unwrap();

    assert_eq!(icon.size(), Size::new(APP_ICON_SIZE, APP_ICON_SIZE));
    assert_eq!(icon.pixel(512, 512), Some([0, 0, 255, 255]));
    assert_eq!(icon.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(icon.pixel(512, 480), Some([255, 255, 255, 255]));
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_png_data_decodes() {
    let image = solid(3, 2, [12, 34, 56, 255]);
    let png = image.data().unwrap();

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (3, 2));
    assert_eq!(decoded.into_raw(), image.to_rgba8());
}

#[test]
fn test_jpeg_data() {
    let image = solid(16, 16, [200, 100, 50, 255]);
    let jpeg = image.jpeg_data(90).unwrap();
    assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

    let decoded = image::load_from_memory(&jpeg).unwrap().to_rgb8();
    let px = decoded.get_pixel(8, 8);
    assert!((px[0] as i32 - 200).abs() <= 4);
    assert!((px[1] as i32 - 100).abs() <= 4);
    assert!((px[2] as i32 - 50).abs() <= 4);
}
