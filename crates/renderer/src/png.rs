//! PNG encoding for RGBA bitmaps.
//!
//! Two layouts are produced:
//! - **Indexed (color type 3)** when the bitmap has at most 256 distinct
//!   colors. Palette-driven drawings on a flat background usually qualify,
//!   and the files come out several times smaller.
//! - **Truecolor with alpha (color type 6)** otherwise.
//!
//! [`encode_png`] picks the layout automatically.

use std::collections::HashMap;
use std::io::Write;

use rayon::prelude::*;
use render_common::{RenderError, RenderResult};

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for an indexed PNG
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels before palette extraction is split across threads
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

/// A straight-alpha RGBA palette entry.
pub type PaletteEntry = (u8, u8, u8, u8);

/// Encode straight-alpha RGBA pixels, choosing indexed or truecolor layout.
pub fn encode_png(pixels: &[u8], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    check_len(pixels.len(), width * height * 4)?;

    let extracted = if width * height >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    };

    match extracted {
        Some((palette, indices)) => encode_png_indexed(width, height, &palette, &indices),
        None => encode_png_rgba(pixels, width, height),
    }
}

/// Encode straight-alpha RGBA pixels as a color type 6 PNG.
pub fn encode_png_rgba(pixels: &[u8], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    check_len(pixels.len(), width * height * 4)?;

    let mut png = PNG_SIGNATURE.to_vec();
    write_chunk(&mut png, b"IHDR", &header(width, height, 6));
    write_chunk(&mut png, b"IDAT", &deflate_scanlines(pixels, width * 4, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode palette indices as a color type 3 PNG.
///
/// A `tRNS` chunk is written only when some palette entry is translucent.
pub fn encode_png_indexed(
    width: usize,
    height: usize,
    palette: &[PaletteEntry],
    indices: &[u8],
) -> RenderResult<Vec<u8>> {
    check_len(indices.len(), width * height)?;
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(RenderError::Encode(format!(
            "palette must hold 1..={} colors, got {}",
            MAX_PALETTE_SIZE,
            palette.len()
        )));
    }

    let mut png = PNG_SIGNATURE.to_vec();
    write_chunk(&mut png, b"IHDR", &header(width, height, 3));

    let plte: Vec<u8> = palette.iter().flat_map(|&(r, g, b, _)| [r, g, b]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|&(_, _, _, a)| a < 255) {
        let trns: Vec<u8> = palette.iter().map(|&(_, _, _, a)| a).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_chunk(&mut png, b"IDAT", &deflate_scanlines(indices, width, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn check_len(actual: usize, expected: usize) -> RenderResult<()> {
    if actual != expected {
        return Err(RenderError::Encode(format!(
            "pixel buffer holds {} bytes, expected {}",
            actual, expected
        )));
    }
    Ok(())
}

/// IHDR payload: 8-bit depth, no interlace.
fn header(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.extend_from_slice(&[8, color_type, 0, 0, 0]);
    ihdr
}

/// Prefix every row with filter type 0 and zlib-compress the result.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> RenderResult<Vec<u8>> {
    let mut raw = Vec::with_capacity(height * (row_bytes + 1));
    for row in data.chunks_exact(row_bytes.max(1)).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&raw)
        .and_then(|_| encoder.finish())
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))
}

fn write_chunk(png: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(kind);
    png.extend_from_slice(data);

    let mut crc = crc32fast::Hasher::new();
    crc.update(kind);
    crc.update(data);
    png.extend_from_slice(&crc.finalize().to_be_bytes());
}

/// Pack RGBA bytes into a u32 for cheap hashing
#[inline(always)]
fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

#[inline(always)]
fn unpack(packed: u32) -> PaletteEntry {
    let [r, g, b, a] = packed.to_le_bytes();
    (r, g, b, a)
}

/// Single-threaded palette extraction; `None` once a 257th color shows up.
fn extract_palette_sequential(pixels: &[u8]) -> Option<(Vec<PaletteEntry>, Vec<u8>)> {
    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let key = pack(px[0], px[1], px[2], px[3]);
        let index = match lookup.get(&key) {
            Some(&index) => index,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let index = palette.len() as u8;
                palette.push(unpack(key));
                lookup.insert(key, index);
                index
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Parallel palette extraction for larger bitmaps.
///
/// Distinct colors are gathered per chunk, merged, and then every pixel is
/// mapped to its palette index in a second parallel pass.
fn extract_palette_parallel(pixels: &[u8]) -> Option<(Vec<PaletteEntry>, Vec<u8>)> {
    let chunk_pixels = (pixels.len() / 4 / rayon::current_num_threads()).max(256);

    let distinct: Vec<u32> = pixels
        .par_chunks(chunk_pixels * 4)
        .flat_map_iter(|chunk| {
            let mut seen: HashMap<u32, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE);
            for px in chunk.chunks_exact(4) {
                seen.insert(pack(px[0], px[1], px[2], px[3]), ());
                if seen.len() > MAX_PALETTE_SIZE {
                    break;
                }
            }
            seen.into_keys()
        })
        .collect();

    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    for key in distinct {
        if lookup.contains_key(&key) {
            continue;
        }
        if palette.len() >= MAX_PALETTE_SIZE {
            return None;
        }
        lookup.insert(key, palette.len() as u8);
        palette.push(unpack(key));
    }

    let indices: Vec<u8> = pixels
        .par_chunks_exact(4)
        .map(|px| lookup.get(&pack(px[0], px[1], px[2], px[3])).copied().unwrap_or(0))
        .collect();

    Some((palette, indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_palette_simple() {
        let pixels = [
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            0, 0, 255, 255, // blue
            255, 0, 0, 255, // red again
        ];

        let (palette, indices) = extract_palette_sequential(&pixels).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(indices, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_extract_palette_keeps_alpha() {
        let pixels = [
            255, 0, 0, 255, // opaque red
            0, 0, 0, 0, // transparent
        ];

        let (palette, _) = extract_palette_sequential(&pixels).unwrap();
        assert!(palette.contains(&(0, 0, 0, 0)));
        assert!(palette.contains(&(255, 0, 0, 255)));
    }

    #[test]
    fn test_extract_palette_parallel_matches_sequential() {
        // 128x128 bands of 50 colors, above PARALLEL_THRESHOLD
        let mut pixels = Vec::with_capacity(128 * 128 * 4);
        for y in 0..128u32 {
            for x in 0..128u32 {
                let band = ((x / 8) + (y / 8)) % 50;
                pixels.extend_from_slice(&[(band * 5) as u8, (100 + band * 3) as u8, 40, 255]);
            }
        }

        let (par_palette, par_indices) = extract_palette_parallel(&pixels).unwrap();
        let (seq_palette, _) = extract_palette_sequential(&pixels).unwrap();
        assert_eq!(par_palette.len(), seq_palette.len());
        assert_eq!(par_indices.len(), 128 * 128);

        for (i, px) in pixels.chunks_exact(4).enumerate() {
            let entry = par_palette[par_indices[i] as usize];
            assert_eq!(entry, (px[0], px[1], px[2], px[3]));
        }
    }

    #[test]
    fn test_too_many_colors() {
        let pixels: Vec<u8> = (0..300u32).flat_map(|i| [i as u8, (i >> 8) as u8, 7, 255]).collect();
        assert!(extract_palette_sequential(&pixels).is_none());
    }

    #[test]
    fn test_chunk_crc() {
        let mut out = Vec::new();
        write_chunk(&mut out, b"IEND", &[]);
        // Well-known CRC of an empty IEND chunk
        assert_eq!(&out[8..], &[0xAE, 0x42, 0x60, 0x82]);
    }
}
