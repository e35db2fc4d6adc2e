//! One-shot rendering to bitmaps or encoded files, and decoding back.

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use ::image::codecs::gif::GifDecoder;
use ::image::{AnimationDecoder, ImageFormat};
use render_common::{Color, RenderError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::canvas::{Canvas, Size};
use crate::image::{Image, DEFAULT_JPEG_QUALITY};
use crate::pdf::PdfCanvas;
use crate::raster::RasterCanvas;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Png,
    Pdf,
    Jpg,
}

impl RenderFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            RenderFormat::Png => "png",
            RenderFormat::Pdf => "pdf",
            RenderFormat::Jpg => "jpg",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for RenderFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(RenderFormat::Png),
            "pdf" => Ok(RenderFormat::Pdf),
            "jpg" | "jpeg" => Ok(RenderFormat::Jpg),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Renders a drawing callback onto a fresh surface.
///
/// ```no_run
/// use render_common::Color;
/// use renderer::{CanvasExt, ImageRenderer, RenderFormat, Size};
///
/// let renderer = ImageRenderer::new();
/// let png = renderer.data(RenderFormat::Png, Size::new(64, 64), |canvas| {
///     canvas.set_fill_color(Color::GREEN);
///     canvas.fill_stroke_polygon(&[(8, 8), (56, 8), (32, 56)]);
/// });
/// assert!(png.is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ImageRenderer {
    background: Color,
    jpeg_quality: u8,
}

impl Default for ImageRenderer {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ImageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Draw onto a new bitmap filled with the background color.
    ///
    /// Returns `None` if the surface cannot be allocated.
    pub fn raster<F>(&self, size: Size, drawing: F) -> Option<Image>
    where
        F: FnOnce(&mut dyn Canvas),
    {
        let mut canvas = RasterCanvas::new(size, self.background)?;
        drawing(&mut canvas);
        Some(canvas.into_image())
    }

    /// Draw and encode in one go.
    pub fn data<F>(&self, format: RenderFormat, size: Size, drawing: F) -> Option<Vec<u8>>
    where
        F: FnOnce(&mut dyn Canvas),
    {
        match format {
            RenderFormat::Pdf => {
                let mut canvas = PdfCanvas::new(size, self.background)?;
                drawing(&mut canvas);
                Some(canvas.finish())
            }
            RenderFormat::Png | RenderFormat::Jpg => {
                let image = self.raster(size, drawing)?;
                encode(&image, format, self.jpeg_quality)
            }
        }
    }

    /// Decode encoded image bytes.
    ///
    /// Animated GIFs yield one image per frame and PDF documents one image
    /// per page, sized to the page's media box. Unrecognised bytes yield
    /// nothing.
    pub fn decode(data: &[u8]) -> Vec<Image> {
        if data.starts_with(PDF_MAGIC) {
            return decode_pdf(data);
        }

        match ::image::guess_format(data) {
            Ok(ImageFormat::Gif) => decode_gif(data),
            Ok(format) => match ::image::load_from_memory_with_format(data, format) {
                Ok(decoded) => Image::from_rgba_image(&decoded.to_rgba8()).into_iter().collect(),
                Err(e) => {
                    warn!(error = %e, ?format, "Failed to decode image");
                    Vec::new()
                }
            },
            Err(e) => {
                debug!(error = %e, bytes = data.len(), "Unrecognised image data");
                Vec::new()
            }
        }
    }

    /// [`decode`](ImageRenderer::decode) the contents of a file.
    pub fn decode_file(path: impl AsRef<Path>) -> Vec<Image> {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(data) => Self::decode(&data),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read image file");
                Vec::new()
            }
        }
    }
}

fn decode_gif(data: &[u8]) -> Vec<Image> {
    let frames = GifDecoder::new(Cursor::new(data)).and_then(|decoder| {
        decoder.into_frames().collect_frames()
    });

    match frames {
        Ok(frames) => {
            debug!(frames = frames.len(), "Decoded GIF");
            frames
                .into_iter()
                .filter_map(|frame| Image::from_rgba_image(&frame.into_buffer()))
                .collect()
        }
        Err(e) => {
            warn!(error = %e, "Failed to decode GIF");
            Vec::new()
        }
    }
}

/// Rasterise every page of a PDF document at one pixel per point.
fn decode_pdf(data: &[u8]) -> Vec<Image> {
    let bytes: Arc<dyn AsRef<[u8]> + Send + Sync> = Arc::new(data.to_vec());
    let pdf = match hayro::Pdf::new(bytes) {
        Ok(pdf) => pdf,
        Err(e) => {
            warn!(error = ?e, bytes = data.len(), "Failed to load PDF");
            return Vec::new();
        }
    };

    let interpreter_settings = hayro::InterpreterSettings::default();
    let render_settings = hayro::RenderSettings {
        x_scale: 1.0,
        y_scale: 1.0,
        ..Default::default()
    };

    let images: Vec<Image> = pdf
        .pages()
        .iter()
        .enumerate()
        .filter_map(|(index, page)| {
            let png = hayro::render(page, &interpreter_settings, &render_settings).take_png();
            match ::image::load_from_memory_with_format(&png, ImageFormat::Png) {
                Ok(decoded) => Image::from_rgba_image(&decoded.to_rgba8()),
                Err(e) => {
                    warn!(error = %e, page = index, "Failed to rasterise PDF page");
                    None
                }
            }
        })
        .collect();

    debug!(pages = images.len(), "Decoded PDF");
    images
}

/// Encode a bitmap; PDF is not a bitmap encoding and yields `None`.
pub(crate) fn encode(image: &Image, format: RenderFormat, jpeg_quality: u8) -> Option<Vec<u8>> {
    let encoded = match format {
        RenderFormat::Png => image.png_data(),
        RenderFormat::Jpg => image.jpeg_data(jpeg_quality),
        RenderFormat::Pdf => {
            warn!("Bitmaps cannot be encoded as PDF");
            return None;
        }
    };

    encoded
        .map_err(|e| warn!(error = %e, %format, "Failed to encode image"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("PNG".parse::<RenderFormat>().unwrap(), RenderFormat::Png);
        assert_eq!("jpeg".parse::<RenderFormat>().unwrap(), RenderFormat::Jpg);
        assert_eq!("pdf".parse::<RenderFormat>().unwrap(), RenderFormat::Pdf);
        assert!("tiff".parse::<RenderFormat>().is_err());
    }

    #[test]
    fn test_truncated_pdf_decodes_to_nothing() {
        assert!(ImageRenderer::decode(b"%PDF-1.7\n%%EOF").is_empty());
    }

    #[test]
    fn test_garbage_decodes_to_nothing() {
        assert!(ImageRenderer::decode(&[1, 2, 3, 4, 5]).is_empty());
        assert!(ImageRenderer::decode(&[]).is_empty());
    }
}
