//! Immutable bitmaps produced by the renderers.

use std::io::Cursor;

use ::image::{DynamicImage, ImageOutputFormat, RgbImage, RgbaImage};
use render_common::{Color, RenderError, RenderResult};
use tiny_skia::{ColorU8, IntRect, Pixmap};
use tracing::warn;

use crate::canvas::{Canvas, CanvasExt, Rect, Size};
use crate::png;
use crate::raster::RasterCanvas;

/// Edge length of the square produced by [`Image::app_icon`].
pub const APP_ICON_SIZE: u32 = 1024;

/// Default JPEG quality (0-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// A finished RGBA bitmap.
///
/// Pixels are kept premultiplied internally; every accessor hands out
/// straight (non-premultiplied) RGBA.
#[derive(Clone)]
pub struct Image {
    pixmap: Pixmap,
    scale: f64,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("scale", &self.scale)
            .finish()
    }
}

impl Image {
    pub(crate) fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap, scale: 1.0 }
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Build an image from straight-alpha RGBA bytes (4 per pixel, row-major).
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Option<Self> {
        if data.len() != width as usize * height as usize * 4 {
            warn!(
                width,
                height,
                bytes = data.len(),
                "RGBA buffer does not match image dimensions"
            );
            return None;
        }

        let mut pixmap = Pixmap::new(width, height)?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(data.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Some(Self::from_pixmap(pixmap))
    }

    pub(crate) fn from_rgba_image(image: &RgbaImage) -> Option<Self> {
        Self::from_rgba8(image.width(), image.height(), image.as_raw())
    }

    /// Tag the image with a display scale (points to pixels).
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Straight RGBA of one pixel, `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// All pixels as straight RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Scale the image to `size` over an opaque white background.
    pub fn resize(&self, size: Size) -> Option<Image> {
        let mut canvas = RasterCanvas::new(size, Color::WHITE)?;
        canvas.draw_image(self, Rect::from_size(size));
        Some(canvas.into_image())
    }

    /// Cut out a rectangle. The rectangle is clipped to the image; `None` if
    /// nothing is left.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Option<Image> {
        let rect = IntRect::from_xywh(i32::try_from(x).ok()?, i32::try_from(y).ok()?, width, height)?;
        let pixmap = self.pixmap.clone_rect(rect)?;
        Some(Image {
            pixmap,
            scale: self.scale,
        })
    }

    /// Copy of the image with a one pixel horizontal line across row `at`.
    pub fn draw_horizontal_line(&self, at: f64, color: Color) -> Option<Image> {
        let size = self.size();
        let mut canvas = RasterCanvas::new(size, Color::WHITE)?;
        canvas.draw_image(self, Rect::from_size(size));

        canvas.set_stroke_color(color);
        canvas.draw_line_segment(&[(0.0, at), (size.width as f64, at)], true);

        Some(canvas.into_image())
    }

    /// [`draw_horizontal_line`](Image::draw_horizontal_line) in green.
    pub fn draw_guide_line(&self, at: f64) -> Option<Image> {
        self.draw_horizontal_line(at, Color::GREEN)
    }

    /// A 1024x1024 white square with this image centered at its own size.
    pub fn app_icon(&self) -> Option<Image> {
        let size = Size::new(APP_ICON_SIZE, APP_ICON_SIZE);
        let mut canvas = RasterCanvas::new(size, Color::WHITE)?;

        let width = self.width() as f64;
        let height = self.height() as f64;
        let x = (APP_ICON_SIZE as f64 - width) / 2.0;
        let y = (APP_ICON_SIZE as f64 - height) / 2.0;
        canvas.draw_image(self, Rect::new(x, y, width, height));

        Some(canvas.into_image())
    }

    /// Encode as PNG.
    pub fn png_data(&self) -> RenderResult<Vec<u8>> {
        png::encode_png(
            &self.to_rgba8(),
            self.width() as usize,
            self.height() as usize,
        )
    }

    /// Encode as JPEG; translucent pixels are flattened onto white.
    pub fn jpeg_data(&self, quality: u8) -> RenderResult<Vec<u8>> {
        let rgb = RgbImage::from_fn(self.width(), self.height(), |x, y| {
            let [r, g, b, a] = self.pixel(x, y).unwrap_or([255, 255, 255, 255]);
            let over_white = |c: u8| -> u8 {
                let alpha = a as f64 / 255.0;
                (c as f64 * alpha + 255.0 * (1.0 - alpha)).round() as u8
            };
            ::image::Rgb([over_white(r), over_white(g), over_white(b)])
        });

        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut out, ImageOutputFormat::Jpeg(quality.clamp(1, 100)))
            .map_err(|e| RenderError::Encode(format!("JPEG: {}", e)))?;
        Ok(out.into_inner())
    }

    /// PNG bytes, or `None` (logged) if encoding failed.
    pub fn data(&self) -> Option<Vec<u8>> {
        self.png_data()
            .map_err(|e| warn!(error = %e, "Failed to encode PNG"))
            .ok()
    }
}
