//! Incremental rendering onto one long-lived bitmap.

use render_common::Color;
use tracing::{debug, warn};

use crate::canvas::{Canvas, Rect, Size};
use crate::image::{Image, DEFAULT_JPEG_QUALITY};
use crate::raster::RasterCanvas;
use crate::render::{self, RenderFormat};

/// Keeps a single surface alive across several drawing passes.
///
/// Each [`raster`](MultiImageRenderer::raster) call draws on top of what
/// earlier calls left behind, which makes it suitable for progress frames
/// of a long drawing.
pub struct MultiImageRenderer {
    canvas: RasterCanvas,
    scale: f64,
    passes: usize,
}

impl MultiImageRenderer {
    /// Allocate the surface, fill it with `background` (white when `None`)
    /// and stretch `seed` over it if given.
    pub fn new(
        size: Size,
        background: Option<Color>,
        scale: f64,
        seed: Option<&Image>,
    ) -> Option<Self> {
        let mut canvas = RasterCanvas::new(size, background.unwrap_or(Color::WHITE))?;
        if let Some(seed) = seed {
            canvas.draw_image(seed, Rect::from_size(size));
        }

        debug!(
            width = size.width,
            height = size.height,
            seeded = seed.is_some(),
            "Created multi-pass renderer"
        );
        Some(Self {
            canvas,
            scale,
            passes: 0,
        })
    }

    pub fn size(&self) -> Size {
        self.canvas.size()
    }

    /// Number of completed [`raster`](MultiImageRenderer::raster) calls.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Run one drawing pass and return the accumulated result.
    pub fn raster<F>(&mut self, drawing: F) -> Image
    where
        F: FnOnce(&mut dyn Canvas),
    {
        drawing(&mut self.canvas);
        self.passes += 1;
        self.canvas.snapshot().with_scale(self.scale)
    }

    /// Encode the current state of the surface.
    pub fn data(&self, format: RenderFormat) -> Option<Vec<u8>> {
        if format == RenderFormat::Pdf {
            warn!("Multi-pass renderer only produces bitmaps; PDF requested");
            return None;
        }
        render::encode(&self.canvas.snapshot(), format, DEFAULT_JPEG_QUALITY)
    }
}
