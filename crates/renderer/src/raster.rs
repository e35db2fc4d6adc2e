//! Bitmap canvas backed by a tiny-skia pixmap.

use render_common::Color;
use tiny_skia::{
    FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};
use tracing::warn;

use crate::canvas::{Canvas, PathMode, Point, Rect, Size};
use crate::image::Image;

/// Colors and line width, saved and restored as a unit.
#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    fill: Color,
    stroke: Color,
    line_width: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
        }
    }
}

/// An in-memory RGBA bitmap you can draw into.
pub struct RasterCanvas {
    pixmap: Pixmap,
    path: PathBuilder,
    has_current_point: bool,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl RasterCanvas {
    /// Allocate a bitmap of `size` filled with `background`.
    ///
    /// Returns `None` when the surface cannot be allocated (zero or oversized
    /// dimensions).
    pub fn new(size: Size, background: Color) -> Option<Self> {
        let Some(mut pixmap) = Pixmap::new(size.width, size.height) else {
            warn!(
                width = size.width,
                height = size.height,
                "Failed to allocate raster surface"
            );
            return None;
        };
        pixmap.fill(to_skia(background));
        Some(Self::from_pixmap(pixmap))
    }

    pub(crate) fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            pixmap,
            path: PathBuilder::new(),
            has_current_point: false,
            state: GraphicsState::default(),
            saved: Vec::new(),
        }
    }

    /// Copy of the current bitmap; the canvas stays usable.
    pub fn snapshot(&self) -> Image {
        Image::from_pixmap(self.pixmap.clone())
    }

    /// Finish drawing and take the bitmap.
    pub fn into_image(self) -> Image {
        Image::from_pixmap(self.pixmap)
    }

    fn paint(color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(to_skia(color));
        paint.anti_alias = true;
        paint
    }
}

impl Canvas for RasterCanvas {
    fn size(&self) -> Size {
        Size::new(self.pixmap.width(), self.pixmap.height())
    }

    fn save_state(&mut self) {
        self.saved.push(self.state);
    }

    fn restore_state(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width.max(0.0);
    }

    fn move_to(&mut self, point: Point) {
        self.path.move_to(point.x as f32, point.y as f32);
        self.has_current_point = true;
    }

    fn add_line_to(&mut self, point: Point) {
        if !self.has_current_point {
            self.move_to(point);
            return;
        }
        self.path.line_to(point.x as f32, point.y as f32);
    }

    fn add_rect(&mut self, rect: Rect) {
        let (x, y) = (rect.x as f32, rect.y as f32);
        let (right, bottom) = ((rect.x + rect.width) as f32, (rect.y + rect.height) as f32);
        self.path.move_to(x, y);
        self.path.line_to(right, y);
        self.path.line_to(right, bottom);
        self.path.line_to(x, bottom);
        self.path.close();
        self.has_current_point = true;
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn draw_path(&mut self, mode: PathMode) {
        let builder = std::mem::take(&mut self.path);
        self.has_current_point = false;

        let Some(path) = builder.finish() else {
            return;
        };

        if mode.fills() {
            let paint = Self::paint(self.state.fill);
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }

        if mode.strokes() {
            let paint = Self::paint(self.state.stroke);
            let stroke = Stroke {
                width: self.state.line_width as f32,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn fill_rect(&mut self, rect: Rect) {
        let Some(rect) = tiny_skia::Rect::from_xywh(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        ) else {
            return;
        };
        let paint = Self::paint(self.state.fill);
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn draw_image(&mut self, image: &Image, rect: Rect) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }
        let sx = rect.width / image.width() as f64;
        let sy = rect.height / image.height() as f64;
        let transform = Transform::from_row(
            sx as f32,
            0.0,
            0.0,
            sy as f32,
            rect.x as f32,
            rect.y as f32,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, image.pixmap().as_ref(), &paint, transform, None);
    }
}

/// Convert to a tiny-skia color; channels are already clamped.
pub(crate) fn to_skia(color: Color) -> tiny_skia::Color {
    let (r, g, b, a) = color.components();
    tiny_skia::Color::from_rgba(r as f32, g as f32, b as f32, a as f32)
        .unwrap_or(tiny_skia::Color::BLACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_is_not_allocated() {
        assert!(RasterCanvas::new(Size::new(0, 10), Color::WHITE).is_none());
    }

    #[test]
    fn test_background_fill() {
        let canvas = RasterCanvas::new(Size::new(4, 3), Color::from_hex("#336699").unwrap())
            .unwrap();
        let image = canvas.snapshot();
        assert_eq!(image.pixel(3, 2), Some([0x33, 0x66, 0x99, 0xff]));
    }

    #[test]
    fn test_unbalanced_restore_is_ignored() {
        let mut canvas = RasterCanvas::new(Size::new(2, 2), Color::WHITE).unwrap();
        canvas.restore_state();
        canvas.set_fill_color(Color::GREEN);
        canvas.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(canvas.snapshot().pixel(0, 0), Some([0, 255, 0, 255]));
    }
}
