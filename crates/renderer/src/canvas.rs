//! Drawing surface abstraction and the path helpers built on it.
//!
//! Every surface (raster or PDF) implements [`Canvas`], a small path-based
//! state machine: build a path with `move_to` / `add_line_to` / `add_rect`,
//! then commit it with [`Canvas::draw_path`]. Committing consumes the path.
//!
//! All canvases share one coordinate system: origin in the top-left corner,
//! y growing downward, one unit per pixel (or PDF point).

use render_common::Color;

use crate::image::Image;

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self {
            x: x as f64,
            y: y as f64,
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self {
            x: x as f64,
            y: y as f64,
        }
    }
}

/// Pixel dimensions of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole surface.
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width as f64, size.height as f64)
    }
}

/// How a path is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMode {
    Fill,
    Stroke,
    #[default]
    FillStroke,
}

impl PathMode {
    pub fn fills(self) -> bool {
        matches!(self, PathMode::Fill | PathMode::FillStroke)
    }

    pub fn strokes(self) -> bool {
        matches!(self, PathMode::Stroke | PathMode::FillStroke)
    }
}

/// A mutable 2D drawing surface.
///
/// Surfaces are not thread-safe; a canvas is owned by whoever is drawing.
pub trait Canvas {
    /// Surface dimensions.
    fn size(&self) -> Size;

    /// Push the current colors and line width.
    fn save_state(&mut self);

    /// Pop the state pushed by the matching `save_state`. Unbalanced calls
    /// are ignored.
    fn restore_state(&mut self);

    fn set_fill_color(&mut self, color: Color);

    fn set_stroke_color(&mut self, color: Color);

    fn set_line_width(&mut self, width: f64);

    /// Start a new subpath at `point`.
    fn move_to(&mut self, point: Point);

    /// Extend the current subpath. Without a current point this starts a
    /// subpath at `point` instead.
    fn add_line_to(&mut self, point: Point);

    /// Append a closed rectangle subpath.
    fn add_rect(&mut self, rect: Rect);

    /// Close the current subpath.
    fn close_path(&mut self);

    /// Fill and/or stroke the current path, then discard it.
    fn draw_path(&mut self, mode: PathMode);

    fn stroke_path(&mut self) {
        self.draw_path(PathMode::Stroke);
    }

    fn fill_path(&mut self) {
        self.draw_path(PathMode::Fill);
    }

    /// Fill `rect` with the fill color without touching the current path.
    fn fill_rect(&mut self, rect: Rect);

    /// Draw `image` stretched into `rect`.
    fn draw_image(&mut self, image: &Image, rect: Rect);
}

/// Polygon and line helpers available on every canvas.
pub trait CanvasExt: Canvas {
    /// Draw a closed polygon through `points`, connecting the last point back
    /// to the first. Does nothing for an empty slice.
    fn draw_polygon<P>(&mut self, points: &[P], mode: PathMode)
    where
        P: Into<Point> + Copy,
    {
        let Some(first) = points.first() else {
            return;
        };
        let first: Point = (*first).into();

        self.move_to(first);
        for point in &points[1..] {
            self.add_line_to((*point).into());
        }
        self.add_line_to(first);

        self.draw_path(mode);
    }

    /// [`draw_polygon`](CanvasExt::draw_polygon) with the default fill + stroke mode.
    fn fill_stroke_polygon<P>(&mut self, points: &[P])
    where
        P: Into<Point> + Copy,
    {
        self.draw_polygon(points, PathMode::FillStroke);
    }

    /// Draw the segment between exactly two points; other lengths are ignored.
    ///
    /// A `discrete` segment is stroked on its own. Otherwise only a line to
    /// the second point is appended, so consecutive calls build one open path
    /// the caller strokes when done.
    fn draw_line_segment<P>(&mut self, points: &[P], discrete: bool)
    where
        P: Into<Point> + Copy,
    {
        let [start, end] = points else {
            return;
        };

        if discrete {
            self.move_to((*start).into());
        }
        self.add_line_to((*end).into());
        if discrete {
            self.stroke_path();
        }
    }
}

impl<T: Canvas + ?Sized> CanvasExt for T {}
