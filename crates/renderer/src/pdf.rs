//! Single-page vector canvas producing PDF bytes.
//!
//! The page content stream starts with a flip transform so that drawing
//! uses the same top-left origin as [`RasterCanvas`](crate::raster::RasterCanvas).
//! PDF has no alpha in its color operators: translucent fill and stroke
//! colors are applied through shared ExtGState dictionaries.
//!
//! Path construction is buffered and only written out when the path is
//! painted, so state operators and [`Canvas::fill_rect`] never land inside
//! an open path object.

use std::collections::HashMap;
use std::io::Write;

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Ref};
use render_common::Color;
use tracing::{debug, warn};

use crate::canvas::{Canvas, PathMode, Point, Rect, Size};
use crate::image::Image;

const CATALOG_ID: Ref = Ref::new(1);
const PAGE_TREE_ID: Ref = Ref::new(2);
const PAGE_ID: Ref = Ref::new(3);
const CONTENT_ID: Ref = Ref::new(4);
const FIRST_RESOURCE_ID: i32 = 5;

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    fill: Color,
    stroke: Color,
    /// Alpha pair (fill, stroke) currently in effect on the page.
    alpha: (u8, u8),
}

/// Pending path construction operator.
#[derive(Debug, Clone, Copy)]
enum PathOp {
    Move(Point),
    Line(Point),
    Rect(Rect),
    Close,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::BLACK,
            alpha: (255, 255),
        }
    }
}

/// A drawing surface that records into a one-page PDF document.
pub struct PdfCanvas {
    pdf: Pdf,
    content: Content,
    size: Size,
    next_id: i32,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    path: Vec<PathOp>,
    has_current_point: bool,
    ext_states: HashMap<(u8, u8), String>,
    resources_ext: Vec<(String, Ref)>,
    resources_images: Vec<(String, Ref)>,
}

impl PdfCanvas {
    /// Start a page of `size` points with `background` painted over it.
    ///
    /// Returns `None` for an empty page.
    pub fn new(size: Size, background: Color) -> Option<Self> {
        if size.is_empty() {
            warn!(
                width = size.width,
                height = size.height,
                "Refusing to create an empty PDF page"
            );
            return None;
        }

        let mut canvas = Self {
            pdf: Pdf::new(),
            content: Content::new(),
            size,
            next_id: FIRST_RESOURCE_ID,
            state: GraphicsState::default(),
            saved: Vec::new(),
            path: Vec::new(),
            has_current_point: false,
            ext_states: HashMap::new(),
            resources_ext: Vec::new(),
            resources_images: Vec::new(),
        };

        canvas
            .content
            .transform([1.0, 0.0, 0.0, -1.0, 0.0, size.height as f32]);

        canvas.save_state();
        canvas.set_fill_color(background);
        canvas.fill_rect(Rect::from_size(size));
        canvas.restore_state();

        Some(canvas)
    }

    fn alloc(&mut self) -> Ref {
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Make the page's alpha match the current fill and stroke colors.
    fn sync_alpha(&mut self) {
        let wanted = (
            self.state.fill.to_rgba8()[3],
            self.state.stroke.to_rgba8()[3],
        );
        if wanted == self.state.alpha {
            return;
        }

        let name = match self.ext_states.get(&wanted) {
            Some(name) => name.clone(),
            None => {
                let id = self.alloc();
                let name = format!("Gs{}", self.ext_states.len() + 1);
                self.pdf
                    .ext_graphics(id)
                    .non_stroking_alpha(wanted.0 as f32 / 255.0)
                    .stroking_alpha(wanted.1 as f32 / 255.0);
                self.ext_states.insert(wanted, name.clone());
                self.resources_ext.push((name.clone(), id));
                name
            }
        };

        self.content.set_parameters(Name(name.as_bytes()));
        self.state.alpha = wanted;
    }

    /// Embed `image` as an RGB XObject plus a grayscale soft mask when it
    /// has any translucent pixel. Returns the resource name.
    fn embed_image(&mut self, image: &Image) -> Option<String> {
        let rgba = image.to_rgba8();
        let rgb: Vec<u8> = rgba.chunks_exact(4).flat_map(|p| [p[0], p[1], p[2]]).collect();
        let alpha: Vec<u8> = rgba.chunks_exact(4).map(|p| p[3]).collect();
        let translucent = alpha.iter().any(|&a| a < 255);

        let rgb = deflate(&rgb)?;
        let mask = if translucent {
            Some((self.alloc(), deflate(&alpha)?))
        } else {
            None
        };

        let id = self.alloc();
        let width = image.width() as i32;
        let height = image.height() as i32;

        let mut xobject = self.pdf.image_xobject(id, &rgb);
        xobject.filter(Filter::FlateDecode);
        xobject.width(width);
        xobject.height(height);
        xobject.color_space().device_rgb();
        xobject.bits_per_component(8);
        if let Some((mask_id, _)) = &mask {
            xobject.s_mask(*mask_id);
        }
        xobject.finish();

        if let Some((mask_id, data)) = &mask {
            let mut smask = self.pdf.image_xobject(*mask_id, data);
            smask.filter(Filter::FlateDecode);
            smask.width(width);
            smask.height(height);
            smask.color_space().device_gray();
            smask.bits_per_component(8);
            smask.finish();
        }

        let name = format!("Im{}", self.resources_images.len() + 1);
        self.resources_images.push((name.clone(), id));
        Some(name)
    }

    /// Close the page and return the serialized document.
    pub fn finish(mut self) -> Vec<u8> {
        let content = self.content.finish();
        self.pdf.stream(CONTENT_ID, &content);

        self.pdf.catalog(CATALOG_ID).pages(PAGE_TREE_ID);
        self.pdf.pages(PAGE_TREE_ID).kids([PAGE_ID]).count(1);

        let mut page = self.pdf.page(PAGE_ID);
        page.media_box(pdf_writer::Rect::new(
            0.0,
            0.0,
            self.size.width as f32,
            self.size.height as f32,
        ));
        page.parent(PAGE_TREE_ID);
        page.contents(CONTENT_ID);

        let mut resources = page.resources();
        if !self.resources_ext.is_empty() {
            let mut states = resources.ext_g_states();
            for (name, id) in &self.resources_ext {
                states.pair(Name(name.as_bytes()), *id);
            }
        }
        if !self.resources_images.is_empty() {
            let mut objects = resources.x_objects();
            for (name, id) in &self.resources_images {
                objects.pair(Name(name.as_bytes()), *id);
            }
        }
        resources.finish();
        page.finish();

        let bytes = self.pdf.finish();
        debug!(
            bytes = bytes.len(),
            images = self.resources_images.len(),
            "Finished PDF page"
        );
        bytes
    }
}

impl Canvas for PdfCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn save_state(&mut self) {
        self.content.save_state();
        self.saved.push(self.state);
    }

    fn restore_state(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.content.restore_state();
            self.state = state;
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        let (r, g, b, _) = color.components();
        self.content.set_fill_rgb(r as f32, g as f32, b as f32);
        self.state.fill = color;
        self.sync_alpha();
    }

    fn set_stroke_color(&mut self, color: Color) {
        let (r, g, b, _) = color.components();
        self.content.set_stroke_rgb(r as f32, g as f32, b as f32);
        self.state.stroke = color;
        self.sync_alpha();
    }

    fn set_line_width(&mut self, width: f64) {
        self.content.set_line_width(width.max(0.0) as f32);
    }

    fn move_to(&mut self, point: Point) {
        self.path.push(PathOp::Move(point));
        self.has_current_point = true;
    }

    fn add_line_to(&mut self, point: Point) {
        if !self.has_current_point {
            self.move_to(point);
            return;
        }
        self.path.push(PathOp::Line(point));
    }

    fn add_rect(&mut self, rect: Rect) {
        self.path.push(PathOp::Rect(rect));
        self.has_current_point = true;
    }

    fn close_path(&mut self) {
        if self.has_current_point {
            self.path.push(PathOp::Close);
        }
    }

    fn draw_path(&mut self, mode: PathMode) {
        if !self.has_current_point {
            return;
        }
        for op in self.path.drain(..) {
            match op {
                PathOp::Move(p) => {
                    self.content.move_to(p.x as f32, p.y as f32);
                }
                PathOp::Line(p) => {
                    self.content.line_to(p.x as f32, p.y as f32);
                }
                PathOp::Rect(r) => {
                    self.content
                        .rect(r.x as f32, r.y as f32, r.width as f32, r.height as f32);
                }
                PathOp::Close => {
                    self.content.close_path();
                }
            }
        }
        match mode {
            PathMode::Fill => self.content.fill_nonzero(),
            PathMode::Stroke => self.content.stroke(),
            PathMode::FillStroke => self.content.fill_nonzero_and_stroke(),
        };
        self.has_current_point = false;
    }

    fn fill_rect(&mut self, rect: Rect) {
        // Pending path ops are still buffered, so this is its own path object.
        self.content.rect(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        );
        self.content.fill_nonzero();
    }

    fn draw_image(&mut self, image: &Image, rect: Rect) {
        let Some(name) = self.embed_image(image) else {
            warn!("Failed to embed image into PDF page");
            return;
        };

        // Image space is bottom-up; undo the page flip for this one draw.
        self.content.save_state();
        self.content.transform([
            rect.width as f32,
            0.0,
            0.0,
            -(rect.height as f32),
            rect.x as f32,
            (rect.y + rect.height) as f32,
        ]);
        self.content.x_object(Name(name.as_bytes()));
        self.content.restore_state();
    }
}

fn deflate(data: &[u8]) -> Option<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| warn!(error = %e, "PDF stream compression failed"))
        .ok()
}
