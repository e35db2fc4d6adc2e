//! Palette-driven drawing, rasterization and export.
//!
//! - [`calculator`]: map iteration indices onto palette colors
//! - [`canvas`]: the drawing surface trait and polygon helpers
//! - [`raster`] / [`pdf`]: bitmap and vector surfaces
//! - [`render`] / [`multi`]: one-shot and incremental renderers
//! - [`png`]: indexed/truecolor PNG encoder
//! - [`writer`]: exporting into user directories

pub mod calculator;
pub mod canvas;
pub mod image;
pub mod multi;
pub mod pdf;
pub mod png;
pub mod raster;
pub mod render;
pub mod writer;

pub use calculator::{ColorCalculator, Interpolation, DEFAULT_SIGMOID_SATURATION};
pub use canvas::{Canvas, CanvasExt, PathMode, Point, Rect, Size};
pub use crate::image::{Image, APP_ICON_SIZE, DEFAULT_JPEG_QUALITY};
pub use multi::MultiImageRenderer;
pub use pdf::PdfCanvas;
pub use raster::RasterCanvas;
pub use render::{ImageRenderer, RenderFormat};
pub use writer::{FileWriter, SearchDomain, StandardDirectory, DEFAULT_EXPORT_NAME};
