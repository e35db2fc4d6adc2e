//! Common types shared by the image renderer and its tools.

pub mod color;
pub mod error;
pub mod palette;

pub use color::Color;
pub use error::{RenderError, RenderResult};
pub use palette::{Palette, PaletteDefinition, PaletteSet};
