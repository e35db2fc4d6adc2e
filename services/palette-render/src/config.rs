//! Palette resolution for the renderer.
//!
//! Palettes come from a JSON/YAML palette file when one is given, otherwise
//! from the built-in set.

use std::path::Path;

use anyhow::{Context, Result};
use render_common::{Palette, PaletteSet};
use tracing::{debug, info};

/// Name of the palette used when none is requested.
pub const DEFAULT_PALETTE: &str = "Color Spectrum";

/// Load the palette set from `file`, or the built-ins without one.
pub fn load_palette_set(file: Option<&Path>) -> Result<PaletteSet> {
    let Some(file) = file else {
        debug!("Using built-in palettes");
        return Ok(PaletteSet::builtins());
    };

    let set = PaletteSet::from_file(file)
        .with_context(|| format!("Failed to load palettes from {}", file.display()))?;
    info!(
        path = %file.display(),
        palettes = set.palettes.len(),
        "Loaded palette file"
    );
    Ok(set)
}

/// Resolve `name` (case-insensitive) in the set loaded from `file`.
pub fn load_palette(file: Option<&Path>, name: &str) -> Result<Palette> {
    let set = load_palette_set(file)?;
    set.get(name).with_context(|| {
        format!(
            "Palette '{}' is not available (known: {})",
            name,
            set.names().join(", ")
        )
    })
}
