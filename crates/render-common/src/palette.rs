//! Named color palettes and the files they are loaded from.
//!
//! A palette file lists palettes the way designers keep them:
//!
//! ```json
//! {
//!   "palettes": [
//!     { "name": "Berimbolo", "colors": ["#02111D", "#037BB5", "#02111D"] }
//!   ]
//! }
//! ```
//!
//! The same structure is accepted as YAML when the file ends in `.yaml` or
//! `.yml`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::Color;
use crate::error::{RenderError, RenderResult};

/// An ordered, non-empty sequence of colors with a display name.
///
/// Order matters: it is the sequence interpolation walks through.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    name: String,
    colors: Vec<Color>,
}

impl Palette {
    /// Build a palette; fails when `colors` is empty.
    pub fn new(name: impl Into<String>, colors: Vec<Color>) -> RenderResult<Self> {
        let name = name.into();
        if colors.is_empty() {
            return Err(RenderError::EmptyPalette(name));
        }
        Ok(Self { name, colors })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Black through the primaries to blue.
    pub fn spectrum() -> Self {
        builtin(
            "Color Spectrum",
            &[
                "#000000", "#FF0000", "#FFFF00", "#FF00FF", "#00FF00", "#FF00FF", "#00FFFF",
                "#0000FF",
            ],
        )
    }

    /// Dark navy to ocean blue and back.
    pub fn berimbolo() -> Self {
        builtin("Berimbolo", &["#02111D", "#037BB5", "#02111D"])
    }

    /// All built-in palettes.
    pub fn builtins() -> Vec<Palette> {
        vec![Self::spectrum(), Self::berimbolo()]
    }
}

fn builtin(name: &str, hex: &[&str]) -> Palette {
    Palette {
        name: name.to_string(),
        colors: hex.iter().filter_map(|h| Color::from_hex(h)).collect(),
    }
}

/// Palette as written in a palette file: colors are still hex strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteDefinition {
    pub name: String,
    pub colors: Vec<String>,
}

impl PaletteDefinition {
    /// Parse every color, skipping the ones that are not valid hex.
    pub fn native_colors(&self) -> Vec<Color> {
        self.colors
            .iter()
            .filter_map(|hex| {
                let color = Color::from_hex(hex);
                if color.is_none() {
                    warn!(palette = %self.name, color = %hex, "Skipping invalid palette color");
                }
                color
            })
            .collect()
    }

    /// Convert into a palette; fails if no color survives parsing.
    pub fn to_palette(&self) -> RenderResult<Palette> {
        Palette::new(self.name.clone(), self.native_colors())
    }
}

impl From<&Palette> for PaletteDefinition {
    fn from(palette: &Palette) -> Self {
        Self {
            name: palette.name.clone(),
            colors: palette.colors.iter().map(Color::to_hex).collect(),
        }
    }
}

/// A collection of palette definitions loaded from configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaletteSet {
    #[serde(default)]
    pub palettes: Vec<PaletteDefinition>,
}

impl PaletteSet {
    /// Parse a palette set from a JSON string.
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a palette set from a YAML string.
    pub fn from_yaml(yaml: &str) -> RenderResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a palette set, picking the parser from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let set = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content)?,
            Some("json") => Self::from_json(&content)?,
            other => {
                return Err(RenderError::Config(format!(
                    "Unknown palette file extension {:?} for {}",
                    other,
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), count = set.palettes.len(), "Loaded palette file");
        Ok(set)
    }

    /// Built-in palettes as a set.
    pub fn builtins() -> Self {
        Self {
            palettes: Palette::builtins().iter().map(PaletteDefinition::from).collect(),
        }
    }

    /// Names of all palettes, in file order.
    pub fn names(&self) -> Vec<&str> {
        self.palettes.iter().map(|p| p.name.as_str()).collect()
    }

    /// Look up a palette by name (case-insensitive) and convert it.
    pub fn get(&self, name: &str) -> RenderResult<Palette> {
        self.palettes
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| RenderError::PaletteNotFound(name.to_string()))?
            .to_palette()
    }
}
