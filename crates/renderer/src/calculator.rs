//! Palette interpolation over an iteration budget.
//!
//! A [`ColorCalculator`] maps an iteration index (for example, the segment
//! number of a long path being drawn) to a color taken from a palette:
//!
//! - [`Interpolation::Step`]: one band per color, no blending.
//! - [`Interpolation::Linear`]: one band per transition, blended linearly.
//! - [`Interpolation::Sigmoid`]: one band per transition, eased with the
//!   logistic function so colors settle near each palette entry.
//!
//! Queries are pure and total: any index is accepted and indices past the
//! budget clamp to the last palette color.

use std::ops::RangeInclusive;
use std::str::FromStr;

use render_common::{Color, Palette, RenderError, RenderResult};
use serde::{Deserialize, Serialize};

/// Default saturation bound for the sigmoid blend: the segment is mapped
/// onto `[-6, 6]` before applying the logistic function.
pub const DEFAULT_SIGMOID_SATURATION: f64 = 6.0;

/// How colors are chosen between palette entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Step,
    #[default]
    Linear,
    Sigmoid,
}

impl FromStr for Interpolation {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "step" | "stepped" => Ok(Interpolation::Step),
            "linear" => Ok(Interpolation::Linear),
            "sigmoid" => Ok(Interpolation::Sigmoid),
            other => Err(RenderError::Config(format!(
                "unknown interpolation '{}', expected step, linear or sigmoid",
                other
            ))),
        }
    }
}

/// Maps iteration indices to palette colors.
#[derive(Debug, Clone)]
pub struct ColorCalculator {
    colors: Vec<Color>,
    interpolation: Interpolation,
    steps_per_segment: usize,
    saturation: f64,
}

impl ColorCalculator {
    /// Create a calculator for `colors` spread over `max_iterations` steps.
    ///
    /// Fails only when `colors` is empty.
    pub fn new(
        colors: &[Color],
        max_iterations: usize,
        interpolation: Interpolation,
    ) -> RenderResult<Self> {
        if colors.is_empty() {
            return Err(RenderError::EmptyPalette("unnamed".to_string()));
        }
        Ok(Self::build(colors.to_vec(), max_iterations, interpolation))
    }

    /// Create a calculator from a palette, which is never empty.
    pub fn from_palette(
        palette: &Palette,
        max_iterations: usize,
        interpolation: Interpolation,
    ) -> Self {
        Self::build(palette.colors().to_vec(), max_iterations, interpolation)
    }

    fn build(colors: Vec<Color>, max_iterations: usize, interpolation: Interpolation) -> Self {
        let n = colors.len();
        let steps_per_segment = match interpolation {
            Interpolation::Step => max_iterations / n,
            Interpolation::Linear | Interpolation::Sigmoid if n > 1 => max_iterations / (n - 1),
            Interpolation::Linear | Interpolation::Sigmoid => 1,
        };

        Self {
            colors,
            interpolation,
            // A budget smaller than the palette would leave zero-width bands.
            steps_per_segment: steps_per_segment.max(1),
            saturation: DEFAULT_SIGMOID_SATURATION,
        }
    }

    pub fn stepped(colors: &[Color], max_iterations: usize) -> RenderResult<Self> {
        Self::new(colors, max_iterations, Interpolation::Step)
    }

    pub fn linear(colors: &[Color], max_iterations: usize) -> RenderResult<Self> {
        Self::new(colors, max_iterations, Interpolation::Linear)
    }

    pub fn sigmoid(colors: &[Color], max_iterations: usize) -> RenderResult<Self> {
        Self::new(colors, max_iterations, Interpolation::Sigmoid)
    }

    /// Override the sigmoid saturation bound (ignored by other strategies).
    pub fn with_saturation(mut self, saturation: f64) -> Self {
        self.saturation = saturation;
        self
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Iterations covered by one band (one color for `Step`, one transition
    /// otherwise). Never zero.
    pub fn steps_per_segment(&self) -> usize {
        self.steps_per_segment
    }

    /// Palette index of the band containing `index`.
    pub fn color_index(&self, index: usize) -> usize {
        (index / self.steps_per_segment).min(self.colors.len() - 1)
    }

    /// Color for an iteration index.
    pub fn color(&self, index: usize) -> Color {
        let base = self.color_index(index);
        let source = &self.colors[base];

        let t = match self.interpolation {
            Interpolation::Step => return *source,
            Interpolation::Linear => self.position(index, 0.0..=1.0),
            Interpolation::Sigmoid => {
                logistic(self.position(index, -self.saturation..=self.saturation))
            }
        };

        let destination = &self.colors[(base + 1).min(self.colors.len() - 1)];
        source.lerp(destination, t)
    }

    /// Position of `index` inside its band, mapped onto `range`.
    fn position(&self, index: usize, range: RangeInclusive<f64>) -> f64 {
        let steps = self.steps_per_segment as f64;
        translate((index % self.steps_per_segment) as f64, 0.0..=steps, range)
    }
}

/// Linearly map `x` from `source` onto `destination`.
pub fn translate(x: f64, source: RangeInclusive<f64>, destination: RangeInclusive<f64>) -> f64 {
    ((destination.end() - destination.start()) * (x - source.start()))
        / (source.end() - source.start())
        + destination.start()
}

/// Standard logistic function `1 / (1 + e^-x)`.
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
