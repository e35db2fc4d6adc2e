//! Hypotrochoid geometry and the palette-colored drawing of it.

use std::f64::consts::TAU;
use std::ops::Range;

use anyhow::{bail, Result};
use renderer::{Canvas, CanvasExt, ColorCalculator, Size};

/// Fraction of the shorter canvas side left free around the curve.
const MARGIN: f64 = 0.05;

/// Curve traced by a point at `offset` from the center of a circle of
/// radius `inner` rolling inside a circle of radius `outer`.
#[derive(Debug, Clone, Copy)]
pub struct Hypotrochoid {
    outer: u32,
    inner: u32,
    offset: f64,
}

impl Hypotrochoid {
    pub fn new(outer: u32, inner: u32, offset: f64) -> Result<Self> {
        if outer == 0 || inner == 0 {
            bail!("hypotrochoid radii must be positive (outer={}, inner={})", outer, inner);
        }
        let curve = Self {
            outer,
            inner,
            offset,
        };
        if curve.extent() <= f64::EPSILON {
            bail!("hypotrochoid degenerates to a point");
        }
        Ok(curve)
    }

    /// Parameter range after which the curve closes.
    pub fn period(&self) -> f64 {
        TAU * (self.inner / gcd(self.outer, self.inner)) as f64
    }

    /// Largest distance of any curve point from the center.
    pub fn extent(&self) -> f64 {
        (self.outer as f64 - self.inner as f64).abs() + self.offset.abs()
    }

    pub fn point(&self, t: f64) -> (f64, f64) {
        let (big, small) = (self.outer as f64, self.inner as f64);
        let k = (big - small) / small;
        (
            (big - small) * t.cos() + self.offset * (k * t).cos(),
            (big - small) * t.sin() - self.offset * (k * t).sin(),
        )
    }

    /// `segments + 1` points along one full period, fitted into `size`.
    pub fn points(&self, segments: usize, size: Size) -> Vec<(f64, f64)> {
        let (cx, cy) = (size.width as f64 / 2.0, size.height as f64 / 2.0);
        let scale = cx.min(cy) * (1.0 - 2.0 * MARGIN) / self.extent();
        let step = self.period() / segments.max(1) as f64;

        (0..=segments)
            .map(|i| {
                let (x, y) = self.point(i as f64 * step);
                (cx + x * scale, cy + y * scale)
            })
            .collect()
    }
}

/// Stroke segments `range` of the polyline `points`, segment `i` in
/// `calc.color(i)`. Indices without a following point are skipped.
pub fn draw_segments(
    canvas: &mut dyn Canvas,
    points: &[(f64, f64)],
    calc: &ColorCalculator,
    range: Range<usize>,
    line_width: f64,
) {
    let end = range.end.min(points.len().saturating_sub(1));
    canvas.save_state();
    canvas.set_line_width(line_width);
    for i in range.start..end {
        canvas.set_stroke_color(calc.color(i));
        canvas.draw_line_segment(&points[i..=i + 1], true);
    }
    canvas.restore_state();
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
