use std::f32::consts::FRAC_PI_2;
use std::ops::Range;

use crate::ir::Bounds;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

pub fn center(bounds: &Bounds) -> Point {
    Point::new(bounds.x + bounds.width / 2.0, bounds.y + bounds.height / 2.0)
}

/// Arctangent of the slope between two centers, in `(-pi/2, pi/2]`.
///
/// The direction of travel is not encoded: callers pick the walking direction
/// from the sign of `dx`. Vertically aligned centers resolve to `+-pi/2` by the
/// sign of `dy`, coincident centers to `0`.
pub fn angle(from: &Bounds, to: &Bounds) -> f32 {
    let a = center(from);
    let b = center(to);
    slope_angle(b.x - a.x, b.y - a.y)
}

pub fn slope_angle(dx: f32, dy: f32) -> f32 {
    if dx == 0.0 {
        if dy > 0.0 {
            FRAC_PI_2
        } else if dy < 0.0 {
            -FRAC_PI_2
        } else {
            0.0
        }
    } else {
        (dy / dx).atan()
    }
}

pub fn length(from: &Bounds, to: &Bounds) -> f32 {
    center(from).distance(center(to))
}

pub fn diagonal(bounds: &Bounds) -> f32 {
    bounds.width.hypot(bounds.height)
}

/// Axis-aligned pixel rectangle that drawing is confined to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min: Point,
    pub max: Point,
}

impl Viewport {
    pub const UNBOUNDED: Viewport = Viewport {
        min: Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        max: Point::new(f32::INFINITY, f32::INFINITY),
    };

    /// Canvas of the given pixel size anchored at the origin.
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            min: Point::new(0.0, 0.0),
            max: Point::new(width, height),
        }
    }

    /// Indices `i < count` whose point `origin + i * step` lies inside the
    /// viewport grown by `pad` on every side, widened by one index each way.
    pub fn visible_steps(&self, origin: Point, step: (f32, f32), count: usize, pad: f32) -> Range<usize> {
        let pad = f64::from(pad);
        let mut lo = 0.0f64;
        let mut hi = count as f64;
        let axes = [
            (origin.x, step.0, self.min.x, self.max.x),
            (origin.y, step.1, self.min.y, self.max.y),
        ];
        for (start, delta, min, max) in axes {
            let (start, delta) = (f64::from(start), f64::from(delta));
            let (min, max) = (f64::from(min) - pad, f64::from(max) + pad);
            if delta == 0.0 {
                if start < min || start > max {
                    return 0..0;
                }
                continue;
            }
            let (a, b) = ((min - start) / delta, (max - start) / delta);
            lo = lo.max(a.min(b));
            hi = hi.min(a.max(b));
        }
        // also rejects NaN bounds
        if !(lo <= hi) {
            return 0..0;
        }
        let first = (lo.floor() as usize).saturating_sub(1);
        let last = (hi.ceil() as usize).saturating_add(1).min(count);
        first.min(last)..last
    }
}
