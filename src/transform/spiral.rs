//! The droste mapping: destination canonical point -> source canonical point, per depth.
//!
//! The destination plane is unrolled with a complex logarithm into a strip, sheared so the
//! copies line up into a spiral, tiled with period `ln(1 / ratio)`, shifted to the requested
//! depth and wrapped back with the exponential. Step order matters: each step assumes the
//! coordinates produced by the previous one.

use crate::effects::params::{EffectParameters, Layering};
use crate::foundation::core::Point;
use crate::foundation::math::{TWO_PI, fract_turn};
use crate::transform::complex::ComplexPoint;

/// Per-render constants of the spiral mapping.
///
/// Built once from [`EffectParameters`]; evaluating it is pure, so one value can be shared by
/// every worker rendering the same frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpiralTransform {
    layering: Layering,
    min_depth: i32,
    max_depth: i32,
    inner_radius: f64,
    period: f64,
    cos_angle: f64,
    unit_angle: ComplexPoint,
    center: ComplexPoint,
    position: ComplexPoint,
    zoom_shift: f64,
    rotation_shift: f64,
    evolution_shift: f64,
}

impl SpiralTransform {
    /// Derive the mapping constants. Parameters are expected to be validated.
    pub fn new(params: &EffectParameters) -> Self {
        let r2 = params.radius;
        let r1 = r2 * params.ratio;
        let period = (r2 / r1).ln();
        let angle = (f64::from(params.spin) * period).atan2(TWO_PI);

        Self {
            layering: params.layering,
            min_depth: params.min_depth,
            max_depth: params.max_depth,
            inner_radius: r1,
            period,
            cos_angle: angle.cos(),
            unit_angle: ComplexPoint::unit(angle),
            center: params.center.into(),
            position: params.position.into(),
            zoom_shift: period * params.zoom,
            rotation_shift: TWO_PI * fract_turn(params.rotation),
            evolution_shift: period * fract_turn(params.evolution),
        }
    }

    /// Log-space length of one copy: `ln(radius / inner_radius)`.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Layering remap of an iteration depth.
    #[inline]
    pub fn effective_depth(&self, depth: i32) -> i32 {
        self.layering
            .effective_depth(depth, self.min_depth, self.max_depth)
    }

    /// Map a destination point to the source point seen at iteration `depth`.
    ///
    /// Degenerate inputs (the vanishing point itself) produce non-finite coordinates.
    #[inline]
    pub fn source_point(&self, t: Point, depth: i32) -> Point {
        let depth = self.effective_depth(depth);

        let mut c = ComplexPoint::from(t) - self.position;
        c = c.log();
        c.re -= self.zoom_shift;

        // shear the strip so consecutive copies join into one spiral
        c = c.scale_divide(self.cos_angle) / self.unit_angle;

        c.im -= self.rotation_shift;
        c.re -= self.evolution_shift;
        c.re %= self.period;
        c.re += self.period * f64::from(depth);

        c = c.exp().scale(self.inner_radius);
        (c + self.center).into()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/spiral.rs"]
mod tests;
