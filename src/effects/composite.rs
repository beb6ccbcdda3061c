use std::ops::RangeInclusive;

use crate::effects::sample::sample_cubic;
use crate::foundation::core::{Point, Rgba, TRANSPARENT};
use crate::render::buffer::{Component, Plane};
use crate::transform::coords::CoordSpace;
use crate::transform::spiral::SpiralTransform;

/// Straight-alpha "source over destination".
///
/// A fully transparent result is normalized to transparent black.
#[inline]
pub fn over(dst: Rgba, src: Rgba) -> Rgba {
    let sa = src[3];
    let da = dst[3];
    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        return TRANSPARENT;
    }
    let mut out = [0.0, 0.0, 0.0, out_a];
    for i in 0..3 {
        out[i] = (src[i] * sa + dst[i] * da * (1.0 - sa)) / out_a;
    }
    out
}

/// Sample the copy at iteration `depth` for canonical destination point `t`.
#[inline]
pub(crate) fn sample_depth<T: Component, const N: usize>(
    spiral: &SpiralTransform,
    space: CoordSpace,
    src: &Plane<'_, T, N>,
    t: Point,
    depth: i32,
) -> Rgba {
    let c = space.to_pixel(spiral.source_point(t, depth));
    sample_cubic(src, c.x, c.y)
}

/// Composite `depths` of the spiral at canonical point `t`, in ascending depth order.
///
/// Layering is already folded into [`SpiralTransform::effective_depth`], so the loop itself
/// never changes direction.
pub(crate) fn composite_depths<T: Component, const N: usize>(
    spiral: &SpiralTransform,
    depths: RangeInclusive<i32>,
    space: CoordSpace,
    src: &Plane<'_, T, N>,
    t: Point,
) -> Rgba {
    depths.fold(TRANSPARENT, |acc, depth| {
        over(acc, sample_depth(spiral, space, src, t, depth))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
