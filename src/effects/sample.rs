use crate::foundation::core::{Rgba, TRANSPARENT};
use crate::foundation::math::catmull_rom;
use crate::render::buffer::{Component, Plane};

/// Catmull-Rom sample of `src` at pixel-space position `(fx, fy)`.
///
/// Pixel `(x, y)` is centred on `(x + 0.5, y + 0.5)`. Taps outside the plane bounds count
/// as transparent black, so copies fade out at the image edges instead of smearing or
/// wrapping. Non-finite positions sample as transparent black.
///
/// Alpha is clamped to `[0, 1]` to absorb kernel overshoot; colour channels are returned as
/// interpolated.
pub(crate) fn sample_cubic<T: Component, const N: usize>(
    src: &Plane<'_, T, N>,
    fx: f64,
    fy: f64,
) -> Rgba {
    if !fx.is_finite() || !fy.is_finite() {
        return TRANSPARENT;
    }

    let bx = (fx - 0.5).floor();
    let by = (fy - 0.5).floor();
    let b = src.bounds();
    // kernel spans base - 1 ..= base + 2
    if bx + 2.0 < f64::from(b.x1)
        || bx - 1.0 >= f64::from(b.x2)
        || by + 2.0 < f64::from(b.y1)
        || by - 1.0 >= f64::from(b.y2)
    {
        return TRANSPARENT;
    }

    let dx = (fx - 0.5 - bx).clamp(0.0, 1.0);
    let dy = (fy - 0.5 - by).clamp(0.0, 1.0);
    let (cx, cy) = (bx as i64, by as i64);

    let mut taps = [[TRANSPARENT; 4]; 4];
    for (j, row) in (cy - 1..).zip(taps.iter_mut()) {
        for (i, tap) in (cx - 1..).zip(row.iter_mut()) {
            if let Some(px) = src.fetch(i, j) {
                *tap = px;
            }
        }
    }

    let mut out = TRANSPARENT;
    for (ch, v) in out.iter_mut().enumerate() {
        let across = |r: &[Rgba; 4]| {
            catmull_rom(
                f64::from(r[0][ch]),
                f64::from(r[1][ch]),
                f64::from(r[2][ch]),
                f64::from(r[3][ch]),
                dx,
            )
        };
        *v = catmull_rom(
            across(&taps[0]),
            across(&taps[1]),
            across(&taps[2]),
            across(&taps[3]),
            dy,
        ) as f32;
    }
    // unlike a plain cubic filter, coverage is clamped so "over" stays monotonic across depths
    out[3] = out[3].clamp(0.0, 1.0);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/sample.rs"]
mod tests;
