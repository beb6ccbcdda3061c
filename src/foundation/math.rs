pub(crate) const TWO_PI: f64 = std::f64::consts::TAU;

/// Sub-turn part of `v`, keeping the sign of `v` (`v - trunc(v)`).
pub(crate) fn fract_turn(v: f64) -> f64 {
    v % 1.0
}

/// Catmull-Rom cubic through `ic` (at 0) and `in_` (at 1), evaluated at `d` in `[0, 1]`.
#[inline]
pub(crate) fn catmull_rom(ip: f64, ic: f64, in_: f64, inn: f64, d: f64) -> f64 {
    ic + 0.5
        * d
        * (-ip + in_
            + d * (2.0 * ip - 5.0 * ic + 4.0 * in_ - inn + d * (-ip + 3.0 * ic - 3.0 * in_ + inn)))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
