//! Complex-plane arithmetic on `(re, im)` pairs.
//!
//! Operations are total: `log`, `reciprocal` and division at the origin return non-finite
//! values instead of failing. Callers carry those values through; the sampler turns any
//! non-finite coordinate into a transparent sample.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::foundation::core::Point;

/// A complex number stored as two `f64` components.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ComplexPoint {
    /// Real part (x).
    pub re: f64,
    /// Imaginary part (y).
    pub im: f64,
}

impl ComplexPoint {
    /// `0 + 0i`.
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// `1 + 0i`.
    pub const ONE: Self = Self::new(1.0, 0.0);

    /// Build from components.
    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// `e^(i * theta)`.
    #[inline]
    pub fn unit(theta: f64) -> Self {
        Self::new(0.0, theta).exp()
    }

    /// Squared magnitude.
    #[inline]
    pub fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// `true` when both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    /// Complex exponential.
    #[inline]
    pub fn exp(self) -> Self {
        let s = self.re.exp();
        Self::new(s * self.im.cos(), s * self.im.sin())
    }

    /// Principal natural logarithm: `ln|c| + i*arg(c)` with `arg` in `(-pi, pi]`.
    #[inline]
    pub fn log(self) -> Self {
        Self::new(self.norm_sqr().sqrt().ln(), self.im.atan2(self.re))
    }

    /// `1 / c`.
    #[inline]
    pub fn reciprocal(self) -> Self {
        let s = self.norm_sqr();
        Self::new(self.re / s, -self.im / s)
    }

    /// Multiply both components by a real.
    #[inline]
    pub fn scale(self, s: f64) -> Self {
        Self::new(self.re * s, self.im * s)
    }

    /// Divide both components by a real.
    #[inline]
    pub fn scale_divide(self, s: f64) -> Self {
        Self::new(self.re / s, self.im / s)
    }
}

impl Add for ComplexPoint {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for ComplexPoint {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for ComplexPoint {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for ComplexPoint {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        let s = rhs.norm_sqr();
        Self::new(
            (self.re * rhs.re + self.im * rhs.im) / s,
            (self.im * rhs.re - self.re * rhs.im) / s,
        )
    }
}

impl Mul<f64> for ComplexPoint {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Div<f64> for ComplexPoint {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        self.scale_divide(rhs)
    }
}

impl Neg for ComplexPoint {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

impl From<Point> for ComplexPoint {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<ComplexPoint> for Point {
    fn from(c: ComplexPoint) -> Self {
        Point::new(c.re, c.im)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/complex.rs"]
mod tests;
