//! Canonical <-> pixel coordinate conversion.
//!
//! Canonical space is resolution independent: parameters are expressed in it, while buffers
//! are addressed in pixel space. A proxy render at scale `s` sees `pixel = canonical * s`,
//! and non-square pixels additionally stretch x by the pixel aspect ratio.

use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{DrosteError, DrosteResult};

/// Render scale plus pixel aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordSpace {
    render_scale: Vec2,
    pixel_aspect_ratio: f64,
}

impl CoordSpace {
    /// Full resolution, square pixels.
    pub const IDENTITY: Self = Self {
        render_scale: Vec2::new(1.0, 1.0),
        pixel_aspect_ratio: 1.0,
    };

    /// Validate and build a coordinate space. All factors must be finite and `> 0`.
    pub fn new(render_scale: Vec2, pixel_aspect_ratio: f64) -> DrosteResult<Self> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(render_scale.x) || !ok(render_scale.y) {
            return Err(DrosteError::validation(format!(
                "render scale must be finite and > 0, got ({}, {})",
                render_scale.x, render_scale.y
            )));
        }
        if !ok(pixel_aspect_ratio) {
            return Err(DrosteError::validation(format!(
                "pixel aspect ratio must be finite and > 0, got {pixel_aspect_ratio}"
            )));
        }
        Ok(Self {
            render_scale,
            pixel_aspect_ratio,
        })
    }

    /// Render scale per axis.
    pub fn render_scale(self) -> Vec2 {
        self.render_scale
    }

    /// Pixel aspect ratio (width / height of one pixel).
    pub fn pixel_aspect_ratio(self) -> f64 {
        self.pixel_aspect_ratio
    }

    /// Pixel-space (sub-pixel) position to canonical space.
    #[inline]
    pub fn to_canonical(self, p: Point) -> Point {
        Point::new(
            p.x * self.pixel_aspect_ratio / self.render_scale.x,
            p.y / self.render_scale.y,
        )
    }

    /// Canonical position to pixel space (sub-pixel).
    #[inline]
    pub fn to_pixel(self, p: Point) -> Point {
        Point::new(
            p.x * self.render_scale.x / self.pixel_aspect_ratio,
            p.y * self.render_scale.y,
        )
    }
}

impl Default for CoordSpace {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/coords.rs"]
mod tests;
