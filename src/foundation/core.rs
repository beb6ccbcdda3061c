use std::fmt;

use crate::foundation::error::{DrosteError, DrosteResult};

pub use kurbo::{Point, Vec2};

/// Straight-alpha RGBA color normalized to `[0, 1]`, independent of storage depth.
pub type Rgba = [f32; 4];

/// Fully transparent black.
pub const TRANSPARENT: Rgba = [0.0; 4];

/// Integer pixel rectangle, half-open on both axes: `[x1, x2) x [y1, y2)`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct RectI {
    /// Left edge (inclusive).
    pub x1: i32,
    /// Bottom edge (inclusive).
    pub y1: i32,
    /// Right edge (exclusive).
    pub x2: i32,
    /// Top edge (exclusive).
    pub y2: i32,
}

impl RectI {
    /// Build a rectangle, rejecting inverted edges.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> DrosteResult<Self> {
        if x1 > x2 || y1 > y2 {
            return Err(DrosteError::validation(format!(
                "rect edges inverted: ({x1},{y1})..({x2},{y2})"
            )));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(width: u32, height: u32) -> DrosteResult<Self> {
        let w = i32::try_from(width)
            .map_err(|_| DrosteError::validation("rect width exceeds i32::MAX"))?;
        let h = i32::try_from(height)
            .map_err(|_| DrosteError::validation("rect height exceeds i32::MAX"))?;
        Ok(Self {
            x1: 0,
            y1: 0,
            x2: w,
            y2: h,
        })
    }

    /// Horizontal extent, 0 when empty.
    pub fn width(self) -> u32 {
        if self.x2 > self.x1 {
            self.x2.abs_diff(self.x1)
        } else {
            0
        }
    }

    /// Vertical extent, 0 when empty.
    pub fn height(self) -> u32 {
        if self.y2 > self.y1 {
            self.y2.abs_diff(self.y1)
        } else {
            0
        }
    }

    /// `true` when the rect covers no pixel.
    pub fn is_empty(self) -> bool {
        self.x1 >= self.x2 || self.y1 >= self.y2
    }

    /// Pixel membership test.
    pub fn contains(self, x: i32, y: i32) -> bool {
        self.x1 <= x && x < self.x2 && self.y1 <= y && y < self.y2
    }

    /// `true` when `other` lies entirely inside `self`. Empty rects are contained anywhere.
    pub fn contains_rect(self, other: Self) -> bool {
        other.is_empty()
            || (self.x1 <= other.x1
                && other.x2 <= self.x2
                && self.y1 <= other.y1
                && other.y2 <= self.y2)
    }
}

/// Storage type of one pixel channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelDepth {
    /// 8-bit unsigned, max 255.
    U8,
    /// 16-bit unsigned, max 65535.
    U16,
    /// 32-bit float, nominal max 1.0.
    F32,
}

impl PixelDepth {
    /// Value that maps to 1.0 in normalized space.
    pub fn max_value(self) -> f32 {
        match self {
            Self::U8 => 255.0,
            Self::U16 => 65535.0,
            Self::F32 => 1.0,
        }
    }
}

impl fmt::Display for PixelDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::F32 => "f32",
        })
    }
}

/// Channel layout of a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelComponents {
    /// Red, green, blue, alpha (straight alpha).
    Rgba,
    /// A single alpha channel.
    Alpha,
}

impl PixelComponents {
    /// Number of stored channels per pixel.
    pub fn count(self) -> usize {
        match self {
            Self::Rgba => 4,
            Self::Alpha => 1,
        }
    }
}

impl fmt::Display for PixelComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rgba => "rgba",
            Self::Alpha => "alpha",
        })
    }
}

/// Bit depth plus channel layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    /// Channel storage type.
    pub depth: PixelDepth,
    /// Channel layout.
    pub components: PixelComponents,
}

impl PixelFormat {
    /// Pair a depth with a layout.
    pub fn new(depth: PixelDepth, components: PixelComponents) -> Self {
        Self { depth, components }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.components, self.depth)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
