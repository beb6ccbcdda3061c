//! Droste is a recursive spiral-zoom ("droste effect") image transform.
//!
//! Every destination pixel is mapped through a complex log/exp spiral to one point per
//! recursion depth in the source image. The copies are sampled with a Catmull-Rom cubic
//! kernel and alpha-composited in depth order.
//!
//! # Pipeline overview
//!
//! 1. **Parameters**: [`EffectParameters`] (serde, camelCase JSON) are validated and turned into
//!    a [`SpiralTransform`].
//! 2. **Map**: destination pixel -> canonical point -> source point per depth.
//! 3. **Sample + composite**: cubic sample of each copy, straight-alpha "over".
//! 4. **Store**: quantize into the destination [`PixelBufferMut`] (u8, u16 or f32; RGBA or alpha).
//!
//! [`render_droste`] renders one tile on the calling thread; [`render_tiled`] splits the
//! request into row bands on a rayon pool. Both poll an [`Abort`] signal once per row.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No global state**: everything a render needs is passed to the call.
//! - **Borrowed buffers**: pixels stay owned by the caller; [`OwnedImage`] is a convenience for
//!   file-based callers.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod effects;
mod foundation;
mod render;
mod transform;

pub use assets::image_io::{OwnedImage, OwnedPixels};
pub use effects::composite::over;
pub use effects::params::{EffectParameters, Layering};
pub use foundation::core::{
    PixelComponents, PixelDepth, PixelFormat, Point, RectI, Rgba, TRANSPARENT, Vec2,
};
pub use foundation::error::{DrosteError, DrosteResult};
pub use render::buffer::{PixelBuffer, PixelBufferMut, PixelData, PixelDataMut};
pub use render::driver::{
    Abort, CancelToken, NeverAbort, RenderRequest, RenderStatus, render_droste,
};
pub use render::pipeline::{RenderThreading, render_tiled};
pub use transform::complex::ComplexPoint;
pub use transform::coords::CoordSpace;
pub use transform::spiral::SpiralTransform;
