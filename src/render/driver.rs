//! Single-tile render driver.
//!
//! [`render_droste`] fills one caller-chosen rectangle of the destination, row by row, and
//! polls the cancellation signal before each row. It holds no state between calls.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::effects::composite::composite_depths;
use crate::effects::params::EffectParameters;
use crate::foundation::core::{Point, RectI, Vec2};
use crate::foundation::error::{DrosteError, DrosteResult};
use crate::render::buffer::{
    Component, PixelBuffer, PixelBufferMut, Plane, PlaneMut, PlaneVisitor, store, with_planes,
};
use crate::transform::coords::CoordSpace;
use crate::transform::spiral::SpiralTransform;

/// Destination window plus the host's resolution settings for one render call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderRequest {
    /// Pixels to write, half-open. Must lie inside the destination buffer.
    pub window: RectI,
    /// Proxy scale per axis (`1.0` = full resolution).
    pub render_scale: Vec2,
    /// Width / height of one pixel.
    pub pixel_aspect_ratio: f64,
}

impl RenderRequest {
    /// Full-resolution request with square pixels.
    pub fn new(window: RectI) -> Self {
        Self {
            window,
            render_scale: Vec2::new(1.0, 1.0),
            pixel_aspect_ratio: 1.0,
        }
    }

    /// Replace the render scale.
    pub fn with_render_scale(mut self, render_scale: Vec2) -> Self {
        self.render_scale = render_scale;
        self
    }

    /// Replace the pixel aspect ratio.
    pub fn with_pixel_aspect_ratio(mut self, pixel_aspect_ratio: f64) -> Self {
        self.pixel_aspect_ratio = pixel_aspect_ratio;
        self
    }

    pub(crate) fn coord_space(&self) -> DrosteResult<CoordSpace> {
        CoordSpace::new(self.render_scale, self.pixel_aspect_ratio)
    }
}

/// How a render call ended when it did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderStatus {
    /// Every row of the window was written.
    Completed,
    /// The abort signal fired; rows written before that point are kept as is.
    Canceled,
}

impl RenderStatus {
    /// Canceled wins over Completed.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Completed, Self::Completed) => Self::Completed,
            _ => Self::Canceled,
        }
    }
}

/// Cancellation signal polled by the renderer once per row.
pub trait Abort: Sync {
    /// `true` once the render should stop.
    fn should_abort(&self) -> bool;
}

impl<F> Abort for F
where
    F: Fn() -> bool + Sync,
{
    fn should_abort(&self) -> bool {
        self()
    }
}

/// Never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverAbort;

impl Abort for NeverAbort {
    fn should_abort(&self) -> bool {
        false
    }
}

/// Shared flag that can be tripped from any thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, untripped token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether [`CancelToken::cancel`] has been called.
    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Abort for CancelToken {
    fn should_abort(&self) -> bool {
        self.is_canceled()
    }
}

/// Render the droste effect into `request.window` of `dst`, reading from `src`.
///
/// Both buffers must share depth and channel layout, otherwise
/// [`DrosteError::FormatMismatch`] is returned before anything is written. Pixels outside
/// the window are never touched.
#[tracing::instrument(
    skip_all,
    fields(
        window = ?request.window,
        format = %dst.format(),
        depths = ?params.depths(),
    )
)]
pub fn render_droste<A: Abort + ?Sized>(
    params: &EffectParameters,
    request: &RenderRequest,
    src: &PixelBuffer<'_>,
    dst: &mut PixelBufferMut<'_>,
    abort: &A,
) -> DrosteResult<RenderStatus> {
    let (spiral, space) = prepare(params, request, src, dst)?;
    if request.window.is_empty() {
        return Ok(RenderStatus::Completed);
    }
    let job = TileJob {
        spiral,
        depths: params.depths(),
        space,
        window: request.window,
        abort,
    };
    with_planes(src, dst, job)
}

/// Checks shared by the single-tile and tiled entry points, in reporting order.
pub(crate) fn prepare(
    params: &EffectParameters,
    request: &RenderRequest,
    src: &PixelBuffer<'_>,
    dst: &PixelBufferMut<'_>,
) -> DrosteResult<(SpiralTransform, CoordSpace)> {
    if src.format() != dst.format() {
        return Err(DrosteError::FormatMismatch {
            src: src.format(),
            dst: dst.format(),
        });
    }
    params.validate()?;
    let space = request.coord_space()?;
    if !dst.bounds().contains_rect(request.window) {
        return Err(DrosteError::validation(format!(
            "render window {:?} is outside destination bounds {:?}",
            request.window,
            dst.bounds()
        )));
    }
    Ok((SpiralTransform::new(params), space))
}

/// Everything one worker needs to fill a window of a typed plane.
pub(crate) struct TileJob<'a, A: ?Sized> {
    pub(crate) spiral: SpiralTransform,
    pub(crate) depths: RangeInclusive<i32>,
    pub(crate) space: CoordSpace,
    pub(crate) window: RectI,
    pub(crate) abort: &'a A,
}

impl<A: Abort + ?Sized> PlaneVisitor for TileJob<'_, A> {
    type Output = RenderStatus;

    fn visit<T: Component, const N: usize>(
        self,
        src: Plane<'_, T, N>,
        mut dst: PlaneMut<'_, T, N>,
    ) -> RenderStatus {
        render_rows(&self, &src, &mut dst)
    }
}

/// Fill `job.window` (clipped to `dst`) one row at a time.
pub(crate) fn render_rows<T: Component, const N: usize, A: Abort + ?Sized>(
    job: &TileJob<'_, A>,
    src: &Plane<'_, T, N>,
    dst: &mut PlaneMut<'_, T, N>,
) -> RenderStatus {
    let b = dst.bounds();
    let (x1, x2) = (job.window.x1.max(b.x1), job.window.x2.min(b.x2));
    let (y1, y2) = (job.window.y1.max(b.y1), job.window.y2.min(b.y2));
    if x1 >= x2 {
        return RenderStatus::Completed;
    }

    for y in y1..y2 {
        if job.abort.should_abort() {
            tracing::debug!(row = y, "render canceled");
            return RenderStatus::Canceled;
        }
        let Some(row) = dst.span_mut(y, x1, x2) else {
            continue;
        };
        for (x, px) in (x1..).zip(row.chunks_exact_mut(N)) {
            let t = job
                .space
                .to_canonical(Point::new(f64::from(x), f64::from(y)));
            store::<T, N>(px, composite_depths(&job.spiral, job.depths.clone(), job.space, src, t));
        }
    }
    RenderStatus::Completed
}

#[cfg(test)]
#[path = "../../tests/unit/render/driver.rs"]
mod tests;
