use rayon::prelude::*;

use crate::effects::params::EffectParameters;
use crate::foundation::error::{DrosteError, DrosteResult};
use crate::render::buffer::{
    Component, PixelBuffer, PixelBufferMut, Plane, PlaneMut, PlaneVisitor, with_planes,
};
use crate::render::driver::{Abort, RenderRequest, RenderStatus, TileJob, prepare, render_rows};

/// How [`render_tiled`] spreads one request over worker threads.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RenderThreading {
    /// Worker count; `None` lets rayon decide. `Some(0)` is rejected.
    pub threads: Option<usize>,
    /// Rows per band. `0` is treated as `1`.
    pub band_rows: u32,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            threads: None,
            band_rows: 32,
        }
    }
}

/// Render `request.window` in horizontal bands on a rayon pool.
///
/// Same contract and output as [`render_droste`](crate::render_droste): every band shares
/// `abort`, and the result is [`RenderStatus::Canceled`] if any band stopped early. Bands that
/// had already finished keep their pixels.
#[tracing::instrument(
    skip_all,
    fields(
        window = ?request.window,
        format = %dst.format(),
        band_rows = threading.band_rows,
    )
)]
pub fn render_tiled<A: Abort + ?Sized>(
    params: &EffectParameters,
    request: &RenderRequest,
    src: &PixelBuffer<'_>,
    dst: &mut PixelBufferMut<'_>,
    threading: &RenderThreading,
    abort: &A,
) -> DrosteResult<RenderStatus> {
    let (spiral, space) = prepare(params, request, src, dst)?;
    let pool = build_thread_pool(threading.threads)?;
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
    with_planes(
        src,
        dst,
        Bands {
            job,
            rows: normalized_band_rows(threading.band_rows),
            pool: &pool,
        },
    )
}

struct Bands<'a, A: ?Sized> {
    job: TileJob<'a, A>,
    rows: u32,
    pool: &'a rayon::ThreadPool,
}

impl<A: Abort + ?Sized> PlaneVisitor for Bands<'_, A> {
    type Output = RenderStatus;

    fn visit<T: Component, const N: usize>(
        self,
        src: Plane<'_, T, N>,
        dst: PlaneMut<'_, T, N>,
    ) -> RenderStatus {
        let window = self.job.window;
        let bands = dst.into_bands(window.y1, window.y2, self.rows);
        tracing::trace!(bands = bands.len(), "dispatching bands");

        let job = &self.job;
        let src = &src;
        self.pool.install(|| {
            bands
                .into_par_iter()
                .map(|mut band| render_rows(job, src, &mut band))
                .reduce(|| RenderStatus::Completed, RenderStatus::merge)
        })
    }
}

fn build_thread_pool(threads: Option<usize>) -> DrosteResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(DrosteError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        DrosteError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
    })
}

fn normalized_band_rows(rows: u32) -> u32 {
    if rows == 0 { 1 } else { rows }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
