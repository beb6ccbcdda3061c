//! Borrowed views over externally owned pixel storage.
//!
//! [`PixelBuffer`] / [`PixelBufferMut`] are the untyped, format-tagged views callers hand to
//! the renderer. Internally they are resolved once per render into typed [`Plane`] /
//! [`PlaneMut`] views so the per-pixel loop is monomorphized for one storage type and
//! channel count.

use crate::foundation::core::{PixelComponents, PixelDepth, PixelFormat, RectI, Rgba};
use crate::foundation::error::{DrosteError, DrosteResult};

/// Read-only sample storage of one of the supported depths.
#[derive(Clone, Copy, Debug)]
pub enum PixelData<'a> {
    /// 8-bit channels.
    U8(&'a [u8]),
    /// 16-bit channels.
    U16(&'a [u16]),
    /// 32-bit float channels.
    F32(&'a [f32]),
}

impl PixelData<'_> {
    fn depth(&self) -> PixelDepth {
        match self {
            Self::U8(_) => PixelDepth::U8,
            Self::U16(_) => PixelDepth::U16,
            Self::F32(_) => PixelDepth::F32,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::U8(s) => s.len(),
            Self::U16(s) => s.len(),
            Self::F32(s) => s.len(),
        }
    }
}

/// Writable sample storage of one of the supported depths.
#[derive(Debug)]
pub enum PixelDataMut<'a> {
    /// 8-bit channels.
    U8(&'a mut [u8]),
    /// 16-bit channels.
    U16(&'a mut [u16]),
    /// 32-bit float channels.
    F32(&'a mut [f32]),
}

impl PixelDataMut<'_> {
    fn depth(&self) -> PixelDepth {
        match self {
            Self::U8(_) => PixelDepth::U8,
            Self::U16(_) => PixelDepth::U16,
            Self::F32(_) => PixelDepth::F32,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::U8(s) => s.len(),
            Self::U16(s) => s.len(),
            Self::F32(s) => s.len(),
        }
    }
}

/// Source image: a rectangle of pixels with a fixed row stride (in channels).
///
/// Row `y` of the rectangle starts at `(y - bounds.y1) * row_stride`.
#[derive(Clone, Copy, Debug)]
pub struct PixelBuffer<'a> {
    data: PixelData<'a>,
    components: PixelComponents,
    bounds: RectI,
    row_stride: usize,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap storage, checking that `data` covers `bounds` at `row_stride`.
    pub fn new(
        data: PixelData<'a>,
        components: PixelComponents,
        bounds: RectI,
        row_stride: usize,
    ) -> DrosteResult<Self> {
        check_geometry(data.len(), components, bounds, row_stride)?;
        Ok(Self {
            data,
            components,
            bounds,
            row_stride,
        })
    }

    /// Wrap tightly packed rows (`row_stride = width * channels`).
    pub fn packed(
        data: PixelData<'a>,
        components: PixelComponents,
        bounds: RectI,
    ) -> DrosteResult<Self> {
        let stride = packed_stride(components, bounds)?;
        Self::new(data, components, bounds, stride)
    }

    /// Bit depth and channel layout.
    pub fn format(&self) -> PixelFormat {
        PixelFormat::new(self.data.depth(), self.components)
    }

    /// Pixel rectangle covered by the buffer.
    pub fn bounds(&self) -> RectI {
        self.bounds
    }

    /// Distance between rows, in channels.
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub(crate) fn plane<T: Component, const N: usize>(&self) -> DrosteResult<Plane<'a, T, N>> {
        let data = T::view(&self.data)
            .filter(|_| self.components.count() == N)
            .ok_or_else(|| {
                DrosteError::validation(format!(
                    "source buffer is {}, not a {}-channel {} plane",
                    self.format(),
                    N,
                    T::DEPTH
                ))
            })?;
        Ok(Plane {
            data,
            bounds: self.bounds,
            stride: self.row_stride,
        })
    }
}

/// Destination image; same layout rules as [`PixelBuffer`].
#[derive(Debug)]
pub struct PixelBufferMut<'a> {
    data: PixelDataMut<'a>,
    components: PixelComponents,
    bounds: RectI,
    row_stride: usize,
}

impl<'a> PixelBufferMut<'a> {
    /// Wrap storage, checking that `data` covers `bounds` at `row_stride`.
    pub fn new(
        data: PixelDataMut<'a>,
        components: PixelComponents,
        bounds: RectI,
        row_stride: usize,
    ) -> DrosteResult<Self> {
        check_geometry(data.len(), components, bounds, row_stride)?;
        Ok(Self {
            data,
            components,
            bounds,
            row_stride,
        })
    }

    /// Wrap tightly packed rows (`row_stride = width * channels`).
    pub fn packed(
        data: PixelDataMut<'a>,
        components: PixelComponents,
        bounds: RectI,
    ) -> DrosteResult<Self> {
        let stride = packed_stride(components, bounds)?;
        Self::new(data, components, bounds, stride)
    }

    /// Bit depth and channel layout.
    pub fn format(&self) -> PixelFormat {
        PixelFormat::new(self.data.depth(), self.components)
    }

    /// Pixel rectangle covered by the buffer.
    pub fn bounds(&self) -> RectI {
        self.bounds
    }

    /// Distance between rows, in channels.
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub(crate) fn plane_mut<T: Component, const N: usize>(
        &mut self,
    ) -> DrosteResult<PlaneMut<'_, T, N>> {
        let format = self.format();
        let channels = self.components.count();
        let data = T::view_mut(&mut self.data)
            .filter(|_| channels == N)
            .ok_or_else(|| {
                DrosteError::validation(format!(
                    "destination buffer is {format}, not a {N}-channel {} plane",
                    T::DEPTH
                ))
            })?;
        Ok(PlaneMut {
            data,
            bounds: self.bounds,
            stride: self.row_stride,
        })
    }
}

fn packed_stride(components: PixelComponents, bounds: RectI) -> DrosteResult<usize> {
    (bounds.width() as usize)
        .checked_mul(components.count())
        .ok_or_else(|| DrosteError::validation("row size overflow"))
}

fn check_geometry(
    len: usize,
    components: PixelComponents,
    bounds: RectI,
    row_stride: usize,
) -> DrosteResult<()> {
    RectI::new(bounds.x1, bounds.y1, bounds.x2, bounds.y2)?;
    if bounds.is_empty() {
        return Ok(());
    }
    let row_len = packed_stride(components, bounds)?;
    if row_stride < row_len {
        return Err(DrosteError::validation(format!(
            "row stride {row_stride} is shorter than a row of {row_len} channels"
        )));
    }
    let required = (bounds.height() as usize - 1)
        .checked_mul(row_stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or_else(|| DrosteError::validation("buffer size overflow"))?;
    if len < required {
        return Err(DrosteError::validation(format!(
            "buffer holds {len} channels, {}x{} at stride {row_stride} needs {required}",
            bounds.width(),
            bounds.height()
        )));
    }
    Ok(())
}

/// Storage type of one channel, with conversion to and from normalized `f32`.
pub(crate) trait Component: Copy + Send + Sync + 'static {
    const DEPTH: PixelDepth;

    fn to_unit(self) -> f32;

    /// Quantize a normalized value; integer depths scale by the maximum level, truncate and
    /// saturate.
    fn from_unit(v: f32) -> Self;

    fn view<'a>(data: &PixelData<'a>) -> Option<&'a [Self]>;

    fn view_mut<'b>(data: &'b mut PixelDataMut<'_>) -> Option<&'b mut [Self]>;
}

impl Component for u8 {
    const DEPTH: PixelDepth = PixelDepth::U8;

    #[inline]
    fn to_unit(self) -> f32 {
        f32::from(self) / 255.0
    }

    #[inline]
    fn from_unit(v: f32) -> Self {
        (v * 255.0).clamp(0.0, 255.0) as u8
    }

    fn view<'a>(data: &PixelData<'a>) -> Option<&'a [Self]> {
        match *data {
            PixelData::U8(s) => Some(s),
            _ => None,
        }
    }

    fn view_mut<'b>(data: &'b mut PixelDataMut<'_>) -> Option<&'b mut [Self]> {
        match data {
            PixelDataMut::U8(s) => Some(&mut **s),
            _ => None,
        }
    }
}

impl Component for u16 {
    const DEPTH: PixelDepth = PixelDepth::U16;

    #[inline]
    fn to_unit(self) -> f32 {
        f32::from(self) / 65535.0
    }

    #[inline]
    fn from_unit(v: f32) -> Self {
        (v * 65535.0).clamp(0.0, 65535.0) as u16
    }

    fn view<'a>(data: &PixelData<'a>) -> Option<&'a [Self]> {
        match *data {
            PixelData::U16(s) => Some(s),
            _ => None,
        }
    }

    fn view_mut<'b>(data: &'b mut PixelDataMut<'_>) -> Option<&'b mut [Self]> {
        match data {
            PixelDataMut::U16(s) => Some(&mut **s),
            _ => None,
        }
    }
}

impl Component for f32 {
    const DEPTH: PixelDepth = PixelDepth::F32;

    #[inline]
    fn to_unit(self) -> f32 {
        self
    }

    #[inline]
    fn from_unit(v: f32) -> Self {
        v
    }

    fn view<'a>(data: &PixelData<'a>) -> Option<&'a [Self]> {
        match *data {
            PixelData::F32(s) => Some(s),
            _ => None,
        }
    }

    fn view_mut<'b>(data: &'b mut PixelDataMut<'_>) -> Option<&'b mut [Self]> {
        match data {
            PixelDataMut::F32(s) => Some(&mut **s),
            _ => None,
        }
    }
}

/// Decode one stored pixel. Alpha-only pixels read as `(0, 0, 0, a)`.
#[inline]
pub(crate) fn load<T: Component, const N: usize>(px: &[T]) -> Rgba {
    if N == 1 {
        [0.0, 0.0, 0.0, px[0].to_unit()]
    } else {
        [
            px[0].to_unit(),
            px[1].to_unit(),
            px[2].to_unit(),
            px[3].to_unit(),
        ]
    }
}

/// Encode one pixel. Alpha-only pixels keep just the alpha channel.
#[inline]
pub(crate) fn store<T: Component, const N: usize>(px: &mut [T], c: Rgba) {
    if N == 1 {
        px[0] = T::from_unit(c[3]);
    } else {
        for (dst, v) in px.iter_mut().zip(c) {
            *dst = T::from_unit(v);
        }
    }
}

/// Typed read-only view; pixels outside `bounds` read as missing.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Plane<'a, T, const N: usize> {
    data: &'a [T],
    bounds: RectI,
    stride: usize,
}

impl<'a, T: Component, const N: usize> Plane<'a, T, N> {
    pub(crate) fn bounds(&self) -> RectI {
        self.bounds
    }

    #[inline]
    pub(crate) fn fetch(&self, x: i64, y: i64) -> Option<Rgba> {
        let b = self.bounds;
        if x < i64::from(b.x1) || x >= i64::from(b.x2) || y < i64::from(b.y1) || y >= i64::from(b.y2)
        {
            return None;
        }
        let off = (y - i64::from(b.y1)) as usize * self.stride + (x - i64::from(b.x1)) as usize * N;
        self.data.get(off..off + N).map(load::<T, N>)
    }
}

/// Typed writable view over whole rows of a destination buffer.
#[derive(Debug)]
pub(crate) struct PlaneMut<'a, T, const N: usize> {
    data: &'a mut [T],
    bounds: RectI,
    stride: usize,
}

impl<'a, T: Component, const N: usize> PlaneMut<'a, T, N> {
    pub(crate) fn bounds(&self) -> RectI {
        self.bounds
    }

    /// Pixels `[x1, x2)` of row `y`, or `None` when the span leaves the plane.
    pub(crate) fn span_mut(&mut self, y: i32, x1: i32, x2: i32) -> Option<&mut [T]> {
        let b = self.bounds;
        if y < b.y1 || y >= b.y2 || x1 < b.x1 || x2 > b.x2 || x1 > x2 {
            return None;
        }
        let row = (y - b.y1) as usize * self.stride;
        let start = row + (x1 - b.x1) as usize * N;
        let end = row + (x2 - b.x1) as usize * N;
        self.data.get_mut(start..end)
    }

    /// Split into rows `[y1, y)` and `[y, y2)`; `y` is clamped to the plane.
    pub(crate) fn split_at_row(self, y: i32) -> (Self, Self) {
        let b = self.bounds;
        let y = y.clamp(b.y1, b.y2.max(b.y1));
        let at = ((y - b.y1) as usize)
            .saturating_mul(self.stride)
            .min(self.data.len());
        let (top, bottom) = self.data.split_at_mut(at);
        (
            Self {
                data: top,
                bounds: RectI { y2: y, ..b },
                stride: self.stride,
            },
            Self {
                data: bottom,
                bounds: RectI { y1: y, ..b },
                stride: self.stride,
            },
        )
    }

    /// Disjoint bands of at most `rows` rows covering `[y1, y2)` of the plane.
    pub(crate) fn into_bands(self, y1: i32, y2: i32, rows: u32) -> Vec<Self> {
        let rows = rows.max(1);
        let (_, rest) = self.split_at_row(y1);
        let (mut rest, _) = rest.split_at_row(y2);
        let mut bands = Vec::with_capacity((rest.bounds.height() / rows) as usize + 1);
        while rest.bounds.height() > rows {
            let cut = i64::from(rest.bounds.y1) + i64::from(rows);
            let (band, tail) = rest.split_at_row(cut as i32);
            bands.push(band);
            rest = tail;
        }
        if !rest.bounds.is_empty() {
            bands.push(rest);
        }
        bands
    }
}

/// Callback invoked with the typed views matching a buffer format.
pub(crate) trait PlaneVisitor {
    type Output;

    fn visit<T: Component, const N: usize>(
        self,
        src: Plane<'_, T, N>,
        dst: PlaneMut<'_, T, N>,
    ) -> Self::Output;
}

/// Resolve both buffers into typed planes and hand them to `visitor`.
///
/// The caller is expected to have checked that both formats agree.
pub(crate) fn with_planes<V: PlaneVisitor>(
    src: &PixelBuffer<'_>,
    dst: &mut PixelBufferMut<'_>,
    visitor: V,
) -> DrosteResult<V::Output> {
    use PixelComponents as C;
    use PixelDepth as D;

    let format = src.format();
    Ok(match (format.depth, format.components) {
        (D::U8, C::Rgba) => visitor.visit(src.plane::<u8, 4>()?, dst.plane_mut::<u8, 4>()?),
        (D::U8, C::Alpha) => visitor.visit(src.plane::<u8, 1>()?, dst.plane_mut::<u8, 1>()?),
        (D::U16, C::Rgba) => visitor.visit(src.plane::<u16, 4>()?, dst.plane_mut::<u16, 4>()?),
        (D::U16, C::Alpha) => visitor.visit(src.plane::<u16, 1>()?, dst.plane_mut::<u16, 1>()?),
        (D::F32, C::Rgba) => visitor.visit(src.plane::<f32, 4>()?, dst.plane_mut::<f32, 4>()?),
        (D::F32, C::Alpha) => visitor.visit(src.plane::<f32, 1>()?, dst.plane_mut::<f32, 1>()?),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/buffer.rs"]
mod tests;
