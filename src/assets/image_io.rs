//! Owned images backed by the `image` crate, for callers that start from files.
//!
//! Buffers are stored bottom row first so pixel `y` grows upward, the same orientation the
//! renderer uses for canonical space. Decoding and encoding flip rows accordingly.

use std::path::Path;

use anyhow::Context;
use image::{DynamicImage, ImageBuffer};

use crate::foundation::core::{PixelComponents, PixelDepth, PixelFormat, RectI};
use crate::foundation::error::{DrosteError, DrosteResult};
use crate::render::buffer::{Component, PixelBuffer, PixelBufferMut, PixelData, PixelDataMut};

/// Sample storage owned by an [`OwnedImage`].
#[derive(Clone, Debug, PartialEq)]
pub enum OwnedPixels {
    /// 8-bit channels.
    U8(Vec<u8>),
    /// 16-bit channels.
    U16(Vec<u16>),
    /// 32-bit float channels.
    F32(Vec<f32>),
}

impl OwnedPixels {
    fn zeroed(depth: PixelDepth, len: usize) -> Self {
        match depth {
            PixelDepth::U8 => Self::U8(vec![0; len]),
            PixelDepth::U16 => Self::U16(vec![0; len]),
            PixelDepth::F32 => Self::F32(vec![0.0; len]),
        }
    }

    fn depth(&self) -> PixelDepth {
        match self {
            Self::U8(_) => PixelDepth::U8,
            Self::U16(_) => PixelDepth::U16,
            Self::F32(_) => PixelDepth::F32,
        }
    }
}

/// Tightly packed pixels with their own bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage {
    pixels: OwnedPixels,
    components: PixelComponents,
    bounds: RectI,
}

impl OwnedImage {
    /// All-zero (transparent black) image covering `bounds`.
    pub fn new_transparent(format: PixelFormat, bounds: RectI) -> DrosteResult<Self> {
        let bounds = RectI::new(bounds.x1, bounds.y1, bounds.x2, bounds.y2)?;
        let len = (bounds.width() as usize)
            .checked_mul(bounds.height() as usize)
            .and_then(|n| n.checked_mul(format.components.count()))
            .ok_or_else(|| DrosteError::validation("image size overflow"))?;
        Ok(Self {
            pixels: OwnedPixels::zeroed(format.depth, len),
            components: format.components,
            bounds,
        })
    }

    /// Wrap tightly packed samples, bottom row first.
    pub fn from_pixels(
        pixels: OwnedPixels,
        components: PixelComponents,
        bounds: RectI,
    ) -> DrosteResult<Self> {
        let img = Self {
            pixels,
            components,
            bounds,
        };
        img.as_buffer()?;
        Ok(img)
    }

    /// Decode an encoded image (any format the `image` crate recognizes).
    ///
    /// Alpha-only images keep just the alpha channel of the decoded pixels.
    pub fn decode(bytes: &[u8], format: PixelFormat) -> DrosteResult<Self> {
        let img = image::load_from_memory(bytes).context("decode image from memory")?;
        Ok(Self::from_dynamic(&img, format))
    }

    /// Read and decode an image file.
    pub fn open(path: impl AsRef<Path>, format: PixelFormat) -> DrosteResult<Self> {
        let path = path.as_ref();
        let img = image::ImageReader::open(path)
            .with_context(|| format!("open image {}", path.display()))?
            .with_guessed_format()
            .with_context(|| format!("probe image format of {}", path.display()))?
            .decode()
            .with_context(|| format!("decode image {}", path.display()))?;
        Ok(Self::from_dynamic(&img, format))
    }

    fn from_dynamic(img: &DynamicImage, format: PixelFormat) -> Self {
        let (w, h) = (img.width(), img.height());
        let pixels = match format.depth {
            PixelDepth::U8 => {
                OwnedPixels::U8(pack(img.to_rgba8().into_raw(), w, format.components))
            }
            PixelDepth::U16 => {
                OwnedPixels::U16(pack(img.to_rgba16().into_raw(), w, format.components))
            }
            PixelDepth::F32 => {
                OwnedPixels::F32(pack(img.to_rgba32f().into_raw(), w, format.components))
            }
        };
        Self {
            pixels,
            components: format.components,
            bounds: RectI {
                x1: 0,
                y1: 0,
                x2: w as i32,
                y2: h as i32,
            },
        }
    }

    /// Move the origin to the image centre (rounded down), keeping the size.
    pub fn centered(mut self) -> Self {
        let (w, h) = (self.bounds.width() as i32, self.bounds.height() as i32);
        self.bounds = RectI {
            x1: -(w / 2),
            y1: -(h / 2),
            x2: w - w / 2,
            y2: h - h / 2,
        };
        self
    }

    /// Bit depth and channel layout.
    pub fn format(&self) -> PixelFormat {
        PixelFormat::new(self.pixels.depth(), self.components)
    }

    /// Pixel rectangle covered by the image.
    pub fn bounds(&self) -> RectI {
        self.bounds
    }

    /// Owned samples, bottom row first.
    pub fn pixels(&self) -> &OwnedPixels {
        &self.pixels
    }

    /// Borrow as a render source.
    pub fn as_buffer(&self) -> DrosteResult<PixelBuffer<'_>> {
        let data = match &self.pixels {
            OwnedPixels::U8(v) => PixelData::U8(v),
            OwnedPixels::U16(v) => PixelData::U16(v),
            OwnedPixels::F32(v) => PixelData::F32(v),
        };
        PixelBuffer::packed(data, self.components, self.bounds)
    }

    /// Borrow as a render destination.
    pub fn as_buffer_mut(&mut self) -> DrosteResult<PixelBufferMut<'_>> {
        let data = match &mut self.pixels {
            OwnedPixels::U8(v) => PixelDataMut::U8(v),
            OwnedPixels::U16(v) => PixelDataMut::U16(v),
            OwnedPixels::F32(v) => PixelDataMut::F32(v),
        };
        PixelBufferMut::packed(data, self.components, self.bounds)
    }

    /// Convert back to a top-row-first `image` buffer.
    ///
    /// Float images are quantized to 16 bits so every common container can hold them.
    /// Alpha-only images become black RGBA with the stored alpha.
    pub fn to_dynamic(&self) -> DrosteResult<DynamicImage> {
        let (w, h) = (self.bounds.width(), self.bounds.height());
        let too_small = || DrosteError::validation("pixel storage does not match image size");
        Ok(match &self.pixels {
            OwnedPixels::U8(v) => DynamicImage::ImageRgba8(
                ImageBuffer::from_raw(w, h, unpack(v, w, self.components))
                    .ok_or_else(too_small)?,
            ),
            OwnedPixels::U16(v) => DynamicImage::ImageRgba16(
                ImageBuffer::from_raw(w, h, unpack(v, w, self.components))
                    .ok_or_else(too_small)?,
            ),
            OwnedPixels::F32(v) => {
                let quantized: Vec<u16> = v.iter().map(|&c| u16::from_unit(c)).collect();
                DynamicImage::ImageRgba16(
                    ImageBuffer::from_raw(w, h, unpack(&quantized, w, self.components))
                        .ok_or_else(too_small)?,
                )
            }
        })
    }

    /// Encode to `path`; the container is chosen from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> DrosteResult<()> {
        let path = path.as_ref();
        self.to_dynamic()?
            .save(path)
            .with_context(|| format!("write image {}", path.display()))?;
        Ok(())
    }
}

/// Top-down RGBA rows to bottom-up rows of the requested layout.
fn pack<T: Copy>(rgba: Vec<T>, width: u32, components: PixelComponents) -> Vec<T> {
    let row = width as usize * 4;
    if row == 0 {
        return Vec::new();
    }
    let rows = rgba.chunks_exact(row).rev();
    match components {
        PixelComponents::Rgba => rows.flatten().copied().collect(),
        PixelComponents::Alpha => rows
            .flat_map(|r| r.chunks_exact(4).map(|px| px[3]))
            .collect(),
    }
}

/// Bottom-up rows of `components` layout to top-down RGBA rows.
fn unpack<T: Component + Default>(data: &[T], width: u32, components: PixelComponents) -> Vec<T> {
    let row = width as usize * components.count();
    if row == 0 {
        return Vec::new();
    }
    let rows = data.chunks_exact(row).rev();
    match components {
        PixelComponents::Rgba => rows.flatten().copied().collect(),
        PixelComponents::Alpha => rows
            .flatten()
            .flat_map(|&a| [T::default(), T::default(), T::default(), a])
            .collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image_io.rs"]
mod tests;
