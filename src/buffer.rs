//! Caller-owned 2-D pixel storage.

use xxhash_rust::xxh3::Xxh3;

use crate::foundation::core::{Pixel, Rect, Rgba8};
use crate::foundation::error::{FilterError, FilterResult};

const XXH3_SEED: u64 = 0x5a3c_91e7_0b4d_26f8;

/// Row-major 2-D pixel buffer.
///
/// Filters replace the buffer contents in place; width and height never change.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer<P> {
    width: u32,
    height: u32,
    pixels: Vec<P>,
}

impl<P: Pixel> PixelBuffer<P> {
    /// Wrap existing row-major pixels. `pixels.len()` must equal `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<P>) -> FilterResult<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(FilterError::validation(format!(
                "pixel buffer {width}x{height} expects {expected} pixels, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A buffer with every pixel set to `px`.
    pub fn filled(width: u32, height: u32, px: P) -> FilterResult<Self> {
        let n = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![px; n],
        })
    }

    /// A buffer built by evaluating `f(x, y)` for every pixel in row-major order.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> P,
    ) -> FilterResult<Self> {
        let n = pixel_count(width, height)?;
        let mut pixels = Vec::with_capacity(n);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Rectangle covering the whole buffer.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    /// Consume the buffer and return its pixels.
    pub fn into_pixels(self) -> Vec<P> {
        self.pixels
    }

    /// Pixels of row `y`, or `None` when out of bounds.
    pub fn row(&self, y: u32) -> Option<&[P]> {
        if y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        self.pixels.get(start..start + w)
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<P> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Overwrite the pixel at `(x, y)`.
    pub fn put(&mut self, x: u32, y: u32, px: P) -> FilterResult<()> {
        if x >= self.width || y >= self.height {
            return Err(FilterError::validation(format!(
                "pixel ({x}, {y}) outside {}x{} buffer",
                self.width, self.height
            )));
        }
        let i = self.index(x, y);
        self.pixels[i] = px;
        Ok(())
    }

    /// Stable content hash over dimensions and color values.
    ///
    /// Equal fingerprints imply identical dimensions and bit-identical colors.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Xxh3::with_seed(XXH3_SEED);
        h.update(&self.width.to_le_bytes());
        h.update(&self.height.to_le_bytes());
        for px in &self.pixels {
            for c in px.to_color() {
                h.update(&c.to_bits().to_le_bytes());
            }
        }
        h.digest()
    }

    pub(crate) fn storage_mut(&mut self) -> &mut Vec<P> {
        &mut self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl PixelBuffer<Rgba8> {
    /// Copy an in-memory [`image::RgbaImage`] into a buffer.
    pub fn from_rgba_image(img: &image::RgbaImage) -> Self {
        let pixels = img.pixels().map(|p| Rgba8::from(p.0)).collect();
        Self {
            width: img.width(),
            height: img.height(),
            pixels,
        }
    }

    /// Copy the buffer into an in-memory [`image::RgbaImage`].
    pub fn to_rgba_image(&self) -> FilterResult<image::RgbaImage> {
        let raw = self
            .pixels
            .iter()
            .flat_map(|p| p.to_array())
            .collect::<Vec<u8>>();
        image::RgbaImage::from_raw(self.width, self.height, raw).ok_or_else(|| {
            FilterError::validation("pixel buffer does not match its RgbaImage dimensions")
        })
    }
}

impl From<&image::RgbaImage> for PixelBuffer<Rgba8> {
    fn from(img: &image::RgbaImage) -> Self {
        Self::from_rgba_image(img)
    }
}

fn pixel_count(width: u32, height: u32) -> FilterResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| FilterError::validation("pixel buffer size overflow"))
}

#[cfg(test)]
#[path = "../tests/unit/buffer.rs"]
mod tests;
