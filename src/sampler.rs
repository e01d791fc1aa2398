//! Clamp-to-edge square window sampling and intensity quantization.

use crate::buffer::PixelBuffer;
use crate::foundation::core::{ColorVec, Pixel};
use crate::foundation::math::clamp_axis;
use crate::params::FilterParameters;

/// Reads `(2 * radius + 1)^2` windows out of a source buffer.
///
/// Coordinates outside the image are clamped per axis (edge replicate).
pub(crate) struct NeighborhoodSampler<'a, P> {
    src: &'a [P],
    width: usize,
    height: usize,
    radius: isize,
    levels: u32,
}

impl<'a, P: Pixel> NeighborhoodSampler<'a, P> {
    pub(crate) fn new(src: &'a PixelBuffer<P>, params: &FilterParameters) -> Self {
        Self {
            src: src.pixels(),
            width: src.width() as usize,
            height: src.height() as usize,
            radius: params.radius() as isize,
            levels: params.quantization_levels(),
        }
    }

    pub(crate) fn levels(&self) -> u32 {
        self.levels
    }

    /// Color of the pixel at `(x, y)` itself.
    #[inline]
    pub(crate) fn center(&self, x: usize, y: usize) -> ColorVec {
        self.src[y * self.width + x].to_color()
    }

    /// Visit the window around `(x, y)` row-major (`fy` outer, `fx` inner), passing each sample's
    /// intensity bucket and color.
    #[inline]
    pub(crate) fn for_each_sample(&self, x: usize, y: usize, mut f: impl FnMut(usize, ColorVec)) {
        let r = self.radius;
        for fy in -r..=r {
            let row = clamp_axis(y, fy, self.height) * self.width;
            for fx in -r..=r {
                let sx = clamp_axis(x, fx, self.width);
                let color = self.src[row + sx].to_color();
                f(quantize_intensity(color, self.levels), color);
            }
        }
    }
}

/// Bucket index `round((r + g + b) / 3 * (levels - 1))`.
///
/// Rounding is `f32::round`: halves go away from zero, so a mean of exactly `0.5 / (levels - 1)`
/// lands in bucket 1. Results are clamped into `[0, levels - 1]` so out-of-range or NaN colors
/// still index a valid bucket.
#[inline]
pub(crate) fn quantize_intensity(color: ColorVec, levels: u32) -> usize {
    let top = levels.saturating_sub(1);
    let mean = (color[0] + color[1] + color[2]) / 3.0;
    let q = (mean * top as f32).round();
    // `as` saturates: NaN and negatives become 0.
    (q as u32).min(top) as usize
}

#[cfg(test)]
#[path = "../tests/unit/sampler.rs"]
mod tests;
