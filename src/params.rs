//! Validated filter parameters.

use crate::buffer::PixelBuffer;
use crate::foundation::core::Pixel;
use crate::foundation::error::{FilterError, FilterResult};

/// Window and quantization settings for the oil-paint filter, validated against the dimensions
/// of the image they will be applied to.
///
/// `radius = window_size >> 1`, so every output pixel samples a `(2 * radius + 1)^2` window. For
/// even window sizes that is one pixel wider than `window_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FilterParameters {
    window_size: u32,
    quantization_levels: u32,
    image_width: u32,
    image_height: u32,
}

impl FilterParameters {
    /// Validate parameters for a `image_width x image_height` image.
    ///
    /// Rejects `window_size == 0`, a window larger than either dimension, and
    /// `quantization_levels == 0`.
    pub fn new(
        window_size: u32,
        quantization_levels: u32,
        image_width: u32,
        image_height: u32,
    ) -> FilterResult<Self> {
        if window_size == 0 {
            return Err(FilterError::validation("window size must be >= 1"));
        }
        if window_size > image_width {
            return Err(FilterError::validation(format!(
                "window size {window_size} exceeds image width {image_width}"
            )));
        }
        if window_size > image_height {
            return Err(FilterError::validation(format!(
                "window size {window_size} exceeds image height {image_height}"
            )));
        }
        if quantization_levels == 0 {
            return Err(FilterError::validation("quantization levels must be >= 1"));
        }
        Ok(Self {
            window_size,
            quantization_levels,
            image_width,
            image_height,
        })
    }

    /// Validate parameters against `buffer`'s dimensions.
    pub fn for_buffer<P: Pixel>(
        window_size: u32,
        quantization_levels: u32,
        buffer: &PixelBuffer<P>,
    ) -> FilterResult<Self> {
        Self::new(
            window_size,
            quantization_levels,
            buffer.width(),
            buffer.height(),
        )
    }

    /// Requested window side length.
    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    /// Number of intensity buckets.
    pub fn quantization_levels(&self) -> u32 {
        self.quantization_levels
    }

    /// Sampling radius (`window_size >> 1`).
    pub fn radius(&self) -> u32 {
        self.window_size >> 1
    }

    /// Image dimensions these parameters were validated for.
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub(crate) fn check_dimensions(&self, width: u32, height: u32) -> FilterResult<()> {
        if (width, height) != self.image_size() {
            return Err(FilterError::validation(format!(
                "parameters validated for {}x{} applied to {width}x{height} buffer",
                self.image_width, self.image_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/params.rs"]
mod tests;
