use crate::foundation::error::{FilterError, FilterResult};
use crate::foundation::math::unit_to_u8;

/// Straight-alpha float color `[r, g, b, a]`, each channel nominally in `[0, 1]`.
pub type ColorVec = [f32; 4];

/// A pixel representation the engine can read and write.
///
/// The engine never looks at pixel storage directly: every sample goes through
/// [`Pixel::to_color`] and every result through [`Pixel::from_color`]. Conversions should be
/// total and lossless within `f32` precision.
pub trait Pixel: Copy + Send + Sync + 'static {
    /// Convert this pixel into a float color vector.
    fn to_color(self) -> ColorVec;

    /// Build a pixel from a float color vector. Out-of-range channels may be clamped.
    fn from_color(color: ColorVec) -> Self;
}

impl Pixel for ColorVec {
    #[inline]
    fn to_color(self) -> ColorVec {
        self
    }

    #[inline]
    fn from_color(color: ColorVec) -> Self {
        color
    }
}

/// Straight-alpha RGBA8.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Construct from channel values.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Channels as `[r, g, b, a]`.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl Pixel for Rgba8 {
    #[inline]
    fn to_color(self) -> ColorVec {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }

    #[inline]
    fn from_color(color: ColorVec) -> Self {
        Self {
            r: unit_to_u8(color[0]),
            g: unit_to_u8(color[1]),
            b: unit_to_u8(color[2]),
            a: unit_to_u8(color[3]),
        }
    }
}

/// Integer pixel rectangle `{x, y, width, height}`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Construct a rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin covering `width x height`.
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive), saturating.
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive), saturating.
    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Return `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Return `true` when `(x, y)` lies inside the rectangle.
    pub fn contains(self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check that the rectangle lies fully within a `width x height` image.
    pub fn validate_within(self, width: u32, height: u32) -> FilterResult<()> {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        match (right, bottom) {
            (Some(r), Some(b)) if r <= width && b <= height => Ok(()),
            _ => Err(FilterError::validation(format!(
                "rect {}x{}+{}+{} exceeds image bounds {width}x{height}",
                self.width, self.height, self.x, self.y
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
