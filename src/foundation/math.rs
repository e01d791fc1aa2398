/// Clamp `center + offset` into `[0, len - 1]`. `len` must be non-zero.
#[inline]
pub(crate) fn clamp_axis(center: usize, offset: isize, len: usize) -> usize {
    let max = len as isize - 1;
    (center as isize + offset).clamp(0, max) as usize
}

/// Map a unit float to a byte, rounding to nearest. NaN maps to 0.
#[inline]
pub(crate) fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
