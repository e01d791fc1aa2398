//! Per-pixel oil-paint kernel over one row range.

use crate::foundation::core::{ColorVec, Pixel, Rect};
use crate::foundation::error::{FilterError, FilterResult};
use crate::histogram::HistogramBins;
use crate::partition::RowRange;
use crate::sampler::NeighborhoodSampler;

/// Filter the pixels of `rect` that fall in `range`.
///
/// `out_rows` holds the full-width shadow rows `[range.min_row, range.max_row)`; only columns
/// inside `rect` are written. `staging` must be `rect.width` long and `bins` must have the
/// sampler's level count. Returns the number of pixels written.
pub(crate) fn filter_range<P: Pixel>(
    sampler: &NeighborhoodSampler<'_, P>,
    rect: Rect,
    range: RowRange,
    out_rows: &mut [P],
    staging: &mut [ColorVec],
    bins: &mut HistogramBins,
) -> FilterResult<u64> {
    if range.len() == 0 {
        return Ok(0);
    }
    let width = out_rows.len() / range.len();
    let (x0, x1) = (rect.x as usize, rect.right() as usize);
    if width == 0 || width * range.len() != out_rows.len() || x1 > width {
        return Err(FilterError::worker(format!(
            "rows {}..{} got a {}-pixel slice for rect columns {x0}..{x1}",
            range.min_row,
            range.max_row,
            out_rows.len()
        )));
    }
    if staging.len() != x1 - x0 {
        return Err(FilterError::worker("staging row does not match rect width"));
    }
    if bins.levels() != sampler.levels() as usize {
        return Err(FilterError::worker("histogram level count mismatch"));
    }

    let mut written = 0u64;
    for (row, y) in out_rows.chunks_exact_mut(width).zip(range.min_row as usize..) {
        for (slot, x) in staging.iter_mut().zip(x0..x1) {
            *slot = filter_pixel(sampler, bins, x, y)?;
        }
        for (dst, &color) in row[x0..x1].iter_mut().zip(staging.iter()) {
            *dst = P::from_color(color);
        }
        written += (x1 - x0) as u64;
    }
    Ok(written)
}

/// Dominant-bucket mean color of the window around `(x, y)`, with the center pixel's alpha.
#[inline]
pub(crate) fn filter_pixel<P: Pixel>(
    sampler: &NeighborhoodSampler<'_, P>,
    bins: &mut HistogramBins,
    x: usize,
    y: usize,
) -> FilterResult<ColorVec> {
    bins.clear();
    sampler.for_each_sample(x, y, |bucket, color| bins.add(bucket, color));

    // The window always contains the center sample, so this only trips on a broken sampler.
    let dominant = bins
        .dominant()
        .ok_or_else(|| FilterError::worker(format!("empty window at ({x}, {y})")))?;
    debug_assert!(dominant.count > 0 && dominant.index < bins.levels());
    let [r, g, b] = dominant.mean_rgb;
    Ok([r, g, b, sampler.center(x, y)[3]])
}

#[cfg(test)]
#[path = "../tests/unit/kernel.rs"]
mod tests;
