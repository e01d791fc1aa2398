//! Per-worker intensity histogram with running dominant-bucket tracking.

use std::collections::TryReserveError;
use std::mem::size_of;

use crate::foundation::core::ColorVec;

/// Struct-of-arrays histogram: one count and three channel sums per intensity bucket.
///
/// Owned by exactly one row-range worker and cleared before every output pixel.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct HistogramBins {
    count: Vec<u32>,
    red_sum: Vec<f64>,
    green_sum: Vec<f64>,
    blue_sum: Vec<f64>,
    max_count: u32,
    max_index: usize,
}

/// Winning bucket of a histogram scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Dominant {
    pub(crate) index: usize,
    pub(crate) count: u32,
    pub(crate) mean_rgb: [f32; 3],
}

impl HistogramBins {
    /// Resize to `levels` buckets and zero them. Allocation failure is returned, not aborted on.
    pub(crate) fn try_reset_levels(&mut self, levels: usize) -> Result<(), TryReserveError> {
        fn fit<T: Copy + Default>(v: &mut Vec<T>, levels: usize) -> Result<(), TryReserveError> {
            v.clear();
            v.try_reserve_exact(levels)?;
            v.resize(levels, T::default());
            Ok(())
        }
        fit(&mut self.count, levels)?;
        fit(&mut self.red_sum, levels)?;
        fit(&mut self.green_sum, levels)?;
        fit(&mut self.blue_sum, levels)?;
        self.max_count = 0;
        self.max_index = 0;
        Ok(())
    }

    pub(crate) fn levels(&self) -> usize {
        self.count.len()
    }

    /// Zero every bucket and the running maximum.
    pub(crate) fn clear(&mut self) {
        self.count.fill(0);
        self.red_sum.fill(0.0);
        self.green_sum.fill(0.0);
        self.blue_sum.fill(0.0);
        self.max_count = 0;
        self.max_index = 0;
    }

    /// Record one sample in `bucket`.
    ///
    /// The running maximum only moves on a strictly greater count, so among tied buckets the one
    /// that reached the count first in scan order wins.
    #[inline]
    pub(crate) fn add(&mut self, bucket: usize, color: ColorVec) {
        let n = &mut self.count[bucket];
        *n += 1;
        let n = *n;
        self.red_sum[bucket] += f64::from(color[0]);
        self.green_sum[bucket] += f64::from(color[1]);
        self.blue_sum[bucket] += f64::from(color[2]);
        if n > self.max_count {
            self.max_count = n;
            self.max_index = bucket;
        }
    }

    /// Channel means of the dominant bucket, or `None` before any sample was added.
    pub(crate) fn dominant(&self) -> Option<Dominant> {
        if self.max_count == 0 {
            return None;
        }
        let i = self.max_index;
        let n = f64::from(self.max_count);
        Some(Dominant {
            index: i,
            count: self.max_count,
            mean_rgb: [
                (self.red_sum[i] / n) as f32,
                (self.green_sum[i] / n) as f32,
                (self.blue_sum[i] / n) as f32,
            ],
        })
    }

    /// Bytes held by the bucket arrays.
    pub(crate) fn capacity_bytes(&self) -> usize {
        self.count.capacity() * size_of::<u32>()
            + (self.red_sum.capacity() + self.green_sum.capacity() + self.blue_sum.capacity())
                * size_of::<f64>()
    }

    pub(crate) fn bytes_for_levels(levels: usize) -> usize {
        levels.saturating_mul(size_of::<u32>() + 3 * size_of::<f64>())
    }
}

#[cfg(test)]
#[path = "../tests/unit/histogram.rs"]
mod tests;
