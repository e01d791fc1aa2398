use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::mem::size_of;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard};

use crate::buffer::PixelBuffer;
use crate::foundation::core::{ColorVec, Pixel};
use crate::foundation::error::{FilterError, FilterResult};
use crate::histogram::HistogramBins;

/// Retention limits for pooled scratch buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArenaOpts {
    /// Maximum bytes retained across all free lists.
    pub max_pool_bytes: usize,
    /// Maximum number of retained buffers per kind (row vectors, histograms, or shadows of one
    /// pixel type).
    pub max_buffers_per_kind: usize,
    /// Hard cap on bytes handed out and not yet released. Acquisitions that would cross it fail
    /// with [`FilterError::ResourceExhausted`]. `None` disables the cap.
    pub max_live_bytes: Option<usize>,
}

impl Default for ArenaOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 256 * 1024 * 1024,
            max_buffers_per_kind: 64,
            max_live_bytes: None,
        }
    }
}

/// Arena counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArenaStats {
    /// Buffers currently parked in free lists.
    pub retained_buffers: usize,
    /// Capacity bytes currently parked in free lists.
    pub retained_bytes: usize,
    /// Bytes handed out and not yet released.
    pub live_bytes: usize,
    /// Acquisitions that had to allocate or grow a buffer.
    pub alloc_buffers: u64,
    /// Capacity bytes allocated by those acquisitions.
    pub alloc_bytes: u64,
    /// Acquisitions served from a free list.
    pub reused_buffers: u64,
    /// Releases dropped because a retention limit was reached.
    pub dropped_on_release: u64,
}

struct Inner {
    stats: ArenaStats,
    rows: Vec<Vec<ColorVec>>,
    histograms: Vec<HistogramBins>,
    // Each entry holds `Vec<P>` boxes of exactly `len` pixels for the `P` its key names.
    shadows: HashMap<ShadowKey, Vec<Box<dyn Any + Send>>>,
}

/// Shadows are only recycled into frames of the same pixel type and pixel count, so a published
/// shadow never carries capacity from a larger frame into the caller's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ShadowKey {
    pixel: TypeId,
    len: usize,
}

impl ShadowKey {
    fn of<P: Pixel>(len: usize) -> Self {
        Self {
            pixel: TypeId::of::<P>(),
            len,
        }
    }
}

impl Inner {
    fn note_reuse(&mut self, capacity_bytes: usize) {
        self.stats.retained_buffers = self.stats.retained_buffers.saturating_sub(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(capacity_bytes);
        self.stats.reused_buffers = self.stats.reused_buffers.saturating_add(1);
    }

    fn note_growth(&mut self, before_bytes: usize, after_bytes: usize) {
        if after_bytes > before_bytes {
            self.stats.alloc_buffers = self.stats.alloc_buffers.saturating_add(1);
            self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(after_bytes as u64);
        }
    }

    fn unreserve(&mut self, bytes: usize) {
        self.stats.live_bytes = self.stats.live_bytes.saturating_sub(bytes);
    }
}

fn rows_list(inner: &mut Inner, _: ()) -> &mut Vec<Vec<ColorVec>> {
    &mut inner.rows
}

fn histogram_list(inner: &mut Inner, _: ()) -> &mut Vec<HistogramBins> {
    &mut inner.histograms
}

fn shadow_list(inner: &mut Inner, key: ShadowKey) -> &mut Vec<Box<dyn Any + Send>> {
    inner.shadows.entry(key).or_default()
}

fn vec_bytes<T>(v: &Vec<T>) -> usize {
    v.capacity().saturating_mul(size_of::<T>())
}

/// Thread-safe pool of scratch buffers shared by all row-range workers.
///
/// Acquire/release happens once per row range (or once per invocation for shadows), never per
/// pixel, so the lock stays out of the hot loop. Every acquisition is returned through an RAII
/// guard that hands the storage back on drop, including on error and unwind paths.
pub(crate) struct ScratchArena {
    opts: ArenaOpts,
    inner: Mutex<Inner>,
}

impl ScratchArena {
    pub(crate) fn new(opts: ArenaOpts) -> Self {
        Self {
            opts,
            inner: Mutex::new(Inner {
                stats: ArenaStats::default(),
                rows: Vec::new(),
                histograms: Vec::new(),
                shadows: HashMap::new(),
            }),
        }
    }

    pub(crate) fn stats(&self) -> ArenaStats {
        self.lock().stats
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Free lists stay consistent even if a holder panicked; the lock is never held across
        // user code.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn reserve_live(&self, inner: &mut Inner, bytes: usize, what: &str) -> FilterResult<()> {
        if let Some(cap) = self.opts.max_live_bytes
            && inner.stats.live_bytes.saturating_add(bytes) > cap
        {
            return Err(FilterError::resource_exhausted(format!(
                "{what} needs {bytes} bytes with {} of {cap} live",
                inner.stats.live_bytes
            )));
        }
        inner.stats.live_bytes = inner.stats.live_bytes.saturating_add(bytes);
        Ok(())
    }

    /// Row-length vector of colors. Contents are unspecified and must be written before read.
    pub(crate) fn acquire_row(&self, len: usize) -> FilterResult<ScopedRow<'_>> {
        let live = len.saturating_mul(size_of::<ColorVec>());
        let mut inner = self.lock();
        self.reserve_live(&mut inner, live, "row buffer")?;

        let mut buf = match inner.rows.pop() {
            Some(b) => {
                inner.note_reuse(vec_bytes(&b));
                b
            }
            None => Vec::new(),
        };
        let before = vec_bytes(&buf);
        buf.clear();
        if let Err(e) = buf.try_reserve_exact(len) {
            inner.unreserve(live);
            return Err(FilterError::resource_exhausted(format!(
                "row buffer of {len} pixels: {e}"
            )));
        }
        inner.note_growth(before, vec_bytes(&buf));
        drop(inner);

        buf.resize(len, [0.0; 4]);
        Ok(ScopedRow {
            arena: self,
            buf,
            live,
        })
    }

    /// Zeroed histogram with `levels` buckets.
    pub(crate) fn acquire_histogram(&self, levels: usize) -> FilterResult<ScopedHistogram<'_>> {
        let live = HistogramBins::bytes_for_levels(levels);
        let mut inner = self.lock();
        self.reserve_live(&mut inner, live, "histogram")?;

        let mut bins = match inner.histograms.pop() {
            Some(b) => {
                inner.note_reuse(b.capacity_bytes());
                b
            }
            None => HistogramBins::default(),
        };
        let before = bins.capacity_bytes();
        if let Err(e) = bins.try_reset_levels(levels) {
            inner.unreserve(live);
            return Err(FilterError::resource_exhausted(format!(
                "histogram with {levels} levels: {e}"
            )));
        }
        inner.note_growth(before, bins.capacity_bytes());
        drop(inner);

        Ok(ScopedHistogram {
            arena: self,
            bins,
            live,
        })
    }

    /// Full-size shadow of `seed`, initialised with a copy of its pixels so that anything the
    /// filter does not overwrite carries over unchanged.
    pub(crate) fn acquire_shadow<P: Pixel>(
        &self,
        seed: &PixelBuffer<P>,
    ) -> FilterResult<ScopedShadow<'_, P>> {
        let len = seed.pixels().len();
        let live = len.saturating_mul(size_of::<P>());
        let mut inner = self.lock();
        self.reserve_live(&mut inner, live, "shadow buffer")?;

        let mut pixels = match shadow_list(&mut inner, ShadowKey::of::<P>(len)).pop() {
            Some(boxed) => match boxed.downcast::<Vec<P>>() {
                Ok(v) => {
                    inner.note_reuse(vec_bytes(&*v));
                    *v
                }
                Err(_) => Vec::new(),
            },
            None => Vec::new(),
        };
        let before = vec_bytes(&pixels);
        pixels.clear();
        // Storage swapped out of a caller's buffer may have been over-allocated.
        pixels.shrink_to(len);
        if let Err(e) = pixels.try_reserve_exact(len) {
            inner.unreserve(live);
            return Err(FilterError::resource_exhausted(format!(
                "shadow buffer of {len} pixels: {e}"
            )));
        }
        inner.note_growth(before, vec_bytes(&pixels));
        drop(inner);

        pixels.extend_from_slice(seed.pixels());
        Ok(ScopedShadow {
            arena: self,
            pixels,
            width: seed.width(),
            height: seed.height(),
            live,
        })
    }

    fn release<T, K: Copy>(
        &self,
        item: T,
        capacity_bytes: usize,
        live: usize,
        key: K,
        free_list: fn(&mut Inner, K) -> &mut Vec<T>,
    ) {
        let mut inner = self.lock();
        inner.unreserve(live);

        let over_bytes =
            inner.stats.retained_bytes.saturating_add(capacity_bytes) > self.opts.max_pool_bytes;
        let over_count = free_list(&mut inner, key).len() >= self.opts.max_buffers_per_kind;
        if capacity_bytes == 0 || over_bytes || over_count {
            inner.stats.dropped_on_release = inner.stats.dropped_on_release.saturating_add(1);
            return;
        }

        free_list(&mut inner, key).push(item);
        inner.stats.retained_buffers = inner.stats.retained_buffers.saturating_add(1);
        inner.stats.retained_bytes = inner.stats.retained_bytes.saturating_add(capacity_bytes);
    }
}

/// Pooled row of colors; returned to the arena on drop.
pub(crate) struct ScopedRow<'a> {
    arena: &'a ScratchArena,
    buf: Vec<ColorVec>,
    live: usize,
}

impl Deref for ScopedRow<'_> {
    type Target = [ColorVec];

    fn deref(&self) -> &[ColorVec] {
        &self.buf
    }
}

impl DerefMut for ScopedRow<'_> {
    fn deref_mut(&mut self) -> &mut [ColorVec] {
        &mut self.buf
    }
}

impl Drop for ScopedRow<'_> {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        let bytes = vec_bytes(&buf);
        self.arena.release(buf, bytes, self.live, (), rows_list);
    }
}

/// Pooled histogram; returned to the arena on drop.
pub(crate) struct ScopedHistogram<'a> {
    arena: &'a ScratchArena,
    bins: HistogramBins,
    live: usize,
}

impl Deref for ScopedHistogram<'_> {
    type Target = HistogramBins;

    fn deref(&self) -> &HistogramBins {
        &self.bins
    }
}

impl DerefMut for ScopedHistogram<'_> {
    fn deref_mut(&mut self) -> &mut HistogramBins {
        &mut self.bins
    }
}

impl Drop for ScopedHistogram<'_> {
    fn drop(&mut self) {
        let bins = std::mem::take(&mut self.bins);
        let bytes = bins.capacity_bytes();
        self.arena.release(bins, bytes, self.live, (), histogram_list);
    }
}

/// Pooled full-frame shadow buffer; whatever storage it holds on drop goes back to the arena.
pub(crate) struct ScopedShadow<'a, P: Pixel> {
    arena: &'a ScratchArena,
    pixels: Vec<P>,
    width: u32,
    height: u32,
    live: usize,
}

impl<P: Pixel> ScopedShadow<'_, P> {
    pub(crate) fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [P] {
        &mut self.pixels
    }

    pub(crate) fn pixels(&self) -> &[P] {
        &self.pixels
    }

    /// Exchange backing storage with `other`. After the swap this guard owns (and will release)
    /// whatever `other` held.
    pub(crate) fn swap_storage(&mut self, other: &mut Vec<P>) {
        std::mem::swap(&mut self.pixels, other);
    }
}

impl<P: Pixel> Drop for ScopedShadow<'_, P> {
    fn drop(&mut self) {
        let pixels = std::mem::take(&mut self.pixels);
        let bytes = vec_bytes(&pixels);
        let key = ShadowKey::of::<P>(pixels.len());
        let boxed: Box<dyn Any + Send> = Box::new(pixels);
        self.arena.release(boxed, bytes, self.live, key, shadow_list);
    }
}

#[cfg(test)]
#[path = "../tests/unit/arena.rs"]
mod tests;
