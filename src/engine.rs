//! Parallel oil-paint engine: partition, filter into a shadow, publish.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::arena::{ArenaOpts, ArenaStats, ScratchArena};
use crate::buffer::PixelBuffer;
use crate::foundation::core::{Pixel, Rect};
use crate::foundation::error::{FilterError, FilterResult};
use crate::kernel::filter_range;
use crate::params::FilterParameters;
use crate::partition::{RowRange, partition_rows};
use crate::publish::publish;
use crate::sampler::NeighborhoodSampler;

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOpts {
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Smallest row range worth giving its own worker.
    pub min_rows_per_partition: usize,
    /// Scratch arena retention limits.
    pub arena: ArenaOpts,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            threads: None,
            min_rows_per_partition: 8,
            arena: ArenaOpts::default(),
        }
    }
}

impl EngineOpts {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(s: &str) -> FilterResult<Self> {
        let opts: Self = serde_json::from_str(s).map_err(|e| FilterError::serde(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check option ranges.
    pub fn validate(&self) -> FilterResult<()> {
        if self.threads == Some(0) {
            return Err(FilterError::validation(
                "engine 'threads' must be >= 1 when set",
            ));
        }
        if self.min_rows_per_partition == 0 {
            return Err(FilterError::validation(
                "engine 'min_rows_per_partition' must be >= 1",
            ));
        }
        Ok(())
    }
}

/// Counters from one filter invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Row ranges the rectangle was split into.
    pub partitions: usize,
    /// Output pixels computed.
    pub pixels_written: u64,
}

/// Histogram oil-paint filter running on a dedicated rayon pool with pooled scratch memory.
///
/// One engine can be reused across many invocations and buffers; scratch buffers are recycled
/// between calls.
pub struct OilPaintEngine {
    opts: EngineOpts,
    pool: rayon::ThreadPool,
    arena: ScratchArena,
}

impl OilPaintEngine {
    /// Validate `opts` and build the worker pool.
    pub fn new(opts: EngineOpts) -> FilterResult<Self> {
        opts.validate()?;
        let pool = build_thread_pool(opts.threads)?;
        let arena = ScratchArena::new(opts.arena);
        Ok(Self { opts, pool, arena })
    }

    /// Options this engine was built with.
    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    /// Worker threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Snapshot of the scratch arena counters.
    pub fn arena_stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    /// Filter `rect` of `buffer` in place.
    pub fn apply<P: Pixel>(
        &self,
        buffer: &mut PixelBuffer<P>,
        rect: Rect,
        params: &FilterParameters,
    ) -> FilterResult<()> {
        self.apply_with_stats(buffer, rect, params).map(|_| ())
    }

    /// Filter the whole of `buffer` in place.
    pub fn apply_full<P: Pixel>(
        &self,
        buffer: &mut PixelBuffer<P>,
        params: &FilterParameters,
    ) -> FilterResult<()> {
        let rect = buffer.bounds();
        self.apply(buffer, rect, params)
    }

    /// Filter `rect` of `buffer` in place and report what was done.
    ///
    /// Parameters and `rect` are checked before anything is allocated. On any error the buffer is
    /// left exactly as it was; on success every pixel of `rect` is replaced at once and pixels
    /// outside `rect` are unchanged.
    #[tracing::instrument(
        skip(self, buffer, params),
        fields(
            width = buffer.width(),
            height = buffer.height(),
            window = params.window_size(),
            levels = params.quantization_levels(),
        )
    )]
    pub fn apply_with_stats<P: Pixel>(
        &self,
        buffer: &mut PixelBuffer<P>,
        rect: Rect,
        params: &FilterParameters,
    ) -> FilterResult<FilterStats> {
        params.check_dimensions(buffer.width(), buffer.height())?;
        rect.validate_within(buffer.width(), buffer.height())?;
        if rect.is_empty() {
            return Ok(FilterStats::default());
        }

        let plan = partition_rows(rect, self.threads(), self.opts.min_rows_per_partition);
        debug!(partitions = plan.len(), "row plan");

        let mut shadow = self.arena.acquire_shadow(buffer)?;
        let width = buffer.width() as usize;
        let sampler = NeighborhoodSampler::new(buffer, params);

        let rows_start = rect.y as usize * width;
        let rows_end = rect.bottom() as usize * width;
        let mut rest = &mut shadow.pixels_mut()[rows_start..rows_end];
        let mut jobs = Vec::<(RowRange, &mut [P])>::with_capacity(plan.len());
        for &range in &plan {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * width);
            jobs.push((range, head));
            rest = tail;
        }

        let levels = params.quantization_levels() as usize;
        let pixels_written = self.pool.install(|| {
            jobs.into_par_iter()
                .map(|(range, rows)| {
                    trace!(
                        min_row = range.min_row,
                        max_row = range.max_row,
                        "row range"
                    );
                    let mut staging = self.arena.acquire_row(rect.width as usize)?;
                    let mut bins = self.arena.acquire_histogram(levels)?;
                    filter_range(&sampler, rect, range, rows, &mut staging, &mut bins)
                })
                .try_reduce(|| 0, |a, b| Ok(a + b))
        })?;

        publish(buffer, shadow)?;
        Ok(FilterStats {
            partitions: plan.len(),
            pixels_written,
        })
    }
}

/// Filter `rect` of `buffer` in place with a one-off engine built from default options.
///
/// Every call builds and tears down its own rayon thread pool and scratch arena, so nothing is
/// pooled between calls. Hold an [`OilPaintEngine`] when filtering repeatedly.
pub fn oil_paint<P: Pixel>(
    buffer: &mut PixelBuffer<P>,
    rect: Rect,
    window_size: u32,
    quantization_levels: u32,
) -> FilterResult<()> {
    let params = FilterParameters::for_buffer(window_size, quantization_levels, buffer)?;
    OilPaintEngine::new(EngineOpts::default())?.apply(buffer, rect, &params)
}

fn build_thread_pool(threads: Option<usize>) -> FilterResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("impasto-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| FilterError::worker(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
