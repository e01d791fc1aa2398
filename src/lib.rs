//! impasto is a parallel, memory-bounded pixel-neighborhood filtering engine.
//!
//! Its filter is a histogram "oil painting" effect: every output pixel takes the mean color of
//! the most populated intensity bucket in a square, edge-clamped window around it, keeping its
//! own alpha. The engine:
//!
//! - splits the target rectangle into row ranges, one per rayon worker
//! - gives each range pooled scratch (a staging row and its own histogram) from a shared arena
//! - writes results into a full-size shadow buffer
//! - swaps the shadow into the caller's [`PixelBuffer`] only once every range has succeeded
//!
//! ```no_run
//! use impasto::{EngineOpts, FilterParameters, OilPaintEngine, PixelBuffer, Rgba8};
//!
//! # fn main() -> impasto::FilterResult<()> {
//! let mut buf = PixelBuffer::filled(64, 64, Rgba8::new(200, 40, 40, 255))?;
//! let params = FilterParameters::for_buffer(5, 20, &buf)?;
//! let engine = OilPaintEngine::new(EngineOpts::default())?;
//! engine.apply_full(&mut buf, &params)?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod arena;
pub mod buffer;
pub mod engine;
pub(crate) mod histogram;
pub(crate) mod kernel;
pub mod params;
pub(crate) mod partition;
pub(crate) mod publish;
pub(crate) mod sampler;

pub use crate::arena::{ArenaOpts, ArenaStats};
pub use crate::buffer::PixelBuffer;
pub use crate::engine::{EngineOpts, FilterStats, OilPaintEngine, oil_paint};
pub use crate::foundation::core::{ColorVec, Pixel, Rect, Rgba8};
pub use crate::foundation::error::{FilterError, FilterResult};
pub use crate::params::FilterParameters;
