//! # tempr
//!
//! **GPU-accelerated descriptive statistics for large univariate datasets.**
//!
//! tempr computes minimum, maximum, average, and an N-bin histogram over a
//! dataset of integer temperature readings using data-parallel reduction and
//! binning kernels dispatched through [wgpu].
//!
//! ## Pipeline
//!
//! A run is a fixed four-stage computation over one in-memory dataset:
//!
//! 1. The input is padded to a workgroup-aligned length with per-reduction
//!    neutral elements ([`padding`]).
//! 2. Device buffers are allocated, written, and pre-filled with neutral
//!    elements ([`device`]).
//! 3. Tree-reduction kernels produce the minimum, maximum, and sum; a binning
//!    kernel derives the histogram from the computed `[min, max]` range
//!    ([`pipeline`]).
//! 4. Scalars and bin counts are read back and the average is derived from
//!    the sum and the *unpadded* element count.
//!
//! Every stage blocks on device completion before the next begins; there is
//! no host-side concurrency between stages.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tempr::device::GpuClient;
//! use tempr::pipeline;
//!
//! let client = GpuClient::new(0, 0)?;
//! let readings: Vec<i32> = vec![5, -3, 8, 12];
//! let summary = pipeline::run(&client, &readings, 20)?;
//! println!("min {} max {} avg {}", summary.min, summary.max, summary.average);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dataset;
pub mod device;
pub mod error;
pub mod padding;
pub mod pipeline;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dataset::{load_readings, Reading};
    pub use crate::device::GpuClient;
    pub use crate::error::{Error, Result};
    pub use crate::padding::Reduction;
    pub use crate::pipeline::{run, Summary};
}
