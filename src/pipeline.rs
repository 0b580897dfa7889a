//! The four-stage statistics pipeline.
//!
//! Control flow: pad → upload → reduce (min, max, sum) → aggregate →
//! histogram → aggregate. The histogram stage is gated on the computed
//! minimum and maximum, so the stages are strictly sequential; every
//! dispatch blocks on device completion before the next begins.
//!
//! ## Reduction contract
//!
//! The reduction kernels emit one partial per workgroup. The host collapses
//! them by launching further passes over the partials until a single element
//! remains, then reads that scalar back. Every partials buffer is pre-filled
//! with the reduction's neutral element before its pass.

use crate::device::shaders::{
    launch_histogram, launch_reduce, workgroup_count, HistogramParams, ReduceParams,
    WORKGROUP_SIZE,
};
use crate::device::GpuClient;
use crate::error::{Error, Result};
use crate::padding::{pad_to_workgroup, Reduction};

const ELEM_SIZE: usize = std::mem::size_of::<i32>();

/// Largest input one dispatch can cover under wgpu's default
/// `max_compute_workgroups_per_dimension` limit (65535 workgroups).
const MAX_DISPATCH_ELEMS: usize = 65_535 * WORKGROUP_SIZE as usize;

/// Final output of one pipeline run.
///
/// `sum` is accumulated on the device in `i32` (matching the element type)
/// and widened on readback; datasets large enough to overflow a 32-bit sum
/// of temperatures are outside this pipeline's scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Original (unpadded) element count
    pub count: usize,
    /// Minimum temperature
    pub min: i32,
    /// Maximum temperature
    pub max: i32,
    /// Sum of all temperatures
    pub sum: i64,
    /// Average temperature, `sum / count` over the unpadded count
    pub average: f64,
    /// Histogram bin counts; the counts sum to `count`
    pub histogram: Vec<u32>,
}

/// Run the full pipeline over one in-memory dataset.
///
/// # Errors
///
/// Rejects an empty dataset, a zero bin count, and inputs beyond the
/// single-dispatch limit (65535 workgroups, ~16.7M elements) with
/// [`Error::InvalidArgument`]. Any device failure aborts the run; partial
/// statistics are never reported.
pub fn run(client: &GpuClient, values: &[i32], bin_count: u32) -> Result<Summary> {
    if values.is_empty() {
        return Err(Error::invalid_argument("values", "dataset is empty"));
    }
    if bin_count == 0 {
        return Err(Error::invalid_argument(
            "bin_count",
            "number of bins must be positive",
        ));
    }

    let count = values.len();

    let min = reduce_scalar(client, values, Reduction::Min)?;
    let max = reduce_scalar(client, values, Reduction::Max)?;
    let sum = reduce_scalar(client, values, Reduction::Sum)? as i64;
    let average = sum as f64 / count as f64;
    tracing::info!(min, max, average, "reductions complete");

    let histogram = histogram(client, values, bin_count, min, max)?;
    tracing::info!(bins = histogram.len(), "histogram complete");

    Ok(Summary {
        count,
        min,
        max,
        sum,
        average,
        histogram,
    })
}

/// Reduce a value sequence to one scalar on the device.
///
/// The input is padded to a workgroup multiple with the reduction's neutral
/// element; each pass collapses workgroup partitions into one partial per
/// workgroup until a single element remains.
///
/// An empty sequence has no reduction result and is rejected before any
/// device work, as is an input past the single-dispatch limit.
pub fn reduce_scalar(client: &GpuClient, values: &[i32], reduction: Reduction) -> Result<i32> {
    if values.is_empty() {
        return Err(Error::invalid_argument(
            "values",
            "cannot reduce an empty sequence",
        ));
    }
    ensure_dispatchable(values.len())?;

    let padded = pad_to_workgroup(values, WORKGROUP_SIZE as usize, reduction);

    let mut numel = padded.len();
    let mut input = client.create_storage_buffer(reduction.entry_point(), (numel * ELEM_SIZE) as u64);
    client.write_buffer(&input, &padded);

    loop {
        let groups = workgroup_count(numel) as usize;

        // One partial per workgroup; pre-filled with the neutral element so
        // a partially-written output still reduces correctly.
        let output = client.create_storage_buffer("partials", (groups * ELEM_SIZE) as u64);
        client.fill_i32(&output, reduction.neutral(), groups);

        let params = client.create_params_buffer(
            "reduce params",
            &ReduceParams {
                numel: numel as u32,
            },
        );

        launch_reduce(client, reduction, &input, &output, &params, numel)?;

        if groups == 1 {
            let result = client.read_buffer::<i32>(&output, 1)?;
            return Ok(result[0]);
        }

        input = output;
        numel = groups;
    }
}

/// Compute the histogram of `values` over `[min, max]` on the device.
///
/// Depends on the reduction results; must not run before both min and max
/// are available. An inverted range, a zero bin count, or a range/bin-count
/// combination whose index arithmetic would overflow the kernel's 32-bit
/// integers is rejected before dispatch.
pub fn histogram(
    client: &GpuClient,
    values: &[i32],
    bin_count: u32,
    min: i32,
    max: i32,
) -> Result<Vec<u32>> {
    let range = histogram_args(min, max, bin_count)?;
    ensure_dispatchable(values.len())?;
    let numel = values.len();

    let input = client.create_storage_buffer("hist input", (numel * ELEM_SIZE) as u64);
    client.write_buffer(&input, values);

    let bins = client.create_storage_buffer("hist bins", (bin_count as usize * 4) as u64);
    client.fill_i32(&bins, 0, bin_count as usize);

    let params = client.create_params_buffer(
        "hist params",
        &HistogramParams {
            numel: numel as u32,
            bin_count,
            range,
            min_val: min,
        },
    );

    launch_histogram(client, &input, &bins, &params, numel)?;

    client.read_buffer::<u32>(&bins, bin_count as usize)
}

/// Reject inputs too large for one compute dispatch.
fn ensure_dispatchable(numel: usize) -> Result<()> {
    if numel > MAX_DISPATCH_ELEMS {
        return Err(Error::invalid_argument(
            "values",
            format!("{numel} elements exceed the single-dispatch limit of {MAX_DISPATCH_ELEMS}"),
        ));
    }
    Ok(())
}

/// Validate histogram parameters and compute the value range.
///
/// Rejects a zero bin count, an inverted range, and any range/bin-count
/// combination where `(max - min) * bin_count` would not fit in the
/// kernel's 32-bit index arithmetic.
fn histogram_args(min: i32, max: i32, bin_count: u32) -> Result<i32> {
    if bin_count == 0 {
        return Err(Error::invalid_argument(
            "bin_count",
            "number of bins must be positive",
        ));
    }
    if min > max {
        return Err(Error::invalid_argument(
            "range",
            format!("minimum {min} exceeds maximum {max}"),
        ));
    }

    let range = (max as i64 - min as i64) + 1;
    let worst_product = (range - 1) * bin_count as i64;
    if range > i32::MAX as i64 || worst_product > i32::MAX as i64 {
        return Err(Error::invalid_argument(
            "range",
            format!(
                "range {range} with {bin_count} bins overflows 32-bit bin index arithmetic"
            ),
        ));
    }

    Ok(range as i32)
}

/// Host-side mirror of the kernel's bin mapping.
///
/// `floor((value - min) * bin_count / range)` clamped to
/// `[0, bin_count - 1]`. Used by tests and for rendering bin labels.
///
/// The product is widened to `i64` here, while the kernel computes it in
/// `i32`; the two agree because [`histogram`] rejects parameter
/// combinations whose products exceed `i32::MAX` before dispatch.
pub fn bin_index(value: i32, min: i32, bin_count: u32, range: i32) -> usize {
    let idx = ((value - min) as i64 * bin_count as i64) / range as i64;
    idx.clamp(0, bin_count as i64 - 1) as usize
}

/// Half-open value interval covered by one histogram bin.
///
/// Bin `b` covers `[min + b*range/bin_count, min + (b+1)*range/bin_count)`,
/// with the last bin closed at `max`.
pub fn bin_bounds(bin: usize, min: i32, bin_count: u32, range: i32) -> (i32, i32) {
    let lo = min + ((bin as i64 * range as i64) / bin_count as i64) as i32;
    let hi = min + (((bin as i64 + 1) * range as i64) / bin_count as i64) as i32;
    (lo, hi)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_index_boundaries() {
        // min maps to bin 0, max maps to the last bin, never bin_count.
        let (min, max, bins) = (-10, 9, 20u32);
        let range = max - min + 1;
        assert_eq!(bin_index(min, min, bins, range), 0);
        assert_eq!(bin_index(max, min, bins, range), bins as usize - 1);
    }

    #[test]
    fn test_bin_index_full_coverage() {
        // Every value in [min, max] maps to exactly one bin in range.
        let (min, max, bins) = (-10, 9, 20u32);
        let range = max - min + 1;
        for v in min..=max {
            let b = bin_index(v, min, bins, range);
            assert!(b < bins as usize, "value {v} escaped to bin {b}");
        }
    }

    #[test]
    fn test_bin_index_single_bin() {
        let range = 5 - (-5) + 1;
        for v in -5..=5 {
            assert_eq!(bin_index(v, -5, 1, range), 0);
        }
    }

    #[test]
    fn test_histogram_args_validation() {
        assert_eq!(histogram_args(-10, 9, 20).unwrap(), 20);
        // min == max collapses to a range of 1
        assert_eq!(histogram_args(7, 7, 5).unwrap(), 1);

        // Inverted range is rejected, not asserted away.
        assert!(matches!(
            histogram_args(10, 2, 5).unwrap_err(),
            Error::InvalidArgument { arg: "range", .. }
        ));
        assert!(matches!(
            histogram_args(0, 10, 0).unwrap_err(),
            Error::InvalidArgument { arg: "bin_count", .. }
        ));
        // (max - min) * bin_count past i32::MAX would wrap in the kernel.
        assert!(matches!(
            histogram_args(i32::MIN, i32::MAX, 2).unwrap_err(),
            Error::InvalidArgument { arg: "range", .. }
        ));
        assert!(matches!(
            histogram_args(0, i32::MAX - 1, 2).unwrap_err(),
            Error::InvalidArgument { arg: "range", .. }
        ));
    }

    #[test]
    fn test_dispatch_limit() {
        assert!(ensure_dispatchable(1).is_ok());
        assert!(ensure_dispatchable(MAX_DISPATCH_ELEMS).is_ok());
        assert!(matches!(
            ensure_dispatchable(MAX_DISPATCH_ELEMS + 1).unwrap_err(),
            Error::InvalidArgument { arg: "values", .. }
        ));
    }

    #[test]
    fn test_bin_bounds_tile_range() {
        let (min, max, bins) = (-10, 9, 4u32);
        let range = max - min + 1;
        let mut expected_lo = min;
        for b in 0..bins as usize {
            let (lo, hi) = bin_bounds(b, min, bins, range);
            assert_eq!(lo, expected_lo);
            assert!(hi > lo);
            expected_lo = hi;
        }
        assert_eq!(expected_lo, max + 1);
    }
}
