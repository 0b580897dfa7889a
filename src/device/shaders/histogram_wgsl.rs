//! WGSL source for the histogram binning kernel.
//!
//! One entry point, `hist2`: each invocation maps its element into one of
//! `bin_count` equal-width bins over the computed `[min, max]` range
//! (`range = max - min + 1`) and atomically increments that bin.
//!
//! The guard is on the *unpadded* element count, so workgroup-alignment
//! padding never reaches a bin and the bin totals always sum to the original
//! element count. The computed index is clamped to `[0, bin_count - 1]`; a
//! value equal to `max` lands in the last bin, not one past it.

/// Histogram shader source (element type `i32`, `u32` bin counters).
pub const HISTOGRAM_SHADER: &str = r#"
struct HistParams {
    numel: u32,
    bin_count: u32,
    range: i32,
    min_val: i32,
}

@group(0) @binding(0) var<storage, read_write> src_vals: array<i32>;
@group(0) @binding(1) var<storage, read_write> bins: array<atomic<u32>>;
@group(0) @binding(2) var<uniform> params: HistParams;

@compute @workgroup_size(256)
fn hist2(@builtin(global_invocation_id) gid: vec3<u32>) {
    if (gid.x >= params.numel) {
        return;
    }

    let v = src_vals[gid.x];
    var idx: i32 = ((v - params.min_val) * i32(params.bin_count)) / params.range;
    idx = clamp(idx, 0, i32(params.bin_count) - 1i);

    atomicAdd(&bins[idx], 1u);
}
"#;
