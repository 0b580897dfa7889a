//! WGSL source for the tree-reduction kernels.
//!
//! Three entry points, one per statistic: `minVal`, `maxVal`, `sum`.
//!
//! Each workgroup cooperatively reduces its partition of the input through a
//! barrier-synchronized scratch array and writes exactly one partial to
//! `partials[workgroup_id]`. The kernel does NOT collapse across workgroups;
//! the host launches further passes over the partials until one element
//! remains. Lanes past `numel` load the operation's neutral element, so
//! later passes need no host-side re-padding.
//!
//! The neutral constants mirror `Reduction::neutral()` exactly: `i32::MAX`
//! for min, `i32::MIN` for max, `0` for sum.

/// Reduction shader source (element type `i32`).
pub const REDUCE_SHADER: &str = r#"
// ============================================================================
// Workgroup Configuration
// ============================================================================

const WORKGROUP_SIZE: u32 = 256u;

const MIN_NEUTRAL: i32 = 2147483647;
const MAX_NEUTRAL: i32 = -2147483648;
const SUM_NEUTRAL: i32 = 0;

// Shared memory for the per-workgroup tree reduction
var<workgroup> scratch: array<i32, 256>;

// ============================================================================
// Parameters
// ============================================================================

struct ReduceParams {
    numel: u32,
}

@group(0) @binding(0) var<storage, read_write> src_vals: array<i32>;
@group(0) @binding(1) var<storage, read_write> partials: array<i32>;
@group(0) @binding(2) var<uniform> params: ReduceParams;

// ============================================================================
// Minimum
// ============================================================================

@compute @workgroup_size(256)
fn minVal(@builtin(global_invocation_id) gid: vec3<u32>,
          @builtin(local_invocation_id) lid: vec3<u32>,
          @builtin(workgroup_id) wid: vec3<u32>) {
    let tid = lid.x;

    var v: i32 = MIN_NEUTRAL;
    if (gid.x < params.numel) {
        v = src_vals[gid.x];
    }
    scratch[tid] = v;
    workgroupBarrier();

    for (var s: u32 = WORKGROUP_SIZE / 2u; s > 0u; s = s >> 1u) {
        if (tid < s) {
            scratch[tid] = min(scratch[tid], scratch[tid + s]);
        }
        workgroupBarrier();
    }

    if (tid == 0u) {
        partials[wid.x] = scratch[0];
    }
}

// ============================================================================
// Maximum
// ============================================================================

@compute @workgroup_size(256)
fn maxVal(@builtin(global_invocation_id) gid: vec3<u32>,
          @builtin(local_invocation_id) lid: vec3<u32>,
          @builtin(workgroup_id) wid: vec3<u32>) {
    let tid = lid.x;

    var v: i32 = MAX_NEUTRAL;
    if (gid.x < params.numel) {
        v = src_vals[gid.x];
    }
    scratch[tid] = v;
    workgroupBarrier();

    for (var s: u32 = WORKGROUP_SIZE / 2u; s > 0u; s = s >> 1u) {
        if (tid < s) {
            scratch[tid] = max(scratch[tid], scratch[tid + s]);
        }
        workgroupBarrier();
    }

    if (tid == 0u) {
        partials[wid.x] = scratch[0];
    }
}

// ============================================================================
// Sum
// ============================================================================

@compute @workgroup_size(256)
fn sum(@builtin(global_invocation_id) gid: vec3<u32>,
       @builtin(local_invocation_id) lid: vec3<u32>,
       @builtin(workgroup_id) wid: vec3<u32>) {
    let tid = lid.x;

    var v: i32 = SUM_NEUTRAL;
    if (gid.x < params.numel) {
        v = src_vals[gid.x];
    }
    scratch[tid] = v;
    workgroupBarrier();

    for (var s: u32 = WORKGROUP_SIZE / 2u; s > 0u; s = s >> 1u) {
        if (tid < s) {
            scratch[tid] = scratch[tid] + scratch[tid + s];
        }
        workgroupBarrier();
    }

    if (tid == 0u) {
        partials[wid.x] = scratch[0];
    }
}
"#;
