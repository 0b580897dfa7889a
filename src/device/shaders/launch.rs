//! Kernel launchers for the reduction and histogram shaders.
//!
//! Each launcher assembles the pipeline and bind group from the cache,
//! encodes one compute pass, and blocks until the device has executed it
//! (the pipeline's stages are strictly sequential).

use wgpu::Buffer;

use super::{workgroup_count, LayoutKey, WORKGROUP_SIZE};
use crate::device::GpuClient;
use crate::error::Result;
use crate::padding::Reduction;

/// Parameters for the reduction kernels. Must match the WGSL struct.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ReduceParams {
    /// Number of valid input elements; lanes past this load the neutral
    pub numel: u32,
}

/// Parameters for the histogram kernel. Must match the WGSL struct.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HistogramParams {
    /// Number of valid (unpadded) input elements
    pub numel: u32,
    /// Number of equal-width bins, >= 1
    pub bin_count: u32,
    /// Value range, `max - min + 1`
    pub range: i32,
    /// Minimum value (left edge of bin 0)
    pub min_val: i32,
}

/// Launch one reduction pass.
///
/// Dispatches `ceil(numel / W)` workgroups of size `W` over `input`; each
/// workgroup writes one partial to `output[workgroup_id]`. Blocks until the
/// pass completes.
pub fn launch_reduce(
    client: &GpuClient,
    reduction: Reduction,
    input: &Buffer,
    output: &Buffer,
    params: &Buffer,
    numel: usize,
) -> Result<()> {
    let cache = client.pipeline_cache();
    let entry_point = reduction.entry_point();

    let module = cache.get_or_create_module("reduce", super::REDUCE_SHADER)?;
    let layout = cache.get_or_create_layout(LayoutKey {
        num_storage_buffers: 2,
        num_uniform_buffers: 1,
    });
    let pipeline = cache.get_or_create_pipeline("reduce", entry_point, &module, &layout);

    let bind_group = cache.create_bind_group(&layout, &[input, output, params]);

    let groups = workgroup_count(numel);
    tracing::debug!(op = entry_point, numel, groups, local = WORKGROUP_SIZE, "dispatch reduction");

    let mut encoder = client
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some(entry_point),
        });
    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some(entry_point),
            timestamp_writes: None,
        });
        pass.set_pipeline(&pipeline);
        pass.set_bind_group(0, Some(&bind_group), &[]);
        pass.dispatch_workgroups(groups, 1, 1);
    }
    client.submit_and_wait(encoder)
}

/// Launch the histogram kernel.
///
/// Covers `ceil(numel / W)` full workgroups; the in-kernel guard on the
/// unpadded count keeps padding out of the bins. Blocks until the pass
/// completes.
pub fn launch_histogram(
    client: &GpuClient,
    input: &Buffer,
    bins: &Buffer,
    params: &Buffer,
    numel: usize,
) -> Result<()> {
    let cache = client.pipeline_cache();

    let module = cache.get_or_create_module("histogram", super::HISTOGRAM_SHADER)?;
    let layout = cache.get_or_create_layout(LayoutKey {
        num_storage_buffers: 2,
        num_uniform_buffers: 1,
    });
    let pipeline = cache.get_or_create_pipeline("histogram", "hist2", &module, &layout);

    let bind_group = cache.create_bind_group(&layout, &[input, bins, params]);

    let groups = workgroup_count(numel);
    tracing::debug!(numel, groups, local = WORKGROUP_SIZE, "dispatch histogram");

    let mut encoder = client
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("hist2"),
        });
    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("hist2"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&pipeline);
        pass.set_bind_group(0, Some(&bind_group), &[]);
        pass.dispatch_workgroups(groups, 1, 1);
    }
    client.submit_and_wait(encoder)
}
