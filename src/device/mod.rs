//! GPU device selection and buffer management.
//!
//! wgpu has no separate platform/device hierarchy the way OpenCL does, so
//! tempr groups adapters by backend (Vulkan, Metal, DX12, GL): the platform
//! index selects a backend group, the device index selects an adapter within
//! it. Out-of-range selections are fatal startup errors.

mod adapter;
mod client;
pub mod shaders;

pub use adapter::{list_platforms_devices, select_adapter};
pub use client::GpuClient;
