//! Adapter discovery and platform/device selection.

use wgpu::{Adapter, Backend};

use crate::error::{Error, Result};

/// Enumerate all adapters, grouped by backend in first-seen order.
///
/// Each group is one "platform"; the adapters inside it are its "devices".
async fn enumerate_platforms() -> Vec<(Backend, Vec<Adapter>)> {
    let instance = wgpu::Instance::default();
    let adapters: Vec<Adapter> = instance.enumerate_adapters(wgpu::Backends::all()).await;

    let mut groups: Vec<(Backend, Vec<Adapter>)> = Vec::new();
    for adapter in adapters {
        let backend = adapter.get_info().backend;
        match groups.iter_mut().find(|(b, _)| *b == backend) {
            Some((_, list)) => list.push(adapter),
            None => groups.push((backend, vec![adapter])),
        }
    }
    groups
}

/// Render all platforms and their devices as a listing for `-l`.
pub fn list_platforms_devices() -> Result<String> {
    let groups = pollster::block_on(enumerate_platforms());
    if groups.is_empty() {
        return Err(Error::Device("no GPU adapters found".into()));
    }

    let mut out = String::new();
    for (p, (backend, adapters)) in groups.iter().enumerate() {
        out.push_str(&format!("Platform {p}: {backend:?}\n"));
        for (d, adapter) in adapters.iter().enumerate() {
            let info = adapter.get_info();
            out.push_str(&format!("  Device {d}: {} ({:?})\n", info.name, info.device_type));
        }
    }
    Ok(out)
}

/// Select the adapter for a platform/device index pair.
///
/// Returns [`Error::AdapterSelection`] describing what exists when either
/// index is out of range.
pub fn select_adapter(platform: usize, device: usize) -> Result<Adapter> {
    let mut groups = pollster::block_on(enumerate_platforms());

    let available = groups
        .iter()
        .map(|(backend, adapters)| format!("{backend:?} x{}", adapters.len()))
        .collect::<Vec<_>>()
        .join(", ");
    let available = if available.is_empty() {
        "no adapters".to_string()
    } else {
        available
    };

    if platform >= groups.len() {
        return Err(Error::AdapterSelection {
            platform,
            device,
            available,
        });
    }
    let (_, adapters) = &mut groups[platform];
    if device >= adapters.len() {
        return Err(Error::AdapterSelection {
            platform,
            device,
            available,
        });
    }
    Ok(adapters.swap_remove(device))
}
