// Physical device selection
//
// First match in enumeration order. No scoring by device type or memory:
// the same machine always yields the same device.

use super::queue::find_queue_families;
use super::{Backend, QueueFamilyIndices, RendererError};

pub fn select_physical_device<B: Backend>(
    backend: &B,
    instance: &B::Instance,
) -> Result<(B::PhysicalDevice, QueueFamilyIndices), RendererError> {
    let devices = backend.enumerate_physical_devices(instance);
    if devices.is_empty() {
        log::error!("Can't find GPUs that support Vulkan");
        return Err(RendererError::NoCompatibleDevice);
    }

    log::info!("Found {} Vulkan-capable GPU(s)", devices.len());
    let infos: Vec<_> = devices
        .iter()
        .map(|&device| backend.device_info(instance, device))
        .collect();
    for (index, info) in infos.iter().enumerate() {
        log::info!("\tGPU {}: {}", index, info);
    }

    for (device, info) in devices.into_iter().zip(&infos) {
        let indices = find_queue_families(backend, instance, device);

        if indices.is_valid() {
            log::info!("Selected GPU: {}", info);
            return Ok((device, indices));
        }
        log::debug!("Skipping GPU without a graphics queue family: {}", info);
    }

    Err(RendererError::NoCompatibleDevice)
}
