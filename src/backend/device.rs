// Logical device creation
//
// One queue from the graphics family, no device extensions and the default
// (all-disabled) feature set. The device is only proof that the pipeline
// works; it does not request anything it would not use.

use ash::vk;
use std::mem::ManuallyDrop;
use std::sync::Arc;

use super::instance::OwnedInstance;
use super::{Backend, DeviceDesc, QueueFamilyIndices, RendererError};

/// Priority of the single graphics queue
const GRAPHICS_QUEUE_PRIORITY: f32 = 1.0;

/// Logical device handle released exactly once when dropped.
///
/// Must be dropped before the instance it was created from.
pub struct OwnedDevice<B: Backend> {
    backend: Arc<B>,
    handle: ManuallyDrop<B::Device>,
}

impl<B: Backend> OwnedDevice<B> {
    pub fn new(backend: Arc<B>, handle: B::Device) -> Self {
        Self {
            backend,
            handle: ManuallyDrop::new(handle),
        }
    }

    pub fn raw(&self) -> &B::Device {
        &self.handle
    }
}

impl<B: Backend> Drop for OwnedDevice<B> {
    fn drop(&mut self) {
        log::debug!("Destroying logical device");
        // SAFETY: the handle is never touched again after drop
        let handle = unsafe { ManuallyDrop::take(&mut self.handle) };
        self.backend.destroy_device(handle);
    }
}

/// Create the logical device and fetch queue 0 of the graphics family
pub fn create_logical_device<B: Backend>(
    instance: &OwnedInstance<B>,
    physical_device: B::PhysicalDevice,
    indices: &QueueFamilyIndices,
) -> Result<(OwnedDevice<B>, B::Queue), RendererError> {
    let Some(graphics_family) = indices.graphics_family else {
        return Err(RendererError::NoCompatibleDevice);
    };

    let desc = DeviceDesc {
        queue_family_index: graphics_family,
        queue_priorities: vec![GRAPHICS_QUEUE_PRIORITY],
        enabled_extensions: Vec::new(),
        enabled_features: vk::PhysicalDeviceFeatures::default(),
    };

    let backend = instance.backend();
    let handle = backend
        .create_device(instance.raw(), physical_device, &desc)
        .map_err(RendererError::DeviceCreationFailed)?;
    let device = OwnedDevice::new(Arc::clone(backend), handle);

    let graphics_queue = backend.device_queue(device.raw(), graphics_family, 0);
    log::info!(
        "Logical device created, graphics queue from family {}",
        graphics_family
    );

    Ok((device, graphics_queue))
}
