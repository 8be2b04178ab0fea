// Backend module - Vulkan device bring-up
//
// Design: every native call goes through the `Backend` trait so the
// bring-up logic (capability queries, selection, ordered creation) runs unchanged
// against the real driver or a scripted fake.

pub mod device;
pub mod error;
pub mod instance;
pub mod caps;
pub mod queue;
pub mod renderer;
pub mod selector;
pub mod vulkan;

#[cfg(test)]
mod tests;

use ash::vk;
use std::fmt;

pub use device::{create_logical_device, OwnedDevice};
pub use error::RendererError;
pub use instance::{create_instance, InstanceDesc, OwnedInstance};
pub use queue::{find_queue_families, QueueFamilyIndices};
pub use renderer::{Renderer, RendererConfig, RendererState};
pub use selector::select_physical_device;
pub use vulkan::AshBackend;

/// Capabilities of one queue family, in driver enumeration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyDescriptor {
    pub queue_count: u32,
    pub flags: vk::QueueFlags,
}

impl QueueFamilyDescriptor {
    pub fn new(queue_count: u32, flags: vk::QueueFlags) -> Self {
        Self { queue_count, flags }
    }

    /// True if the family has at least one queue that accepts graphics work
    pub fn supports_graphics(&self) -> bool {
        self.queue_count > 0 && self.flags.contains(vk::QueueFlags::GRAPHICS)
    }
}

/// Human-readable description of a physical device (logging only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
    pub api_version: u32,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:?}, Vulkan {}.{}.{})",
            self.name,
            self.device_type,
            vk::api_version_major(self.api_version),
            vk::api_version_minor(self.api_version),
            vk::api_version_patch(self.api_version),
        )
    }
}

/// Logical device request: one queue family, one queue per entry
#[derive(Debug, Clone)]
pub struct DeviceDesc {
    pub queue_family_index: u32,
    pub queue_priorities: Vec<f32>,
    pub enabled_extensions: Vec<String>,
    pub enabled_features: vk::PhysicalDeviceFeatures,
}

/// Native graphics API surface used during device bring-up.
///
/// Queries never fail from the caller's point of view: an implementation
/// that cannot enumerate something reports an empty list. Creation calls
/// return the raw `vk::Result` so the caller can classify the failure.
pub trait Backend {
    type Instance;
    type PhysicalDevice: Copy + PartialEq + fmt::Debug;
    type Device;
    type Queue: Copy + fmt::Debug;

    fn instance_extensions(&self) -> Vec<String>;
    fn instance_layers(&self) -> Vec<String>;
    fn create_instance(&self, desc: &InstanceDesc) -> Result<Self::Instance, vk::Result>;
    fn destroy_instance(&self, instance: Self::Instance);

    fn enumerate_physical_devices(&self, instance: &Self::Instance) -> Vec<Self::PhysicalDevice>;
    fn queue_families(
        &self,
        instance: &Self::Instance,
        physical_device: Self::PhysicalDevice,
    ) -> Vec<QueueFamilyDescriptor>;
    fn device_info(
        &self,
        instance: &Self::Instance,
        physical_device: Self::PhysicalDevice,
    ) -> DeviceInfo;

    fn create_device(
        &self,
        instance: &Self::Instance,
        physical_device: Self::PhysicalDevice,
        desc: &DeviceDesc,
    ) -> Result<Self::Device, vk::Result>;
    fn device_queue(&self, device: &Self::Device, family_index: u32, queue_index: u32) -> Self::Queue;
    fn destroy_device(&self, device: Self::Device);
}
