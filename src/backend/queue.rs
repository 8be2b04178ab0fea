use super::caps::list_queue_families;
use super::{Backend, QueueFamilyDescriptor};

/// Queue family index for each role the renderer needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics_family: Option<u32>,
}

impl QueueFamilyIndices {
    /// True once every required role has a family
    pub fn is_valid(&self) -> bool {
        self.graphics_family.is_some()
    }

    /// Earliest family that can take graphics work; later families are not
    /// considered once one qualifies.
    pub fn from_families(families: &[QueueFamilyDescriptor]) -> Self {
        let graphics_family = families
            .iter()
            .position(QueueFamilyDescriptor::supports_graphics)
            .map(|index| index as u32);

        Self { graphics_family }
    }
}

pub fn find_queue_families<B: Backend>(
    backend: &B,
    instance: &B::Instance,
    physical_device: B::PhysicalDevice,
) -> QueueFamilyIndices {
    let families = list_queue_families(backend, instance, physical_device);
    QueueFamilyIndices::from_families(&families)
}
