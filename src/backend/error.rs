use ash::vk;

/// Everything that can stop the device bring-up sequence
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Vulkan loader unavailable: {0}")]
    LoaderUnavailable(String),

    #[error("Validation layer requested, but not available: {0}")]
    UnsupportedLayer(String),

    #[error("Instance does not support required extension: {0}")]
    UnsupportedExtension(String),

    #[error("Failed to create Vulkan instance: {0}")]
    InstanceCreationFailed(vk::Result),

    #[error("No GPU with a graphics-capable queue family")]
    NoCompatibleDevice,

    #[error("Failed to create logical device: {0}")]
    DeviceCreationFailed(vk::Result),
}
