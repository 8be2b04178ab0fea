// Renderer facade
//
// Owns the instance and logical device and creates them in strict order:
// instance -> physical device -> logical device. The first failure aborts
// the sequence; anything already created is released on the way out.

use std::fmt;
use std::sync::Arc;

use super::device::{create_logical_device, OwnedDevice};
use super::instance::{create_instance, OwnedInstance};
use super::selector::select_physical_device;
use super::{Backend, QueueFamilyIndices, RendererError};

/// Settings the facade needs from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    pub app_name: String,
    pub engine_name: String,
    pub enable_diagnostics: bool,
    pub diagnostic_layer: String,
}

/// Construction progress of a renderer.
///
/// Only `Ready` is observable on a constructed `Renderer`. The intermediate
/// states and `Failed` exist while `Renderer::new` runs and show up in its
/// debug log; a failed construction is reported through `RendererError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    Uninitialized,
    InstanceReady,
    DeviceSelected,
    Ready,
    Failed,
}

impl fmt::Display for RendererState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RendererState::Uninitialized => "uninitialized",
            RendererState::InstanceReady => "instance ready",
            RendererState::DeviceSelected => "device selected",
            RendererState::Ready => "ready",
            RendererState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Vulkan instance + logical device + graphics queue.
///
/// IMPORTANT: Field order matters for Drop! The logical device is declared
/// before the instance so it is destroyed first.
pub struct Renderer<B: Backend> {
    graphics_queue: B::Queue,
    indices: QueueFamilyIndices,
    device: OwnedDevice<B>,
    physical_device: B::PhysicalDevice,
    instance: OwnedInstance<B>,
    state: RendererState,
}

impl<B: Backend> Renderer<B> {
    /// Run the full bring-up sequence.
    ///
    /// # Arguments
    /// * `backend` - Native API implementation
    /// * `required_extensions` - Instance extensions the window surface needs
    /// * `config` - Application identity and diagnostic settings
    pub fn new(
        backend: Arc<B>,
        required_extensions: &[String],
        config: &RendererConfig,
    ) -> Result<Self, RendererError> {
        let mut state = RendererState::Uninitialized;

        match Self::build(&backend, required_extensions, config, &mut state) {
            Ok(renderer) => {
                log::info!("Renderer {}", renderer.state);
                Ok(renderer)
            }
            Err(e) => {
                log::error!("Vulkan renderer failed to initialize: {}", e);
                Err(e)
            }
        }
    }

    fn build(
        backend: &Arc<B>,
        required_extensions: &[String],
        config: &RendererConfig,
        state: &mut RendererState,
    ) -> Result<Self, RendererError> {
        let instance = advance(state, RendererState::InstanceReady, || {
            create_instance(backend, required_extensions, config)
        })?;

        let (physical_device, indices) = advance(state, RendererState::DeviceSelected, || {
            select_physical_device(backend.as_ref(), instance.raw())
        })?;

        let (device, graphics_queue) = advance(state, RendererState::Ready, || {
            create_logical_device(&instance, physical_device, &indices)
        })?;

        Ok(Self {
            graphics_queue,
            indices,
            device,
            physical_device,
            instance,
            state: *state,
        })
    }

    /// Always `Ready`: a renderer only exists once construction succeeded
    pub fn state(&self) -> RendererState {
        self.state
    }

    pub fn graphics_queue(&self) -> B::Queue {
        self.graphics_queue
    }

    pub fn queue_family_indices(&self) -> QueueFamilyIndices {
        self.indices
    }

    pub fn device(&self) -> &B::Device {
        self.device.raw()
    }

    pub fn physical_device(&self) -> B::PhysicalDevice {
        self.physical_device
    }

    pub fn instance(&self) -> &B::Instance {
        self.instance.raw()
    }
}

impl<B: Backend> Drop for Renderer<B> {
    fn drop(&mut self) {
        log::info!("Cleaning up Vulkan resources...");
        // Fields drop next: device, then instance
    }
}

/// Attempt one transition; on failure the state becomes `Failed`
fn advance<T>(
    state: &mut RendererState,
    next: RendererState,
    step: impl FnOnce() -> Result<T, RendererError>,
) -> Result<T, RendererError> {
    match step() {
        Ok(value) => {
            log::debug!("Renderer state: {} -> {}", state, next);
            *state = next;
            Ok(value)
        }
        Err(e) => {
            log::debug!("Renderer state: {} -> {}", state, RendererState::Failed);
            *state = RendererState::Failed;
            Err(e)
        }
    }
}
