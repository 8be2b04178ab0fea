// Instance creation
//
// Validates the requested layers and extensions against what the loader
// reports, then creates the instance. Nothing is created unless every
// check passes.

use std::mem::ManuallyDrop;
use std::sync::Arc;

use super::caps::{first_missing, list_instance_extensions, list_instance_layers};
use super::{Backend, RendererConfig, RendererError};

/// Everything the backend needs to create an instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDesc {
    pub app_name: String,
    pub engine_name: String,
    pub extensions: Vec<String>,
    pub layers: Vec<String>,
}

/// Instance handle released exactly once when dropped
pub struct OwnedInstance<B: Backend> {
    backend: Arc<B>,
    handle: ManuallyDrop<B::Instance>,
}

impl<B: Backend> OwnedInstance<B> {
    pub fn new(backend: Arc<B>, handle: B::Instance) -> Self {
        Self {
            backend,
            handle: ManuallyDrop::new(handle),
        }
    }

    pub fn raw(&self) -> &B::Instance {
        &self.handle
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }
}

impl<B: Backend> Drop for OwnedInstance<B> {
    fn drop(&mut self) {
        log::debug!("Destroying Vulkan instance");
        // SAFETY: the handle is never touched again after drop
        let handle = unsafe { ManuallyDrop::take(&mut self.handle) };
        self.backend.destroy_instance(handle);
    }
}

/// Create the instance with the window's required extensions and, when
/// diagnostics are enabled, the configured validation layer.
///
/// No extensions beyond `required_extensions` are requested.
pub fn create_instance<B: Backend>(
    backend: &Arc<B>,
    required_extensions: &[String],
    config: &RendererConfig,
) -> Result<OwnedInstance<B>, RendererError> {
    let layers = if config.enable_diagnostics {
        let available = list_instance_layers(backend.as_ref());
        let wanted = [config.diagnostic_layer.clone()];
        if let Some(missing) = first_missing(&wanted, &available) {
            return Err(RendererError::UnsupportedLayer(missing.to_string()));
        }
        log::info!("Enabling validation layer {}", config.diagnostic_layer);
        wanted.to_vec()
    } else {
        Vec::new()
    };

    let available = list_instance_extensions(backend.as_ref());
    if let Some(missing) = first_missing(required_extensions, &available) {
        return Err(RendererError::UnsupportedExtension(missing.to_string()));
    }

    let desc = InstanceDesc {
        app_name: config.app_name.clone(),
        engine_name: config.engine_name.clone(),
        extensions: required_extensions.to_vec(),
        layers,
    };
    log::debug!("Instance extensions: {:?}", desc.extensions);

    let handle = backend
        .create_instance(&desc)
        .map_err(RendererError::InstanceCreationFailed)?;

    log::info!("Vulkan instance created");
    Ok(OwnedInstance::new(Arc::clone(backend), handle))
}
