// Vulkan backend - ash implementation of `Backend`
//
// Loads the Vulkan library at runtime and forwards every call to the
// driver. Query failures are logged and reported as empty lists.

use ash::{vk, Entry};
use std::ffi::{c_char, CString};

use super::{Backend, DeviceDesc, DeviceInfo, InstanceDesc, QueueFamilyDescriptor, RendererError};

pub struct AshBackend {
    entry: Entry,
}

impl AshBackend {
    /// Load the Vulkan library
    pub fn load() -> Result<Self, RendererError> {
        let entry = unsafe { Entry::load() }
            .map_err(|e| RendererError::LoaderUnavailable(e.to_string()))?;
        Ok(Self { entry })
    }
}

impl Backend for AshBackend {
    type Instance = ash::Instance;
    type PhysicalDevice = vk::PhysicalDevice;
    type Device = ash::Device;
    type Queue = vk::Queue;

    fn instance_extensions(&self) -> Vec<String> {
        match self.entry.enumerate_instance_extension_properties(None) {
            Ok(properties) => properties
                .iter()
                .map(|p| fixed_str(&p.extension_name))
                .collect(),
            Err(e) => {
                log::warn!("Failed to enumerate instance extensions: {}", e);
                Vec::new()
            }
        }
    }

    fn instance_layers(&self) -> Vec<String> {
        match self.entry.enumerate_instance_layer_properties() {
            Ok(properties) => properties
                .iter()
                .map(|p| fixed_str(&p.layer_name))
                .collect(),
            Err(e) => {
                log::warn!("Failed to enumerate instance layers: {}", e);
                Vec::new()
            }
        }
    }

    fn create_instance(&self, desc: &InstanceDesc) -> Result<ash::Instance, vk::Result> {
        let app_name = to_cstring(&desc.app_name)?;
        let engine_name = to_cstring(&desc.engine_name)?;

        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, 1, 0, 0))
            .engine_name(&engine_name)
            .engine_version(vk::make_api_version(0, 1, 0, 0))
            .api_version(vk::API_VERSION_1_3);

        let extensions = to_cstrings(&desc.extensions)?;
        let extension_ptrs = as_ptrs(&extensions);
        let layers = to_cstrings(&desc.layers)?;
        let layer_ptrs = as_ptrs(&layers);

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);

        unsafe { self.entry.create_instance(&create_info, None) }
    }

    fn destroy_instance(&self, instance: ash::Instance) {
        unsafe { instance.destroy_instance(None) };
    }

    fn enumerate_physical_devices(&self, instance: &ash::Instance) -> Vec<vk::PhysicalDevice> {
        match unsafe { instance.enumerate_physical_devices() } {
            Ok(devices) => devices,
            Err(e) => {
                log::warn!("Failed to enumerate physical devices: {}", e);
                Vec::new()
            }
        }
    }

    fn queue_families(
        &self,
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
    ) -> Vec<QueueFamilyDescriptor> {
        unsafe { instance.get_physical_device_queue_family_properties(physical_device) }
            .iter()
            .map(|props| QueueFamilyDescriptor::new(props.queue_count, props.queue_flags))
            .collect()
    }

    fn device_info(&self, instance: &ash::Instance, physical_device: vk::PhysicalDevice) -> DeviceInfo {
        let properties = unsafe { instance.get_physical_device_properties(physical_device) };
        DeviceInfo {
            name: fixed_str(&properties.device_name),
            device_type: properties.device_type,
            api_version: properties.api_version,
        }
    }

    fn create_device(
        &self,
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        desc: &DeviceDesc,
    ) -> Result<ash::Device, vk::Result> {
        let queue_create_info = vk::DeviceQueueCreateInfo::builder()
            .queue_family_index(desc.queue_family_index)
            .queue_priorities(&desc.queue_priorities)
            .build();

        let extensions = to_cstrings(&desc.enabled_extensions)?;
        let extension_ptrs = as_ptrs(&extensions);

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(std::slice::from_ref(&queue_create_info))
            .enabled_extension_names(&extension_ptrs)
            .enabled_features(&desc.enabled_features);

        unsafe { instance.create_device(physical_device, &create_info, None) }
    }

    fn device_queue(&self, device: &ash::Device, family_index: u32, queue_index: u32) -> vk::Queue {
        unsafe { device.get_device_queue(family_index, queue_index) }
    }

    fn destroy_device(&self, device: ash::Device) {
        unsafe {
            // Nothing has been submitted, but the device must be idle before destruction
            if let Err(e) = device.device_wait_idle() {
                log::warn!("device_wait_idle failed before destroy: {}", e);
            }
            device.destroy_device(None);
        }
    }
}

/// Name from a fixed-size, NUL-terminated driver string
fn fixed_str(raw: &[c_char]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn to_cstring(name: &str) -> Result<CString, vk::Result> {
    CString::new(name).map_err(|_| {
        log::error!("Name contains an interior NUL byte: {:?}", name);
        vk::Result::ERROR_INITIALIZATION_FAILED
    })
}

fn to_cstrings(names: &[String]) -> Result<Vec<CString>, vk::Result> {
    names.iter().map(|name| to_cstring(name)).collect()
}

fn as_ptrs(names: &[CString]) -> Vec<*const c_char> {
    names.iter().map(|name| name.as_ptr()).collect()
}
