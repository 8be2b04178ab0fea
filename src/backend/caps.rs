// Capability queries
//
// Read-only queries against the backend. Order of the returned lists is the
// driver's enumeration order; queue family positions are the indices used
// everywhere else as `graphics_family`.

use super::{Backend, QueueFamilyDescriptor};

pub fn list_instance_extensions<B: Backend>(backend: &B) -> Vec<String> {
    let extensions = backend.instance_extensions();
    log::info!("Instance supports {} extensions", extensions.len());
    for name in &extensions {
        log::debug!("\t{}", name);
    }
    extensions
}

pub fn list_instance_layers<B: Backend>(backend: &B) -> Vec<String> {
    let layers = backend.instance_layers();
    log::debug!("Instance supports {} layers", layers.len());
    for name in &layers {
        log::debug!("\t{}", name);
    }
    layers
}

pub fn list_queue_families<B: Backend>(
    backend: &B,
    instance: &B::Instance,
    physical_device: B::PhysicalDevice,
) -> Vec<QueueFamilyDescriptor> {
    backend.queue_families(instance, physical_device)
}

/// First name in `required` with no exact match in `available`.
///
/// Comparison is exact and case-sensitive; a prefix or substring of an
/// available name does not count.
pub fn first_missing<'a, R, A>(required: &'a [R], available: &[A]) -> Option<&'a str>
where
    R: AsRef<str>,
    A: AsRef<str>,
{
    required
        .iter()
        .map(AsRef::<str>::as_ref)
        .find(|name| !available.iter().any(|have| AsRef::<str>::as_ref(have) == *name))
}
