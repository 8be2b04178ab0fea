//! Device bring-up tests against a scripted backend (no GPU required)


use ash::vk;
use std::sync::Arc;

use self::fake::{Call, FakeBackend, FakeGpu, FakeQueue};
use super::{
    create_instance, create_logical_device, find_queue_families, select_physical_device, Backend,
    QueueFamilyDescriptor, QueueFamilyIndices, Renderer, RendererConfig, RendererError,
    RendererState,
};

const VALIDATION: &str = "VK_LAYER_KHRONOS_validation";

fn config(enable_diagnostics: bool) -> RendererConfig {
    RendererConfig {
        app_name: "Vulkan App".to_string(),
        engine_name: "no engine".to_string(),
        enable_diagnostics,
        diagnostic_layer: VALIDATION.to_string(),
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn graphics() -> QueueFamilyDescriptor {
    QueueFamilyDescriptor::new(1, vk::QueueFlags::GRAPHICS)
}

fn compute() -> QueueFamilyDescriptor {
    QueueFamilyDescriptor::new(1, vk::QueueFlags::COMPUTE)
}

mod queue_family_tests {
    use super::*;

    #[test]
    fn device_without_graphics_bit_has_invalid_indices() {
        let backend = FakeBackend::new().with_gpu(FakeGpu::new(
            "compute only",
            vec![
                compute(),
                QueueFamilyDescriptor::new(2, vk::QueueFlags::TRANSFER),
            ],
        ));
        let instance = backend.create_instance(&fake::desc()).unwrap();

        let indices = find_queue_families(&backend, &instance, 0);
        assert!(!indices.is_valid());
    }

    #[test]
    fn index_matches_enumeration_position() {
        let backend = FakeBackend::new().with_gpu(FakeGpu::new(
            "mixed",
            vec![compute(), compute(), graphics(), graphics()],
        ));
        let instance = backend.create_instance(&fake::desc()).unwrap();

        let indices = find_queue_families(&backend, &instance, 0);
        assert_eq!(indices.graphics_family, Some(2));
    }
}

mod selector_tests {
    use super::*;

    #[test]
    fn first_suitable_device_wins_regardless_of_later_ones() {
        for first_valid in 0..4 {
            let mut backend = FakeBackend::new();
            for i in 0..first_valid {
                backend = backend.with_gpu(FakeGpu::new(&format!("gpu{}", i), vec![compute()]));
            }
            for i in first_valid..5 {
                backend = backend.with_gpu(FakeGpu::new(&format!("gpu{}", i), vec![graphics()]));
            }
            let instance = backend.create_instance(&fake::desc()).unwrap();

            let (device, indices) = select_physical_device(&backend, &instance).unwrap();
            assert_eq!(device, first_valid);
            assert_eq!(indices.graphics_family, Some(0));
        }
    }

    #[test]
    fn every_candidate_is_described_even_after_a_match() {
        let backend = FakeBackend::new()
            .with_gpu(FakeGpu::new("graphics", vec![graphics()]))
            .with_gpu(FakeGpu::new("compute", vec![compute()]))
            .with_gpu(FakeGpu::new("graphics too", vec![graphics()]));
        let instance = backend.create_instance(&fake::desc()).unwrap();

        let (device, _) = select_physical_device(&backend, &instance).unwrap();
        assert_eq!(device, 0);
        assert_eq!(backend.device_info_queries(), vec![0, 1, 2]);
    }

    #[test]
    fn empty_device_list_is_no_compatible_device() {
        let backend = FakeBackend::new();
        let instance = backend.create_instance(&fake::desc()).unwrap();

        let result = select_physical_device(&backend, &instance);
        assert!(matches!(result, Err(RendererError::NoCompatibleDevice)));
    }

    #[test]
    fn no_graphics_anywhere_is_no_compatible_device() {
        let backend = FakeBackend::new()
            .with_gpu(FakeGpu::new("a", vec![compute()]))
            .with_gpu(FakeGpu::new("b", vec![]));
        let instance = backend.create_instance(&fake::desc()).unwrap();

        let result = select_physical_device(&backend, &instance);
        assert!(matches!(result, Err(RendererError::NoCompatibleDevice)));
    }

    #[test]
    fn scenario_second_device_second_family() {
        let backend = FakeBackend::new()
            .with_gpu(FakeGpu::new("no graphics", vec![compute()]))
            .with_gpu(FakeGpu::new("graphics at 1", vec![compute(), graphics()]));
        let instance = backend.create_instance(&fake::desc()).unwrap();

        let (device, indices) = select_physical_device(&backend, &instance).unwrap();
        assert_eq!(device, 1);
        assert_eq!(
            indices,
            QueueFamilyIndices {
                graphics_family: Some(1)
            }
        );
    }
}

mod instance_tests {
    use super::*;

    #[test]
    fn missing_extension_fails_without_creating_instance() {
        let backend = Arc::new(FakeBackend::new().with_extensions(&["A"]));

        let result = create_instance(&backend, &names(&["A", "B"]), &config(false));
        match result {
            Err(RendererError::UnsupportedExtension(name)) => assert_eq!(name, "B"),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("instance created with a missing extension"),
        }
        assert_eq!(backend.created_instances(), 0);
    }

    #[test]
    fn all_extensions_present_succeeds() {
        let backend = Arc::new(FakeBackend::new().with_extensions(&["A", "B", "C"]));

        let instance = create_instance(&backend, &names(&["A", "B"]), &config(false)).unwrap();
        assert_eq!(*instance.raw(), fake::FakeInstance(0));

        let desc = backend.last_instance_desc().unwrap();
        assert_eq!(desc.extensions, names(&["A", "B"]));
        assert!(desc.layers.is_empty());
    }

    #[test]
    fn extension_match_is_exact() {
        let backend = Arc::new(FakeBackend::new().with_extensions(&["VK_KHR_surface_ext", "vk_khr_surface"]));

        let result = create_instance(&backend, &names(&["VK_KHR_surface"]), &config(false));
        assert!(matches!(result, Err(RendererError::UnsupportedExtension(_))));
    }

    #[test]
    fn missing_layer_with_diagnostics_fails() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_extensions(&["A"])
                .with_layers(&["VK_LAYER_LUNARG_api_dump"]),
        );

        let result = create_instance(&backend, &names(&["A"]), &config(true));
        match result {
            Err(RendererError::UnsupportedLayer(name)) => assert_eq!(name, VALIDATION),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("instance created with a missing layer"),
        }
        assert_eq!(backend.created_instances(), 0);
    }

    #[test]
    fn layer_check_skipped_when_diagnostics_disabled() {
        let backend = Arc::new(FakeBackend::new().with_extensions(&["A"]));

        let instance = create_instance(&backend, &names(&["A"]), &config(false));
        assert!(instance.is_ok());
        assert_eq!(backend.layer_queries(), 0);
    }

    #[test]
    fn validation_layer_is_enabled_when_available() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_extensions(&["A"])
                .with_layers(&[VALIDATION]),
        );

        let _instance = create_instance(&backend, &names(&["A"]), &config(true)).unwrap();
        let desc = backend.last_instance_desc().unwrap();
        assert_eq!(desc.layers, names(&[VALIDATION]));
        assert_eq!(desc.extensions, names(&["A"]));
    }

    #[test]
    fn backend_rejection_is_instance_creation_failed() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_extensions(&["A"])
                .failing_instance(vk::Result::ERROR_INCOMPATIBLE_DRIVER),
        );

        let result = create_instance(&backend, &names(&["A"]), &config(false));
        assert!(matches!(
            result,
            Err(RendererError::InstanceCreationFailed(vk::Result::ERROR_INCOMPATIBLE_DRIVER))
        ));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn dropping_instance_destroys_it_once() {
        let backend = Arc::new(FakeBackend::new());
        let instance = create_instance(&backend, &[], &config(false)).unwrap();
        drop(instance);

        assert_eq!(
            backend.calls(),
            vec![
                Call::CreateInstance(fake::FakeInstance(0)),
                Call::DestroyInstance(fake::FakeInstance(0)),
            ]
        );
    }
}

mod device_tests {
    use super::*;

    #[test]
    fn requests_one_full_priority_queue_and_nothing_else() {
        let backend = Arc::new(
            FakeBackend::new().with_gpu(FakeGpu::new("gpu", vec![compute(), graphics()])),
        );
        let instance = create_instance(&backend, &[], &config(false)).unwrap();
        let indices = QueueFamilyIndices {
            graphics_family: Some(1),
        };

        let (_device, queue) = create_logical_device(&instance, 0, &indices).unwrap();
        assert_eq!(queue, FakeQueue { family: 1, index: 0 });

        let request = backend.last_device_request().unwrap();
        assert_eq!(request.physical_device, 0);
        assert_eq!(request.queue_family_index, 1);
        assert_eq!(request.queue_priorities, vec![1.0]);
        assert!(request.extensions.is_empty());
        assert!(request.features_all_disabled);
    }

    #[test]
    fn invalid_indices_are_rejected_before_the_backend() {
        let backend = Arc::new(FakeBackend::new().with_gpu(FakeGpu::new("gpu", vec![graphics()])));
        let instance = create_instance(&backend, &[], &config(false)).unwrap();

        let result = create_logical_device(&instance, 0, &QueueFamilyIndices::default());
        assert!(matches!(result, Err(RendererError::NoCompatibleDevice)));
        assert!(backend.last_device_request().is_none());
    }

    #[test]
    fn backend_rejection_is_device_creation_failed() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_gpu(FakeGpu::new("gpu", vec![graphics()]))
                .failing_device(vk::Result::ERROR_FEATURE_NOT_PRESENT),
        );
        let instance = create_instance(&backend, &[], &config(false)).unwrap();
        let indices = QueueFamilyIndices {
            graphics_family: Some(0),
        };

        let result = create_logical_device(&instance, 0, &indices);
        assert!(matches!(
            result,
            Err(RendererError::DeviceCreationFailed(vk::Result::ERROR_FEATURE_NOT_PRESENT))
        ));
    }
}

mod renderer_tests {
    use super::*;

    fn single_gpu_backend() -> FakeBackend {
        FakeBackend::new()
            .with_extensions(&["VK_KHR_surface", "VK_KHR_xcb_surface"])
            .with_gpu(FakeGpu::new("gpu", vec![graphics()]))
    }

    #[test]
    fn reaches_ready_with_queue_zero_of_family_zero() {
        let backend = Arc::new(single_gpu_backend());
        let required = names(&["VK_KHR_surface", "VK_KHR_xcb_surface"]);

        let renderer = Renderer::new(Arc::clone(&backend), &required, &config(false)).unwrap();
        assert_eq!(renderer.state(), RendererState::Ready);
        assert_eq!(renderer.graphics_queue(), FakeQueue { family: 0, index: 0 });
        assert_eq!(renderer.queue_family_indices().graphics_family, Some(0));
        assert_eq!(renderer.physical_device(), 0);
    }

    #[test]
    fn drop_destroys_device_before_instance() {
        let backend = Arc::new(single_gpu_backend());

        let renderer = Renderer::new(Arc::clone(&backend), &[], &config(false)).unwrap();
        let instance = *renderer.instance();
        let device = *renderer.device();
        drop(renderer);

        assert_eq!(
            backend.calls(),
            vec![
                Call::CreateInstance(instance),
                Call::CreateDevice(device),
                Call::DestroyDevice(device),
                Call::DestroyInstance(instance),
            ]
        );
    }

    #[test]
    fn failed_device_creation_releases_instance() {
        let backend = Arc::new(single_gpu_backend().failing_device(vk::Result::ERROR_DEVICE_LOST));

        let result = Renderer::new(Arc::clone(&backend), &[], &config(false));
        assert!(matches!(result, Err(RendererError::DeviceCreationFailed(_))));

        let instance = fake::FakeInstance(0);
        assert_eq!(
            backend.calls(),
            vec![Call::CreateInstance(instance), Call::DestroyInstance(instance)]
        );
    }

    #[test]
    fn failed_selection_releases_instance() {
        let backend = Arc::new(FakeBackend::new().with_gpu(FakeGpu::new("compute", vec![compute()])));

        let result = Renderer::new(Arc::clone(&backend), &[], &config(false));
        assert!(matches!(result, Err(RendererError::NoCompatibleDevice)));

        let instance = fake::FakeInstance(0);
        assert_eq!(
            backend.calls(),
            vec![Call::CreateInstance(instance), Call::DestroyInstance(instance)]
        );
    }

    #[test]
    fn failed_validation_creates_nothing() {
        let backend = Arc::new(single_gpu_backend());

        let result = Renderer::new(Arc::clone(&backend), &names(&["A", "B"]), &config(false));
        assert!(matches!(result, Err(RendererError::UnsupportedExtension(_))));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn diagnostics_without_layer_aborts_before_devices_are_touched() {
        let backend = Arc::new(single_gpu_backend());

        let result = Renderer::new(Arc::clone(&backend), &[], &config(true));
        assert!(matches!(result, Err(RendererError::UnsupportedLayer(_))));
        assert!(backend.calls().is_empty());
        assert_eq!(backend.device_enumerations(), 0);
    }

    #[test]
    fn state_names_are_readable() {
        assert_eq!(RendererState::DeviceSelected.to_string(), "device selected");
        assert_eq!(RendererState::Failed.to_string(), "failed");
    }
}
