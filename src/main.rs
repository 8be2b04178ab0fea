// =============================================================================
// VULKAN DEVICE BRING-UP
// =============================================================================
//
// Opens a window, creates a Vulkan instance, picks the first GPU with a
// graphics queue family and creates a logical device on it.
//
// ARCHITECTURE OVERVIEW:
// ┌─────────────────────────────────────────────────────────────────┐
// │  App (winit event loop)                                         │
// │    ├── WindowContext (window + required surface extensions)     │
// │    └── Renderer                                                 │
// │          ├── Instance (validated extensions/layers)             │
// │          ├── Physical device (first with a graphics family)     │
// │          └── Logical device + graphics queue                    │
// └─────────────────────────────────────────────────────────────────┘
//
// =============================================================================

use anyhow::{Context, Result};
use std::sync::Arc;
use vk_bootstrap::backend::{AshBackend, Renderer};
use vk_bootstrap::config::Config;
use vk_bootstrap::window::WindowContext;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
};

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    let (config, load_error) = Config::load();
    init_logging(&config);
    if let Some(e) = load_error {
        log::warn!("Failed to load config.toml: {:#}. Using defaults.", e);
    }
    log::info!("Starting Vulkan device bring-up");

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    // A renderer that failed to initialize is fatal
    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Initialize logging; `RUST_LOG` overrides the configured level
fn init_logging(config: &Config) {
    let level = config.log_level();
    env_logger::Builder::new()
        .filter_level(level.unwrap_or(log::LevelFilter::Info))
        .parse_default_env()
        .init();

    if level.is_none() {
        log::warn!(
            "Unknown log level '{}', defaulting to info",
            config.debug.log_level
        );
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// IMPORTANT: Field order matters for Drop! The renderer is declared before
/// the window so the device and instance go away while the window is alive.
struct App {
    config: Config,
    renderer: Option<Renderer<AshBackend>>,
    window: Option<WindowContext>,
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            config,
            renderer: None,
            window: None,
            init_error: None,
        }
    }

    fn init_vulkan(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = WindowContext::create(event_loop, &self.config.window)?;

        let backend = Arc::new(
            AshBackend::load().context("Failed to load Vulkan library. Is Vulkan installed?")?,
        );
        let renderer = Renderer::new(
            backend,
            window.required_instance_extensions(),
            &self.config.renderer_config(),
        )
        .context("Vulkan renderer failed to initialize")?;

        log::info!(
            "Graphics queue {:?} from family {:?} ready for window {:?}",
            renderer.graphics_queue(),
            renderer.queue_family_indices().graphics_family,
            window.window().id()
        );

        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }
}

// =============================================================================
// EVENT HANDLING
// =============================================================================

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.init_error.is_some() {
            return;
        }

        // Reported once, by main's return value
        if let Err(e) = self.init_vulkan(event_loop) {
            self.init_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                use winit::keyboard::{KeyCode, PhysicalKey};

                if event.state.is_pressed() && event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    log::info!("ESC pressed, exiting...");
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Renderer before window
        self.renderer = None;
        self.window = None;
        log::info!("Cleanup complete");
    }
}
