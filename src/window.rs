// =============================================================================
// WINDOW CONTEXT - the windowing side of device bring-up
// =============================================================================
//
// Owns the window and knows which instance extensions its surface needs.
// The renderer only ever sees the extension list.

use anyhow::{Context, Result};
use ash::extensions::{ext, khr};
use raw_window_handle::{HasDisplayHandle, RawDisplayHandle};
use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes},
};

use crate::config::WindowConfig;

pub struct WindowContext {
    window: Arc<Window>,
    required_extensions: Vec<String>,
}

impl WindowContext {
    /// Create the window and resolve the surface extensions for its display
    pub fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self> {
        let attributes = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height))
            .with_resizable(config.resizable);

        let window = event_loop
            .create_window(attributes)
            .context("Failed to create window")?;

        let display = window
            .display_handle()
            .context("Failed to get display handle")?
            .as_raw();
        let required_extensions = required_instance_extensions(display)?;

        log::info!(
            "Window created: {}x{}, surface needs {:?}",
            config.width,
            config.height,
            required_extensions
        );

        Ok(Self {
            window: Arc::new(window),
            required_extensions,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Instance extensions required to present to this window, in order
    pub fn required_instance_extensions(&self) -> &[String] {
        &self.required_extensions
    }
}

impl Drop for WindowContext {
    fn drop(&mut self) {
        log::debug!("Closing window");
    }
}

/// `VK_KHR_surface` followed by the platform surface extension
pub fn required_instance_extensions(display: RawDisplayHandle) -> Result<Vec<String>> {
    let platform = match display {
        RawDisplayHandle::Windows(_) => khr::Win32Surface::name(),
        RawDisplayHandle::Xlib(_) => khr::XlibSurface::name(),
        RawDisplayHandle::Xcb(_) => khr::XcbSurface::name(),
        RawDisplayHandle::Wayland(_) => khr::WaylandSurface::name(),
        RawDisplayHandle::Android(_) => khr::AndroidSurface::name(),
        RawDisplayHandle::AppKit(_) | RawDisplayHandle::UiKit(_) => ext::MetalSurface::name(),
        other => anyhow::bail!("Unsupported display handle type: {:?}", other),
    };

    Ok([khr::Surface::name(), platform]
        .iter()
        .map(|name| name.to_string_lossy().into_owned())
        .collect())
}
