//! Vulkan device bring-up: instance, physical device selection and a
//! logical device with its graphics queue.

pub mod backend;
pub mod config;
pub mod window;

pub use backend::{Backend, Renderer, RendererConfig, RendererError, RendererState};
