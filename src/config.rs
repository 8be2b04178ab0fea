// =============================================================================
// CONFIGURATION - Load settings from config.toml
// =============================================================================
//
// This module handles loading and parsing configuration from config.toml.
// Provides sensible defaults if config file is missing or has errors.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::backend::RendererConfig;

/// Layer enabled when diagnostics are requested
pub const DEFAULT_VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub window: WindowConfig,
    pub debug: DebugConfig,
}

/// Application identity reported to the driver
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub engine_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Vulkan App".to_string(),
            engine_name: "no engine".to_string(),
        }
    }
}

/// Window settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Test Window".to_string(),
            width: 800,
            height: 600,
            resizable: false,
        }
    }
}

/// Debug settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub validation_layers: bool,
    pub validation_layer: String,
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            validation_layers: cfg!(debug_assertions),
            validation_layer: DEFAULT_VALIDATION_LAYER.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config.toml, falling back to defaults.
    ///
    /// Called before logging is set up; a load failure is returned for the
    /// caller to report.
    pub fn load() -> (Self, Option<anyhow::Error>) {
        Self::load_or_default("config.toml")
    }

    /// Load configuration from a specific path, defaults plus the error on failure
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, Option<anyhow::Error>) {
        match Self::load_from_path(path) {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        log::info!("Loaded configuration from {:?}", path);
        log::debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Configured log level filter, `None` when the name is unknown
    pub fn log_level(&self) -> Option<log::LevelFilter> {
        self.debug.log_level.parse().ok()
    }

    /// Settings consumed by the renderer facade
    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            app_name: self.app.name.clone(),
            engine_name: self.app.engine_name.clone(),
            enable_diagnostics: self.debug.validation_layers,
            diagnostic_layer: self.debug.validation_layer.clone(),
        }
    }
}
