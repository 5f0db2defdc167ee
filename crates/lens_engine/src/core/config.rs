//! # Application Configuration
//!
//! Concrete configuration structures for logging, the renderer and the scene
//! to load. All of them are serde types and load through [`Config`].

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};

/// # Logging Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log filter (`error`, `warn`, `info`, `debug`, `trace`)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// # Shader Configuration
///
/// Compiled shader object paths for one shading model. The device layer is
/// responsible for loading them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderConfig {
    /// Path to the compiled vertex shader
    pub vertex_shader_path: String,
    /// Path to the compiled pixel shader
    pub pixel_shader_path: String,
}

impl ShaderConfig {
    /// Create a new shader configuration
    pub fn new(vertex_path: impl Into<String>, pixel_path: impl Into<String>) -> Self {
        Self {
            vertex_shader_path: vertex_path.into(),
            pixel_shader_path: pixel_path.into(),
        }
    }

    /// Default PBR shader pair
    pub fn pbr() -> Self {
        Self::new("PBRVertexShader.cso", "PBRPixelShader.cso")
    }

    /// Default Phong shader pair
    pub fn phong() -> Self {
        Self::new("PhongVertexShader.cso", "PhongPixelShader.cso")
    }

    fn validate(&self, model: &str) -> Result<(), String> {
        if self.vertex_shader_path.is_empty() {
            return Err(format!("{model} vertex shader path cannot be empty"));
        }
        if self.pixel_shader_path.is_empty() {
            return Err(format!("{model} pixel shader path cannot be empty"));
        }
        Ok(())
    }
}

/// # Renderer Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Color the target surface is cleared to each frame (RGBA)
    pub clear_color: [f32; 4],
    /// Shaders bound for PBR materials
    pub pbr_shaders: ShaderConfig,
    /// Shaders bound for Phong materials
    pub phong_shaders: ShaderConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            // Transparent black lets the passthrough show behind the scene
            clear_color: [0.0, 0.0, 0.0, 0.0],
            pbr_shaders: ShaderConfig::pbr(),
            phong_shaders: ShaderConfig::phong(),
        }
    }
}

impl RendererConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.clear_color.iter().any(|c| !c.is_finite()) {
            return Err("Clear color must be finite".to_string());
        }
        self.pbr_shaders.validate("PBR")?;
        self.phong_shaders.validate("Phong")
    }
}

/// # Application Configuration
///
/// Top-level configuration file of the driver binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Renderer settings
    pub renderer: RendererConfig,
    /// Scene description file to populate the world from
    pub scene_path: Option<String>,
}

impl Config for ApplicationConfig {}

impl ApplicationConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("Log level cannot be empty".to_string()));
        }
        self.renderer.validate().map_err(ConfigError::Invalid)
    }
}
