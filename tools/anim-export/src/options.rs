//! Export options and the `anim-export.toml` config file

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Default glTF sampling rate used to turn seconds into frames
pub const DEFAULT_GLTF_FPS: f32 = 24.0;

/// Indent width of pretty output (one space, matching existing AnbMaker inputs)
pub const DEFAULT_INDENT: usize = 1;

/// Options consumed by the exporter and the document writer
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Pretty-print JSON
    pub pretty: bool,
    /// Spaces per indent level when pretty-printing
    pub indent: usize,
    /// Frame rate for objects not linked into any scene; `None` makes
    /// such objects a structural error
    pub fallback_fps: Option<f32>,
    /// Emit keyframe type, easing and amplitude on every keyframe
    pub keyframe_details: bool,
    /// Frames per second assumed when importing glTF timelines
    pub gltf_fps: f32,
}

impl ExportOptions {
    /// Reject frame rates that are not positive and finite
    pub fn validate(&self) -> Result<()> {
        if let Some(fps) = self.fallback_fps {
            if !(fps.is_finite() && fps > 0.0) {
                anyhow::bail!("fallback fps must be positive, got {}", fps);
            }
        }
        if !(self.gltf_fps.is_finite() && self.gltf_fps > 0.0) {
            anyhow::bail!("glTF fps must be positive, got {}", self.gltf_fps);
        }
        Ok(())
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: DEFAULT_INDENT,
            fallback_fps: None,
            keyframe_details: false,
            gltf_fps: DEFAULT_GLTF_FPS,
        }
    }
}

/// anim-export.toml structure
#[derive(Debug, Default, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub gltf: GltfSection,
}

/// `[export]` section
#[derive(Debug, Deserialize)]
pub struct ExportSection {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    #[serde(default = "default_indent")]
    pub indent: usize,
    #[serde(default)]
    pub fallback_fps: Option<f32>,
    #[serde(default)]
    pub keyframe_details: bool,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
            indent: default_indent(),
            fallback_fps: None,
            keyframe_details: false,
        }
    }
}

/// `[gltf]` section
#[derive(Debug, Deserialize)]
pub struct GltfSection {
    /// Frames per second used to convert glTF seconds to frames
    #[serde(default = "default_gltf_fps")]
    pub fps: f32,
}

impl Default for GltfSection {
    fn default() -> Self {
        Self {
            fps: default_gltf_fps(),
        }
    }
}

fn default_pretty() -> bool {
    true
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

fn default_gltf_fps() -> f32 {
    DEFAULT_GLTF_FPS
}

impl ExportConfig {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Parse config from string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse anim-export.toml")?;
        config.to_options().validate()?;
        Ok(config)
    }

    pub fn to_options(&self) -> ExportOptions {
        ExportOptions {
            pretty: self.export.pretty,
            indent: self.export.indent,
            fallback_fps: self.export.fallback_fps,
            keyframe_details: self.export.keyframe_details,
            gltf_fps: self.gltf.fps,
        }
    }
}
