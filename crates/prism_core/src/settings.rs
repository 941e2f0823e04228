//! Render settings.
//!
//! Settings are plain data with serde support so a render can be driven from
//! a small JSON file:
//!
//! ```json
//! { "width": 640, "height": 480, "samples_per_pixel": 16, "accelerator": "bvh" }
//! ```
//!
//! Missing fields fall back to [`RenderSettings::default`].

use std::path::Path;

use prism_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::material::Color;

/// Errors that can occur while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Which ray accelerator the scene uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceleratorKind {
    /// Test every primitive for every ray.
    #[serde(alias = "none")]
    Linear,
    /// Bounding volume hierarchy.
    #[default]
    Bvh,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel; 0 renders one centered ray (Whitted mode)
    pub samples_per_pixel: u32,
    /// Maximum number of secondary bounces
    pub max_depth: u32,
    /// Ray accelerator
    pub accelerator: AcceleratorKind,
    /// Maximum primitives per BVH leaf
    pub leaf_size: usize,
    /// Side of the glossy reflection grid in Whitted mode
    pub glossy_grid: u32,
    /// Sampler seed
    pub seed: u64,
    /// Background color when rays escape
    pub background: [f32; 3],
}

/// Side of the largest square grid with at most `samples` cells.
///
/// Sample counts that are not perfect squares are rounded down, with a warning.
pub fn sample_grid_side(samples: u32) -> u32 {
    let side = (samples as f64).sqrt() as u32;
    if side * side != samples {
        log::warn!(
            "samples_per_pixel = {} is not a perfect square, using {}",
            samples,
            side * side
        );
    }
    side
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            samples_per_pixel: 0,
            max_depth: 4,
            accelerator: AcceleratorKind::Bvh,
            leaf_size: 4,
            glossy_grid: 2,
            seed: 0,
            background: [0.0, 0.0, 0.0],
        }
    }
}

impl RenderSettings {
    /// Parse settings from a JSON string and validate them.
    pub fn from_json_str(json: &str) -> SettingsResult<Self> {
        let settings: RenderSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> SettingsResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::debug!("Loaded render settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Check values that would make a render meaningless.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::Invalid {
                field: "width/height",
                message: format!("resolution must be non-zero, got {}x{}", self.width, self.height),
            });
        }
        if self.background.iter().any(|c| !c.is_finite()) {
            return Err(SettingsError::Invalid {
                field: "background",
                message: "color components must be finite".to_string(),
            });
        }
        Ok(())
    }

    /// True when stochastic sampling (anti-aliasing, soft shadows) is on.
    pub fn is_distribution(&self) -> bool {
        self.samples_per_pixel > 0
    }

    /// Side of the stratified pixel grid, 0 in Whitted mode.
    pub fn sqrt_spp(&self) -> u32 {
        sample_grid_side(self.samples_per_pixel)
    }

    /// Leaf size clamped to at least one primitive.
    pub fn leaf_size(&self) -> usize {
        self.leaf_size.max(1)
    }

    /// Background as a color.
    pub fn background_color(&self) -> Color {
        Vec3::from_array(self.background)
    }
}
