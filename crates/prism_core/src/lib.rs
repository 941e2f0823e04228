//! Prism Core - renderer-agnostic scene description.
//!
//! This crate provides:
//!
//! - **Materials**: Phong-style surface description with reflection,
//!   transmission and roughness
//! - **Lights**: point lights and stratified rectangular area lights
//! - **Settings**: `RenderSettings`, loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use prism_core::RenderSettings;
//!
//! let settings = RenderSettings::load("render.json")?;
//! println!("{}x{} @ {} spp", settings.width, settings.height, settings.samples_per_pixel);
//! ```

pub mod light;
pub mod material;
pub mod settings;

// Re-export commonly used types
pub use light::Light;
pub use material::{Color, Material};
pub use settings::{
    sample_grid_side, AcceleratorKind, RenderSettings, SettingsError, SettingsResult,
};
