//! Scene container consumed by the integrator.

use std::sync::Arc;

use crate::accelerator::{Accelerator, LinearScan};
use crate::bvh::Bvh;
use crate::primitive::Primitive;
use prism_core::{AcceleratorKind, Color, Light, RenderSettings};
use prism_math::Ray;

/// Environment lookup for rays that leave the scene.
pub trait Skybox: Send + Sync {
    fn color(&self, ray: &Ray) -> Color;
}

/// Vertical white-to-blue gradient.
#[derive(Debug, Clone, Copy)]
pub struct GradientSky {
    pub horizon: Color,
    pub zenith: Color,
}

impl Default for GradientSky {
    fn default() -> Self {
        Self {
            horizon: Color::new(1.0, 1.0, 1.0),
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

impl Skybox for GradientSky {
    fn color(&self, ray: &Ray) -> Color {
        let unit_direction = ray.direction().normalize_or_zero();
        let a = 0.5 * (unit_direction.y + 1.0);
        self.horizon * (1.0 - a) + self.zenith * a
    }
}

/// Primitives, lights and the environment of a render.
pub struct Scene {
    primitives: Vec<Arc<dyn Primitive>>,
    lights: Vec<Light>,
    background: Color,
    skybox: Option<Box<dyn Skybox>>,
    samples_per_pixel: u32,
    accelerator: AcceleratorKind,
}

impl Scene {
    /// Create an empty scene with a black background.
    pub fn new() -> Self {
        Self {
            primitives: Vec::new(),
            lights: Vec::new(),
            background: Color::ZERO,
            skybox: None,
            samples_per_pixel: 0,
            accelerator: AcceleratorKind::Bvh,
        }
    }

    /// Create an empty scene configured from render settings.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            background: settings.background_color(),
            samples_per_pixel: settings.samples_per_pixel,
            accelerator: settings.accelerator,
            ..Self::new()
        }
    }

    pub fn add_primitive<P: Primitive + 'static>(&mut self, primitive: P) {
        self.primitives.push(Arc::new(primitive));
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn set_skybox(&mut self, skybox: impl Skybox + 'static) {
        self.skybox = Some(Box::new(skybox));
    }

    pub fn set_accelerator(&mut self, kind: AcceleratorKind) {
        self.accelerator = kind;
    }

    pub fn set_samples_per_pixel(&mut self, samples: u32) {
        self.samples_per_pixel = samples;
    }

    pub fn primitives(&self) -> &[Arc<dyn Primitive>] {
        &self.primitives
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn has_skybox(&self) -> bool {
        self.skybox.is_some()
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    pub fn accelerator_kind(&self) -> AcceleratorKind {
        self.accelerator
    }

    /// True when stochastic sampling (anti-aliasing, soft shadows) is on.
    pub fn is_distribution(&self) -> bool {
        self.samples_per_pixel > 0
    }

    /// Color seen by a ray that hits nothing.
    pub fn escape_color(&self, ray: &Ray) -> Color {
        match &self.skybox {
            Some(sky) => sky.color(ray),
            None => self.background,
        }
    }

    /// Build the configured accelerator over the scene's primitives.
    pub fn build_accelerator(&self, leaf_size: usize) -> Box<dyn Accelerator> {
        let primitives = self.primitives.clone();
        match self.accelerator {
            AcceleratorKind::Bvh => Box::new(Bvh::with_leaf_size(primitives, leaf_size)),
            AcceleratorKind::Linear => {
                log::debug!("Using linear scan over {} primitives", primitives.len());
                Box::new(LinearScan::build(primitives))
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
