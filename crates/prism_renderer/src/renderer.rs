//! Per-pixel sampling driver and image output.
//!
//! Each pixel is shaded by one of four sampling patterns:
//! - one ray through the pixel center (Whitted mode, pinhole camera)
//! - a `sqrt_spp x sqrt_spp` grid of jittered rays (anti-aliasing)
//! - a grid of lens samples through the pixel center (depth of field)
//! - jittered pixel positions, each paired with its own lens sample
//!
//! Final colors are clamped to `[0, 1]`.

use std::time::Instant;

use crate::camera::Camera;
use crate::integrator::WhittedIntegrator;
use crate::sampler::Sampler;
use crate::scene::Scene;
use prism_core::{sample_grid_side, Color, RenderSettings};
use prism_math::Vec2;

/// Lens grid side used for depth of field when anti-aliasing is off.
const MIN_LENS_GRID: u32 = 2;

/// Clamp a color to `[0, 1]` per channel.
#[inline]
pub fn clamp_01(color: Color) -> Color {
    color.clamp(Color::ZERO, Color::ONE)
}

/// Convert a color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let c = clamp_01(color) * 255.0;
    [c.x as u8, c.y as u8, c.z as u8]
}

/// Render a single pixel.
///
/// `sqrt_spp == 0` disables anti-aliasing.
pub fn render_pixel(
    camera: &Camera,
    integrator: &WhittedIntegrator<'_>,
    x: u32,
    y: u32,
    sqrt_spp: u32,
    sampler: &mut Sampler,
) -> Color {
    let corner = Vec2::new(x as f32, y as f32);
    let center = corner + Vec2::splat(0.5);

    if !camera.has_depth_of_field() && sqrt_spp == 0 {
        let ray = camera.primary_ray(center);
        return clamp_01(integrator.trace(&ray, sampler));
    }

    let grid = if camera.has_depth_of_field() {
        sqrt_spp.max(MIN_LENS_GRID)
    } else {
        sqrt_spp
    };

    let mut pixel_color = Color::ZERO;
    for p in 0..grid {
        for q in 0..grid {
            let pixel = if sqrt_spp == 0 {
                center
            } else {
                corner + sampler.stratified(p, q, grid)
            };

            let ray = if camera.has_depth_of_field() {
                let lens = sampler.in_unit_disk();
                camera.primary_ray_through_lens(lens, pixel)
            } else {
                camera.primary_ray(pixel)
            };

            pixel_color += integrator.trace(&ray, sampler);
        }
    }

    // Average the samples
    clamp_01(pixel_color / (grid * grid) as f32)
}

/// Simple image buffer for storing render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Row-major RGB floats, three per pixel.
    pub fn as_rgb_f32(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Convert to RGB bytes (for saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }
}

/// Render the entire scene to an image buffer.
///
/// Single-threaded; pixels are visited row by row from the top.
pub fn render(scene: &Scene, camera: &Camera, settings: &RenderSettings) -> ImageBuffer {
    let start = Instant::now();
    let accelerator = scene.build_accelerator(settings.leaf_size());
    log::info!(
        "Built {:?} accelerator over {} primitives in {:.2?}",
        scene.accelerator_kind(),
        accelerator.primitive_count(),
        start.elapsed()
    );

    let integrator = WhittedIntegrator::new(scene, accelerator.as_ref(), settings.max_depth)
        .with_glossy_grid(settings.glossy_grid);
    let sqrt_spp = sample_grid_side(scene.samples_per_pixel());
    let mut sampler = Sampler::new(settings.seed);

    let mut image = ImageBuffer::new(camera.width(), camera.height());
    let start = Instant::now();

    for y in 0..camera.height() {
        for x in 0..camera.width() {
            let color = render_pixel(camera, &integrator, x, y, sqrt_spp, &mut sampler);
            image.set(x, y, color);
        }
    }

    log::info!(
        "Rendered {}x{} ({} spp, depth {}) in {:.2?}",
        camera.width(),
        camera.height(),
        sqrt_spp * sqrt_spp,
        settings.max_depth,
        start.elapsed()
    );

    image
}
