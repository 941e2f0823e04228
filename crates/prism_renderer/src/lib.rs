//! Prism Renderer - BVH-accelerated Whitted ray tracing.
//!
//! A recursive ray tracer with shadow rays, mirror and glossy reflection,
//! Fresnel-weighted refraction, and optional distribution sampling for
//! anti-aliasing, soft shadows and depth of field.
//!
//! Ray-scene queries go through the [`Accelerator`] contract, implemented
//! by [`Bvh`] and by the brute-force [`LinearScan`].

mod aa_box;
mod accelerator;
mod bvh;
mod camera;
mod integrator;
mod plane;
mod primitive;
mod renderer;
mod sampler;
mod scene;
mod sphere;
mod triangle;

pub use aa_box::AaBox;
pub use accelerator::{Accelerator, Hit, LinearScan};
pub use bvh::{Bvh, BvhNode, LEAF_MAX_SIZE};
pub use camera::Camera;
pub use integrator::{
    blinn_phong, reflect, refract, schlick, Refraction, WhittedIntegrator, AMBIENT_IOR,
};
pub use plane::Plane;
pub use primitive::Primitive;
pub use renderer::{clamp_01, color_to_rgb, render, render_pixel, ImageBuffer};
pub use sampler::Sampler;
pub use scene::{GradientSky, Scene, Skybox};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export scene description and math types
pub use prism_core::{AcceleratorKind, Color, Light, Material, RenderSettings};
pub use prism_math::{Aabb, Interval, Ray, Vec2, Vec3, EPSILON};
