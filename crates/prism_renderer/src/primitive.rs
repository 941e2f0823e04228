//! Primitive trait for ray-object intersection.

use prism_core::Material;
use prism_math::{Aabb, Ray, Vec3};

/// A shape that rays can hit.
///
/// Accelerators only ever see primitives through this trait, so adding a
/// shape never touches the BVH or the integrator.
pub trait Primitive: Send + Sync {
    /// Smallest ray parameter `t > EPSILON` where the ray hits the surface.
    fn intersect(&self, ray: &Ray) -> Option<f32>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;

    /// Outward unit normal at a point on the surface.
    fn normal(&self, point: Vec3) -> Vec3;

    /// Normal facing `view`, the direction back toward the ray origin.
    ///
    /// The outward normal is flipped when the ray arrives from inside the
    /// surface, so shading always happens on the visible side.
    fn shading_normal(&self, view: Vec3, point: Vec3) -> Vec3 {
        let normal = self.normal(point);
        if normal.dot(view) < 0.0 {
            -normal
        } else {
            normal
        }
    }

    /// Surface material.
    fn material(&self) -> &Material;
}
