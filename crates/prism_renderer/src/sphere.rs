//! Sphere primitive for ray tracing.

use std::sync::Arc;

use crate::primitive::Primitive;
use prism_core::Material;
use prism_math::{Aabb, Ray, Vec3, EPSILON};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: impl Into<Arc<Material>>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material: material.into(),
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Primitive for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        if a == 0.0 {
            return None;
        }
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root in front of the origin; the far root when starting inside
        let near = (h - sqrtd) / a;
        if near > EPSILON {
            return Some(near);
        }
        let far = (h + sqrtd) / a;
        (far > EPSILON).then_some(far)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        ((point - self.center) / self.radius).normalize_or_zero()
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey() -> Material {
        Material::diffuse(Vec3::splat(0.5), 1.0)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let t = sphere.intersect(&ray).expect("ray points at the sphere");
        assert!((t - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_sphere_hit_is_a_ray_parameter() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));

        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.intersect(&ray).is_none());

        // Behind the origin
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(sphere.intersect(&ray).is_none());
    }

    #[test]
    fn test_ray_from_inside_hits_far_side() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_shading_normal_flips_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey());
        let p = Vec3::new(0.0, 0.0, 1.0);

        // Viewer outside, looking at the front
        assert_eq!(sphere.shading_normal(Vec3::Z, p), Vec3::Z);
        // Viewer inside the sphere
        assert_eq!(sphere.shading_normal(Vec3::NEG_Z, p), Vec3::NEG_Z);
    }

    #[test]
    fn test_sphere_bbox() {
        let sphere = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 1.0, grey());
        let bbox = sphere.bounding_box();
        assert_eq!(bbox.min(), Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(bbox.max(), Vec3::new(2.0, 3.0, 4.0));
    }
}
