//! Axis-aligned box primitive.

use std::sync::Arc;

use crate::primitive::Primitive;
use prism_core::Material;
use prism_math::{Aabb, Ray, Vec3, EPSILON};

/// A solid axis-aligned box.
pub struct AaBox {
    bounds: Aabb,
    material: Arc<Material>,
}

impl AaBox {
    /// Create a box from two opposite corners.
    pub fn new(a: Vec3, b: Vec3, material: impl Into<Arc<Material>>) -> Self {
        Self {
            bounds: Aabb::from_points(a, b),
            material: material.into(),
        }
    }

    /// Unit cube centered on `center`.
    pub fn unit(center: Vec3, material: impl Into<Arc<Material>>) -> Self {
        Self::new(center - Vec3::splat(0.5), center + Vec3::splat(0.5), material)
    }
}

impl Primitive for AaBox {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let (t_near, t_far) = self.bounds.slab_interval(ray)?;

        // Entry face, or the exit face when the origin is inside
        if t_near > EPSILON {
            Some(t_near)
        } else if t_far > EPSILON {
            Some(t_far)
        } else {
            None
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        let min = self.bounds.min();
        let max = self.bounds.max();

        let mut best = f32::INFINITY;
        let mut normal = Vec3::ZERO;
        for axis in 0..3 {
            let to_min = (point[axis] - min[axis]).abs();
            if to_min < best {
                best = to_min;
                normal = Vec3::ZERO;
                normal[axis] = -1.0;
            }
            let to_max = (max[axis] - point[axis]).abs();
            if to_max < best {
                best = to_max;
                normal = Vec3::ZERO;
                normal[axis] = 1.0;
            }
        }
        normal
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_hit_front_face() {
        let cube = AaBox::unit(Vec3::new(0.0, 0.0, -3.0), Material::default());
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let t = cube.intersect(&ray).unwrap();
        assert!((t - 2.5).abs() < 1e-5);
        assert_eq!(cube.normal(ray.at(t)), Vec3::Z);
    }

    #[test]
    fn test_box_hit_from_inside() {
        let cube = AaBox::new(Vec3::splat(-1.0), Vec3::splat(1.0), Material::default());
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let t = cube.intersect(&ray).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
        assert_eq!(cube.normal(ray.at(t)), Vec3::X);
    }

    #[test]
    fn test_box_miss() {
        let cube = AaBox::unit(Vec3::new(0.0, 0.0, -3.0), Material::default());
        assert!(cube.intersect(&Ray::new(Vec3::ZERO, Vec3::Z)).is_none());
        assert!(cube.intersect(&Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::NEG_Z)).is_none());
    }

    #[test]
    fn test_box_behind_origin_is_missed() {
        let cube = AaBox::unit(Vec3::new(0.0, 0.0, 3.0), Material::default());
        assert!(cube.intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).is_none());
        // Origin on the exit face
        assert!(cube.intersect(&Ray::new(Vec3::new(0.0, 0.0, 3.5), Vec3::Z)).is_none());
    }

    #[test]
    fn test_box_axis_parallel_ray() {
        let cube = AaBox::unit(Vec3::new(3.0, 0.0, 0.0), Material::default());
        let t = cube.intersect(&Ray::new(Vec3::ZERO, Vec3::X)).unwrap();
        assert!((t - 2.5).abs() < 1e-5);
    }
}
