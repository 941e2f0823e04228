//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use crate::primitive::Primitive;
use prism_core::Material;
use prism_math::{Aabb, Ray, Vec3, EPSILON};

/// A triangle primitive.
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length, counter-clockwise winding)
    normal: Vec3,
    /// Material
    material: Arc<Material>,
    /// Bounding box
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: impl Into<Arc<Material>>) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();

        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);

        // Pad thin dimensions to avoid degenerate AABBs
        let delta = 0.0001;
        let bbox = Aabb::from_points(min - Vec3::splat(delta), max + Vec3::splat(delta));

        Self {
            v0,
            v1,
            v2,
            normal,
            material: material.into(),
            bbox,
        }
    }
}

impl Primitive for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        (t > EPSILON).then_some(t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn material(&self) -> &Material {
        &self.material
    }
}
