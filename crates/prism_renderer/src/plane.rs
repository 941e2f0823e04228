//! Infinite plane primitive.

use std::sync::Arc;

use crate::primitive::Primitive;
use prism_core::Material;
use prism_math::{Aabb, Ray, Vec3, EPSILON};

/// Radius of the disk a plane is clipped to.
///
/// The BVH needs a finite box with a meaningful centroid, so a plane is a
/// very large disk around its point closest to the origin. Hits farther than
/// this from that point are not reported, which keeps every accelerator
/// returning the same answer.
pub const PLANE_RADIUS: f32 = 1.0e5;

/// The plane of points `p` with `normal . p == offset`, clipped to a disk of
/// radius [`PLANE_RADIUS`].
pub struct Plane {
    normal: Vec3,
    offset: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Plane {
    /// Create a plane from a normal and its signed distance from the origin.
    pub fn new(normal: Vec3, offset: f32, material: impl Into<Arc<Material>>) -> Self {
        let normal = normal.normalize_or_zero();
        let anchor = normal * offset;

        // Axis-aligned extent of a disk of radius R with this normal
        let half = Vec3::new(
            PLANE_RADIUS * (1.0 - normal.x * normal.x).max(0.0).sqrt(),
            PLANE_RADIUS * (1.0 - normal.y * normal.y).max(0.0).sqrt(),
            PLANE_RADIUS * (1.0 - normal.z * normal.z).max(0.0).sqrt(),
        );
        let bbox = Aabb::from_points(anchor - half, anchor + half);

        Self {
            normal,
            offset,
            material: material.into(),
            bbox,
        }
    }

    /// Create a plane through three points (counter-clockwise winding).
    pub fn from_points(p0: Vec3, p1: Vec3, p2: Vec3, material: impl Into<Arc<Material>>) -> Self {
        let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
        Self::new(normal, normal.dot(p0), material)
    }
}

impl Primitive for Plane {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (self.offset - self.normal.dot(ray.origin())) / denom;
        if t <= EPSILON {
            return None;
        }

        let from_anchor = ray.at(t) - self.normal * self.offset;
        let radial = from_anchor - self.normal * self.normal.dot(from_anchor);
        (radial.length_squared() <= PLANE_RADIUS * PLANE_RADIUS).then_some(t)
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
