//! Ray accelerator contract and the brute-force reference implementation.

use std::sync::Arc;

use crate::primitive::Primitive;
use prism_math::{Ray, Vec3, EPSILON};

/// Result of a nearest-hit query.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    /// The primitive that was hit
    pub primitive: &'a dyn Primitive,
    /// Ray parameter of the hit
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
}

impl<'a> Hit<'a> {
    pub fn new(primitive: &'a dyn Primitive, ray: &Ray, distance: f32) -> Self {
        Self {
            primitive,
            distance,
            point: ray.at(distance),
        }
    }
}

/// Structure that answers ray-scene visibility queries.
///
/// Built once from the scene's primitives, then read-only, so a single
/// instance can be shared by every shading call.
pub trait Accelerator: Send + Sync {
    /// Build the structure over `primitives`.
    fn build(primitives: Vec<Arc<dyn Primitive>>) -> Self
    where
        Self: Sized;

    /// Closest hit with ray parameter greater than `EPSILON`.
    fn nearest_hit(&self, ray: &Ray) -> Option<Hit<'_>>;

    /// True if anything is hit with a ray parameter in `(EPSILON, max_distance)`.
    fn any_hit(&self, ray: &Ray, max_distance: f32) -> bool;

    /// Number of primitives indexed.
    fn primitive_count(&self) -> usize;
}

/// Tests every primitive for every ray.
pub struct LinearScan {
    primitives: Vec<Arc<dyn Primitive>>,
}

impl Accelerator for LinearScan {
    fn build(primitives: Vec<Arc<dyn Primitive>>) -> Self {
        Self { primitives }
    }

    fn nearest_hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        let mut closest: Option<(&dyn Primitive, f32)> = None;

        for primitive in &self.primitives {
            if let Some(t) = primitive.intersect(ray) {
                let best = closest.map_or(f32::INFINITY, |(_, d)| d);
                if t > EPSILON && t < best {
                    closest = Some((primitive.as_ref(), t));
                }
            }
        }

        closest.map(|(primitive, t)| Hit::new(primitive, ray, t))
    }

    fn any_hit(&self, ray: &Ray, max_distance: f32) -> bool {
        self.primitives.iter().any(|primitive| {
            primitive
                .intersect(ray)
                .is_some_and(|t| t > EPSILON && t < max_distance)
        })
    }

    fn primitive_count(&self) -> usize {
        self.primitives.len()
    }
}
