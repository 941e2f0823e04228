// Re-export glam for convenience
pub use glam::*;

// Prism math types
mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Offset used against self-intersection and for padding scene bounds.
pub const EPSILON: f32 = 1.0e-4;
