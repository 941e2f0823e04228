use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// Unions never shrink a box and every non-empty box keeps `min <= max` on
/// each axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points.
    ///
    /// Axes thinner than a small delta are widened so flat primitives
    /// (axis-aligned triangles, degenerate boxes) still have volume.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Grow this box so it also contains `other`.
    pub fn extend(&mut self, other: &Aabb) {
        *self = Aabb::surrounding(self, other);
    }

    /// Returns a copy grown by `pad` on every face.
    pub fn padded(&self, pad: f32) -> Aabb {
        Aabb::new(self.x.pad(pad), self.y.pad(pad), self.z.pad(pad))
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// True if any axis is empty.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    ///
    /// Exact ties resolve to the earlier axis in X, Y, Z order.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size >= y_size && x_size >= z_size {
            0
        } else if y_size >= z_size {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    /// Point membership test (boundary included).
    pub fn is_inside(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Aabb) -> bool {
        other.is_empty() || (self.is_inside(other.min()) && self.is_inside(other.max()))
    }

    /// Parameter range `(t_near, t_far)` over which the ray's line lies in
    /// the box, or `None` when the line misses it.
    ///
    /// The range is not clipped to the ray origin: `t_near` is negative when
    /// the origin is inside or past the entry face.
    pub fn slab_interval(&self, r: &Ray) -> Option<(f32, f32)> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];
            let mut t0 = (slab.min - r.origin[axis]) * adinv;
            let mut t1 = (slab.max - r.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            // f32::max/min drop a NaN operand, which is what a ray lying
            // exactly on a slab plane with a zero direction component yields.
            t_near = t0.max(t_near);
            t_far = t1.min(t_far);
            if t_far < t_near {
                return None;
            }
        }

        Some((t_near, t_far))
    }

    /// Slab test against a ray.
    ///
    /// Returns the entry parameter clamped to zero when the ray hits the box,
    /// so a ray starting inside reports `Some(0.0)`. A box entirely behind
    /// the ray origin is a miss.
    pub fn intercepts(&self, r: &Ray) -> Option<f32> {
        let (t_near, t_far) = self.slab_interval(r)?;
        if t_far < 0.0 {
            return None;
        }
        Some(t_near.max(0.0))
    }

    /// Widen near-zero axes so the box never collapses to a plane.
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.pad(delta * 0.5);
        }
        if self.y.size() < delta {
            self.y = self.y.pad(delta * 0.5);
        }
        if self.z.size() < delta {
            self.z = self.z.pad(delta * 0.5);
        }
    }

    /// Static constants
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
