//! Point and rectangular area lights.

use prism_math::{Vec2, Vec3};

use crate::material::Color;

/// A light source.
///
/// With `samples == 0` the light is a point light at `position`. Otherwise it
/// is a rectangle spanning `width` along +X and `height` along +Z from
/// `position`, split into `samples` strata laid out on a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    /// Position (corner of the rectangle for area lights)
    pub position: Vec3,

    /// Extent along X
    pub width: f32,

    /// Extent along Z
    pub height: f32,

    /// Number of strata, 0 for a point light
    pub samples: u32,

    /// Emitted color
    pub color: Color,
}

impl Light {
    /// Create a point light.
    pub fn point(position: Vec3, color: Color) -> Self {
        Self {
            position,
            width: 0.0,
            height: 0.0,
            samples: 0,
            color,
        }
    }

    /// Create a rectangular area light split into `samples` strata.
    pub fn area(position: Vec3, width: f32, height: f32, samples: u32, color: Color) -> Self {
        Self {
            position,
            width,
            height,
            samples,
            color,
        }
    }

    /// True for point lights.
    pub fn is_point(&self) -> bool {
        self.samples == 0
    }

    /// Weight of a single stratum sample.
    ///
    /// Summing one sample per stratum, each scaled by this factor, delivers the
    /// same energy as a point light of the same color regardless of the
    /// stratum count.
    pub fn point_intensity(&self) -> f32 {
        if self.samples == 0 {
            1.0
        } else {
            1.0 / self.samples as f32
        }
    }

    /// Grid of strata as `(columns, rows)`.
    ///
    /// Columns are `floor(sqrt(samples))`; the last row may be partial when
    /// `samples` is not a perfect square.
    pub fn strata_grid(&self) -> (u32, u32) {
        if self.samples == 0 {
            return (1, 1);
        }
        let columns = ((self.samples as f32).sqrt() as u32).max(1);
        let rows = self.samples.div_ceil(columns);
        (columns, rows)
    }

    /// A point inside stratum `stratum`, offset by `jitter` in `[0,1)^2`.
    pub fn stratum_point(&self, stratum: u32, jitter: Vec2) -> Vec3 {
        if self.is_point() {
            return self.position;
        }

        let (columns, rows) = self.strata_grid();
        let stratum = stratum % self.samples;
        let cx = (stratum % columns) as f32;
        let cz = (stratum / columns) as f32;

        Vec3::new(
            self.position.x + (cx + jitter.x) * (self.width / columns as f32),
            self.position.y,
            self.position.z + (cz + jitter.y) * (self.height / rows as f32),
        )
    }
}
