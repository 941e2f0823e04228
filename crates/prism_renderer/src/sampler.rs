//! Seedable random sampling for jitter, lens and glossy rays.
//!
//! Every random decision during a render goes through a [`Sampler`], so two
//! renders with the same seed produce identical images.

use prism_math::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Shuffled visiting order over the strata of one area light.
#[derive(Debug, Clone, Default)]
struct StratumCycle {
    order: Vec<u32>,
    cursor: usize,
}

/// Random number source owned by a render.
pub struct Sampler {
    rng: StdRng,
    light_cycles: Vec<StratumCycle>,
}

impl Sampler {
    /// Create a sampler with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            light_cycles: Vec::new(),
        }
    }

    /// Uniform float in `[0, 1)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniform point in `[0, 1)^2`.
    #[inline]
    pub fn next_vec2(&mut self) -> Vec2 {
        Vec2::new(self.next_f32(), self.next_f32())
    }

    /// Uniform float in `[min, max)`.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Random point strictly inside the unit sphere.
    pub fn in_unit_sphere(&mut self) -> Vec3 {
        loop {
            let p = Vec3::new(
                self.range(-1.0, 1.0),
                self.range(-1.0, 1.0),
                self.range(-1.0, 1.0),
            );
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }

    /// Random point strictly inside the unit disk.
    pub fn in_unit_disk(&mut self) -> Vec2 {
        loop {
            let p = Vec2::new(self.range(-1.0, 1.0), self.range(-1.0, 1.0));
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }

    /// Jittered offset in `[0, 1)^2` for cell `(p, q)` of an `n x n` grid.
    pub fn stratified(&mut self, p: u32, q: u32, n: u32) -> Vec2 {
        let n = n.max(1) as f32;
        Vec2::new(
            (p as f32 + self.next_f32()) / n,
            (q as f32 + self.next_f32()) / n,
        )
    }

    /// Next stratum to sample for area light `light`, which has `strata` cells.
    ///
    /// Each light walks a shuffled permutation of its strata. Once every
    /// stratum has been used the permutation is reshuffled, so consecutive
    /// samples spread over the whole light before any cell repeats.
    pub fn light_stratum(&mut self, light: usize, strata: u32) -> u32 {
        if strata <= 1 {
            return 0;
        }
        if self.light_cycles.len() <= light {
            self.light_cycles.resize_with(light + 1, StratumCycle::default);
        }

        let cycle = &mut self.light_cycles[light];
        if cycle.order.len() != strata as usize {
            cycle.order = (0..strata).collect();
            cycle.cursor = 0;
        }
        if cycle.cursor == 0 {
            cycle.order.shuffle(&mut self.rng);
        }

        let stratum = cycle.order[cycle.cursor];
        cycle.cursor = (cycle.cursor + 1) % cycle.order.len();
        stratum
    }
}
