//! Recursive Whitted-style light transport.
//!
//! Implements:
//! - Blinn-Phong direct lighting with shadow rays toward point and area lights
//! - Mirror and glossy reflection
//! - Refraction with Schlick's Fresnel approximation
//! - Stochastic light sampling when distribution rendering is on
//!
//! Recursion stops unconditionally at `max_depth`, which is the only thing
//! that bounds rays bouncing between facing mirrors.

use crate::accelerator::Accelerator;
use crate::sampler::Sampler;
use crate::scene::Scene;
use prism_core::{Color, Light, Material};
use prism_math::{Ray, Vec3, EPSILON};

/// Refractive index of the medium between objects.
pub const AMBIENT_IOR: f32 = 1.0;

/// Side of the glossy reflection grid when each pixel shoots a single ray.
const WHITTED_GLOSSY_GRID: u32 = 2;

/// Mirror `view` about `normal`. Both point away from the surface.
#[inline]
pub fn reflect(normal: Vec3, view: Vec3) -> Vec3 {
    normal * normal.dot(view) * 2.0 - view
}

/// A transmitted direction and the cosines on either side of the interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refraction {
    pub direction: Vec3,
    pub cos_i: f32,
    pub cos_t: f32,
}

/// Snell's law.
///
/// `normal` faces the incoming side and `view` points back along the
/// incoming ray, both unit length. Returns `None` on total internal
/// reflection, before any square root of a negative number is taken.
pub fn refract(normal: Vec3, view: Vec3, ior_i: f32, ior_t: f32) -> Option<Refraction> {
    let cos_i = normal.dot(view).clamp(-1.0, 1.0);
    let tangent = normal * cos_i - view;
    let sin_i = tangent.length();
    let sin_t = sin_i * ior_i / ior_t;
    if sin_t > 1.0 {
        return None;
    }

    let cos_t = (1.0 - sin_t * sin_t).max(0.0).sqrt();
    let direction = tangent.normalize_or_zero() * sin_t - normal * cos_t;
    Some(Refraction {
        direction: direction.normalize_or_zero(),
        cos_i,
        cos_t,
    })
}

/// Schlick's approximation of the Fresnel reflectance.
///
/// Uses the transmitted-side cosine when leaving a denser medium and the
/// incident-side cosine otherwise, so the cosine always comes from the less
/// dense side of the interface. The result is always in `[0, 1]`.
pub fn schlick(ior_i: f32, ior_t: f32, cos_i: f32, cos_t: f32) -> f32 {
    let r0 = ((ior_i - ior_t) / (ior_i + ior_t)).powi(2);
    let cos = if ior_i > ior_t { cos_t } else { cos_i };
    let kr = r0 + (1.0 - r0) * (1.0 - cos.clamp(0.0, 1.0)).powi(5);
    kr.clamp(0.0, 1.0)
}

/// Lambertian diffuse plus Blinn specular from a single light direction.
pub fn blinn_phong(
    material: &Material,
    normal: Vec3,
    view: Vec3,
    light_dir: Vec3,
    light_color: Color,
) -> Color {
    let n_dot_l = normal.dot(light_dir);
    if n_dot_l <= 0.0 {
        return Color::ZERO;
    }

    let diffuse = material.diffuse_color * material.diffuse * n_dot_l;

    let half = (light_dir + view).normalize_or_zero();
    let n_dot_h = normal.dot(half);
    let specular = if n_dot_h > 0.0 {
        material.specular_color * material.specular * n_dot_h.powf(material.shininess)
    } else {
        Color::ZERO
    };

    (diffuse + specular) * light_color
}

/// Surface data shared by every term of one shading call.
struct SurfacePoint<'a> {
    material: &'a Material,
    normal: Vec3,
    view: Vec3,
    /// Origin for rays leaving on the normal's side
    over_point: Vec3,
}

/// Recursive shading over a scene and its accelerator.
pub struct WhittedIntegrator<'a> {
    scene: &'a Scene,
    accelerator: &'a dyn Accelerator,
    max_depth: u32,
    glossy_grid: u32,
    distribution: bool,
}

impl<'a> WhittedIntegrator<'a> {
    pub fn new(scene: &'a Scene, accelerator: &'a dyn Accelerator, max_depth: u32) -> Self {
        let distribution = scene.is_distribution();
        Self {
            scene,
            accelerator,
            max_depth,
            // The pixel loop already averages many rays
            glossy_grid: if distribution { 1 } else { WHITTED_GLOSSY_GRID },
            distribution,
        }
    }

    /// Set the glossy reflection grid used when a pixel shoots one ray.
    pub fn with_glossy_grid(mut self, side: u32) -> Self {
        if !self.distribution {
            self.glossy_grid = side.max(1);
        }
        self
    }

    /// Shade a primary ray.
    pub fn trace(&self, ray: &Ray, sampler: &mut Sampler) -> Color {
        self.shade(ray, 0, AMBIENT_IOR, sampler)
    }

    /// Color carried back along `ray`, travelling through a medium of index `ior_i`.
    pub fn shade(&self, ray: &Ray, depth: u32, ior_i: f32, sampler: &mut Sampler) -> Color {
        let Some(hit) = self.accelerator.nearest_hit(ray) else {
            return self.scene.escape_color(ray);
        };

        let material = hit.primitive.material();
        let view = -ray.direction().normalize_or_zero();
        let normal = hit.primitive.shading_normal(view, hit.point);
        let surface = SurfacePoint {
            material,
            normal,
            view,
            over_point: hit.point + normal * EPSILON,
        };

        let mut color = self.direct_light(&surface, sampler);

        if depth >= self.max_depth || material.is_local_only() {
            return color;
        }

        if !material.is_dielectric() {
            return color + self.reflection(&surface, depth, ior_i, sampler);
        }

        // Leaving the object when the shading normal was flipped
        let inside = hit.primitive.normal(hit.point).dot(normal) < 0.0;
        let ior_t = if inside { AMBIENT_IOR } else { material.ior };

        let Some(refraction) = refract(normal, view, ior_i, ior_t) else {
            // Total internal reflection
            return color + self.reflection(&surface, depth, ior_i, sampler);
        };

        let kr = schlick(ior_i, ior_t, refraction.cos_i, refraction.cos_t);

        if material.reflection > 0.0 {
            let reflected = Ray::new(surface.over_point, reflect(normal, view).normalize_or_zero());
            let reflected_color = self.shade(&reflected, depth + 1, ior_i, sampler);
            color += material.specular_color * reflected_color * kr;
        }

        // TODO: roughness is not applied to refracted rays; jittering them like
        // glossy reflections gives wrong results and needs its own model.
        let refracted = Ray::new(hit.point - normal * EPSILON, refraction.direction);
        color + self.shade(&refracted, depth + 1, ior_t, sampler) * (1.0 - kr)
    }

    /// Sum of unoccluded light contributions at a surface point.
    fn direct_light(&self, surface: &SurfacePoint<'_>, sampler: &mut Sampler) -> Color {
        let mut color = Color::ZERO;

        for (index, light) in self.scene.lights().iter().enumerate() {
            if light.is_point() {
                color += self.light_sample(surface, light.position, light.color);
            } else if self.distribution {
                // One stratum per primary sample; the pixel loop does the averaging
                let stratum = sampler.light_stratum(index, light.samples);
                let target = light.stratum_point(stratum, sampler.next_vec2());
                color += self.light_sample(surface, target, light.color);
            } else {
                color += self.area_light(surface, light, sampler);
            }
        }

        color
    }

    /// Every stratum of an area light, each weighted by the per-sample intensity.
    fn area_light(
        &self,
        surface: &SurfacePoint<'_>,
        light: &Light,
        sampler: &mut Sampler,
    ) -> Color {
        let light_color = light.color * light.point_intensity();
        (0..light.samples)
            .map(|stratum| {
                let target = light.stratum_point(stratum, sampler.next_vec2());
                self.light_sample(surface, target, light_color)
            })
            .fold(Color::ZERO, |acc, c| acc + c)
    }

    /// Contribution of a light point, zero when it is behind the surface or occluded.
    fn light_sample(&self, surface: &SurfacePoint<'_>, target: Vec3, light_color: Color) -> Color {
        let to_light = target - surface.over_point;
        let distance = to_light.length();
        let Some(light_dir) = to_light.try_normalize() else {
            return Color::ZERO;
        };

        if surface.normal.dot(light_dir) <= 0.0 {
            return Color::ZERO;
        }

        let shadow_ray = Ray::new(surface.over_point, light_dir);
        if self.accelerator.any_hit(&shadow_ray, distance) {
            return Color::ZERO;
        }

        blinn_phong(surface.material, surface.normal, surface.view, light_dir, light_color)
    }

    /// Mirror or glossy reflection, tinted by the specular color.
    fn reflection(
        &self,
        surface: &SurfacePoint<'_>,
        depth: u32,
        ior_i: f32,
        sampler: &mut Sampler,
    ) -> Color {
        let material = surface.material;
        let tint = material.specular_color * material.reflection;
        let direction = reflect(surface.normal, surface.view).normalize_or_zero();

        if !material.is_glossy() {
            let ray = Ray::new(surface.over_point, direction);
            return tint * self.shade(&ray, depth + 1, ior_i, sampler);
        }

        let mut sum = Color::ZERO;
        let mut accepted = 0u32;
        for _ in 0..self.glossy_grid * self.glossy_grid {
            let jittered =
                (direction + sampler.in_unit_sphere() * material.roughness).normalize_or_zero();
            // Perturbed below the surface
            if jittered.dot(surface.normal) <= 0.0 {
                continue;
            }
            let ray = Ray::new(surface.over_point, jittered);
            sum += self.shade(&ray, depth + 1, ior_i, sampler);
            accepted += 1;
        }

        if accepted == 0 {
            return Color::ZERO;
        }
        tint * sum / accepted as f32
    }
}
