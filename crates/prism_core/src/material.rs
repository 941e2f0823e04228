//! Surface materials for Whitted-style shading.

use prism_math::Vec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// A Phong-style material with optional mirror reflection and transmission.
///
/// `reflection` and `transmittance` decide which secondary rays the
/// integrator spawns: both zero means purely local shading, non-zero
/// transmittance makes the surface a dielectric.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Diffuse color (RGB, 0-1)
    pub diffuse_color: Color,

    /// Diffuse coefficient (Kd)
    pub diffuse: f32,

    /// Specular color, also tints mirror reflections
    pub specular_color: Color,

    /// Specular coefficient (Ks)
    pub specular: f32,

    /// Blinn-Phong exponent
    pub shininess: f32,

    /// Mirror reflection coefficient
    pub reflection: f32,

    /// Transmittance (0 = opaque)
    pub transmittance: f32,

    /// Index of refraction
    pub ior: f32,

    /// 0 = perfect mirror, >0 perturbs reflected rays
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_color: Color::splat(0.2),
            diffuse: 0.2,
            specular_color: Color::ONE,
            specular: 0.8,
            shininess: 20.0,
            reflection: 1.0,
            transmittance: 0.0,
            ior: 1.0,
            roughness: 0.0,
        }
    }
}

impl Material {
    /// A purely diffuse material: no highlight, no reflection.
    pub fn diffuse(color: Color, kd: f32) -> Self {
        Self {
            diffuse_color: color,
            diffuse: kd,
            specular: 0.0,
            reflection: 0.0,
            ..Default::default()
        }
    }

    /// Set the specular color and coefficient.
    ///
    /// The specular coefficient doubles as the mirror reflection
    /// coefficient; use [`Material::with_reflection`] to decouple them.
    pub fn with_specular(mut self, color: Color, ks: f32) -> Self {
        self.specular_color = color;
        self.specular = ks;
        self.reflection = ks;
        self
    }

    /// Set the Blinn-Phong exponent.
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Override the mirror reflection coefficient.
    pub fn with_reflection(mut self, reflection: f32) -> Self {
        self.reflection = reflection.max(0.0);
        self
    }

    /// Make the material transmissive with the given index of refraction.
    pub fn with_transmittance(mut self, transmittance: f32, ior: f32) -> Self {
        self.transmittance = transmittance.max(0.0);
        self.ior = ior;
        self
    }

    /// Set the roughness used for glossy reflections.
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.max(0.0);
        self
    }

    /// True if the material spawns no secondary rays.
    pub fn is_local_only(&self) -> bool {
        self.transmittance == 0.0 && self.reflection == 0.0
    }

    /// True if the material refracts.
    pub fn is_dielectric(&self) -> bool {
        self.transmittance > 0.0
    }

    /// True if reflections should be jittered.
    pub fn is_glossy(&self) -> bool {
        self.roughness > 0.0
    }
}
