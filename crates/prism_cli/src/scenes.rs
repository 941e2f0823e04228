//! Built-in demo scenes.

use std::sync::Arc;

use clap::ValueEnum;
use prism_renderer::{
    AaBox, Camera, Color, GradientSky, Light, Material, Plane, RenderSettings, Scene, Sphere,
    Triangle, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Which demo scene to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Grid of random spheres on a ground plane
    Random,
    /// Sphere between two facing mirrors
    Mirrors,
    /// Glass sphere over boxes and a triangle, lit by an area light
    Glass,
}

/// Build a scene and a camera matching `settings`.
pub fn build(kind: SceneKind, settings: &RenderSettings) -> (Scene, Camera) {
    let mut scene = Scene::from_settings(settings);
    let camera = Camera::new().with_resolution(settings.width, settings.height);

    let camera = match kind {
        SceneKind::Random => {
            random_scene(&mut scene, settings.seed);
            camera
                .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
                .with_fov(20.0)
                .with_lens(0.1, 1.0)
        }
        SceneKind::Mirrors => {
            mirrors_scene(&mut scene);
            camera
                .with_position(Vec3::new(0.0, 1.0, 3.5), Vec3::new(0.0, 1.0, 0.0), Vec3::Y)
                .with_fov(50.0)
        }
        SceneKind::Glass => {
            glass_scene(&mut scene);
            camera
                .with_position(Vec3::new(0.0, 2.0, 6.0), Vec3::new(0.0, 0.8, 0.0), Vec3::Y)
                .with_fov(45.0)
        }
    };

    log::info!(
        "Scene {:?}: {} primitives, {} lights",
        kind,
        scene.primitive_count(),
        scene.light_count()
    );
    (scene, camera)
}

/// Random material for a small sphere.
fn random_material(rng: &mut StdRng) -> Material {
    let choose = rng.gen::<f32>();
    let color = Color::new(rng.gen(), rng.gen(), rng.gen());

    if choose < 0.6 {
        // Diffuse with a soft highlight
        Material::diffuse(color * color, 0.9)
            .with_specular(Color::ONE, 0.2)
            .with_reflection(0.0)
    } else if choose < 0.85 {
        // Metal
        Material::diffuse(color, 0.1)
            .with_specular(Color::splat(0.5) + color * 0.5, 0.8)
            .with_roughness(rng.gen_range(0.0..0.3))
    } else {
        // Glass
        Material::diffuse(Color::ZERO, 0.0)
            .with_specular(Color::ONE, 0.5)
            .with_transmittance(1.0, 1.5)
    }
}

/// Ground plane, a grid of small random spheres and three large ones.
pub fn random_scene(scene: &mut Scene, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);

    scene.set_skybox(GradientSky::default());
    scene.add_primitive(Plane::new(
        Vec3::Y,
        0.0,
        Material::diffuse(Color::splat(0.5), 0.8),
    ));

    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }
            let material = random_material(&mut rng);
            scene.add_primitive(Sphere::new(center, 0.2, material));
        }
    }

    scene.add_primitive(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Material::diffuse(Color::ZERO, 0.0)
            .with_specular(Color::ONE, 0.5)
            .with_transmittance(1.0, 1.5),
    ));
    scene.add_primitive(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Material::diffuse(Color::new(0.4, 0.2, 0.1), 0.9),
    ));
    scene.add_primitive(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Material::diffuse(Color::new(0.7, 0.6, 0.5), 0.1)
            .with_specular(Color::new(0.7, 0.6, 0.5), 0.9),
    ));

    scene.add_light(Light::point(Vec3::new(10.0, 20.0, 10.0), Color::splat(0.7)));
    scene.add_light(Light::area(
        Vec3::new(-3.0, 8.0, -3.0),
        2.0,
        2.0,
        9,
        Color::splat(0.5),
    ));
}

/// Two facing mirrors with a red sphere between them.
pub fn mirrors_scene(scene: &mut Scene) {
    scene.set_background(Color::new(0.05, 0.05, 0.1));

    let mirror = Arc::new(
        Material::diffuse(Color::ZERO, 0.0)
            .with_specular(Color::splat(0.9), 0.9)
            .with_shininess(200.0),
    );
    scene.add_primitive(Plane::new(Vec3::X, -2.0, Arc::clone(&mirror)));
    scene.add_primitive(Plane::new(Vec3::NEG_X, -2.0, mirror));
    scene.add_primitive(Plane::new(
        Vec3::Y,
        0.0,
        Material::diffuse(Color::splat(0.6), 0.9),
    ));
    scene.add_primitive(Sphere::new(
        Vec3::new(0.0, 0.7, 0.0),
        0.7,
        Material::diffuse(Color::new(0.8, 0.1, 0.1), 0.9)
            .with_specular(Color::ONE, 0.3)
            .with_reflection(0.0),
    ));

    scene.add_light(Light::point(Vec3::new(0.0, 4.0, 2.0), Color::ONE));
}

/// Glass and glossy objects over a floor, lit by a soft area light.
pub fn glass_scene(scene: &mut Scene) {
    scene.set_skybox(GradientSky::default());

    scene.add_primitive(Plane::new(
        Vec3::Y,
        0.0,
        Material::diffuse(Color::new(0.8, 0.8, 0.7), 0.9),
    ));

    let checker_a = Arc::new(Material::diffuse(Color::new(0.9, 0.2, 0.2), 0.9));
    let checker_b = Arc::new(Material::diffuse(Color::new(0.2, 0.3, 0.9), 0.9));
    for i in -2..=2 {
        let material = if i % 2 == 0 { &checker_a } else { &checker_b };
        scene.add_primitive(AaBox::new(
            Vec3::new(i as f32 - 0.4, 0.0, -2.5),
            Vec3::new(i as f32 + 0.4, 0.8, -1.7),
            Arc::clone(material),
        ));
    }

    scene.add_primitive(Triangle::new(
        Vec3::new(-3.0, 0.0, -3.5),
        Vec3::new(3.0, 0.0, -3.5),
        Vec3::new(0.0, 3.0, -3.5),
        Material::diffuse(Color::new(0.9, 0.8, 0.2), 0.8),
    ));

    scene.add_primitive(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Material::diffuse(Color::ZERO, 0.0)
            .with_specular(Color::ONE, 0.6)
            .with_shininess(120.0)
            .with_transmittance(1.0, 1.5),
    ));
    scene.add_primitive(Sphere::new(
        Vec3::new(-2.2, 0.6, 0.5),
        0.6,
        Material::diffuse(Color::splat(0.1), 0.2)
            .with_specular(Color::new(0.9, 0.8, 0.6), 0.8)
            .with_roughness(0.3),
    ));

    scene.add_light(Light::area(
        Vec3::new(-1.0, 5.0, -1.0),
        2.0,
        2.0,
        16,
        Color::ONE,
    ));
}
