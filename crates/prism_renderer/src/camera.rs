//! Pinhole and thin-lens camera for ray generation.

use prism_math::{Ray, Vec2, Vec3};

/// Camera for generating rays into the scene.
///
/// Pixel coordinates are continuous: `(0, 0)` is the top-left corner of the
/// image and `(width, height)` the bottom-right, so the center of pixel
/// `(i, j)` is `(i + 0.5, j + 0.5)`.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    width: u32,
    height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,        // Vertical field of view in degrees
    aperture: f32,    // Lens radius, 0 for a pinhole
    focal_ratio: f32, // Focal distance in units of the view-plane distance

    // Cached computed values (set by initialize())
    u: Vec3,
    v: Vec3,
    w: Vec3,
    plane_distance: f32,
    plane_width: f32,
    plane_height: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            width: 512,
            height: 512,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 60.0,
            aperture: 0.0,
            focal_ratio: 1.0,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            plane_distance: 1.0,
            plane_width: 1.0,
            plane_height: 1.0,
        };
        camera.initialize();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self.initialize();
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.initialize();
        self
    }

    /// Set vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self.initialize();
        self
    }

    /// Set lens settings. An `aperture` above zero enables depth of field.
    pub fn with_lens(mut self, aperture: f32, focal_ratio: f32) -> Self {
        self.aperture = aperture.max(0.0);
        self.focal_ratio = focal_ratio;
        self
    }

    /// Recompute the view basis and view-plane size.
    pub fn initialize(&mut self) {
        self.plane_distance = (self.look_from - self.look_at).length().max(f32::MIN_POSITIVE);
        self.plane_height = 2.0 * self.plane_distance * (self.vfov.to_radians() / 2.0).tan();
        self.plane_width = self.plane_height * (self.width as f32 / self.height as f32);

        self.w = (self.look_from - self.look_at).normalize_or_zero();
        self.u = self.vup.cross(self.w).normalize_or_zero();
        self.v = self.w.cross(self.u);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aperture(&self) -> f32 {
        self.aperture
    }

    pub fn has_depth_of_field(&self) -> bool {
        self.aperture > 0.0
    }

    /// Unnormalized direction to the view-plane point at `pixel`.
    fn plane_direction(&self, pixel: Vec2) -> Vec3 {
        -self.w * self.plane_distance
            + self.v * self.plane_height * (0.5 - pixel.y / self.height as f32)
            + self.u * self.plane_width * (pixel.x / self.width as f32 - 0.5)
    }

    /// Ray from the eye through a continuous pixel position.
    pub fn primary_ray(&self, pixel: Vec2) -> Ray {
        Ray::new(self.look_from, self.plane_direction(pixel).normalize_or_zero())
    }

    /// Ray from a point on the lens through the focal-plane point of `pixel`.
    ///
    /// `lens` is a point in the unit disk; it is scaled by the aperture.
    pub fn primary_ray_through_lens(&self, lens: Vec2, pixel: Vec2) -> Ray {
        let focus = self.look_from + self.plane_direction(pixel) * self.focal_ratio;
        let lens = lens * self.aperture;
        let origin = self.look_from + self.u * lens.x + self.v * lens.y;
        Ray::new(origin, (focus - origin).normalize_or_zero())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_center_ray() {
        let camera = Camera::new()
            .with_resolution(100, 100)
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);

        let ray = camera.primary_ray(Vec2::new(50.0, 50.0));
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 5.0));
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_top_left_pixel_points_up_and_left() {
        let camera = Camera::new().with_resolution(200, 100);
        let ray = camera.primary_ray(Vec2::new(0.5, 0.5));
        assert!(ray.direction.x < 0.0);
        assert!(ray.direction.y > 0.0);
        assert!((ray.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_lens_rays_converge_on_focal_plane() {
        let camera = Camera::new()
            .with_position(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::Y)
            .with_lens(0.5, 1.0);
        assert!(camera.has_depth_of_field());

        let pixel = Vec2::new(256.0, 256.0);
        let a = camera.primary_ray_through_lens(Vec2::new(0.9, 0.0), pixel);
        let b = camera.primary_ray_through_lens(Vec2::new(-0.3, 0.6), pixel);

        // Both rays pass through the look-at point, which sits on the focal plane
        let ta = -a.origin.z / a.direction.z;
        let tb = -b.origin.z / b.direction.z;
        assert!(a.at(ta).length() < 1e-4);
        assert!(b.at(tb).length() < 1e-4);
        assert!((a.origin - Vec3::new(0.45, 0.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn test_zero_aperture_is_pinhole() {
        let camera = Camera::new().with_lens(-1.0, 2.0);
        assert_eq!(camera.aperture(), 0.0);
        assert!(!camera.has_depth_of_field());
    }
}
