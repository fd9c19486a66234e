//! Camera for ray generation.

use lumen_core::CameraConfig;
use lumen_math::{sampling, Color, Point3, Ray, Vec3};
use rand::RngCore;

/// Pinhole or thin-lens camera.
///
/// All viewport geometry is derived once in [`Camera::new`]; the camera
/// cannot be reconfigured afterwards.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    image_height: u32,

    // Derived viewport geometry
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,

    // Stratification
    sqrt_spp: u32,
    recip_sqrt_spp: f32,
    pixel_samples_scale: f32,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        let image_width = config.image_width.max(1);
        let image_height = config.image_height();

        let sqrt_spp = ((config.samples_per_pixel as f32).sqrt() as u32).max(1);
        let recip_sqrt_spp = 1.0 / sqrt_spp as f32;
        let pixel_samples_scale = 1.0 / (sqrt_spp * sqrt_spp) as f32;

        let center = config.look_from;

        // Calculate viewport dimensions
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_dist;
        let viewport_width = viewport_height * (image_width as f32 / image_height as f32);

        // Calculate camera basis vectors
        let w = (config.look_from - config.look_at).normalize();
        let u = config.vup.cross(w).normalize();
        let v = w.cross(u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        let pixel_delta_u = viewport_u / image_width as f32;
        let pixel_delta_v = viewport_v / image_height as f32;

        let viewport_upper_left =
            center - config.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = config.focus_dist * (config.defocus_angle / 2.0).to_radians().tan();

        Self {
            image_height,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
            sqrt_spp,
            recip_sqrt_spp,
            pixel_samples_scale,
            config,
        }
    }

    /// Ray through pixel `(i, j)`, jittered within stratum `(s_i, s_j)` of
    /// the pixel's `sqrt_spp x sqrt_spp` grid.
    ///
    /// Origin lies on the defocus disk (or the camera center for a
    /// pinhole) and the time is uniform in [0, 1).
    pub fn get_ray(&self, i: u32, j: u32, s_i: u32, s_j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = self.sample_square_stratified(s_i, s_j, rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.config.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = sampling::gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Random point in the `[-0.5, 0.5]^2` square restricted to stratum
    /// `(s_i, s_j)`.
    fn sample_square_stratified(&self, s_i: u32, s_j: u32, rng: &mut dyn RngCore) -> Vec3 {
        let px = ((s_i as f32 + sampling::gen_f32(rng)) * self.recip_sqrt_spp) - 0.5;
        let py = ((s_j as f32 + sampling::gen_f32(rng)) * self.recip_sqrt_spp) - 0.5;
        Vec3::new(px, py, 0.0)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = sampling::random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn image_width(&self) -> u32 {
        self.config.image_width.max(1)
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn max_depth(&self) -> u32 {
        self.config.max_depth
    }

    pub fn background(&self) -> Color {
        self.config.background
    }

    /// Strata per pixel edge; a pixel takes `sqrt_spp^2` samples.
    pub fn sqrt_spp(&self) -> u32 {
        self.sqrt_spp
    }

    /// Weight of one sample in a pixel's average.
    pub fn pixel_samples_scale(&self) -> f32 {
        self.pixel_samples_scale
    }

    /// Camera basis `(u, v, w)`: right, up, and backwards.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square_camera(spp: u32) -> Camera {
        Camera::new(
            CameraConfig::default()
                .with_image(100, 1.0)
                .with_quality(spp, 10)
                .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
                .with_lens(90.0, 0.0, 1.0),
        )
    }

    #[test]
    fn test_camera_basis() {
        let camera = square_camera(1);
        let (u, v, w) = camera.basis();
        assert!((u - Vec3::X).length() < 1e-5);
        assert!((v - Vec3::Y).length() < 1e-5);
        assert!((w - Vec3::Z).length() < 1e-5);
        assert_eq!(camera.image_height(), 100);
    }

    #[test]
    fn test_stratification_rounds_down() {
        let camera = square_camera(10);
        assert_eq!(camera.sqrt_spp(), 3);
        assert!((camera.pixel_samples_scale() - 1.0 / 9.0).abs() < 1e-7);

        let camera = square_camera(1);
        assert_eq!(camera.sqrt_spp(), 1);
    }

    #[test]
    fn test_center_ray_points_forward() {
        let camera = square_camera(1);
        let mut rng = StdRng::seed_from_u64(42);

        let ray = camera.get_ray(50, 50, 0, 0, &mut rng);
        assert_eq!(ray.origin(), Vec3::ZERO);
        let dir = ray.direction().normalize();
        assert!(dir.z < -0.99);
        assert!((0.0..1.0).contains(&ray.time()));
    }

    #[test]
    fn test_samples_stay_in_stratum() {
        // Viewport is 2x2 at distance 1, so each pixel is 0.02 wide.
        let camera = square_camera(4);
        let mut rng = StdRng::seed_from_u64(7);
        let pixel_width = 2.0 / 100.0;
        let left_edge = -1.0 + 10.0 * pixel_width;

        for _ in 0..100 {
            let ray = camera.get_ray(10, 0, 1, 0, &mut rng);
            let x = ray.direction().x / -ray.direction().z;
            // Stratum 1 of 2 covers the right half of the pixel.
            assert!(x >= left_edge + 0.5 * pixel_width - 1e-5);
            assert!(x <= left_edge + pixel_width + 1e-5);
        }
    }

    #[test]
    fn test_defocus_origin_on_lens() {
        let camera = Camera::new(
            CameraConfig::default()
                .with_image(64, 1.0)
                .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
                .with_lens(40.0, 10.0, 5.0),
        );
        let radius = 5.0 * (5.0f32).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(1);

        let mut moved = false;
        for _ in 0..100 {
            let ray = camera.get_ray(32, 32, 0, 0, &mut rng);
            assert!(ray.origin().z.abs() < 1e-6);
            assert!(ray.origin().length() <= radius + 1e-5);
            moved |= ray.origin() != Vec3::ZERO;
        }
        assert!(moved);
    }
}
