//! Core path tracing renderer.
//!
//! Monte Carlo path tracing with next-event estimation: non-specular
//! bounces sample an equal mix of the material's density and the scene's
//! registered lights.

use std::time::Instant;

use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::camera::Camera;
use crate::error::RenderResult;
use crate::hittable::{HitRecord, Hittable};
use crate::material::ScatterKind;
use crate::output::ImageBuffer;
use crate::pdf::{HittablePdf, MixturePdf, Pdf};
use lumen_core::RenderSettings;
use lumen_math::{Color, Interval, Ray};
use rand::RngCore;

/// Minimum ray parameter for secondary hits, against shadow acne.
pub const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// Sampled densities at or below this end the path.
pub const MIN_PDF_VALUE: f32 = 1e-8;

/// Compute the radiance arriving along `ray`, following at most `depth`
/// path segments.
///
/// Emission is gathered at every vertex. Specular scatters follow their
/// ray weighted by attenuation only; other scatters are weighted by
/// `attenuation * scattering_pdf / pdf`. When `lights` is `None` the
/// material's own density is used alone.
pub fn ray_color(
    ray: &Ray,
    depth: u32,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..depth {
        let mut rec = HitRecord::default();

        if !world.hit(&ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY), &mut rec, rng) {
            return radiance + throughput * background;
        }

        radiance += throughput * rec.material.emitted(&ray, &rec, rec.u, rec.v, rec.p);

        let Some(srec) = rec.material.scatter(&ray, &rec, rng) else {
            return radiance;
        };

        match srec.kind {
            ScatterKind::Specular(next) => {
                throughput *= srec.attenuation;
                ray = next;
            }
            ScatterKind::Sampled(material_pdf) => {
                let (direction, pdf_value) = match lights {
                    Some(lights) => {
                        let light_pdf = HittablePdf::new(lights, rec.p);
                        let mixture = MixturePdf::new(&light_pdf, &material_pdf);
                        let direction = mixture.generate(rng);
                        (direction, mixture.value(direction, rng))
                    }
                    None => {
                        let direction = material_pdf.generate(rng);
                        (direction, material_pdf.value(direction, rng))
                    }
                };

                if !pdf_value.is_finite() || pdf_value <= MIN_PDF_VALUE {
                    return radiance;
                }

                let scattered = Ray::new(rec.p, direction, ray.time());
                let scattering_pdf = rec.material.scattering_pdf(&ray, &rec, &scattered);

                throughput *= srec.attenuation * scattering_pdf / pdf_value;
                ray = scattered;
            }
        }
    }

    radiance
}

/// Average of all stratified samples through pixel `(x, y)`.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let sqrt_spp = camera.sqrt_spp();
    let mut pixel_color = Color::ZERO;

    for s_j in 0..sqrt_spp {
        for s_i in 0..sqrt_spp {
            let ray = camera.get_ray(x, y, s_i, s_j, rng);
            pixel_color += ray_color(
                &ray,
                camera.max_depth(),
                world,
                lights,
                camera.background(),
                rng,
            );
        }
    }

    pixel_color * camera.pixel_samples_scale()
}

/// Render the whole image in parallel buckets.
///
/// The world and lights are only read. With `settings.threads` set, a
/// dedicated pool of that size is used; otherwise rayon's global pool.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    settings: &RenderSettings,
) -> RenderResult<ImageBuffer> {
    camera.config().validate()?;
    settings.validate()?;

    let width = camera.image_width();
    let height = camera.image_height();
    let buckets = generate_buckets(width, height, settings.bucket_size);

    log::info!(
        "Rendering {}x{} at {} spp ({} buckets, max depth {})",
        width,
        height,
        camera.sqrt_spp() * camera.sqrt_spp(),
        buckets.len(),
        camera.max_depth()
    );
    let start = Instant::now();

    let render_all = || -> Vec<BucketResult> {
        buckets
            .par_iter()
            .map(|bucket| {
                let pixels = render_bucket(bucket, camera, world, lights, settings.seed);
                BucketResult::new(*bucket, pixels)
            })
            .collect()
    };

    let results = match settings.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(render_all),
        None => render_all(),
    };

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render complete in {:.2?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::HittableList;
    use crate::material::{Dielectric, DiffuseLight, Lambertian, Metal};
    use crate::planar::Quad;
    use crate::sphere::Sphere;
    use crate::BvhNode;
    use lumen_core::CameraConfig;
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn camera(width: u32, spp: u32, depth: u32, background: Color) -> Camera {
        Camera::new(
            CameraConfig::default()
                .with_image(width, 1.0)
                .with_quality(spp, depth)
                .with_position(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)
                .with_lens(60.0, 0.0, 3.0)
                .with_background(background),
        )
    }

    fn two_spheres() -> HittableList {
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(
            Vec3::new(0.0, -100.5, 0.0),
            100.0,
            Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0))),
        )));
        world.add(Arc::new(Sphere::new(
            Vec3::ZERO,
            0.5,
            Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.3)),
        )));
        world
    }

    fn bits(image: &ImageBuffer) -> Vec<[u32; 3]> {
        image
            .pixels()
            .iter()
            .map(|c| c.to_array().map(f32::to_bits))
            .collect()
    }

    #[test]
    fn test_miss_returns_background() {
        let world = HittableList::new();
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::at_time_zero(Vec3::ZERO, Vec3::Z);
        let sky = Color::new(0.5, 0.7, 1.0);
        assert_eq!(ray_color(&ray, 5, &world, None, sky, &mut rng), sky);
    }

    #[test]
    fn test_zero_depth_is_black() {
        let world = HittableList::new();
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::at_time_zero(Vec3::ZERO, Vec3::Z);
        assert_eq!(ray_color(&ray, 0, &world, None, Color::ONE, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_emitter_seen_directly() {
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(DiffuseLight::new(Color::splat(2.0))),
        )));
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::at_time_zero(Vec3::ZERO, Vec3::NEG_Z);
        let color = ray_color(&ray, 1, &world, None, Color::ZERO, &mut rng);
        assert_eq!(color, Color::splat(2.0));
    }

    #[test]
    fn test_glass_sphere_transmits_background() {
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(Dielectric::new(1.5)),
        )));
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::at_time_zero(Vec3::ZERO, Vec3::NEG_Z);
        // Glass absorbs nothing, so any escaping path carries the full background.
        for _ in 0..50 {
            let color = ray_color(&ray, 50, &world, None, Color::ONE, &mut rng);
            assert!((color - Color::ONE).length() < 1e-5);
        }
    }

    #[test]
    fn test_single_bounce_without_light_is_black() {
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Lambertian::new(Color::splat(0.7))),
        )));

        let camera = camera(16, 4, 1, Color::ZERO);
        let settings = RenderSettings::default().with_seed(1);
        let image = render(&camera, &world, None, &settings).unwrap();

        assert_eq!(image.width(), 16);
        assert_eq!(image.height(), 16);
        assert!(image.pixels().iter().all(|&c| c == Color::ZERO));
    }

    #[test]
    fn test_seeded_render_is_reproducible() {
        let world = BvhNode::new(two_spheres());
        let camera = camera(24, 4, 8, Color::new(0.7, 0.8, 1.0));
        let settings = RenderSettings {
            bucket_size: 8,
            ..RenderSettings::default()
        }
        .with_seed(42);

        let first = render(&camera, &world, None, &settings).unwrap();
        let second = render(&camera, &world, None, &settings).unwrap();
        assert_eq!(bits(&first), bits(&second));

        // Thread count and bucket size do not change a seeded image.
        let other = RenderSettings {
            bucket_size: 5,
            ..settings.clone()
        }
        .with_threads(3);
        let third = render(&camera, &world, None, &other).unwrap();
        assert_eq!(bits(&first), bits(&third));
    }

    #[test]
    fn test_light_sampling_lights_diffuse_surface() {
        let light_shape: Arc<dyn Hittable> = Arc::new(Quad::new(
            Vec3::new(-0.5, 1.0, -0.5),
            Vec3::X,
            Vec3::Z,
            Arc::new(DiffuseLight::new(Color::splat(10.0))),
        ));
        let mut world = HittableList::new();
        world.add(light_shape.clone());
        world.add(Arc::new(Quad::new(
            Vec3::new(-2.0, -1.0, 2.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -4.0),
            Arc::new(Lambertian::new(Color::splat(0.5))),
        )));
        let lights = HittableList::from_object(light_shape);

        let mut rng = StdRng::seed_from_u64(3);
        let ray = Ray::at_time_zero(Vec3::new(0.0, 0.0, 0.0), Vec3::NEG_Y);
        let mut sum = Color::ZERO;
        for _ in 0..200 {
            let c = ray_color(&ray, 2, &world, Some(&lights), Color::ZERO, &mut rng);
            assert!(c.is_finite());
            sum += c;
        }
        assert!(sum.x > 0.0);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let world = HittableList::new();
        let camera = camera(4, 1, 1, Color::ZERO);
        let settings = RenderSettings {
            bucket_size: 0,
            ..RenderSettings::default()
        };
        assert!(render(&camera, &world, None, &settings).is_err());
    }
}
