//! Cornell box example.
//!
//! Renders the classic box with a rotated block, a glass sphere and a
//! sampled ceiling light, then saves a PPM.
//!
//! Usage: `cornell_box [scene.json] [output.ppm]`. The optional JSON file
//! overrides camera and render settings.

use std::sync::Arc;

use anyhow::Context;
use lumen_core::{CameraConfig, SceneConfig};
use lumen_renderer::{
    make_box, render, BvhNode, Camera, Color, Dielectric, DiffuseLight, Hittable, HittableList,
    Lambertian, Material, Quad, RotateY, Sphere, Translate, Vec3,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SceneConfig::from_json_file(&path)
            .with_context(|| format!("failed to load scene config {}", path))?,
        None => SceneConfig {
            camera: default_camera(),
            ..SceneConfig::default()
        },
    };
    let output = args.next().unwrap_or_else(|| "cornell_box.ppm".to_string());

    let start = std::time::Instant::now();
    let (world, lights) = build_scene();
    log::info!("Scene built in {:?}", start.elapsed());

    let camera = Camera::new(config.camera);
    let image = render(&camera, &world, Some(&lights), &config.render)?;
    image
        .save_ppm(&output)
        .with_context(|| format!("failed to save {}", output))?;

    Ok(())
}

fn default_camera() -> CameraConfig {
    CameraConfig::default()
        .with_image(600, 1.0)
        .with_quality(100, 50)
        .with_position(
            Vec3::new(278.0, 278.0, -800.0), // look_from
            Vec3::new(278.0, 278.0, 0.0),    // look_at
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Color::ZERO)
}

fn build_scene() -> (BvhNode, HittableList) {
    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    let mut world = HittableList::new();

    // Walls
    world.add(Arc::new(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
    )));

    // Ceiling light, facing down
    let ceiling_light: Arc<dyn Hittable> = Arc::new(Quad::new(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light,
    ));
    world.add(ceiling_light.clone());

    // Tall block
    let block = make_box(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white);
    let block = Arc::new(RotateY::new(Arc::new(block), 15.0));
    world.add(Arc::new(Translate::new(block, Vec3::new(265.0, 0.0, 295.0))));

    // Glass sphere
    let glass: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(190.0, 90.0, 190.0),
        90.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(glass.clone());

    let mut lights = HittableList::new();
    lights.add(ceiling_light);
    lights.add(glass);

    (BvhNode::new(world), lights)
}
