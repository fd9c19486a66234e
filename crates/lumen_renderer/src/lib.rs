//! Lumen renderer - CPU path tracing
//!
//! A Monte Carlo path tracer with BVH acceleration, importance-sampled
//! lights and motion blur. Scenes are built in code from shared
//! [`Hittable`]s and [`Material`]s, then rendered in parallel buckets.

mod bucket;
mod bvh;
mod camera;
mod constant_medium;
mod error;
mod hittable;
mod instance;
mod material;
mod output;
mod pdf;
mod perlin;
mod planar;
mod renderer;
mod sphere;
mod texture;

pub use bucket::{generate_buckets, pixel_rng, render_bucket, Bucket, BucketResult};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use constant_medium::ConstantMedium;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{RotateY, Translate};
pub use material::{
    Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterKind, ScatterRecord,
};
pub use output::{color_to_rgb8, linear_to_gamma, write_ppm, ImageBuffer};
pub use pdf::{CosinePdf, HittablePdf, MaterialPdf, MixturePdf, Pdf, SpherePdf};
pub use perlin::Perlin;
pub use planar::{
    make_box, Circle, Disk, Parallelogram, Planar, PlanarBoundary, Quad, Triangle,
    TriangleBoundary,
};
pub use renderer::{ray_color, render, render_pixel, MIN_PDF_VALUE, SHADOW_ACNE_EPSILON};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};

/// Re-export common math types from lumen_math
pub use lumen_math::{Aabb, Color, Interval, Point3, Ray, Vec3};
