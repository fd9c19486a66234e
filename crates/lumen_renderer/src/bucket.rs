//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon, then gathered back in row-major order.

use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::renderer::render_pixel;
use lumen_math::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Spreads pixel indices across the seed space.
const PIXEL_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position of this bucket in row-major order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Split an image into `bucket_size` tiles, row-major. Edge tiles are
/// clipped to the image.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    buckets
}

/// Generator for one pixel when rendering with a fixed seed.
///
/// Depends only on the seed and the pixel's row-major index, so output does
/// not depend on which thread renders the pixel.
pub fn pixel_rng(seed: u64, pixel_index: u64) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(pixel_index.wrapping_mul(PIXEL_SEED_STRIDE)))
}

/// Render a single bucket to a vector of colors.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    seed: Option<u64>,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);
    let mut thread_rng = rand::thread_rng();
    let image_width = camera.image_width() as u64;

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;

            let color = match seed {
                Some(seed) => {
                    let index = global_y as u64 * image_width + global_x as u64;
                    let mut rng = pixel_rng(seed, index);
                    render_pixel(camera, world, lights, global_x, global_y, &mut rng)
                }
                None => render_pixel(camera, world, lights, global_x, global_y, &mut thread_rng),
            };
            pixels.push(color);
        }
    }

    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}
