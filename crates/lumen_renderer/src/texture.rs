//! Surface color lookups by UV and world position.

use std::sync::Arc;

use crate::perlin::Perlin;
use lumen_core::{TextureCache, TextureImage};
use lumen_math::{Color, Point3};
use rand::RngCore;

/// Number of octaves summed by [`NoiseTexture`].
const TURBULENCE_DEPTH: u32 = 7;

pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Point3) -> Color;
}

/// Constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Point3) -> Color {
        self.albedo
    }
}

/// Alternates two textures on a 3D lattice of cells `scale` wide.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Point3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum.rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Looks up a decoded image by UV. Missing images show up magenta.
pub struct ImageTexture {
    image: Arc<TextureImage>,
}

impl ImageTexture {
    pub fn new(image: Arc<TextureImage>) -> Self {
        Self { image }
    }

    /// Find `filename` in the usual image directories, falling back to the
    /// placeholder when it cannot be loaded.
    pub fn open(filename: &str) -> Self {
        Self::new(Arc::new(TextureImage::find_or_missing(filename)))
    }

    /// Share a decoded image through `cache`, so textures naming the same
    /// file decode it once.
    pub fn cached(cache: &mut TextureCache, path: &str) -> Self {
        Self::new(cache.load_or_missing(path))
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Point3) -> Color {
        // Flip v: image rows run top to bottom.
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = (u * self.image.width() as f32) as i64;
        let j = (v * self.image.height() as f32) as i64;
        let [r, g, b] = self.image.pixel(i, j);

        let scale = 1.0 / 255.0;
        Color::new(r as f32, g as f32, b as f32) * scale
    }
}

/// Marble-like bands driven by Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Point3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turb(p, TURBULENCE_DEPTH);
        Color::splat(0.5) * (1.0 + phase.sin())
    }
}
