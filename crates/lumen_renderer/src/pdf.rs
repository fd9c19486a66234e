//! Direction sampling densities for importance sampling.
//!
//! All densities are over solid angle.

use std::f32::consts::PI;

use crate::hittable::Hittable;
use lumen_math::{sampling, Onb, Point3, Vec3};
use rand::{Rng, RngCore};

/// A probability density over directions that can also be sampled.
pub trait Pdf {
    /// Density of `direction`. Need not be normalized.
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32;

    /// Draw a direction distributed by this density.
    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Uniform over the whole sphere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpherePdf;

impl Pdf for SpherePdf {
    fn value(&self, _direction: Vec3, _rng: &mut dyn RngCore) -> f32 {
        1.0 / (4.0 * PI)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        sampling::random_unit_vector(rng)
    }
}

/// Cosine-weighted hemisphere around a normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(w: Vec3) -> Self {
        Self { uvw: Onb::new(w) }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3, _rng: &mut dyn RngCore) -> f32 {
        let cosine_theta = direction.normalize().dot(self.uvw.w);
        (cosine_theta / PI).max(0.0)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.transform(sampling::random_cosine_direction(rng))
    }
}

/// Samples directions toward a shape, as seen from `origin`.
pub struct HittablePdf<'a> {
    objects: &'a dyn Hittable,
    origin: Point3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(objects: &'a dyn Hittable, origin: Point3) -> Self {
        Self { objects, origin }
    }
}

impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        self.objects.pdf_value(self.origin, direction, rng)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.objects.random(self.origin, rng)
    }
}

/// Equal-weight blend of two densities.
pub struct MixturePdf<'a> {
    p: [&'a dyn Pdf; 2],
}

impl<'a> MixturePdf<'a> {
    pub fn new(p0: &'a dyn Pdf, p1: &'a dyn Pdf) -> Self {
        Self { p: [p0, p1] }
    }
}

impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        0.5 * self.p[0].value(direction, rng) + 0.5 * self.p[1].value(direction, rng)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if rng.gen_bool(0.5) {
            self.p[0].generate(rng)
        } else {
            self.p[1].generate(rng)
        }
    }
}

/// The density a non-specular material scatters with.
#[derive(Debug, Clone, Copy)]
pub enum MaterialPdf {
    Cosine(CosinePdf),
    Sphere(SpherePdf),
}

impl Pdf for MaterialPdf {
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        match self {
            MaterialPdf::Cosine(pdf) => pdf.value(direction, rng),
            MaterialPdf::Sphere(pdf) => pdf.value(direction, rng),
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            MaterialPdf::Cosine(pdf) => pdf.generate(rng),
            MaterialPdf::Sphere(pdf) => pdf.generate(rng),
        }
    }
}
