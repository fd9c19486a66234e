//! Material trait and implementations.
//!
//! Materials either hand back an explicit specular ray or a density the
//! integrator samples (possibly mixed with light sampling).

use std::f32::consts::PI;
use std::sync::Arc;

use crate::hittable::HitRecord;
use crate::pdf::{CosinePdf, MaterialPdf, SpherePdf};
use crate::texture::{SolidColor, Texture};
use lumen_math::{sampling, Color, Point3, Ray, Vec3Ext};
use rand::RngCore;

/// How the next ray leaves a surface.
#[derive(Debug, Clone, Copy)]
pub enum ScatterKind {
    /// A delta lobe: follow this ray and skip density evaluation.
    Specular(Ray),
    /// Sample this density for the next direction.
    Sampled(MaterialPdf),
}

/// Result of a scatter event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterRecord {
    pub attenuation: Color,
    pub kind: ScatterKind,
}

impl ScatterRecord {
    pub fn specular(attenuation: Color, ray: Ray) -> Self {
        Self {
            attenuation,
            kind: ScatterKind::Specular(ray),
        }
    }

    pub fn sampled(attenuation: Color, pdf: MaterialPdf) -> Self {
        Self {
            attenuation,
            kind: ScatterKind::Sampled(pdf),
        }
    }

    /// True for delta materials, which bypass importance sampling.
    pub fn skip_pdf(&self) -> bool {
        matches!(self.kind, ScatterKind::Specular(_))
    }
}

/// Material trait for surface scattering behavior.
///
/// Every method has an absorbing, non-emitting default.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray. `None` means the ray is absorbed.
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        None
    }

    /// Radiance emitted toward `ray_in`.
    fn emitted(&self, _ray_in: &Ray, _rec: &HitRecord, _u: f32, _v: f32, _p: Point3) -> Color {
        Color::ZERO
    }

    /// Density with which this material scatters `ray_in` into `scattered`.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }
}

/// Lambertian (diffuse) material
pub struct Lambertian {
    tex: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self::with_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn with_texture(tex: Arc<dyn Texture>) -> Self {
        Self { tex }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::sampled(
            self.tex.value(rec.u, rec.v, rec.p),
            MaterialPdf::Cosine(CosinePdf::new(rec.normal)),
        ))
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let cos_theta = rec.normal.dot(scattered.direction().normalize());
        (cos_theta / PI).max(0.0)
    }
}

/// Metal (reflective) material
#[derive(Debug, Clone, Copy)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// `fuzz` is clamped to [0, 1]; zero is a perfect mirror.
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let reflected = ray_in.direction().reflect_about(rec.normal).normalize()
            + self.fuzz * sampling::random_unit_vector(rng);

        // Fuzz can push the reflection below the surface.
        if reflected.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord::specular(
            self.albedo,
            Ray::new(rec.p, reflected, ray_in.time()),
        ))
    }
}

/// Dielectric (glass) material
#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    /// Refractive index relative to the surrounding medium
    refraction_index: f32,
}

impl Dielectric {
    pub fn new(refraction_index: f32) -> Self {
        Self { refraction_index }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, refraction_index: f32) -> f32 {
        let r0 = (1.0 - refraction_index) / (1.0 + refraction_index);
        let r0 = r0 * r0;
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let ri = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = ri * sin_theta > 1.0;
        let direction =
            if cannot_refract || Self::reflectance(cos_theta, ri) > sampling::gen_f32(rng) {
                unit_direction.reflect_about(rec.normal)
            } else {
                unit_direction.refract_through(rec.normal, ri)
            };

        Some(ScatterRecord::specular(
            Color::ONE,
            Ray::new(rec.p, direction, ray_in.time()),
        ))
    }
}

/// Emits a texture's color from its front face and never scatters.
pub struct DiffuseLight {
    tex: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self::with_texture(Arc::new(SolidColor::new(emit)))
    }

    pub fn with_texture(tex: Arc<dyn Texture>) -> Self {
        Self { tex }
    }
}

impl Material for DiffuseLight {
    fn emitted(&self, _ray_in: &Ray, rec: &HitRecord, u: f32, v: f32, p: Point3) -> Color {
        if !rec.front_face {
            return Color::ZERO;
        }
        self.tex.value(u, v, p)
    }
}

/// Scatters uniformly in all directions. Used as the phase function of
/// participating media.
pub struct Isotropic {
    tex: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::with_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn with_texture(tex: Arc<dyn Texture>) -> Self {
        Self { tex }
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::sampled(
            self.tex.value(rec.u, rec.v, rec.p),
            MaterialPdf::Sphere(SpherePdf),
        ))
    }

    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        1.0 / (4.0 * PI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::Pdf;
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record_facing(normal: Vec3, front_face: bool) -> HitRecord<'static> {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            front_face,
            t: 1.0,
            ..HitRecord::default()
        }
    }

    #[test]
    fn test_lambertian_samples_cosine_pdf() {
        let mat = Lambertian::new(Color::new(0.5, 0.5, 0.5));
        let rec = record_facing(Vec3::Y, true);
        let ray = Ray::at_time_zero(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let mut rng = StdRng::seed_from_u64(42);

        let srec = mat.scatter(&ray, &rec, &mut rng).unwrap();
        assert!(!srec.skip_pdf());
        assert_eq!(srec.attenuation, Color::splat(0.5));

        let ScatterKind::Sampled(pdf) = srec.kind else {
            panic!("lambertian scattered specularly");
        };
        let dir = pdf.generate(&mut rng);
        let scattered = Ray::at_time_zero(rec.p, dir);
        let expected = pdf.value(dir, &mut rng);
        assert!((mat.scattering_pdf(&ray, &rec, &scattered) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_lambertian_pdf_zero_below_surface() {
        let mat = Lambertian::new(Color::ONE);
        let rec = record_facing(Vec3::Y, true);
        let ray = Ray::at_time_zero(Vec3::Y, Vec3::NEG_Y);
        let below = Ray::at_time_zero(Vec3::ZERO, Vec3::NEG_Y);
        assert_eq!(mat.scattering_pdf(&ray, &rec, &below), 0.0);
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let mat = Metal::new(Color::new(0.8, 0.8, 0.8), 0.0);
        let rec = record_facing(Vec3::Y, true);
        let ray = Ray::at_time_zero(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(42);

        let srec = mat.scatter(&ray, &rec, &mut rng).unwrap();
        assert!(srec.skip_pdf());
        let ScatterKind::Specular(out) = srec.kind else {
            panic!("metal must be specular");
        };
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((out.direction() - expected).length() < 1e-5);
    }

    #[test]
    fn test_metal_clamps_fuzz() {
        let mat = Metal::new(Color::ONE, 3.0);
        assert_eq!(mat.fuzz, 1.0);
    }

    #[test]
    fn test_dielectric_always_scatters_with_unit_attenuation() {
        let mat = Dielectric::new(1.5);
        let mut rng = StdRng::seed_from_u64(42);

        for i in 0..500 {
            let angle = i as f32 / 500.0 * std::f32::consts::FRAC_PI_2;
            let dir = Vec3::new(angle.sin(), -angle.cos(), 0.0);
            let ray = Ray::at_time_zero(Vec3::Y, dir);
            for front_face in [true, false] {
                let rec = record_facing(Vec3::Y, front_face);
                let srec = mat.scatter(&ray, &rec, &mut rng).unwrap();
                assert!(srec.skip_pdf());
                assert_eq!(srec.attenuation, Color::ONE);
            }
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mat = Dielectric::new(1.5);
        // Inside the glass at a grazing angle: sin(theta) * 1.5 > 1.
        let rec = record_facing(Vec3::Y, false);
        let dir = Vec3::new(0.9, -0.1, 0.0).normalize();
        let ray = Ray::at_time_zero(Vec3::Y, dir);
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..20 {
            let srec = mat.scatter(&ray, &rec, &mut rng).unwrap();
            let ScatterKind::Specular(out) = srec.kind else {
                panic!("dielectric must be specular");
            };
            assert!(out.direction().y > 0.0);
        }
    }

    #[test]
    fn test_diffuse_light_emits_front_face_only() {
        let light = DiffuseLight::new(Color::splat(4.0));
        let ray = Ray::at_time_zero(Vec3::Y, Vec3::NEG_Y);
        let mut rng = StdRng::seed_from_u64(0);

        let front = record_facing(Vec3::Y, true);
        let back = record_facing(Vec3::Y, false);
        assert_eq!(light.emitted(&ray, &front, 0.0, 0.0, front.p), Color::splat(4.0));
        assert_eq!(light.emitted(&ray, &back, 0.0, 0.0, back.p), Color::ZERO);
        assert!(light.scatter(&ray, &front, &mut rng).is_none());
    }

    #[test]
    fn test_isotropic_uniform_density() {
        let mat = Isotropic::new(Color::splat(0.3));
        let rec = record_facing(Vec3::X, true);
        let ray = Ray::at_time_zero(Vec3::ZERO, Vec3::X);
        let mut rng = StdRng::seed_from_u64(0);

        let srec = mat.scatter(&ray, &rec, &mut rng).unwrap();
        assert!(!srec.skip_pdf());
        let scattered = Ray::at_time_zero(Vec3::ZERO, Vec3::NEG_Z);
        assert!((mat.scattering_pdf(&ray, &rec, &scattered) - 1.0 / (4.0 * PI)).abs() < 1e-7);
    }
}
