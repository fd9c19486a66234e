//! Homogeneous participating media (fog, smoke).

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::material::{Isotropic, Material};
use crate::texture::Texture;
use lumen_math::{sampling, Aabb, Color, Interval, Ray, Vec3};
use rand::RngCore;

/// Small step past the entry point when searching for the exit.
const EXIT_SEARCH_OFFSET: f32 = 0.0001;

/// A volume of constant density filling a closed boundary.
///
/// Rays scatter inside with probability growing with the distance
/// travelled through the volume.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self::with_phase_function(boundary, density, Arc::new(Isotropic::new(albedo)))
    }

    pub fn with_texture(boundary: Arc<dyn Hittable>, density: f32, tex: Arc<dyn Texture>) -> Self {
        Self::with_phase_function(boundary, density, Arc::new(Isotropic::with_texture(tex)))
    }

    fn with_phase_function(
        boundary: Arc<dyn Hittable>,
        density: f32,
        phase_function: Arc<dyn Material>,
    ) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function,
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let mut entry = HitRecord::default();
        let mut exit = HitRecord::default();

        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut entry, rng) {
            return false;
        }
        let exit_t = Interval::new(entry.t + EXIT_SEARCH_OFFSET, f32::INFINITY);
        if !self.boundary.hit(ray, exit_t, &mut exit, rng) {
            return false;
        }

        let t_enter = entry.t.max(ray_t.min).max(0.0);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return false;
        }

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * sampling::gen_f32(rng).ln();

        if hit_distance > distance_inside_boundary {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        rec.u = 0.0;
        rec.v = 0.0;
        // Arbitrary; the phase function ignores orientation
        rec.normal = Vec3::X;
        rec.front_face = true;
        rec.material = self.phase_function.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
