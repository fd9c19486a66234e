//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::{Arc, Once};

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use lumen_math::{sampling, Aabb, Interval, Onb, Point3, Ray, Vec3};
use rand::RngCore;

static MOVING_LIGHT_WARNING: Once = Once::new();

/// A sphere, optionally moving linearly from `center` at time 0 to
/// `center2` at time 1.
pub struct Sphere {
    /// Center path; a zero direction means the sphere is stationary.
    center: Ray,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Point3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center: Ray::at_time_zero(center, Vec3::ZERO),
            radius,
            material,
            bbox,
        }
    }

    /// A sphere moving from `center1` at time 0 to `center2` at time 1.
    pub fn new_moving(
        center1: Point3,
        center2: Point3,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);
        let box2 = Aabb::from_points(center2 - rvec, center2 + rvec);

        Self {
            center: Ray::at_time_zero(center1, center2 - center1),
            radius,
            material,
            bbox: Aabb::surrounding(&box1, &box2),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.center.direction() != Vec3::ZERO
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from +Y
        // phi: angle around Y axis from -X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }

    /// Light sampling aims at the time-0 center.
    fn sampling_center(&self) -> Point3 {
        if self.is_moving() {
            MOVING_LIGHT_WARNING.call_once(|| {
                log::warn!("Sampling a moving sphere as a light; using its position at time 0");
            });
        }
        self.center.at(0.0)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let current_center = self.center.at(ray.time());
        let oc = current_center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - current_center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::get_sphere_uv(outward_normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Point3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        let mut rec = HitRecord::default();
        let ray = Ray::at_time_zero(origin, direction);
        if !self.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, rng) {
            return 0.0;
        }

        let distance_squared = (self.sampling_center() - origin).length_squared();
        if distance_squared <= self.radius * self.radius {
            // Every direction from inside reaches the surface.
            return 1.0 / (4.0 * PI);
        }
        let cos_theta_max = (1.0 - self.radius * self.radius / distance_squared).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);

        1.0 / solid_angle
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.sampling_center() - origin;
        let distance_squared = direction.length_squared();
        if distance_squared <= self.radius * self.radius {
            return sampling::random_unit_vector(rng);
        }
        let uvw = Onb::new(direction);
        uvw.transform(sampling::random_to_sphere(rng, self.radius, distance_squared))
    }
}
