//! Instances: a shared object placed by a rigid transform.
//!
//! Rays are moved into the object's local space, intersected there, and the
//! hit is moved back, so one prototype can appear many times.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use lumen_math::{Aabb, Interval, Mat3, Mat4, Mat4Ext, Point3, Ray, Vec3};
use rand::RngCore;

/// An object shifted by `offset`.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let offset_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        if !self.object.hit(&offset_ray, ray_t, rec, rng) {
            return false;
        }

        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Point3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        self.object.pdf_value(origin - self.offset, direction, rng)
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin - self.offset, rng)
    }
}

/// An object rotated about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    to_world: Mat3,
    to_local: Mat3,
    bbox: Aabb,
}

impl RotateY {
    /// Rotate counter-clockwise (seen from +Y) by `angle` degrees.
    pub fn new(object: Arc<dyn Hittable>, angle: f32) -> Self {
        let to_world = Mat3::from_rotation_y(angle.to_radians());
        let bbox = Mat4::from_mat3(to_world).transform_aabb(&object.bounding_box());

        Self {
            object,
            to_world,
            // Rotations are orthonormal
            to_local: to_world.transpose(),
            bbox,
        }
    }
}

impl Hittable for RotateY {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let rotated_ray = Ray::new(
            self.to_local * ray.origin(),
            self.to_local * ray.direction(),
            ray.time(),
        );

        if !self.object.hit(&rotated_ray, ray_t, rec, rng) {
            return false;
        }

        rec.p = self.to_world * rec.p;
        rec.normal = self.to_world * rec.normal;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Point3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        self.object
            .pdf_value(self.to_local * origin, self.to_local * direction, rng)
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        self.to_world * self.object.random(self.to_local * origin, rng)
    }
}
