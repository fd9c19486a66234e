//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use crate::material::Material;
use lumen_math::{sampling, Aabb, Interval, Point3, Ray, Vec3};
use rand::{Rng, RngCore};

/// A dummy material used for HitRecord::default().
/// Always absorbs light.
struct DummyMaterial;

impl Material for DummyMaterial {}

static DUMMY_MATERIAL: DummyMaterial = DummyMaterial;

/// Record of a ray-object intersection.
///
/// Filled in place during traversal; a shape only writes it when it finds a
/// hit inside the interval it was given.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Unit surface normal, always pointing against the incoming ray
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface UV coordinates
    pub u: f32,
    pub v: f32,
    /// Ray parameter of the intersection
    pub t: f32,
    /// Whether the ray hit the outward-facing side of the surface
    pub front_face: bool,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: &DUMMY_MATERIAL,
            u: 0.0,
            v: 0.0,
            t: 0.0,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Orient the stored normal against the ray.
    ///
    /// `outward_normal` must be unit length.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can hit.
///
/// `pdf_value` and `random` make a shape usable as an importance-sampled
/// light; shapes that cannot be sampled keep the defaults.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within `ray_t`.
    ///
    /// Returns true if hit, and fills in the hit record. `rng` is only drawn
    /// from by stochastic shapes such as participating media.
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;

    /// Solid-angle density of sampling `direction` from `origin` toward this shape.
    fn pdf_value(&self, _origin: Point3, _direction: Vec3, _rng: &mut dyn RngCore) -> f32 {
        0.0
    }

    /// A direction from `origin` toward a random point on this shape.
    fn random(&self, _origin: Point3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::X
    }
}

/// An unordered list of hittable objects, linearly scanned.
#[derive(Clone)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// A list holding a single object.
    pub fn from_object(object: Arc<dyn Hittable>) -> Self {
        let mut list = Self::new();
        list.add(object);
        list
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<Arc<dyn Hittable>> {
        self.objects
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, Interval::new(ray_t.min, closest_so_far), rec, rng) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Average of the member densities: each member is picked with equal
    /// probability by [`HittableList::random`].
    ///
    /// An empty list reports 0 for every direction even though `random`
    /// still returns a uniform direction. Pass `None` as the light set to
    /// the renderer instead of an empty list; a zero density ends the path.
    fn pdf_value(&self, origin: Point3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        if self.objects.is_empty() {
            return 0.0;
        }
        let weight = 1.0 / self.objects.len() as f32;
        self.objects
            .iter()
            .map(|object| weight * object.pdf_value(origin, direction, rng))
            .sum()
    }

    /// Direction toward a uniformly chosen member. An empty list falls back
    /// to a uniform direction; its density still reads 0.
    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        if self.objects.is_empty() {
            return sampling::random_unit_vector(rng);
        }
        let index = rng.gen_range(0..self.objects.len());
        self.objects[index].random(origin, rng)
    }
}
