//! Flat primitives: parallelograms, disks and triangles.
//!
//! All three share the plane intersection and light sampling; they differ
//! only in which planar coordinates `(alpha, beta)` along the `u` and `v`
//! edges count as inside.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::material::Material;
use lumen_math::{sampling, Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;

/// Rays closer to parallel with the plane than this are treated as misses.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Region of the plane a [`Planar`] shape covers.
pub trait PlanarBoundary: Send + Sync {
    /// Whether planar coordinates `(alpha, beta)` fall inside the shape.
    fn is_interior(&self, alpha: f32, beta: f32) -> bool;

    /// Shape area as a multiple of `|u x v|`.
    fn area_factor(&self) -> f32;

    /// Uniformly distributed interior point in planar coordinates.
    fn sample(&self, rng: &mut dyn RngCore) -> (f32, f32);

    /// Planar coordinates whose hull contains the shape.
    fn hull(&self) -> [(f32, f32); 4];
}

/// `0 <= alpha, beta <= 1`
#[derive(Debug, Clone, Copy, Default)]
pub struct Parallelogram;

impl PlanarBoundary for Parallelogram {
    fn is_interior(&self, alpha: f32, beta: f32) -> bool {
        let unit = Interval::new(0.0, 1.0);
        unit.contains(alpha) && unit.contains(beta)
    }

    fn area_factor(&self) -> f32 {
        1.0
    }

    fn sample(&self, rng: &mut dyn RngCore) -> (f32, f32) {
        (sampling::gen_f32(rng), sampling::gen_f32(rng))
    }

    fn hull(&self) -> [(f32, f32); 4] {
        [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]
    }
}

/// Ellipse centered on the origin point, `radius` measured in edge units.
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    radius: f32,
}

impl Circle {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl PlanarBoundary for Circle {
    fn is_interior(&self, alpha: f32, beta: f32) -> bool {
        alpha * alpha + beta * beta < self.radius * self.radius
    }

    fn area_factor(&self) -> f32 {
        PI * self.radius * self.radius
    }

    fn sample(&self, rng: &mut dyn RngCore) -> (f32, f32) {
        let r = self.radius * sampling::gen_f32(rng).sqrt();
        let phi = 2.0 * PI * sampling::gen_f32(rng);
        (r * phi.cos(), r * phi.sin())
    }

    fn hull(&self) -> [(f32, f32); 4] {
        let r = self.radius;
        [(-r, -r), (r, -r), (-r, r), (r, r)]
    }
}

/// `alpha, beta > 0` and `alpha + beta < 1`; edges are outside.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriangleBoundary;

impl PlanarBoundary for TriangleBoundary {
    fn is_interior(&self, alpha: f32, beta: f32) -> bool {
        alpha > 0.0 && beta > 0.0 && alpha + beta < 1.0
    }

    fn area_factor(&self) -> f32 {
        0.5
    }

    fn sample(&self, rng: &mut dyn RngCore) -> (f32, f32) {
        let alpha = sampling::gen_f32(rng);
        let beta = sampling::gen_f32(rng);
        if alpha + beta > 1.0 {
            (1.0 - alpha, 1.0 - beta)
        } else {
            (alpha, beta)
        }
    }

    fn hull(&self) -> [(f32, f32); 4] {
        [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)]
    }
}

/// A flat shape spanned from `q` by edge vectors `u` and `v`.
pub struct Planar<B: PlanarBoundary> {
    q: Point3,
    u: Vec3,
    v: Vec3,
    /// `n / (n . n)` for the unnormalized normal, used to solve for planar coordinates
    w: Vec3,
    normal: Vec3,
    d: f32,
    area: f32,
    boundary: B,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

pub type Quad = Planar<Parallelogram>;
pub type Disk = Planar<Circle>;
pub type Triangle = Planar<TriangleBoundary>;

impl<B: PlanarBoundary> Planar<B> {
    pub fn with_boundary(
        q: Point3,
        u: Vec3,
        v: Vec3,
        boundary: B,
        material: Arc<dyn Material>,
    ) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);
        let area = boundary.area_factor() * n.length();

        let [first, rest @ ..] = boundary.hull().map(|(a, b)| q + a * u + b * v);
        let (lo, hi) = rest
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            area,
            boundary,
            material,
            bbox: Aabb::from_points(lo, hi),
        }
    }

    pub fn area(&self) -> f32 {
        self.area
    }
}

impl Quad {
    /// Parallelogram with corner `q` and edges `u`, `v`.
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::with_boundary(q, u, v, Parallelogram, material)
    }
}

impl Disk {
    /// Disk centered at `center` in the plane of `u` and `v`.
    pub fn new(center: Point3, u: Vec3, v: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self::with_boundary(center, u, v, Circle::new(radius), material)
    }
}

impl Triangle {
    /// Triangle with vertices `q`, `q + u` and `q + v`.
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::with_boundary(q, u, v, TriangleBoundary, material)
    }

    pub fn from_vertices(a: Point3, b: Point3, c: Point3, material: Arc<dyn Material>) -> Self {
        Self::new(a, b - a, c - a, material)
    }
}

impl<B: PlanarBoundary> Hittable for Planar<B> {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        let intersection = ray.at(t);
        let planar_hitpt = intersection - self.q;
        let alpha = self.w.dot(planar_hitpt.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt));

        if !self.boundary.is_interior(alpha, beta) {
            return false;
        }

        rec.t = t;
        rec.p = intersection;
        rec.u = alpha;
        rec.v = beta;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

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

        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = (direction.dot(rec.normal) / direction.length()).abs();

        distance_squared / (cosine * self.area)
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        let (alpha, beta) = self.boundary.sample(rng);
        let p = self.q + alpha * self.u + beta * self.v;
        p - origin
    }
}

/// The six sides of the axis-aligned box with opposite corners `a` and `b`.
pub fn make_box(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Vec3::new(min.x, min.y, max.z), dx, dy),  // front
        (Vec3::new(max.x, min.y, max.z), -dz, dy), // right
        (Vec3::new(max.x, min.y, min.z), -dx, dy), // back
        (Vec3::new(min.x, min.y, min.z), dz, dy),  // left
        (Vec3::new(min.x, max.y, max.z), dx, -dz), // top
        (Vec3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];
    for (q, u, v) in faces {
        sides.add(Arc::new(Quad::new(q, u, v, material.clone())));
    }

    sides
}
