//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of bounding boxes built once over a fixed set of
//! primitives. Splits are median-of-extent, not SAH.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable, HittableList};
use lumen_math::{Aabb, Interval, Ray};
use rand::RngCore;

/// Internal BVH node. Leaves are the primitives themselves.
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a BVH over the objects of `list`.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    pub fn new(list: HittableList) -> Self {
        Self::from_objects(list.into_objects())
    }

    /// Build a BVH over `objects`.
    ///
    /// # Panics
    ///
    /// Panics if `objects` is empty.
    pub fn from_objects(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        assert!(!objects.is_empty(), "cannot build a BVH over zero primitives");
        log::debug!("Building BVH over {} primitives", objects.len());
        Self::build(&mut objects)
    }

    /// Recursive construction over a mutable slice.
    ///
    /// The split axis is the longest axis of the slice's union box; the
    /// slice is sorted by box minimum on that axis and halved.
    fn build(objects: &mut [Arc<dyn Hittable>]) -> Self {
        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));
        let axis = bbox.longest_axis();

        let (left, right): (Arc<dyn Hittable>, Arc<dyn Hittable>) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone()),
            2 => (objects[0].clone(), objects[1].clone()),
            _ => {
                objects.sort_unstable_by(|a, b| box_compare(a.as_ref(), b.as_ref(), axis));

                let mid = objects.len() / 2;
                let (lo, hi) = objects.split_at_mut(mid);
                (Arc::new(Self::build(lo)), Arc::new(Self::build(hi)))
            }
        };

        Self { left, right, bbox }
    }

    pub fn left(&self) -> &Arc<dyn Hittable> {
        &self.left
    }

    pub fn right(&self) -> &Arc<dyn Hittable> {
        &self.right
    }
}

fn box_compare(a: &dyn Hittable, b: &dyn Hittable, axis: usize) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.total_cmp(&b_min)
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        let hit_left = self.left.hit(ray, ray_t, rec, rng);

        // Only check right up to closest hit
        let right_max = if hit_left { rec.t } else { ray_t.max };
        let hit_right = self
            .right
            .hit(ray, Interval::new(ray_t.min, right_max), rec, rng);

        hit_left || hit_right
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Lambertian, Material};
    use crate::planar::Quad;
    use crate::sphere::Sphere;
    use lumen_math::{sampling, Color, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere(center: Vec3, radius: f32) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            center,
            radius,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        ))
    }

    fn random_scene(rng: &mut StdRng, count: usize) -> HittableList {
        let mut list = HittableList::new();
        for i in 0..count {
            let center = sampling::random_vec3_range(rng, -10.0, 10.0);
            // Each primitive gets its own material so hits can be told apart.
            let material: Arc<dyn Material> =
                Arc::new(Lambertian::new(Color::splat(i as f32 / count as f32)));
            if i % 4 == 0 {
                let u = sampling::random_vec3_range(rng, -2.0, 2.0);
                let v = sampling::random_vec3_range(rng, -2.0, 2.0);
                list.add(Arc::new(Quad::new(center, u, v, material)));
            } else {
                let radius = sampling::gen_range_f32(rng, 0.2, 1.5);
                list.add(Arc::new(Sphere::new(center, radius, material)));
            }
        }
        list
    }

    #[test]
    #[should_panic(expected = "zero primitives")]
    fn test_bvh_empty_panics() {
        BvhNode::from_objects(Vec::new());
    }

    #[test]
    fn test_bvh_single_primitive_shares_leaf() {
        let bvh = BvhNode::from_objects(vec![sphere(Vec3::new(0.0, 0.0, -1.0), 0.5)]);
        assert!(Arc::ptr_eq(bvh.left(), bvh.right()));

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::at_time_zero(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_two_primitives_are_direct_leaves() {
        let a = sphere(Vec3::new(-2.0, 0.0, -5.0), 0.5);
        let b = sphere(Vec3::new(2.0, 0.0, -5.0), 0.5);
        let bvh = BvhNode::from_objects(vec![a.clone(), b.clone()]);

        assert!(Arc::ptr_eq(bvh.left(), &a));
        assert!(Arc::ptr_eq(bvh.right(), &b));
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<_> = (0..10)
            .map(|i| sphere(Vec3::new(i as f32, 0.0, -5.0), 0.5))
            .collect();
        let bvh = BvhNode::from_objects(spheres);

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::at_time_zero(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((rec.p.z - (-4.5)).abs() < 0.01);
    }

    #[test]
    fn test_bvh_bbox_covers_all_primitives() {
        let mut rng = StdRng::seed_from_u64(21);
        let list = random_scene(&mut rng, 50);
        let expected = list.bounding_box();
        let bvh = BvhNode::new(list);
        assert_eq!(bvh.bounding_box(), expected);
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(2024);
        let list = random_scene(&mut rng, 200);
        let bvh = BvhNode::new(list.clone());
        let ray_t = Interval::new(0.001, f32::INFINITY);

        let mut hits = 0;
        for _ in 0..2000 {
            let origin = sampling::random_vec3_range(&mut rng, -15.0, 15.0);
            let direction = sampling::random_unit_vector(&mut rng);
            let ray = Ray::at_time_zero(origin, direction);

            let mut linear_rec = HitRecord::default();
            let mut bvh_rec = HitRecord::default();
            let linear_hit = list.hit(&ray, ray_t, &mut linear_rec, &mut rng);
            let bvh_hit = bvh.hit(&ray, ray_t, &mut bvh_rec, &mut rng);

            assert_eq!(linear_hit, bvh_hit);
            if linear_hit {
                hits += 1;
                assert!((linear_rec.t - bvh_rec.t).abs() < 1e-4);
                assert!(std::ptr::addr_eq(linear_rec.material, bvh_rec.material));
            }
        }
        assert!(hits > 100, "too few hits to be meaningful: {hits}");
    }
}
