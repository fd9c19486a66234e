// Extension traits over glam types used by the path tracer.

use crate::Aabb;
use glam::{Mat4, Vec3};

/// Extra vector operations for scattering.
pub trait Vec3Ext {
    /// Mirror `self` about the plane with normal `n`.
    fn reflect_about(&self, n: Vec3) -> Vec3;

    /// Refract the unit vector `self` through a surface with unit normal `n`
    /// (facing against `self`), with `etai_over_etat` the index ratio.
    fn refract_through(&self, n: Vec3, etai_over_etat: f32) -> Vec3;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn reflect_about(&self, n: Vec3) -> Vec3 {
        *self - 2.0 * self.dot(n) * n
    }

    #[inline]
    fn refract_through(&self, n: Vec3, etai_over_etat: f32) -> Vec3 {
        let cos_theta = (-*self).dot(n).min(1.0);
        let r_out_perp = etai_over_etat * (*self + cos_theta * n);
        let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
        r_out_perp + r_out_parallel
    }
}

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let corners = aabb.corners();
        let first = self.transform_point3(corners[0]);

        let (lo, hi) = corners[1..]
            .iter()
            .map(|&corner| self.transform_point3(corner))
            .fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));

        Aabb::from_points(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_reflect_about() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(v.reflect_about(Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_with_unit_ratio_passes_straight() {
        let v = Vec3::new(1.0, -1.0, 0.0).normalize();
        let refracted = v.refract_through(Vec3::Y, 1.0);
        assert!((refracted - v).length() < 1e-5);
    }

    #[test]
    fn test_refract_bends_toward_normal() {
        let v = Vec3::new(1.0, -1.0, 0.0).normalize();
        let refracted = v.refract_through(Vec3::Y, 1.0 / 1.5);
        // Entering a denser medium: smaller tangential component.
        assert!(refracted.x.abs() < v.x.abs());
        assert!(refracted.y < 0.0);
    }

    #[test]
    fn test_transform_aabb_translation() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let moved = Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)).transform_aabb(&aabb);

        assert!((moved.x.min - 2.0).abs() < 1e-5);
        assert!((moved.x.max - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_transform_aabb_rotation() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let rotated = Mat4::from_rotation_y(FRAC_PI_2).transform_aabb(&aabb);

        // Quarter turn about Y swaps the X and Z extents.
        assert!((rotated.z.size() - 2.0).abs() < 1e-4);
        assert!((rotated.x.size() - 1.0).abs() < 1e-4);
    }
}
