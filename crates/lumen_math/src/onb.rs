use crate::Vec3;

/// Orthonormal basis built around a single direction.
///
/// `w` is the supplied direction; `u` and `v` complete a right-handed frame.
/// Used to carry local-frame samples (cosine lobes, cones) into world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Onb {
    pub fn new(n: Vec3) -> Self {
        let w = n.normalize();
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    /// Map local coordinates `(x, y, z)` onto `x*u + y*v + z*w`.
    #[inline]
    pub fn transform(&self, local: Vec3) -> Vec3 {
        local.x * self.u + local.y * self.v + local.z * self.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(onb: &Onb) {
        assert!((onb.u.length() - 1.0).abs() < 1e-5);
        assert!((onb.v.length() - 1.0).abs() < 1e-5);
        assert!((onb.w.length() - 1.0).abs() < 1e-5);
        assert!(onb.u.dot(onb.v).abs() < 1e-5);
        assert!(onb.u.dot(onb.w).abs() < 1e-5);
        assert!(onb.v.dot(onb.w).abs() < 1e-5);
    }

    #[test]
    fn test_onb_is_orthonormal() {
        for n in [
            Vec3::X,
            Vec3::Y,
            Vec3::NEG_Z,
            Vec3::new(0.3, -2.0, 5.0),
            Vec3::new(0.95, 0.1, 0.0),
        ] {
            let onb = Onb::new(n);
            assert_orthonormal(&onb);
            assert!((onb.w - n.normalize()).length() < 1e-5);
        }
    }

    #[test]
    fn test_onb_transform_z_maps_to_w() {
        let onb = Onb::new(Vec3::new(1.0, 2.0, 3.0));
        let mapped = onb.transform(Vec3::Z);
        assert!((mapped - onb.w).length() < 1e-6);
    }
}
