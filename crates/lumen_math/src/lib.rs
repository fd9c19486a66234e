//! Lumen math - vectors, rays, intervals and bounding boxes.
//!
//! Vectors come from glam; `Point3` and `Color` are aliases of `Vec3`
//! that only document intent.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod onb;
mod ray;
pub mod sampling;
mod transform;

pub use aabb::{Aabb, AABB_MIN_WIDTH};
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use transform::{Mat4Ext, Vec3Ext};

/// A position in space.
pub type Point3 = Vec3;

/// Linear RGB. Channels may leave [0, 1] (or go NaN) while integrating.
pub type Color = Vec3;
