use crate::{Float, Point3f, Vec3f, INFINITY, RAY_EPSILON};
use cgmath::InnerSpace;

pub mod bounds;

pub use bounds::*;

#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub origin: Point3f,
    pub dir: Vec3f,
    pub t_max: Float,
}

impl Ray {
    pub fn new(origin: Point3f, dir: Vec3f) -> Self {
        Self {
            origin,
            dir,
            t_max: INFINITY,
        }
    }

    pub fn at(&self, t: Float) -> Point3f {
        self.origin + (self.dir * t)
    }
}

/// Offsets a ray origin off the surface at `p` so that secondary rays do not
/// re-intersect the geometry they originate from.
pub fn offset_ray_origin(p: Point3f, n: Vec3f, dir: Vec3f) -> Point3f {
    if dir.dot(n) < 0.0 {
        p - n * RAY_EPSILON
    } else {
        p + n * RAY_EPSILON
    }
}

pub fn spawn_ray(p: Point3f, n: Vec3f, dir: Vec3f) -> Ray {
    Ray::new(offset_ray_origin(p, n, dir), dir)
}

/// Builds an orthonormal basis around `v`. `v` must be normalized.
pub fn coordinate_system(v: Vec3f) -> (Vec3f, Vec3f) {
    let v2 = if v.x.abs() > v.y.abs() {
        Vec3f::new(-v.z, 0.0, v.x) / (v.x * v.x + v.z * v.z).sqrt()
    } else {
        Vec3f::new(0.0, v.z, -v.y) / (v.y * v.y + v.z * v.z).sqrt()
    };
    (v2, v.cross(v2))
}
