use crate::{Float, Point2i, Point3f, Ray, Vec2i, Vec3f};

/// Half-open integer rectangle `[min.x, max.x) x [min.y, max.y)`. Used both
/// for full image extents and for the scheduling blocks cut out of them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Bounds2i {
    pub min: Point2i,
    pub max: Point2i,
}

impl Bounds2i {
    pub fn with_bounds(min: Point2i, max: Point2i) -> Self {
        Self { min, max }
    }

    pub fn with_dims(width: i32, height: i32) -> Self {
        Self {
            min: Point2i::new(0, 0),
            max: Point2i::new(width, height),
        }
    }

    pub fn dims(&self) -> Vec2i {
        self.max - self.min
    }

    pub fn area(&self) -> i32 {
        let d = self.dims();
        (d.x * d.y).max(0)
    }

    pub fn contains(&self, p: Point2i) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            min: Point2i::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point2i::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        }
    }

    /// Row-major iteration over every pixel coordinate in the bounds.
    pub fn iter_points(&self) -> impl Iterator<Item = Point2i> {
        let (min, max) = (self.min, self.max);
        (min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| Point2i::new(x, y)))
    }

    /// Cuts the bounds into blocks of side `block_size` in row-major order.
    /// Blocks on the right and bottom edges are clipped, so the blocks are
    /// pairwise disjoint and cover the bounds exactly.
    pub fn iter_blocks(&self, block_size: i32) -> impl Iterator<Item = Bounds2i> {
        assert!(block_size > 0);
        let (min, max) = (self.min, self.max);
        (min.y..max.y)
            .step_by(block_size as usize)
            .flat_map(move |y0| {
                (min.x..max.x).step_by(block_size as usize).map(move |x0| {
                    Bounds2i::with_bounds(
                        Point2i::new(x0, y0),
                        Point2i::new((x0 + block_size).min(max.x), (y0 + block_size).min(max.y)),
                    )
                })
            })
    }
}

/// Axis-aligned box in world space, used by the BVH.
#[derive(Debug, Copy, Clone)]
pub struct Bounds3f {
    pub min: Point3f,
    pub max: Point3f,
}

impl Bounds3f {
    pub fn empty() -> Self {
        Self {
            min: point3f!(crate::INFINITY, crate::INFINITY, crate::INFINITY),
            max: point3f!(-crate::INFINITY, -crate::INFINITY, -crate::INFINITY),
        }
    }

    pub fn with_bounds(min: Point3f, max: Point3f) -> Self {
        Self { min, max }
    }

    pub fn join(&self, other: &Self) -> Self {
        Self {
            min: point3f!(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z)
            ),
            max: point3f!(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z)
            ),
        }
    }

    pub fn join_point(&self, p: Point3f) -> Self {
        Self {
            min: point3f!(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z)),
            max: point3f!(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z)),
        }
    }

    pub fn centroid(&self) -> Point3f {
        point3f!(
            0.5 * (self.min.x + self.max.x),
            0.5 * (self.min.y + self.max.y),
            0.5 * (self.min.z + self.max.z)
        )
    }

    /// Index of the axis along which the bounds are widest.
    pub fn max_extent(&self) -> usize {
        let d = self.max - self.min;
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Slab test against a ray with precomputed reciprocal direction.
    pub fn intersect_test(&self, ray: &Ray, inv_dir: Vec3f) -> bool {
        let mut t0: Float = 0.0;
        let mut t1 = ray.t_max;
        for axis in 0..3 {
            let mut t_near = (self.min[axis] - ray.origin[axis]) * inv_dir[axis];
            let mut t_far = (self.max[axis] - ray.origin[axis]) * inv_dir[axis];
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            t0 = t0.max(t_near);
            t1 = t1.min(t_far);
            if t0 > t1 {
                return false;
            }
        }
        true
    }
}
