use crate::{quadratic, Bounds3f, Float, Point3f, Ray, Vec3f};
use cgmath::InnerSpace;

/// Geometry and shading data at a ray-primitive intersection.
#[derive(Debug, Copy, Clone)]
pub struct SurfaceHit {
    pub t: Float,
    pub p: Point3f,
    /// Outward geometric normal, unit length.
    pub n: Vec3f,
    /// Index into the scene's material list.
    pub material: usize,
}

#[derive(Debug, Copy, Clone)]
pub struct Sphere {
    pub center: Point3f,
    pub radius: Float,
}

impl Sphere {
    pub fn bounds(&self) -> Bounds3f {
        let r = vec3f!(self.radius, self.radius, self.radius);
        Bounds3f::with_bounds(self.center - r, self.center + r)
    }

    /// Nearest intersection parameter in `(0, ray.t_max)`, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<Float> {
        let oc = ray.origin - self.center;
        let a = ray.dir.magnitude2();
        let b = 2.0 * oc.dot(ray.dir);
        let c = oc.magnitude2() - self.radius * self.radius;
        let (t0, t1) = quadratic(a, b, c)?;
        for &t in &[t0, t1] {
            if t > 0.0 && t < ray.t_max {
                return Some(t);
            }
        }
        None
    }

    pub fn normal_at(&self, p: Point3f) -> Vec3f {
        (p - self.center) / self.radius
    }
}

/// A shape bound to its material slot.
#[derive(Debug, Copy, Clone)]
pub struct Primitive {
    pub sphere: Sphere,
    pub material: usize,
}

impl Primitive {
    pub fn bounds(&self) -> Bounds3f {
        self.sphere.bounds()
    }

    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let t = self.sphere.intersect(ray)?;
        let p = ray.at(t);
        Some(SurfaceHit {
            t,
            p,
            n: self.sphere.normal_at(p),
            material: self.material,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sphere_hit_front() {
        let s = Sphere {
            center: point3f!(0, 0, 0),
            radius: 1.0,
        };
        let ray = Ray::new(point3f!(0, 0, 5), vec3f!(0, 0, -1));
        let t = s.intersect(&ray).unwrap();
        assert_abs_diff_eq!(t, 4.0, epsilon = 1e-4);
        assert_abs_diff_eq!(s.normal_at(ray.at(t)).z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_sphere_inside_hits_far_side() {
        let s = Sphere {
            center: point3f!(0, 0, 0),
            radius: 2.0,
        };
        let ray = Ray::new(point3f!(0, 0, 0), vec3f!(0, 0, 1));
        let t = s.intersect(&ray).unwrap();
        assert_abs_diff_eq!(t, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_sphere_miss_and_t_max() {
        let s = Sphere {
            center: point3f!(0, 0, 0),
            radius: 1.0,
        };
        assert!(s
            .intersect(&Ray::new(point3f!(0, 3, 5), vec3f!(0, 0, -1)))
            .is_none());
        let mut short = Ray::new(point3f!(0, 0, 5), vec3f!(0, 0, -1));
        short.t_max = 2.0;
        assert!(s.intersect(&short).is_none());
    }
}
