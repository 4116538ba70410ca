use crate::{Float, Point2f, Point3f, Ray, Vec3f};
use cgmath::InnerSpace;

/// Perspective look-at camera. The render core treats this as an opaque ray
/// source; the only state it exposes beyond ray generation is the aspect
/// ratio the output width is derived from.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point3f,
    right: Vec3f,
    up: Vec3f,
    back: Vec3f,
    yfov: Float,
    aspect: Float,
}

impl Camera {
    pub fn look_at(from: Point3f, to: Point3f, up: Vec3f, yfov: Float, aspect: Float) -> Self {
        let back = (from - to).normalize();
        let right = up.cross(back).normalize();
        let up = back.cross(right);
        Self {
            origin: from,
            right,
            up,
            back,
            yfov,
            aspect,
        }
    }

    pub fn aspect(&self) -> Float {
        self.aspect
    }

    /// Primary ray through the normalized film point `uv` in `[0,1)^2`,
    /// `(0,0)` at the top-left corner.
    pub fn generate_ray(&self, uv: Point2f) -> Ray {
        let h = 2.0 * (0.5 * self.yfov).tan();
        let w = h * self.aspect;
        let dir = self.right * (w * (uv.x - 0.5)) + self.up * (h * (0.5 - uv.y)) - self.back;
        Ray::new(self.origin, dir.normalize())
    }
}
