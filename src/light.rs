use crate::spectrum::Spectrum;
use crate::{Float, Point3f, Vec3f};
use cgmath::InnerSpace;

/// Incident illumination sampled at a shading point: the radiance arriving,
/// the unit direction towards the light, and the distance used to clip the
/// shadow ray.
#[derive(Debug, Copy, Clone)]
pub struct LiSample {
    pub radiance: Spectrum,
    pub wi: Vec3f,
    pub dist: Float,
}

#[derive(Debug, Clone)]
pub struct PointLight {
    pub position: Point3f,
    pub intensity: Spectrum,
}

impl PointLight {
    pub fn sample_li(&self, p: Point3f) -> LiSample {
        let d = self.position - p;
        let dist2 = d.magnitude2();
        let dist = dist2.sqrt();
        LiSample {
            radiance: self.intensity / dist2,
            wi: d / dist,
            dist,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_inverse_square_falloff() {
        let light = PointLight {
            position: point3f!(0, 4, 0),
            intensity: Spectrum::uniform(16.0),
        };
        let near = light.sample_li(point3f!(0, 2, 0));
        let far = light.sample_li(point3f!(0, 0, 0));
        assert_abs_diff_eq!(near.radiance[0], 4.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.radiance[0], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.wi.y, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(far.dist, 4.0, epsilon = 1e-5);
    }
}
