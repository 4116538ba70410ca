use super::{faceforward, sample_point_lights, Estimator};
use crate::sampler::SampleStream;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use crate::{Float, Ray};

/// First-hit direct lighting: emission, next-event estimation against the
/// point lights, and the constant environment response of a Lambertian
/// surface. No indirect bounces.
pub struct DirectLighting {
    pub environment: Spectrum,
    pub envmap_invisible: bool,
    pub shadow_notransmission: bool,
}

impl Estimator for DirectLighting {
    fn incident_radiance(
        &self,
        ray: Ray,
        scene: &Scene,
        _stream: &mut SampleStream,
    ) -> (Spectrum, Float) {
        match scene.intersect(&ray) {
            Some(hit) => {
                let mat = scene.material(&hit);
                let n = faceforward(hit.n, ray.dir);
                let mut radiance = mat.emission;
                radiance +=
                    sample_point_lights(scene, hit.p, n, mat.diffuse, self.shadow_notransmission);
                // A constant environment integrates against the cosine lobe
                // to exactly the albedo.
                radiance += mat.diffuse * self.environment;
                (radiance, 1.0)
            }
            None => {
                if self.envmap_invisible {
                    (Spectrum::black(), 0.0)
                } else {
                    (self.environment, 1.0)
                }
            }
        }
    }
}
