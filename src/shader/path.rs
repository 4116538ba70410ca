use super::{cosine_sample_hemisphere, faceforward, sample_point_lights, Estimator};
use crate::sampler::SampleStream;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use crate::{spawn_ray, Float, Ray};

/// Unidirectional path tracer: next-event estimation against the point
/// lights at every bounce, cosine-weighted diffuse continuations,
/// straight-through transmission, and Russian roulette once the path's
/// throughput stops mattering.
pub struct PathTracer {
    pub max_bounces: u32,
    /// Throughput level below which Russian roulette starts killing paths.
    pub rr_threshold: Float,
    pub environment: Spectrum,
    pub envmap_invisible: bool,
    pub shadow_notransmission: bool,
}

impl PathTracer {
    pub fn new(environment: Spectrum, envmap_invisible: bool, shadow_notransmission: bool) -> Self {
        Self {
            max_bounces: 16,
            rr_threshold: 0.1,
            environment,
            envmap_invisible,
            shadow_notransmission,
        }
    }
}

impl Estimator for PathTracer {
    fn incident_radiance(
        &self,
        primary: Ray,
        scene: &Scene,
        stream: &mut SampleStream,
    ) -> (Spectrum, Float) {
        let mut radiance = Spectrum::black();
        let mut throughput = Spectrum::uniform(1.0);
        let mut alpha = 1.0;
        let mut ray = primary;

        for bounce in 0..self.max_bounces {
            let hit = match scene.intersect(&ray) {
                Some(hit) => hit,
                None => {
                    // Escaped rays pick up the environment. With
                    // `envmap_invisible` primary escapes see nothing, but the
                    // environment still lights the scene through indirect
                    // bounces.
                    if bounce > 0 || !self.envmap_invisible {
                        radiance += throughput * self.environment;
                    }
                    if bounce == 0 {
                        alpha = if self.envmap_invisible { 0.0 } else { 1.0 };
                    }
                    break;
                }
            };

            let mat = scene.material(&hit);
            let n = faceforward(hit.n, ray.dir);

            // Point lights are not geometry, so adding emission here can
            // never double count against next-event estimation.
            radiance += throughput * mat.emission;
            radiance += throughput
                * sample_point_lights(scene, hit.p, n, mat.diffuse, self.shadow_notransmission);

            let kt = mat.transmission.mean();
            if kt > 0.0 && stream.next_1d() < kt {
                throughput *= mat.transmission / kt;
                ray = spawn_ray(hit.p, n, ray.dir);
            } else if !mat.diffuse.is_black() {
                // Cosine-weighted sampling: the cos/pdf factor cancels,
                // leaving the albedo (reweighted for the unchosen
                // transmission lobe).
                throughput *= mat.diffuse / (1.0 - kt);
                let wi = cosine_sample_hemisphere(n, stream.next_2d());
                ray = spawn_ray(hit.p, n, wi);
            } else {
                break;
            }

            if bounce >= 3 && throughput.max_component() < self.rr_threshold {
                let q = throughput.max_component().max(1e-3);
                if stream.next_1d() >= q {
                    break;
                }
                throughput /= q;
            }
            debug_assert!(!throughput.has_nans());
        }

        (radiance, alpha)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::camera::Camera;
    use crate::light::PointLight;
    use crate::material::Material;
    use crate::sampler::{SamplerBank, SamplerKind};
    use crate::scene::Scene;
    use crate::shape::{Primitive, Sphere};
    use crate::Point2i;

    fn one_sphere_scene(lights: Vec<PointLight>) -> Scene {
        Scene::new(
            vec![Primitive {
                sphere: Sphere {
                    center: point3f!(0, 0, 0),
                    radius: 1.0,
                },
                material: 0,
            }],
            vec![Material::matte(Spectrum::uniform(0.5))],
            lights,
            vec![Camera::look_at(
                point3f!(0, 0, 5),
                point3f!(0, 0, 0),
                vec3f!(0, 1, 0),
                0.8,
                1.0,
            )],
            Spectrum::black(),
        )
    }

    fn bank() -> SamplerBank {
        SamplerBank::new(SamplerKind::Uniform, 16, 0)
    }

    #[test]
    fn test_lit_sphere_is_brighter_than_unlit() {
        let lit = one_sphere_scene(vec![PointLight {
            position: point3f!(0, 0, 5),
            intensity: Spectrum::uniform(50.0),
        }]);
        let unlit = one_sphere_scene(vec![]);
        let tracer = PathTracer::new(Spectrum::black(), false, false);

        let bank = bank();
        let pixel = Point2i::new(0, 0);
        let ray = Ray::new(point3f!(0, 0, 5), vec3f!(0, 0, -1));

        let (l_lit, a) = tracer.incident_radiance(ray, &lit, &mut bank.stream(pixel, 0));
        let (l_unlit, _) = tracer.incident_radiance(ray, &unlit, &mut bank.stream(pixel, 0));
        assert_eq!(a, 1.0);
        assert!(l_lit.mean() > l_unlit.mean());
    }

    #[test]
    fn test_escape_honors_envmap_invisible() {
        let scene = one_sphere_scene(vec![]);
        let env = Spectrum::new(0.25, 0.5, 0.75);
        let miss = Ray::new(point3f!(0, 10, 5), vec3f!(0, 0, -1));

        let bank = bank();
        let pixel = Point2i::new(0, 0);
        let visible = PathTracer::new(env, false, false);
        let (l, a) = visible.incident_radiance(miss, &scene, &mut bank.stream(pixel, 0));
        assert_eq!(l, env);
        assert_eq!(a, 1.0);

        let invisible = PathTracer::new(env, true, false);
        let (l, a) = invisible.incident_radiance(miss, &scene, &mut bank.stream(pixel, 0));
        assert!(l.is_black());
        assert_eq!(a, 0.0);
    }
}
