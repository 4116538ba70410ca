use super::{faceforward, Estimator};
use crate::sampler::SampleStream;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use crate::{Float, Ray};
use cgmath::InnerSpace;

/// Headlight-style preview shader: a single local term from the camera
/// direction plus emission and the flat environment, no secondary rays.
/// Scene lights are deliberately ignored, which makes it both fast and
/// useful for inspecting geometry.
pub struct Eyelight {
    pub environment: Spectrum,
    pub envmap_invisible: bool,
}

impl Estimator for Eyelight {
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
                let cos = n.dot(-ray.dir).max(0.0);
                let radiance =
                    mat.emission + mat.diffuse * (Spectrum::uniform(cos) + self.environment);
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

#[cfg(test)]
mod test {
    use super::*;
    use crate::camera::Camera;
    use crate::light::PointLight;
    use crate::material::Material;
    use crate::sampler::{SamplerBank, SamplerKind};
    use crate::shape::{Primitive, Sphere};
    use crate::Point2i;
    use approx::assert_abs_diff_eq;

    fn scene_with_lights(lights: Vec<PointLight>) -> Scene {
        Scene::new(
            vec![Primitive {
                sphere: Sphere {
                    center: point3f!(0, 0, 0),
                    radius: 1.0,
                },
                material: 0,
            }],
            vec![Material::matte(Spectrum::uniform(0.6))],
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

    #[test]
    fn test_head_on_surface_gets_full_cosine() {
        let scene = scene_with_lights(vec![]);
        let shader = Eyelight {
            environment: Spectrum::black(),
            envmap_invisible: false,
        };
        let bank = SamplerBank::new(SamplerKind::Uniform, 4, 0);
        let ray = Ray::new(point3f!(0, 0, 5), vec3f!(0, 0, -1));
        let (l, a) = shader.incident_radiance(ray, &scene, &mut bank.stream(Point2i::new(0, 0), 0));
        assert_eq!(a, 1.0);
        // Normal faces the camera dead on, so the term is exactly the albedo.
        assert_abs_diff_eq!(l[0], 0.6, epsilon = 1e-5);
    }

    #[test]
    fn test_scene_lights_do_not_matter() {
        let dark = scene_with_lights(vec![]);
        let lit = scene_with_lights(vec![PointLight {
            position: point3f!(0, 4, 0),
            intensity: Spectrum::uniform(100.0),
        }]);
        let shader = Eyelight {
            environment: Spectrum::black(),
            envmap_invisible: false,
        };
        let bank = SamplerBank::new(SamplerKind::Uniform, 4, 0);
        let ray = Ray::new(point3f!(0, 0, 5), vec3f!(0, 0, -1));
        let (a, _) = shader.incident_radiance(ray, &dark, &mut bank.stream(Point2i::new(0, 0), 0));
        let (b, _) = shader.incident_radiance(ray, &lit, &mut bank.stream(Point2i::new(0, 0), 0));
        assert_eq!(a, b);
    }
}
