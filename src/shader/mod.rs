use crate::light::LiSample;
use crate::sampler::SampleStream;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use crate::{coordinate_system, spawn_ray, Float, Point2f, Point3f, Ray, Vec3f};
use cgmath::InnerSpace;
use std::f32::consts::{FRAC_1_PI, PI};
use std::str::FromStr;

pub mod direct;
pub mod eyelight;
pub mod path;

pub use direct::DirectLighting;
pub use eyelight::Eyelight;
pub use path::PathTracer;

/// Path estimation strategy. Closed set mirrored by the `--shader` CLI
/// option.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderKind {
    Pathtrace,
    Eyelight,
    Direct,
}

impl ShaderKind {
    pub const VARIANTS: &'static [&'static str] = &["pathtrace", "eyelight", "direct"];
}

impl Default for ShaderKind {
    fn default() -> Self {
        ShaderKind::Pathtrace
    }
}

impl FromStr for ShaderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pathtrace" => Ok(ShaderKind::Pathtrace),
            "eyelight" => Ok(ShaderKind::Eyelight),
            "direct" => Ok(ShaderKind::Direct),
            other => Err(anyhow::anyhow!("unknown shader type: {}", other)),
        }
    }
}

/// A radiance estimation strategy. Every strategy answers the same question
/// for a primary ray: what radiance arrives along it, and how much of the
/// background it covers (alpha).
pub trait Estimator: Send + Sync {
    fn incident_radiance(
        &self,
        ray: Ray,
        scene: &Scene,
        stream: &mut SampleStream,
    ) -> (Spectrum, Float);
}

const MAX_SHADOW_SEGMENTS: usize = 32;

/// Fraction of light surviving along the shadow ray from `p` towards a
/// sampled light. With `notransmission` set, any intersection is full
/// occlusion; otherwise transmissive surfaces attenuate and the walk
/// continues behind them.
pub(crate) fn shadow_transmittance(
    scene: &Scene,
    p: Point3f,
    n: Vec3f,
    li: &LiSample,
    notransmission: bool,
) -> Spectrum {
    let mut ray = spawn_ray(p, n, li.wi);
    // Stop short of the light position itself.
    ray.t_max = li.dist - 1e-3;

    if notransmission {
        return if scene.intersect_test(&ray) {
            Spectrum::black()
        } else {
            Spectrum::uniform(1.0)
        };
    }

    let mut tr = Spectrum::uniform(1.0);
    for _ in 0..MAX_SHADOW_SEGMENTS {
        let hit = match scene.intersect(&ray) {
            None => return tr,
            Some(hit) => hit,
        };
        let mat = scene.material(&hit);
        if !mat.is_transmissive() {
            return Spectrum::black();
        }
        tr *= mat.transmission;
        let remaining = ray.t_max - hit.t;
        if remaining <= 0.0 {
            return tr;
        }
        ray = spawn_ray(hit.p, hit.n, ray.dir);
        ray.t_max = remaining;
    }
    tr
}

/// Direct illumination from the scene's point lights on a Lambertian
/// surface with the given albedo.
pub(crate) fn sample_point_lights(
    scene: &Scene,
    p: Point3f,
    n: Vec3f,
    diffuse: Spectrum,
    notransmission: bool,
) -> Spectrum {
    let mut radiance = Spectrum::black();
    if diffuse.is_black() {
        return radiance;
    }
    for light in &scene.lights {
        let li = light.sample_li(p);
        let cos = li.wi.dot(n);
        if cos <= 0.0 || li.radiance.is_black() {
            continue;
        }
        let tr = shadow_transmittance(scene, p, n, &li, notransmission);
        if tr.is_black() {
            continue;
        }
        radiance += diffuse * FRAC_1_PI * tr * li.radiance * cos;
    }
    radiance
}

/// Cosine-weighted direction on the hemisphere around the unit normal `n`.
pub(crate) fn cosine_sample_hemisphere(n: Vec3f, u: Point2f) -> Vec3f {
    let (t, b) = coordinate_system(n);
    let r = u.x.sqrt();
    let phi = 2.0 * PI * u.y;
    let z = (1.0 - u.x).max(0.0).sqrt();
    (t * (r * phi.cos()) + b * (r * phi.sin()) + n * z).normalize()
}

/// Flips the shading normal to face the incoming ray.
pub(crate) fn faceforward(n: Vec3f, dir: Vec3f) -> Vec3f {
    if n.dot(dir) > 0.0 {
        -n
    } else {
        n
    }
}
